//! Turning raw text into a [`Doc`].
//!
//! Any tokenizer, tagger and parser can feed the rule engine through the
//! [`Analyzer`] trait, or through CoNLL-U files (see [`crate::conllu`]).
//! [`SimpleAnalyzer`] is the self-contained fallback: UAX-29 word
//! segmentation with tokenizer special cases, a rule-based lemmatizer, a
//! dictionary tagger and shallow dependency attachment.

mod lemma;
mod parse;
mod special;
mod tagger;
mod tokenize;

pub use lemma::lemmatize;
pub use special::{SpecialCase, SpecialCases};

use crate::doc::{Doc, Token};
use crate::errors::DocError;

pub trait Analyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Result<Doc, DocError>;
}

#[derive(Debug, Clone, Default)]
pub struct SimpleAnalyzer {
    special_cases: SpecialCases,
}

impl SimpleAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_special_cases(mut self, special_cases: SpecialCases) -> Self {
        self.special_cases = special_cases;
        self
    }

    pub fn special_cases(&self) -> &SpecialCases {
        &self.special_cases
    }
}

impl Analyzer for SimpleAnalyzer {
    fn analyze(&self, text: &str) -> Result<Doc, DocError> {
        let raw = tokenize::tokenize(text, &self.special_cases);
        let tagged = tagger::tag(&raw);
        let sents = parse::sentence_ids(&raw, &tagged);
        let arcs = parse::parse(&raw, &tagged, &sents);

        let tokens = raw
            .into_iter()
            .zip(tagged)
            .enumerate()
            .map(|(i, (raw, tagged))| {
                let mut token = Token::new(raw.text, raw.idx);
                token.whitespace = raw.whitespace;
                token.lemma = tagged.lemma;
                token.pos = tagged.pos;
                token.tag = tagged.tag;
                token.head = arcs.heads[i];
                token.dep = arcs.deps[i].clone();
                token.sent = sents[i];
                token
            })
            .collect();
        Doc::new(text, tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> SimpleAnalyzer {
        let rules = "self-harm\tself-harm\tNN\tNOUN\nself-harmed\tself-harm\tVBD\tVERB\n";
        SimpleAnalyzer::new().with_special_cases(SpecialCases::parse("rules", rules).unwrap())
    }

    #[test]
    fn offsets_and_whitespace_rebuild_the_text() {
        let text = "She  denies\n\nself-harm (cuts).";
        let doc = analyzer().analyze(text).unwrap();
        let rebuilt: String = doc
            .tokens()
            .iter()
            .map(|t| format!("{}{}", t.text, t.whitespace))
            .collect();
        assert_eq!(rebuilt, text);
        assert!(doc.tokens().iter().any(|t| t.is_space()));
    }

    #[test]
    fn every_sentence_has_one_root() {
        let doc = analyzer()
            .analyze("She has self-harmed in the past. Denies current thoughts.\n\nPlan: review")
            .unwrap();
        for sent in doc.sents() {
            let roots = sent.clone().filter(|&i| doc.is_root(i)).count();
            assert_eq!(roots, 1, "{:?}", doc.span_text(sent.clone().into()));
        }
    }

    #[test]
    fn negated_verb_is_an_ancestor() {
        let doc = analyzer().analyze("She denies deliberate self-harm.").unwrap();
        let lemmas: Vec<&str> = doc.ancestors(3).map(|i| doc[i].lemma.as_str()).collect();
        assert_eq!(lemmas, vec!["deny"]);
        assert_eq!(doc[1].dep, "ROOT");
    }

    #[test]
    fn empty_text() {
        let doc = analyzer().analyze("").unwrap();
        assert!(doc.is_empty());
    }
}
