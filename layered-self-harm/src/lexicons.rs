//! The default lexicons and tokenizer rules.
//!
//! Every table ships inside the crate. A `lexicon_dir` may override any of
//! them file by file; tables missing from the directory fall back to the
//! built-in text.

use crate::errors::{AnnotatorError, Result};
use layered_rules::{Attr, LexicalAnnotator, Lexicon, MatchKey, SpecialCases};
use std::path::Path;

/// One lexicon of the pipeline: where it comes from, what it matches on and
/// which channel it writes.
#[derive(Debug, Clone, Copy)]
pub struct LexiconSpec {
    pub name: &'static str,
    pub file: &'static str,
    pub key: MatchKey,
    pub attr: Attr,
    builtin: &'static str,
}

macro_rules! lexicon {
    ($name:literal, $key:ident, $attr:ident) => {
        LexiconSpec {
            name: $name,
            file: concat!($name, "_lex.txt"),
            key: MatchKey::$key,
            attr: Attr::$attr,
            builtin: include_str!(concat!("../resources/", $name, "_lex.txt")),
        }
    };
}

/// Application order matters: later lexicons overwrite the `LA` labels of
/// earlier ones on shared tokens.
pub const LEXICONS: &[LexiconSpec] = &[
    lexicon!("history_type", Lower, La),
    lexicon!("dsh", Lemma, Dsh),
    lexicon!("time_past", Lower, Time),
    lexicon!("time_present", Lemma, Time),
    lexicon!("time_life_stage", Lemma, Time),
    lexicon!("negation", Lemma, Neg),
    lexicon!("modality", Lemma, Modality),
    lexicon!("hedging", Lemma, Hedging),
    lexicon!("intent", Lemma, La),
    lexicon!("body_part", Lemma, La),
    lexicon!("harm_action", Lemma, La),
    lexicon!("harm_action_type", Lemma, HaType),
    lexicon!("med", Lemma, La),
];

pub const DETOKENIZATION_RULES_FILE: &str = "detokenization_rules.txt";

const DETOKENIZATION_RULES: &str = include_str!("../resources/detokenization_rules.txt");

impl LexiconSpec {
    pub fn load(&self, dir: Option<&Path>, strict: bool) -> Result<Lexicon> {
        if let Some(path) = dir.map(|dir| dir.join(self.file)).filter(|path| path.is_file()) {
            return Ok(Lexicon::load(&path, strict)?);
        }
        Ok(Lexicon::parse(self.name, self.builtin, strict)?)
    }

    pub fn annotator(&self, dir: Option<&Path>, strict: bool) -> Result<LexicalAnnotator> {
        Ok(LexicalAnnotator::new(self.load(dir, strict)?, self.key, self.attr))
    }
}

/// Annotators for [`LEXICONS`], in order.
pub fn load_annotators(dir: Option<&Path>, strict: bool) -> Result<Vec<LexicalAnnotator>> {
    LEXICONS.iter().map(|spec| spec.annotator(dir, strict)).collect()
}

pub fn load_special_cases(dir: Option<&Path>) -> Result<SpecialCases> {
    if let Some(path) = dir
        .map(|dir| dir.join(DETOKENIZATION_RULES_FILE))
        .filter(|path| path.is_file())
    {
        let text = std::fs::read_to_string(&path).map_err(|source| AnnotatorError::Io {
            path: path.clone(),
            source,
        })?;
        return Ok(SpecialCases::parse(&path.display().to_string(), &text)?);
    }
    Ok(SpecialCases::parse(DETOKENIZATION_RULES_FILE, DETOKENIZATION_RULES)?)
}
