//! Passes that run before the lexicons.
//!
//! External parsers lemmatize pronouns to a placeholder (`-PRON-`) or to the
//! masculine base form, and plural nouns of the DSH vocabulary inconsistently.
//! [`LemmaCorrector`] restores the forms the lexicons and rules are written
//! against. [`DateTokenAnnotator`] marks dates as past time context.

use crate::labels::TIME;
use layered_rules::{Attr, Doc, Label, Resolver};
use once_cell::sync::Lazy;
use regex::Regex;

/// Pronouns whose lemma is their lowercase form.
const PRONOUNS: &[&str] = &[
    "she", "her", "herself", "he", "him", "his", "himself", "they", "them", "their",
    "themselves", "themself",
];

/// Plural forms some parsers leave unlemmatized.
const PLURALS: &[(&str, &str)] = &[("overdoses", "overdose"), ("ods", "od")];

#[derive(Debug, Default, Clone, Copy)]
pub struct LemmaCorrector;

impl Resolver for LemmaCorrector {
    fn go(&self, doc: &mut Doc) {
        let mut fixes = Vec::new();
        for (i, token) in doc.tokens().iter().enumerate() {
            let lower = token.lower.as_str();
            let lemma = if PRONOUNS.contains(&lower) {
                Some(lower)
            } else {
                PLURALS
                    .iter()
                    .find(|(plural, _)| *plural == lower)
                    .map(|(_, singular)| *singular)
            };
            if let Some(lemma) = lemma.filter(|lemma| *lemma != token.lemma) {
                fixes.push((i, lemma.to_string()));
            }
        }
        for (i, lemma) in fixes {
            doc.set_lemma(i, lemma);
        }
    }
}

// yyyy, dd/mm/yy(yy), dd.mm.yy(yy)
static DATE: Lazy<Regex> = Lazy::new(|| {
    let day = r"(0?[1-9]|[12][0-9]|3[01])";
    let month = r"(0[1-9]|1[012])";
    let year = r"((19|20)[0-9][0-9]|[0-9][0-9])";
    Regex::new(&format!(
        r"^((19|20)[0-9][0-9]|{day}/{month}/{year}|{day}\.{month}\.{year})$"
    ))
    .unwrap()
});

/// Sets `TIME = TIME` on tokens whose lemma is a year or a numeric date.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTokenAnnotator;

impl DateTokenAnnotator {
    pub fn is_date(lemma: &str) -> bool {
        DATE.is_match(lemma)
    }
}

impl Resolver for DateTokenAnnotator {
    fn go(&self, doc: &mut Doc) {
        let dates: Vec<usize> = doc
            .tokens()
            .iter()
            .enumerate()
            .filter(|(_, token)| Self::is_date(&token.lemma))
            .map(|(i, _)| i)
            .collect();
        for i in dates {
            doc.set_attr(i, Attr::Time, Some(Label::from_static(TIME)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_rules::Token;

    fn doc(words: &[(&str, &str)]) -> Doc {
        let text = words.iter().map(|(w, _)| *w).collect::<Vec<_>>().join(" ");
        let mut offset = 0;
        let tokens = words
            .iter()
            .enumerate()
            .map(|(i, (word, lemma))| {
                let mut token = Token::new(*word, offset);
                token.lemma = lemma.to_string();
                if i + 1 < words.len() {
                    token.whitespace = " ".to_string();
                }
                offset += word.len() + 1;
                token
            })
            .collect();
        Doc::new(text, tokens).unwrap()
    }

    #[test]
    fn pronoun_and_plural_lemmas() {
        let doc = doc(&[("She", "-PRON-"), ("took", "take"), ("overdoses", "overdoses"), ("herself", "-PRON-")])
            .run_resolver(&LemmaCorrector);
        let lemmas: Vec<&str> = doc.tokens().iter().map(|t| t.lemma.as_str()).collect();
        assert_eq!(lemmas, vec!["she", "take", "overdose", "herself"]);
    }

    #[test]
    fn dates() {
        for date in ["1998", "2019", "3/04/19", "03/04/2019", "31.12.99"] {
            assert!(DateTokenAnnotator::is_date(date), "{}", date);
        }
        for other in ["15", "205", "50mg", "32/01/19", "1/13/2019", "3/4/19"] {
            assert!(!DateTokenAnnotator::is_date(other), "{}", other);
        }
    }

    #[test]
    fn date_tokens_get_time() {
        let doc = doc(&[("overdose", "overdose"), ("in", "in"), ("2015", "2015")])
            .run_resolver(&DateTokenAnnotator);
        assert!(doc[2].attrs.is(Attr::Time, TIME));
        assert!(!doc[0].attrs.is_set(Attr::Time));
    }
}
