//! Tokenizer special cases ("detokenization rules").
//!
//! Each line reads `orth<TAB>lemma<TAB>tag<TAB>pos`; `_` leaves the tag or
//! part of speech to the tagger. A chunk of text equal to `orth` (ignoring
//! case) is kept as one token with the given lemma.

use crate::errors::LexiconError;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialCase {
    pub orth: String,
    pub lemma: String,
    pub tag: Option<String>,
    pub pos: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SpecialCases {
    by_lower: HashMap<String, SpecialCase>,
}

impl SpecialCases {
    /// Any line without exactly four fields is an error.
    pub fn parse(source_name: &str, text: &str) -> Result<SpecialCases, LexiconError> {
        let mut by_lower = HashMap::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 4 {
                return Err(LexiconError::MalformedSpecialCase {
                    source_name: source_name.to_string(),
                    line: i + 1,
                    found: fields.len(),
                });
            }
            let optional = |value: &str| (value != "_").then(|| value.to_string());
            let case = SpecialCase {
                orth: fields[0].to_string(),
                lemma: fields[1].to_string(),
                tag: optional(fields[2]),
                pos: optional(fields[3]),
            };
            by_lower.insert(case.orth.to_lowercase(), case);
        }
        log::info!("{}: {} tokenization rules", source_name, by_lower.len());
        Ok(SpecialCases { by_lower })
    }

    pub fn get(&self, chunk: &str) -> Option<&SpecialCase> {
        self.by_lower.get(&chunk.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.by_lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_lower.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rules() {
        let cases = SpecialCases::parse(
            "rules",
            "# orth lemma tag pos\nself-harmed\tself-harm\tVBD\tVERB\nh/o\th/o\t_\t_\n",
        )
        .unwrap();
        assert_eq!(cases.len(), 2);
        let harmed = cases.get("Self-harmed").unwrap();
        assert_eq!(harmed.lemma, "self-harm");
        assert_eq!(harmed.pos.as_deref(), Some("VERB"));
        assert_eq!(cases.get("h/o").unwrap().tag, None);
    }

    #[test]
    fn rejects_short_lines() {
        let err = SpecialCases::parse("rules", "self-harm\tself-harm\n").unwrap_err();
        assert!(matches!(err, LexiconError::MalformedSpecialCase { line: 1, found: 2, .. }));
    }
}
