//! From token channels to mention records.

use crate::labels::{dsh_type, DSH, HEDGING, HISTORICAL, MODALITY, NEG, NON_DSH, TIME, UNCERTAIN};
use layered_rules::{Attr, Doc, Span, Token};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

pub const MENTION_CLASS: &str = "SELF-HARM";
pub const ANNOTATOR: &str = "SYSTEM";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Polarity {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "RELEVANT")]
    Relevant,
    #[serde(rename = "NON-RELEVANT")]
    NonRelevant,
    #[serde(rename = "UNCERTAIN")]
    Uncertain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Temporality {
    Current,
    Historical,
}

impl Polarity {
    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Positive => "POSITIVE",
            Polarity::Negative => "NEGATIVE",
        }
    }
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Relevant => "RELEVANT",
            Status::NonRelevant => "NON-RELEVANT",
            Status::Uncertain => "UNCERTAIN",
        }
    }
}

impl Temporality {
    pub fn as_str(self) -> &'static str {
        match self {
            Temporality::Current => "CURRENT",
            Temporality::Historical => "HISTORICAL",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Polarity, Status, Temporality);

/// One detected mention, ready for eHOST or JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionRecord {
    #[serde(skip)]
    pub id: String,
    pub annotator: String,
    pub class: String,
    pub comment: Option<String>,
    /// Character offsets into the document text.
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub dsh_type: String,
    pub polarity: Polarity,
    pub status: Status,
    pub temporality: Temporality,
}

fn is_past(token: &Token) -> bool {
    token.attrs.is(Attr::Time, TIME) || token.attrs.is(Attr::Time, HISTORICAL)
}

impl MentionRecord {
    /// Map the channels of a mention token. Returns `None` when the token is
    /// not a mention.
    pub fn from_token(doc: &Doc, i: usize, id: String) -> Option<MentionRecord> {
        let token = doc.get(i)?;
        let attrs = &token.attrs;
        let mut polarity = Polarity::Positive;
        let mut temporality = Temporality::Current;
        let status = if attrs.is(Attr::Dsh, DSH) {
            let mut status = Status::Relevant;
            if attrs.is(Attr::Neg, NEG) {
                polarity = Polarity::Negative;
                status = Status::NonRelevant;
            }
            if attrs.is(Attr::Modality, MODALITY) {
                status = Status::Uncertain;
            }
            if attrs.is(Attr::Hedging, HEDGING) {
                status = Status::NonRelevant;
            }
            if attrs.is(Attr::Hedging, UNCERTAIN) {
                status = Status::Uncertain;
            }
            status
        } else if attrs.is(Attr::Dsh, NON_DSH) {
            if attrs.is(Attr::Neg, NEG) {
                polarity = Polarity::Negative;
            }
            Status::NonRelevant
        } else {
            return None;
        };
        if is_past(token) {
            temporality = Temporality::Historical;
        }

        Some(MentionRecord {
            id,
            annotator: ANNOTATOR.to_string(),
            class: MENTION_CLASS.to_string(),
            comment: None,
            start: doc.char_offset(token.idx),
            end: doc.char_offset(token.end()),
            text: doc.span_text(Span::single(i)).to_string(),
            dsh_type: attrs
                .get(Attr::DshType)
                .map_or(dsh_type::SELF_HARM, |label| label.as_str())
                .to_string(),
            polarity,
            status,
            temporality,
        })
    }
}

/// The mentions of one document, in document order.
///
/// Serializes as a JSON object keyed by mention id, keeping that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mentions(pub Vec<MentionRecord>);

impl Mentions {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MentionRecord> {
        self.0.iter()
    }

    pub fn get(&self, id: &str) -> Option<&MentionRecord> {
        self.0.iter().find(|record| record.id == id)
    }
}

impl<'a> IntoIterator for &'a Mentions {
    type Item = &'a MentionRecord;
    type IntoIter = std::slice::Iter<'a, MentionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for Mentions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for record in &self.0 {
            map.serialize_entry(&record.id, record)?;
        }
        map.end()
    }
}

pub fn mention_id(n: usize) -> String {
    format!("EHOST_Instance_{}", n)
}

/// One record per mention token, numbered from 1.
pub fn build_output(doc: &Doc) -> Mentions {
    let mut records = Vec::new();
    for i in 0..doc.len() {
        if let Some(record) = MentionRecord::from_token(doc, i, mention_id(records.len() + 1)) {
            records.push(record);
        }
    }
    Mentions(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_rules::{Label, Token};

    fn doc(words: &[&str]) -> Doc {
        let text = words.join(" ");
        let mut offset = 0;
        let mut tokens = Vec::new();
        for (i, word) in words.iter().enumerate() {
            let mut token = Token::new(*word, offset);
            if i + 1 < words.len() {
                token.whitespace = " ".to_string();
            }
            offset += word.len() + 1;
            tokens.push(token);
        }
        Doc::new(text, tokens).unwrap()
    }

    fn mark(doc: &mut Doc, i: usize, attr: Attr, label: &'static str) {
        doc.set_attr(i, attr, Some(Label::from_static(label)));
    }

    #[test]
    fn later_channels_override() {
        let mut doc = doc(&["denies", "overdose", "maybe", "cutting"]);
        mark(&mut doc, 1, Attr::Dsh, DSH);
        mark(&mut doc, 1, Attr::Neg, NEG);
        mark(&mut doc, 1, Attr::Time, HISTORICAL);
        mark(&mut doc, 3, Attr::Dsh, DSH);
        mark(&mut doc, 3, Attr::Modality, MODALITY);
        mark(&mut doc, 3, Attr::DshType, dsh_type::CUTTING);

        let output = build_output(&doc);
        assert_eq!(output.len(), 2);
        let first = output.get("EHOST_Instance_1").unwrap();
        assert_eq!(first.text, "overdose");
        assert_eq!((first.start, first.end), (7, 15));
        assert_eq!(first.polarity, Polarity::Negative);
        assert_eq!(first.status, Status::NonRelevant);
        assert_eq!(first.temporality, Temporality::Historical);
        assert_eq!(first.dsh_type, dsh_type::SELF_HARM);

        let second = output.get("EHOST_Instance_2").unwrap();
        assert_eq!(second.polarity, Polarity::Positive);
        assert_eq!(second.status, Status::Uncertain);
        assert_eq!(second.temporality, Temporality::Current);
        assert_eq!(second.dsh_type, dsh_type::CUTTING);
    }

    #[test]
    fn hedging_beats_modality() {
        let mut doc = doc(&["possible", "overdose"]);
        mark(&mut doc, 1, Attr::Dsh, DSH);
        mark(&mut doc, 1, Attr::Modality, MODALITY);
        mark(&mut doc, 1, Attr::Hedging, HEDGING);
        assert_eq!(build_output(&doc).0[0].status, Status::NonRelevant);

        mark(&mut doc, 1, Attr::Hedging, UNCERTAIN);
        assert_eq!(build_output(&doc).0[0].status, Status::Uncertain);
    }

    #[test]
    fn non_dsh_is_never_relevant() {
        let mut doc = doc(&["self-neglect"]);
        mark(&mut doc, 0, Attr::Dsh, NON_DSH);
        let record = &build_output(&doc).0[0];
        assert_eq!(record.status, Status::NonRelevant);
        assert_eq!(record.polarity, Polarity::Positive);
    }

    #[test]
    fn json_keeps_document_order() {
        let mut doc = doc(&["a"; 11]);
        for i in 0..11 {
            mark(&mut doc, i, Attr::Dsh, DSH);
        }
        let json = serde_json::to_string(&build_output(&doc)).unwrap();
        let second = json.find("\"EHOST_Instance_2\"").unwrap();
        let tenth = json.find("\"EHOST_Instance_10\"").unwrap();
        assert!(second < tenth);
        assert!(json.contains("\"status\":\"RELEVANT\""));
        assert!(json.contains("\"dsh_type\":\"SELF-HARM\""));
    }
}
