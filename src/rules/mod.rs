//! Rules and rule layers.
//!
//! A [`Rule`] pairs a token pattern with channel writes. Rules are grouped
//! into a [`RuleLayer`], which runs them in order over a document as one pass.
//! Rule tables are written in Rust with the [`dsl`](crate::dsl) helpers, or
//! loaded from RON files with [`load_rule_file`].

mod file;
mod layer;

pub use file::{load_rule_file, parse_rule_file, RuleFile};
pub use layer::{LayerOptions, LayerReport, RuleLayer};

use crate::doc::Attr;
use crate::pattern::TokenSpec;
use serde::{Deserialize, Serialize};

/// Which tokens of a match a write applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    All,
    Last,
    /// Zero-based index within the match; ignored when out of range.
    At(usize),
}

impl Target {
    fn order(&self) -> (u8, usize) {
        match self {
            Target::All => (0, 0),
            Target::Last => (1, 0),
            Target::At(i) => (2, *i),
        }
    }
}

/// Set a channel to a label, or clear it with `value: None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Write {
    pub target: Target,
    pub attr: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub pattern: Vec<TokenSpec>,
    #[serde(default)]
    pub writes: Vec<Write>,
    #[serde(default)]
    pub merge: bool,
}

impl Rule {
    pub fn new(name: &str, pattern: Vec<TokenSpec>) -> Self {
        Rule {
            name: name.to_string(),
            pattern,
            writes: Vec::new(),
            merge: false,
        }
    }

    fn write(mut self, target: Target, attr: Attr, value: Option<&str>) -> Self {
        self.writes.push(Write {
            target,
            attr: attr.name().to_string(),
            value: value.map(str::to_string),
        });
        self
    }

    pub fn all(self, attr: Attr, value: &str) -> Self {
        self.write(Target::All, attr, Some(value))
    }

    pub fn clear_all(self, attr: Attr) -> Self {
        self.write(Target::All, attr, None)
    }

    pub fn last(self, attr: Attr, value: &str) -> Self {
        self.write(Target::Last, attr, Some(value))
    }

    pub fn clear_last(self, attr: Attr) -> Self {
        self.write(Target::Last, attr, None)
    }

    pub fn at(self, index: usize, attr: Attr, value: &str) -> Self {
        self.write(Target::At(index), attr, Some(value))
    }

    pub fn clear_at(self, index: usize, attr: Attr) -> Self {
        self.write(Target::At(index), attr, None)
    }

    /// Collapse each match into one token when span merging is enabled.
    pub fn merged(mut self) -> Self {
        self.merge = true;
        self
    }
}

/// Parser fields that rules may read but never write.
pub const BUILTIN_FIELDS: &[&str] = &[
    "DEP",
    "HEAD",
    "IS_ALPHA",
    "IS_ASCII",
    "IS_BRACKET",
    "IS_CURRENCY",
    "IS_DIGIT",
    "IS_LEFT_PUNCT",
    "IS_LOWER",
    "IS_OOV",
    "IS_PUNCT",
    "IS_QUOTE",
    "IS_RIGHT_PUNCT",
    "IS_SPACE",
    "IS_STOP",
    "IS_TITLE",
    "IS_UPPER",
    "LEMMA",
    "LENGTH",
    "LIKE_EMAIL",
    "LIKE_NUM",
    "LIKE_URL",
    "LOWER",
    "ORTH",
    "POS",
    "PREFIX",
    "SENT_START",
    "SHAPE",
    "SUFFIX",
    "TAG",
    "TEXT",
];
