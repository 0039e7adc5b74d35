//! Token patterns: a declarative description ([`TokenSpec`]) that rule
//! tables and rule files are written in, and the compiled form ([`Pattern`])
//! that finds every match in a document.

pub mod dsl;
mod matcher;
mod predicate;

pub use matcher::Pattern;
pub use predicate::TokenPredicate;

use crate::doc::Token;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A parser field a check can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Field {
    Orth,
    Lower,
    Lemma,
    Pos,
    Tag,
    Dep,
    Shape,
}

impl Field {
    pub fn value<'t>(self, token: &'t Token) -> Cow<'t, str> {
        match self {
            Field::Orth => Cow::Borrowed(&token.text),
            Field::Lower => Cow::Borrowed(&token.lower),
            Field::Lemma => Cow::Borrowed(&token.lemma),
            Field::Pos => Cow::Borrowed(&token.pos),
            Field::Tag => Cow::Borrowed(&token.tag),
            Field::Dep => Cow::Borrowed(&token.dep),
            Field::Shape => Cow::Owned(token.shape()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextTest {
    Eq(String),
    In(Vec<String>),
    NotIn(Vec<String>),
    /// Unanchored search; write `^`/`$` when the whole value must match.
    Regex(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumOp {
    Ge,
    Gt,
    Le,
    Lt,
    Eq,
}

impl NumOp {
    pub fn compare(self, left: f64, right: f64) -> bool {
        match self {
            NumOp::Ge => left >= right,
            NumOp::Gt => left > right,
            NumOp::Le => left <= right,
            NumOp::Lt => left < right,
            NumOp::Eq => left == right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelTest {
    Is(String),
    In(Vec<String>),
    /// Also true when the channel is unset.
    NotIn(Vec<String>),
    Unset,
    Set,
}

/// One check of a token predicate.
///
/// Channel checks name the channel as a string so that rule files can be
/// deserialized before channel names are resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Check {
    Text(Field, TextTest),
    Num(Field, NumOp, f64),
    Attr(String, LabelTest),
    IsSpace(bool),
    IsPunct(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Quantifier {
    #[default]
    One,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

impl Quantifier {
    pub fn may_skip(self) -> bool {
        matches!(self, Quantifier::Optional | Quantifier::ZeroOrMore)
    }

    pub fn may_repeat(self) -> bool {
        matches!(self, Quantifier::ZeroOrMore | Quantifier::OneOrMore)
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Quantifier::One => "",
            Quantifier::Optional => "?",
            Quantifier::ZeroOrMore => "*",
            Quantifier::OneOrMore => "+",
        })
    }
}

/// A conjunction of checks plus a quantifier. No checks is the wildcard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenSpec {
    #[serde(default)]
    pub checks: Vec<Check>,
    #[serde(default)]
    pub op: Quantifier,
}
