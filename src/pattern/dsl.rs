//! Short constructors for writing rule tables in Rust.
//!
//! ```
//! use layered_rules::dsl::*;
//! use layered_rules::Attr;
//!
//! // [LEMMA deliberate] [DSH = DSH]+
//! let pattern = vec![lemma("deliberate"), is(Attr::Dsh, "DSH").plus()];
//! assert_eq!(pattern.len(), 2);
//! ```

use super::{Check, Field, LabelTest, NumOp, Quantifier, TextTest, TokenSpec};
use crate::doc::Attr;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn single(check: Check) -> TokenSpec {
    TokenSpec {
        checks: vec![check],
        op: Quantifier::One,
    }
}

impl TokenSpec {
    /// Conjoin the checks of `other` (its quantifier is ignored).
    pub fn and(mut self, other: TokenSpec) -> Self {
        self.checks.extend(other.checks);
        self
    }

    /// `?`
    pub fn opt(mut self) -> Self {
        self.op = Quantifier::Optional;
        self
    }

    /// `*`
    pub fn star(mut self) -> Self {
        self.op = Quantifier::ZeroOrMore;
        self
    }

    /// `+`
    pub fn plus(mut self) -> Self {
        self.op = Quantifier::OneOrMore;
        self
    }
}

/// The wildcard `{}`.
pub fn any() -> TokenSpec {
    TokenSpec::default()
}

pub fn text_eq(field: Field, value: &str) -> TokenSpec {
    single(Check::Text(field, TextTest::Eq(value.to_string())))
}

pub fn text_in(field: Field, values: &[&str]) -> TokenSpec {
    single(Check::Text(field, TextTest::In(strings(values))))
}

pub fn text_not_in(field: Field, values: &[&str]) -> TokenSpec {
    single(Check::Text(field, TextTest::NotIn(strings(values))))
}

pub fn text_re(field: Field, pattern: &str) -> TokenSpec {
    single(Check::Text(field, TextTest::Regex(pattern.to_string())))
}

pub fn orth(value: &str) -> TokenSpec {
    text_eq(Field::Orth, value)
}

pub fn orth_in(values: &[&str]) -> TokenSpec {
    text_in(Field::Orth, values)
}

pub fn lower(value: &str) -> TokenSpec {
    text_eq(Field::Lower, value)
}

pub fn lower_in(values: &[&str]) -> TokenSpec {
    text_in(Field::Lower, values)
}

pub fn lower_not_in(values: &[&str]) -> TokenSpec {
    text_not_in(Field::Lower, values)
}

pub fn lower_re(pattern: &str) -> TokenSpec {
    text_re(Field::Lower, pattern)
}

pub fn lemma(value: &str) -> TokenSpec {
    text_eq(Field::Lemma, value)
}

pub fn lemma_in(values: &[&str]) -> TokenSpec {
    text_in(Field::Lemma, values)
}

pub fn lemma_not_in(values: &[&str]) -> TokenSpec {
    text_not_in(Field::Lemma, values)
}

pub fn lemma_re(pattern: &str) -> TokenSpec {
    text_re(Field::Lemma, pattern)
}

/// Numeric comparison against a lemma that parses as a number.
pub fn lemma_cmp(op: NumOp, value: f64) -> TokenSpec {
    single(Check::Num(Field::Lemma, op, value))
}

pub fn pos(value: &str) -> TokenSpec {
    text_eq(Field::Pos, value)
}

pub fn pos_in(values: &[&str]) -> TokenSpec {
    text_in(Field::Pos, values)
}

pub fn pos_not_in(values: &[&str]) -> TokenSpec {
    text_not_in(Field::Pos, values)
}

pub fn tag(value: &str) -> TokenSpec {
    text_eq(Field::Tag, value)
}

pub fn tag_in(values: &[&str]) -> TokenSpec {
    text_in(Field::Tag, values)
}

pub fn tag_not_in(values: &[&str]) -> TokenSpec {
    text_not_in(Field::Tag, values)
}

pub fn tag_re(pattern: &str) -> TokenSpec {
    text_re(Field::Tag, pattern)
}

pub fn dep(value: &str) -> TokenSpec {
    text_eq(Field::Dep, value)
}

pub fn shape(value: &str) -> TokenSpec {
    text_eq(Field::Shape, value)
}

/// Channel holds exactly `label`.
pub fn is(attr: Attr, label: &str) -> TokenSpec {
    single(Check::Attr(
        attr.name().to_string(),
        LabelTest::Is(label.to_string()),
    ))
}

pub fn attr_in(attr: Attr, labels: &[&str]) -> TokenSpec {
    single(Check::Attr(attr.name().to_string(), LabelTest::In(strings(labels))))
}

/// Channel unset or holding none of `labels`.
pub fn attr_not_in(attr: Attr, labels: &[&str]) -> TokenSpec {
    single(Check::Attr(
        attr.name().to_string(),
        LabelTest::NotIn(strings(labels)),
    ))
}

pub fn unset(attr: Attr) -> TokenSpec {
    single(Check::Attr(attr.name().to_string(), LabelTest::Unset))
}

pub fn set(attr: Attr) -> TokenSpec {
    single(Check::Attr(attr.name().to_string(), LabelTest::Set))
}

pub fn space() -> TokenSpec {
    single(Check::IsSpace(true))
}

pub fn not_space() -> TokenSpec {
    single(Check::IsSpace(false))
}

pub fn punct() -> TokenSpec {
    single(Check::IsPunct(true))
}

pub fn not_punct() -> TokenSpec {
    single(Check::IsPunct(false))
}
