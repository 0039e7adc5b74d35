use super::{Check, Field, LabelTest, NumOp, Quantifier, TextTest, TokenSpec};
use crate::doc::{Attr, Label, Token};
use crate::errors::ConfigError;
use regex::Regex;

#[derive(Debug)]
enum TextMatcher {
    Eq(String),
    In(Vec<String>),
    NotIn(Vec<String>),
    Regex(Regex),
}

impl TextMatcher {
    fn test(&self, value: &str) -> bool {
        match self {
            TextMatcher::Eq(expected) => value == expected,
            TextMatcher::In(set) => set.iter().any(|v| v == value),
            TextMatcher::NotIn(set) => set.iter().all(|v| v != value),
            TextMatcher::Regex(re) => re.is_match(value),
        }
    }
}

#[derive(Debug)]
enum LabelMatcher {
    Is(String),
    In(Vec<String>),
    NotIn(Vec<String>),
    Unset,
    Set,
}

impl LabelMatcher {
    fn test(&self, value: Option<&Label>) -> bool {
        match (self, value) {
            (LabelMatcher::Is(expected), Some(label)) => label == expected.as_str(),
            (LabelMatcher::In(set), Some(label)) => set.iter().any(|v| label == v.as_str()),
            (LabelMatcher::NotIn(set), Some(label)) => set.iter().all(|v| label != v.as_str()),
            (LabelMatcher::NotIn(_), None) => true,
            (LabelMatcher::Unset, value) => value.is_none(),
            (LabelMatcher::Set, value) => value.is_some(),
            (_, None) => false,
        }
    }
}

#[derive(Debug)]
enum CompiledCheck {
    Text(Field, TextMatcher),
    Num(Field, NumOp, f64),
    /// `None`: the channel name is unknown and always reads as unset.
    Attr(Option<Attr>, LabelMatcher),
    IsSpace(bool),
    IsPunct(bool),
}

impl CompiledCheck {
    fn test(&self, token: &Token) -> bool {
        match self {
            CompiledCheck::Text(field, matcher) => matcher.test(&field.value(token)),
            CompiledCheck::Num(field, op, expected) => parse_number(&field.value(token))
                .map_or(false, |value| op.compare(value, *expected)),
            CompiledCheck::Attr(attr, matcher) => {
                matcher.test(attr.and_then(|attr| token.attrs.get(attr)))
            }
            CompiledCheck::IsSpace(expected) => token.is_space() == *expected,
            CompiledCheck::IsPunct(expected) => token.is_punct() == *expected,
        }
    }
}

fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A compiled [`TokenSpec`].
#[derive(Debug)]
pub struct TokenPredicate {
    checks: Vec<CompiledCheck>,
    op: Quantifier,
}

impl TokenPredicate {
    pub fn compile(rule: &str, spec: &TokenSpec) -> Result<Self, ConfigError> {
        let mut checks = Vec::with_capacity(spec.checks.len());
        for check in &spec.checks {
            checks.push(match check {
                Check::Text(field, test) => CompiledCheck::Text(*field, compile_text(rule, test)?),
                Check::Num(field, op, value) => CompiledCheck::Num(*field, *op, *value),
                Check::Attr(name, test) => {
                    let attr = Attr::from_name(name);
                    if attr.is_none() {
                        log::warn!(
                            "rule {}: unknown attribute {} in pattern, treated as unset",
                            rule,
                            name
                        );
                    }
                    CompiledCheck::Attr(attr, compile_label(test))
                }
                Check::IsSpace(expected) => CompiledCheck::IsSpace(*expected),
                Check::IsPunct(expected) => CompiledCheck::IsPunct(*expected),
            });
        }
        Ok(TokenPredicate {
            checks,
            op: spec.op,
        })
    }

    pub fn op(&self) -> Quantifier {
        self.op
    }

    pub fn matches(&self, token: &Token) -> bool {
        self.checks.iter().all(|check| check.test(token))
    }
}

fn compile_text(rule: &str, test: &TextTest) -> Result<TextMatcher, ConfigError> {
    Ok(match test {
        TextTest::Eq(value) => TextMatcher::Eq(value.clone()),
        TextTest::In(values) => TextMatcher::In(values.clone()),
        TextTest::NotIn(values) => TextMatcher::NotIn(values.clone()),
        TextTest::Regex(pattern) => {
            TextMatcher::Regex(Regex::new(pattern).map_err(|err| ConfigError::InvalidRegex {
                rule: rule.to_string(),
                pattern: pattern.clone(),
                message: err.to_string(),
            })?)
        }
    })
}

fn compile_label(test: &LabelTest) -> LabelMatcher {
    match test {
        LabelTest::Is(value) => LabelMatcher::Is(value.clone()),
        LabelTest::In(values) => LabelMatcher::In(values.clone()),
        LabelTest::NotIn(values) => LabelMatcher::NotIn(values.clone()),
        LabelTest::Unset => LabelMatcher::Unset,
        LabelTest::Set => LabelMatcher::Set,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::dsl::*;

    fn token(text: &str, lemma: &str, pos: &str) -> Token {
        let mut token = Token::new(text, 0);
        token.lemma = lemma.to_string();
        token.pos = pos.to_string();
        token
    }

    fn check(spec: TokenSpec, token: &Token) -> bool {
        TokenPredicate::compile("TEST", &spec).unwrap().matches(token)
    }

    #[test]
    fn regex_is_unanchored() {
        let tok = token("self-harmed", "self-harm", "VERB");
        assert!(check(lemma_re("harm"), &tok));
        assert!(check(lemma_re("^self-.+$"), &tok));
        assert!(!check(lemma_re("^harm"), &tok));
    }

    #[test]
    fn numeric_comparison_needs_a_number() {
        assert!(check(lemma_cmp(NumOp::Ge, 10.0), &token("12", "12", "NUM")));
        assert!(check(lemma_cmp(NumOp::Ge, 10.0), &token("1,000", "1,000", "NUM")));
        assert!(!check(lemma_cmp(NumOp::Ge, 10.0), &token("8", "8", "NUM")));
        assert!(!check(lemma_cmp(NumOp::Ge, 10.0), &token("ten", "ten", "NUM")));
    }

    #[test]
    fn channel_tests() {
        let mut tok = token("cut", "cut", "VERB");
        assert!(check(unset(Attr::Dsh), &tok));
        assert!(check(attr_not_in(Attr::Dsh, &["DSH"]), &tok));
        assert!(!check(is(Attr::Dsh, "DSH"), &tok));

        tok.attrs.set(Attr::Dsh, Some("DSH".into()));
        assert!(check(is(Attr::Dsh, "DSH"), &tok));
        assert!(check(attr_in(Attr::Dsh, &["NON_DSH", "DSH"]), &tok));
        assert!(!check(attr_not_in(Attr::Dsh, &["DSH"]), &tok));
        assert!(check(set(Attr::Dsh), &tok));
    }

    #[test]
    fn unknown_channel_reads_unset() {
        let spec = TokenSpec {
            checks: vec![Check::Attr("SH".to_string(), LabelTest::Unset)],
            op: Quantifier::One,
        };
        assert!(check(spec, &token("cut", "cut", "VERB")));
    }

    #[test]
    fn invalid_regex_is_a_config_error() {
        let err = TokenPredicate::compile("BROKEN", &lemma_re("(")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRegex { ref rule, .. } if rule == "BROKEN"));
    }

    #[test]
    fn conjunction_and_wildcard() {
        let tok = token("arm", "arm", "NOUN");
        assert!(check(any(), &tok));
        assert!(check(lemma("arm").and(pos("NOUN")), &tok));
        assert!(!check(lemma("arm").and(pos("VERB")), &tok));
        assert!(check(not_space().and(not_punct()), &tok));
    }
}
