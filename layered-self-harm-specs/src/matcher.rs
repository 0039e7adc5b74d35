//! Checking assertion bodies against mention records.

use crate::assertion::{AssertionMismatch, FieldMismatch};
use crate::fixture::{Assertion, AssertionBody, CompareOp};
use layered_self_harm::MentionRecord;

pub const MENTION: &str = "Mention";
pub const NO_MENTION: &str = "NoMention";

/// Fields a `Mention(...)` assertion may check.
pub const MENTION_FIELDS: &[&str] = &["polarity", "status", "temporality", "dsh_type", "text"];

/// Result of matching assertions against pipeline output.
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    pub passed: Vec<AssertionResult>,
    pub failed: Vec<AssertionResult>,
}

#[derive(Debug, Clone)]
pub struct AssertionResult {
    pub assertion: Assertion,
    /// Paragraph of the asserted span, when it could be resolved.
    pub paragraph: Option<usize>,
    pub span_text: String,
    pub outcome: AssertionOutcome,
}

#[derive(Debug, Clone)]
pub enum AssertionOutcome {
    Passed,
    Failed(AssertionMismatch),
    NotFound { reason: String },
    /// A mention was found where `NoMention()` was asserted.
    Unexpected { found: String },
    UnknownType { span_type: String },
}

pub fn is_supported_type(type_name: &str) -> bool {
    matches!(type_name, MENTION | NO_MENTION)
}

fn field_value<'r>(record: &'r MentionRecord, field: &str) -> Option<&'r str> {
    Some(match field {
        "polarity" => record.polarity.as_str(),
        "status" => record.status.as_str(),
        "temporality" => record.temporality.as_str(),
        "dsh_type" => record.dsh_type.as_str(),
        "text" => record.text.as_str(),
        _ => return None,
    })
}

fn compare(actual: &str, operator: CompareOp, expected: &str) -> bool {
    match operator {
        CompareOp::Equals => actual.eq_ignore_ascii_case(expected),
        CompareOp::NotEquals => !actual.eq_ignore_ascii_case(expected),
        CompareOp::Contains => actual.to_lowercase().contains(&expected.to_lowercase()),
    }
}

/// Check every field of `body` against `record`.
pub fn check_mention(
    record: &MentionRecord,
    body: &AssertionBody,
    span_text: &str,
) -> Result<(), AssertionMismatch> {
    let mut mismatch = AssertionMismatch::new(span_text, format!("{}({})", MENTION, body));
    for check in &body.field_checks {
        match field_value(record, &check.field) {
            Some(actual) if compare(actual, check.operator, &check.expected) => {}
            Some(actual) => {
                mismatch = mismatch.with_field(FieldMismatch::hard(
                    check.field.as_str(),
                    format!("{}{}", check.operator, check.expected),
                    actual,
                ));
            }
            None => {
                mismatch = mismatch.with_field(FieldMismatch::hard(
                    check.field.as_str(),
                    format!("one of {}", MENTION_FIELDS.join(", ")),
                    "unknown field",
                ));
            }
        }
    }
    if record.text != span_text {
        mismatch = mismatch.with_field(FieldMismatch::info("span", span_text, record.text.as_str()));
    }
    if mismatch.has_hard_mismatch() {
        Err(mismatch)
    } else {
        Ok(())
    }
}

impl MatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: AssertionResult) {
        if matches!(result.outcome, AssertionOutcome::Passed) {
            self.passed.push(result);
        } else {
            self.failed.push(result);
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::FieldCheck;
    use layered_self_harm::{Polarity, Status, Temporality};

    fn record() -> MentionRecord {
        MentionRecord {
            id: "EHOST_Instance_1".to_string(),
            annotator: "SYSTEM".to_string(),
            class: "SELF-HARM".to_string(),
            comment: None,
            start: 11,
            end: 31,
            text: "deliberate self-harm".to_string(),
            dsh_type: "SELF-HARM".to_string(),
            polarity: Polarity::Negative,
            status: Status::NonRelevant,
            temporality: Temporality::Current,
        }
    }

    fn body(checks: &[(&str, CompareOp, &str)]) -> AssertionBody {
        AssertionBody {
            field_checks: checks
                .iter()
                .map(|(field, operator, expected)| FieldCheck {
                    field: field.to_string(),
                    expected: expected.to_string(),
                    operator: *operator,
                })
                .collect(),
        }
    }

    #[test]
    fn matching_fields_pass() {
        let body = body(&[
            ("polarity", CompareOp::Equals, "negative"),
            ("status", CompareOp::Equals, "NON-RELEVANT"),
            ("temporality", CompareOp::NotEquals, "HISTORICAL"),
            ("text", CompareOp::Contains, "self-harm"),
        ]);
        assert!(check_mention(&record(), &body, "deliberate self-harm").is_ok());
    }

    #[test]
    fn wrong_value_is_a_hard_mismatch() {
        let body = body(&[("polarity", CompareOp::Equals, "POSITIVE")]);
        let mismatch = check_mention(&record(), &body, "deliberate self-harm").unwrap_err();
        assert_eq!(mismatch.fields.len(), 1);
        assert_eq!(mismatch.fields[0].to_string(), "✗ polarity: expected =POSITIVE, got NEGATIVE");
    }

    #[test]
    fn boundary_difference_alone_passes() {
        assert!(check_mention(&record(), &AssertionBody::default(), "self-harm").is_ok());
    }

    #[test]
    fn unknown_fields_fail() {
        let body = body(&[("severity", CompareOp::Equals, "high")]);
        assert!(check_mention(&record(), &body, "deliberate self-harm").is_err());
        assert!(is_supported_type("NoMention"));
        assert!(!is_supported_type("Obligation"));
    }
}
