//! Readable failure reports.

use crate::assertion::MismatchSeverity;
use crate::matcher::{AssertionOutcome, AssertionResult};
use std::fmt::Write;

/// Format a failed assertion with the paragraph text and the span underlined.
pub fn format_failure(fixture_name: &str, result: &AssertionResult, text_context: Option<&str>) -> String {
    let mut output = String::new();
    let assertion = &result.assertion;
    let span_text = result.span_text.as_str();

    let _ = writeln!(output, "\nFAIL: {}:{}", fixture_name, assertion.source_line);
    let _ = writeln!(output);

    if let Some(context) = text_context {
        let _ = writeln!(output, "  {}", context);
        if let Some(pos) = context.find(span_text).filter(|_| !span_text.is_empty()) {
            let column = context[..pos].chars().count();
            let _ = writeln!(
                output,
                "{}{}",
                " ".repeat(column + 2),
                "^".repeat(span_text.chars().count())
            );
        }
        let _ = writeln!(output);
    }

    match &result.outcome {
        AssertionOutcome::Failed(mismatch) => {
            let _ = writeln!(output, "  assertion failed for mention: \"{}\"", span_text);
            for field in &mismatch.fields {
                let marker = match field.severity {
                    MismatchSeverity::Hard => "\u{2717}",
                    MismatchSeverity::Info => "\u{2139}",
                };
                let _ = writeln!(
                    output,
                    "    {} {}: expected `{}`, found `{}`",
                    marker, field.field, field.expected, field.actual
                );
            }
        }
        AssertionOutcome::NotFound { reason } => {
            let _ = writeln!(output, "  mention not found: {}", reason);
        }
        AssertionOutcome::Unexpected { found } => {
            let _ = writeln!(output, "  unexpected mention: \"{}\"", found);
        }
        AssertionOutcome::UnknownType { span_type } => {
            let _ = writeln!(
                output,
                "  unknown assertion type {} (expected Mention or NoMention)",
                span_type
            );
        }
        AssertionOutcome::Passed => {
            let _ = writeln!(output, "  (passed)");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "  Assertion was: {}", assertion);
    output
}

pub fn format_summary(
    fixture_name: &str,
    passed: usize,
    failed: usize,
    expected_failures: usize,
    regressions: usize,
) -> String {
    let status = if regressions > 0 { "FAIL" } else { "PASS" };
    format!(
        "{}: {}\n  {} passed, {} failed ({} expected, {} regressions)\n",
        status, fixture_name, passed, failed, expected_failures, regressions
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::{AssertionMismatch, FieldMismatch};
    use crate::fixture::{Assertion, AssertionBody, RefTarget};

    fn result(outcome: AssertionOutcome) -> AssertionResult {
        AssertionResult {
            assertion: Assertion {
                target: RefTarget::Span(1),
                span_type: "Mention".to_string(),
                body: AssertionBody::default(),
                source_line: 5,
            },
            paragraph: Some(0),
            span_text: "self-harm".to_string(),
            outcome,
        }
    }

    #[test]
    fn test_format_field_mismatch() {
        let mismatch = AssertionMismatch::new("self-harm", "Mention(polarity=NEGATIVE)")
            .with_field(FieldMismatch::hard("polarity", "=NEGATIVE", "POSITIVE"));
        let output = format_failure(
            "denial.nlp",
            &result(AssertionOutcome::Failed(mismatch)),
            Some("Denies self-harm."),
        );
        insta::assert_snapshot!(output.trim(), @r###"
        FAIL: denial.nlp:5

          Denies self-harm.
                 ^^^^^^^^^

          assertion failed for mention: "self-harm"
            ✗ polarity: expected `=NEGATIVE`, found `POSITIVE`

          Assertion was: [1]: Mention()
        "###);
    }

    #[test]
    fn test_format_unexpected() {
        let output = format_failure(
            "risk.nlp",
            &result(AssertionOutcome::Unexpected {
                found: "self-harm".to_string(),
            }),
            None,
        );
        assert!(output.contains("unexpected mention: \"self-harm\""));
    }

    #[test]
    fn test_format_summary() {
        assert_eq!(
            format_summary("a.nlp", 3, 1, 1, 0),
            "PASS: a.nlp\n  3 passed, 1 failed (1 expected, 0 regressions)\n"
        );
    }
}
