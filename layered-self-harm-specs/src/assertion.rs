//! Assertion failures with field-level detail.

use std::fmt;
use thiserror::Error;

/// Assertion check failed.
#[derive(Debug, Clone, Error)]
pub struct AssertionMismatch {
    /// The text that was marked in the fixture.
    pub span_text: String,
    /// Original assertion source for context.
    pub assertion_source: String,
    pub fields: Vec<FieldMismatch>,
}

impl fmt::Display for AssertionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Assertion mismatch for span: \"{}\"", self.span_text)?;
        writeln!(f, "Assertion: {}", self.assertion_source)?;
        for field in &self.fields {
            writeln!(f, "  {}", field)?;
        }
        Ok(())
    }
}

impl AssertionMismatch {
    pub fn new(span_text: impl Into<String>, assertion_source: impl Into<String>) -> Self {
        Self {
            span_text: span_text.into(),
            assertion_source: assertion_source.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldMismatch) -> Self {
        self.fields.push(field);
        self
    }

    pub fn has_hard_mismatch(&self) -> bool {
        self.fields.iter().any(|f| f.severity == MismatchSeverity::Hard)
    }
}

/// A single field mismatch.
#[derive(Debug, Clone)]
pub struct FieldMismatch {
    pub field: String,
    /// What was expected (from assertion).
    pub expected: String,
    /// What was found on the mention.
    pub actual: String,
    pub severity: MismatchSeverity,
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity_marker = match self.severity {
            MismatchSeverity::Hard => "✗",
            MismatchSeverity::Info => "ℹ",
        };
        write!(
            f,
            "{} {}: expected {}, got {}",
            severity_marker, self.field, self.expected, self.actual
        )
    }
}

impl FieldMismatch {
    pub fn hard(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
            severity: MismatchSeverity::Hard,
        }
    }

    pub fn info(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
            severity: MismatchSeverity::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchSeverity {
    /// The mention has the wrong value.
    Hard,
    /// The mention was found with different boundaries.
    Info,
}
