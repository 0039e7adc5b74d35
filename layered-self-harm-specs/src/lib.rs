//! Fixture-driven testing for layered-self-harm.
//!
//! Test cases live in `.nlp` files: note text with `«n:text»` markers and
//! `> [n]: Mention(field=value, ...)` assertions about the marked spans.
//! Paragraphs separated by `---` are annotated as separate notes, and
//! fixtures under `fixtures/female/` run with the female cohort.
//!
//! ## Modules
//!
//! - [`parser`] - parses `.nlp` fixture files
//! - [`fixture`] - fixture types
//! - [`loader`] - loading fixture directories
//! - [`matcher`] - checking mention records against assertions
//! - [`runner`] - running fixtures through the annotator
//! - [`formatter`] - failure reports
//! - [`failures`] - expected failures tracked in TOML

pub mod assertion;
pub mod config;
pub mod errors;
pub mod failures;
pub mod fixture;
pub mod formatter;
pub mod loader;
pub mod matcher;
pub mod parser;
pub mod runner;

pub use assertion::{AssertionMismatch, FieldMismatch, MismatchSeverity};
pub use config::PipelineConfig;
pub use errors::{SpecError, SpecResult};
pub use failures::{ExpectedFailures, FailureEntry, FailureState, HarnessResult};
pub use fixture::{Assertion, AssertionBody, CompareOp, FieldCheck, NlpFixture, RefTarget, SpanMarker};
pub use formatter::{format_failure, format_summary};
pub use loader::{load_all_fixtures, load_fixture};
pub use matcher::{check_mention, AssertionOutcome, AssertionResult, MatchResult};
pub use parser::{parse_fixture, parse_spans};
pub use runner::{build_annotator, check_fixture_assertions, run_fixture, run_harness, HarnessReport, PipelineResult};
