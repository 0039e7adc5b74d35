//! Error types for the fixture harness.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    /// Error parsing a fixture file.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Error loading a fixture or expected-failures file.
    #[error("failed to load {path}: {message}")]
    Load { path: String, message: String },

    /// The annotator could not be built or failed on a fixture.
    #[error("pipeline error: {message}")]
    Pipeline { message: String },
}

pub type SpecResult<T> = Result<T, SpecError>;
