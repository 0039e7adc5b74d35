//! Error types for the annotator.

use layered_rules::{ConfigError, ConllError, DocError, LexiconError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or running an [`Annotator`](crate::Annotator).
#[derive(Debug, Error)]
pub enum AnnotatorError {
    /// A lexicon or the tokenizer rules could not be loaded.
    #[error(transparent)]
    Lexicon(#[from] LexiconError),

    /// A user rule file could not be read or parsed.
    #[error(transparent)]
    Rules(#[from] ConfigError),

    /// The analyzer produced an inconsistent document.
    #[error(transparent)]
    Doc(#[from] DocError),

    /// Pre-parsed input could not be read.
    #[error(transparent)]
    Conll(#[from] ConllError),

    /// The configuration file is missing or malformed.
    #[error("invalid configuration {path}: {message}")]
    Config { path: String, message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Xml(#[from] XmlError),
}

/// eHOST output that cannot be serialized or saved.
#[derive(Debug, Error)]
pub enum XmlError {
    /// XML 1.0 forbids the character (most control characters).
    #[error("character U+{code:04X} at offset {offset} is not allowed in XML 1.0")]
    InvalidChar { code: u32, offset: usize },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for annotator operations.
pub type Result<T, E = AnnotatorError> = std::result::Result<T, E>;
