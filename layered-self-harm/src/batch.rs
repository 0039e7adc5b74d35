//! Processing files and directories of notes.

use crate::ehost::{self, EhostFile};
use crate::errors::{AnnotatorError, Result};
use crate::mapper::Mentions;
use crate::pipeline::Annotator;
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a document was not annotated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    TooLong { chars: usize, max_chars: usize },
    Unreadable { message: String },
    /// Annotation or writing the eHOST output failed.
    Failed { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooLong { chars, max_chars } => write!(
                f,
                "text of {} characters exceeds the limit of {}",
                chars, max_chars
            ),
            SkipReason::Unreadable { message } => write!(f, "unreadable: {}", message),
            SkipReason::Failed { message } => write!(f, "failed: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Annotated(Mentions),
    Skipped(SkipReason),
}

impl Outcome {
    pub fn mentions(&self) -> Option<&Mentions> {
        match self {
            Outcome::Annotated(mentions) => Some(mentions),
            Outcome::Skipped(_) => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }
}

/// One processed input file.
#[derive(Debug)]
pub struct DocumentResult {
    pub path: PathBuf,
    pub outcome: Outcome,
    pub output: Option<EhostFile>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: Vec<DocumentResult>,
}

impl BatchReport {
    pub fn annotated(&self) -> usize {
        self.documents.iter().filter(|doc| !doc.outcome.is_skipped()).count()
    }

    pub fn skipped(&self) -> usize {
        self.documents.iter().filter(|doc| doc.outcome.is_skipped()).count()
    }

    pub fn mentions(&self) -> usize {
        self.documents
            .iter()
            .filter_map(|doc| doc.outcome.mentions())
            .map(Mentions::len)
            .sum()
    }
}

/// Decode a note: UTF-8 when valid, Latin-1 otherwise.
pub fn decode(path: &Path, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("{} is not UTF-8, decoding as Latin-1", path.display());
            err.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| AnnotatorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode(path, bytes))
}

/// The files to process for `path`: the file itself, or the regular files
/// directly inside a directory, sorted by name.
pub fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let io_err = |source| AnnotatorError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(path).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let file = entry.path();
        if file.is_file() {
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}

impl Annotator {
    /// Annotate one file. Unreadable, oversized and failing files are
    /// skipped.
    pub fn process_file(&self, path: &Path) -> Outcome {
        let text = match read_text(path) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("skipping {}: {}", path.display(), err);
                return Outcome::Skipped(SkipReason::Unreadable {
                    message: err.to_string(),
                });
            }
        };
        match self.process_text(&text, &path.display().to_string()) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("failed to annotate {}: {}", path.display(), err);
                Outcome::Skipped(SkipReason::Failed {
                    message: err.to_string(),
                })
            }
        }
    }

    /// Annotate a file or every file of a directory, optionally writing the
    /// eHOST output next to each input. A document that is skipped or fails
    /// never stops the batch.
    pub fn process_path(&self, path: &Path, write_output: bool) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        for file in collect_inputs(path)? {
            log::info!("processing file {}", file.display());
            let mut outcome = self.process_file(&file);
            let written = match (&outcome, write_output) {
                (Outcome::Annotated(mentions), true) => {
                    Some(ehost::write_ehost_output(&file, mentions))
                }
                _ => None,
            };
            let output = match written {
                Some(Ok(output)) => Some(output),
                Some(Err(err)) => {
                    log::error!("failed to write eHOST output for {}: {}", file.display(), err);
                    outcome = Outcome::Skipped(SkipReason::Failed {
                        message: err.to_string(),
                    });
                    None
                }
                None => None,
            };
            report.documents.push(DocumentResult {
                path: file,
                outcome,
                output,
            });
        }
        log::info!(
            "{} documents annotated, {} skipped, {} mentions",
            report.annotated(),
            report.skipped(),
            report.mentions()
        );
        Ok(report)
    }
}
