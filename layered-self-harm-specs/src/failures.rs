//! Expected failures tracking via TOML file.
//!
//! ```toml
//! [[pending]]
//! fixture = "history/family-history.nlp"
//! assertion = "S0.[1]"
//! reason = "relative not recognised as subject"
//! added = "2026-10-15"
//! ```

use crate::errors::{SpecError, SpecResult};
use crate::fixture::RefTarget;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectedFailures {
    /// Known limitations of the rules.
    #[serde(default)]
    pub known: Vec<FailureEntry>,
    /// Failures awaiting a fix.
    #[serde(default)]
    pub pending: Vec<FailureEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEntry {
    /// Fixture path relative to the fixtures directory.
    pub fixture: String,
    /// Assertion reference, see [`ExpectedFailures::format_ref`].
    pub assertion: String,
    #[serde(default)]
    pub reason: Option<String>,
    /// Date added (YYYY-MM-DD).
    #[serde(default)]
    pub added: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureState {
    Known,
    Pending,
    /// Expected to pass; the failure is a regression.
    Regression,
}

impl ExpectedFailures {
    /// Load from a TOML file. A missing file means no expected failures.
    pub fn load(path: &Path) -> SpecResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let load_err = |message: String| SpecError::Load {
            path: path.display().to_string(),
            message,
        };
        let content = fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        toml::from_str(&content).map_err(|e| load_err(e.to_string()))
    }

    pub fn is_expected(&self, fixture: &str, assertion_ref: &str) -> FailureState {
        if self.known.iter().any(|e| e.matches(fixture, assertion_ref)) {
            FailureState::Known
        } else if self.pending.iter().any(|e| e.matches(fixture, assertion_ref)) {
            FailureState::Pending
        } else {
            FailureState::Regression
        }
    }

    /// `S{paragraph}.{target}`, e.g. `S0.[1]` or `S2.["overdose"]`.
    pub fn format_ref(paragraph_idx: usize, target: &RefTarget) -> String {
        format!("S{}.{}", paragraph_idx, target)
    }

    pub fn count(&self) -> usize {
        self.known.len() + self.pending.len()
    }

    pub fn get_entry(&self, fixture: &str, assertion_ref: &str) -> Option<&FailureEntry> {
        self.known
            .iter()
            .chain(self.pending.iter())
            .find(|e| e.matches(fixture, assertion_ref))
    }
}

impl FailureEntry {
    fn matches(&self, fixture: &str, assertion_ref: &str) -> bool {
        self.fixture == fixture && self.assertion == assertion_ref
    }
}

/// Result of running the harness.
#[derive(Debug, Clone, Default)]
pub struct HarnessResult {
    pub total: usize,
    pub passed: usize,
    /// Known and pending failures.
    pub expected_failures: usize,
    pub regressions: usize,
    /// Expected failures that passed; their entries can be removed.
    pub fixed: Vec<String>,
}

impl HarnessResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self) -> bool {
        self.regressions == 0
    }

    pub fn record_pass(&mut self) {
        self.total += 1;
        self.passed += 1;
    }

    pub fn record_failure(&mut self, state: FailureState) {
        self.total += 1;
        match state {
            FailureState::Known | FailureState::Pending => self.expected_failures += 1,
            FailureState::Regression => self.regressions += 1,
        }
    }
}
