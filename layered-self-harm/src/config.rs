//! Annotator configuration.
//!
//! Every field has a default, so a TOML file only lists what it changes:
//!
//! ```toml
//! cohort = "female"
//! backward_window = 8
//!
//! [signals]
//! historical_ancestor = true
//! ```

use crate::context::Signals;
use crate::errors::{AnnotatorError, Result};
use crate::layers::Cohort;
use layered_rules::LayerOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Documents this long (in characters) or longer are skipped.
pub const DEFAULT_MAX_CHARS: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnotatorConfig {
    pub cohort: Cohort,
    /// Tokens before a mention that may lend it their context.
    pub backward_window: usize,
    pub forward_window: usize,
    pub max_chars: usize,
    pub longest_match: bool,
    pub merge_rule_spans: bool,
    /// Malformed lexicon lines are errors instead of warnings.
    pub strict_lexicons: bool,
    /// Replaces built-in lexicons file by file.
    pub lexicon_dir: Option<PathBuf>,
    /// RON rule files run after the built-in layers, in order.
    pub extra_rules: Vec<PathBuf>,
    pub signals: Signals,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        AnnotatorConfig {
            cohort: Cohort::All,
            backward_window: 10,
            forward_window: 10,
            max_chars: DEFAULT_MAX_CHARS,
            longest_match: false,
            merge_rule_spans: false,
            strict_lexicons: false,
            lexicon_dir: None,
            extra_rules: Vec::new(),
            signals: Signals::default(),
        }
    }
}

impl AnnotatorConfig {
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn female_cohort() -> Self {
        Self::default().with_cohort(Cohort::Female)
    }

    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| AnnotatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text).map_err(|err| AnnotatorError::Config {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        // relative paths are relative to the configuration file
        if let Some(base) = path.parent() {
            config.lexicon_dir = config.lexicon_dir.map(|dir| base.join(dir));
            for rules in &mut config.extra_rules {
                *rules = base.join(&*rules);
            }
        }
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    pub fn layer_options(&self) -> LayerOptions {
        LayerOptions {
            longest_match: self.longest_match,
            merge_spans: self.merge_rule_spans,
        }
    }

    pub fn with_cohort(mut self, cohort: Cohort) -> Self {
        self.cohort = cohort;
        self
    }

    pub fn with_windows(mut self, backward: usize, forward: usize) -> Self {
        self.backward_window = backward;
        self.forward_window = forward;
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn with_longest_match(mut self, longest_match: bool) -> Self {
        self.longest_match = longest_match;
        self
    }

    pub fn with_merge_rule_spans(mut self, merge: bool) -> Self {
        self.merge_rule_spans = merge;
        self
    }

    pub fn with_strict_lexicons(mut self, strict: bool) -> Self {
        self.strict_lexicons = strict;
        self
    }

    pub fn with_signals(mut self, signals: Signals) -> Self {
        self.signals = signals;
        self
    }

    pub fn with_lexicon_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lexicon_dir = Some(dir.into());
        self
    }

    pub fn with_extra_rules(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra_rules.push(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AnnotatorConfig::from_toml_str(
            r#"
cohort = "female"
backward_window = 8

[signals]
historical_ancestor = true
"#,
        )
        .unwrap();
        assert_eq!(config.cohort, Cohort::Female);
        assert_eq!(config.backward_window, 8);
        assert_eq!(config.forward_window, 10);
        assert_eq!(config.max_chars, DEFAULT_MAX_CHARS);
        assert!(config.signals.historical_ancestor);
        assert!(!config.signals.past_tense_governor);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AnnotatorConfig::from_toml_str("backwards_window = 3").is_err());
        assert!(AnnotatorConfig::from_toml_str("[signals]\nsarcasm = true").is_err());
    }

    #[test]
    fn toml_round_trip() {
        let config = AnnotatorConfig::female_cohort()
            .with_windows(5, 3)
            .with_signals(Signals::all())
            .with_extra_rules("extra.ron");
        let text = config.to_toml_string().unwrap();
        assert_eq!(AnnotatorConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dsh.toml");
        std::fs::write(&path, "lexicon_dir = \"lex\"\nextra_rules = [\"more.ron\"]\n").unwrap();
        let config = AnnotatorConfig::load(&path).unwrap();
        assert_eq!(config.lexicon_dir, Some(dir.path().join("lex")));
        assert_eq!(config.extra_rules, vec![dir.path().join("more.ron")]);

        let missing = AnnotatorConfig::load(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(AnnotatorError::Io { .. })));
    }
}
