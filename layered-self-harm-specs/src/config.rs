//! Pipeline configuration for fixtures.

use layered_self_harm::AnnotatorConfig;
use std::path::{Component, Path};

/// Fixtures under this directory run with the female cohort.
pub const FEMALE_DIR: &str = "female";

#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub annotator: AnnotatorConfig,
}

impl PipelineConfig {
    pub fn standard() -> Self {
        Self {
            annotator: AnnotatorConfig::standard(),
        }
    }

    pub fn female_cohort() -> Self {
        Self {
            annotator: AnnotatorConfig::female_cohort(),
        }
    }

    /// The configuration for a fixture at `relative` to the fixtures root.
    pub fn for_fixture(relative: &Path) -> Self {
        match relative.components().next() {
            Some(Component::Normal(dir)) if dir == FEMALE_DIR => Self::female_cohort(),
            _ => Self::standard(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_self_harm::Cohort;

    #[test]
    fn cohort_follows_directory() {
        let female = PipelineConfig::for_fixture(Path::new("female/male-subject.nlp"));
        assert_eq!(female.annotator.cohort, Cohort::Female);
        let standard = PipelineConfig::for_fixture(Path::new("denial.nlp"));
        assert_eq!(standard.annotator.cohort, Cohort::All);
    }
}
