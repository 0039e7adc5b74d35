//! The built-in rule layers.
//!
//! Layers run in [`LayerName::ORDER`]. Each one reads the channels written
//! by the lexicons and by the layers before it:
//!
//! - `history` marks history sections (`HISTORY`)
//! - `level0` finds DSH expressions from lexical categories (`DSH`, `DSH_TYPE`)
//! - `level1` extends, retracts and types the level-0 mentions
//! - `time` tags past time expressions and moves them onto mentions
//! - `negation` marks negated mentions, one sentence at a time
//! - `status` removes questions, plans and (per cohort) mismatched subjects

mod history;
mod level0;
mod level1;
mod negation;
mod status;
mod time;

use crate::labels::DSH;
use layered_rules::dsl::*;
use layered_rules::pattern::TokenSpec;
use layered_rules::{Attr, LayerOptions, Rule, RuleLayer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The patient population a pipeline is tuned for.
///
/// The female cohort additionally discards mentions whose subject is a male
/// third party ("he took an overdose").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    #[default]
    All,
    Female,
}

impl FromStr for Cohort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Cohort::All),
            "female" => Ok(Cohort::Female),
            other => Err(format!("unknown cohort {:?} (expected `all` or `female`)", other)),
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cohort::All => "all",
            Cohort::Female => "female",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerName {
    History,
    Level0,
    Level1,
    Time,
    Negation,
    Status,
}

impl LayerName {
    pub const ORDER: [LayerName; 6] = [
        LayerName::History,
        LayerName::Level0,
        LayerName::Level1,
        LayerName::Time,
        LayerName::Negation,
        LayerName::Status,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayerName::History => "history",
            LayerName::Level0 => "level0",
            LayerName::Level1 => "level1",
            LayerName::Time => "time",
            LayerName::Negation => "negation",
            LayerName::Status => "status",
        }
    }

    /// Negation cues never reach across a sentence boundary.
    pub fn sentence_scoped(self) -> bool {
        matches!(self, LayerName::Negation)
    }

    pub fn rules(self, cohort: Cohort) -> Vec<Rule> {
        match self {
            LayerName::History => history::rules(),
            LayerName::Level0 => level0::rules(),
            LayerName::Level1 => level1::rules(),
            LayerName::Time => time::rules(),
            LayerName::Negation => negation::rules(),
            LayerName::Status => status::rules(cohort),
        }
    }

    pub fn layer(self, cohort: Cohort, options: LayerOptions) -> RuleLayer {
        RuleLayer::new(self.as_str(), &self.rules(cohort))
            .sentence_scoped(self.sentence_scoped())
            .with_options(options)
    }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every built-in layer, compiled, in run order.
pub fn build_layers(cohort: Cohort, options: LayerOptions) -> Vec<RuleLayer> {
    LayerName::ORDER
        .iter()
        .map(|name| name.layer(cohort, options))
        .collect()
}

pub(crate) const SUBJECT: &[&str] = &["she", "he", "they"];
pub(crate) const POSSESSIVE: &[&str] = &["her", "his", "their"];
pub(crate) const REFLEXIVE: &[&str] = &["herself", "himself", "themselves", "themself"];
pub(crate) const SIDES: &[&str] = &["left", "right", "lower", "upper"];
/// Lemmas that end a clause.
pub(crate) const STOPS: &[&str] = &[".", "?", "!", ":", ";"];
pub(crate) const BEHAVIOUR: &[&str] = &["act", "action", "attempt", "behaviour", "gesture"];

pub(crate) fn subject() -> TokenSpec {
    lemma_in(SUBJECT)
}

pub(crate) fn possessive() -> TokenSpec {
    lemma_in(POSSESSIVE)
}

pub(crate) fn reflexive() -> TokenSpec {
    lemma_in(REFLEXIVE)
}

pub(crate) fn la(label: &str) -> TokenSpec {
    is(Attr::La, label)
}

pub(crate) fn dsh() -> TokenSpec {
    is(Attr::Dsh, DSH)
}

pub(crate) fn not_dsh() -> TokenSpec {
    attr_not_in(Attr::Dsh, &[DSH])
}

/// Any token that is not a clause stop and not yet part of a mention.
pub(crate) fn gap() -> TokenSpec {
    lemma_not_in(STOPS).and(not_dsh())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_builtin_rule_compiles() {
        for cohort in [Cohort::All, Cohort::Female] {
            for layer in build_layers(cohort, LayerOptions::default()) {
                assert!(layer.rejected().is_empty(), "{}: {:?}", layer.name(), layer.rejected());
                assert!(!layer.is_empty());
            }
        }
    }

    #[test]
    fn rule_names_are_unique_per_layer() {
        for name in LayerName::ORDER {
            let rules = name.rules(Cohort::Female);
            let unique: HashSet<_> = rules.iter().map(|rule| rule.name.as_str()).collect();
            assert_eq!(unique.len(), rules.len(), "duplicate rule name in {}", name);
        }
    }

    #[test]
    fn female_cohort_adds_subject_rules() {
        let all = LayerName::Status.layer(Cohort::All, LayerOptions::default());
        let female = LayerName::Status.layer(Cohort::Female, LayerOptions::default());
        assert!(!all.rule_names().any(|name| name == "HE_DSH"));
        assert!(female.rule_names().any(|name| name == "HE_DSH"));
        assert!(female.rule_names().any(|name| name == "IF_SHE_DSH"));
    }

    #[test]
    fn cohort_from_str() {
        assert_eq!("Female".parse::<Cohort>().unwrap(), Cohort::Female);
        assert_eq!("all".parse::<Cohort>().unwrap(), Cohort::All);
        assert!("male".parse::<Cohort>().is_err());
    }
}
