//! Running fixtures through the annotator and checking their assertions.

use crate::config::PipelineConfig;
use crate::errors::{SpecError, SpecResult};
use crate::failures::{ExpectedFailures, FailureState, HarnessResult};
use crate::fixture::NlpFixture;
use crate::formatter::{format_failure, format_summary};
use crate::loader::load_all_fixtures;
use crate::matcher::{
    check_mention, AssertionOutcome, AssertionResult, MatchResult, MENTION, NO_MENTION,
};
use layered_self_harm::{Annotator, Cohort, MentionRecord, Outcome};
use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;

/// Mentions found in a fixture, tagged with their paragraph index.
#[derive(Debug, Default)]
pub struct PipelineResult {
    pub mentions: Vec<(usize, MentionRecord)>,
}

impl PipelineResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_paragraph(&self, index: usize) -> impl Iterator<Item = &MentionRecord> + '_ {
        self.mentions
            .iter()
            .filter(move |(paragraph, _)| *paragraph == index)
            .map(|(_, record)| record)
    }
}

pub fn build_annotator(config: &PipelineConfig) -> SpecResult<Annotator> {
    Annotator::builder()
        .config(config.annotator.clone())
        .build()
        .map_err(|err| SpecError::Pipeline {
            message: err.to_string(),
        })
}

/// Annotate each paragraph of the fixture as its own note.
pub fn run_fixture(fixture: &NlpFixture, annotator: &Annotator) -> SpecResult<PipelineResult> {
    let mut result = PipelineResult::new();
    for paragraph in &fixture.paragraphs {
        let id = format!("paragraph {}", paragraph.index);
        let outcome = annotator
            .process_text(&paragraph.text, &id)
            .map_err(|err| SpecError::Pipeline {
                message: err.to_string(),
            })?;
        match outcome {
            Outcome::Annotated(mentions) => result
                .mentions
                .extend(mentions.0.into_iter().map(|record| (paragraph.index, record))),
            Outcome::Skipped(reason) => {
                return Err(SpecError::Pipeline {
                    message: format!("{} skipped: {}", id, reason),
                })
            }
        }
    }
    Ok(result)
}

fn overlaps(record: &MentionRecord, range: &Range<usize>) -> bool {
    record.start < range.end && range.start < record.end
}

/// Check all assertions in a fixture against the mentions found.
pub fn check_fixture_assertions(fixture: &NlpFixture, result: &PipelineResult) -> MatchResult {
    let mut match_result = MatchResult::new();

    for assertion in &fixture.assertions {
        let Some((paragraph, range, span_text)) = fixture.resolve(&assertion.target) else {
            match_result.push(AssertionResult {
                assertion: assertion.clone(),
                paragraph: None,
                span_text: String::new(),
                outcome: AssertionOutcome::NotFound {
                    reason: format!("Failed to resolve target {}", assertion.target),
                },
            });
            continue;
        };

        let overlapping: Vec<&MentionRecord> = result
            .in_paragraph(paragraph.index)
            .filter(|record| overlaps(record, &range))
            .collect();

        let outcome = match assertion.span_type.as_str() {
            MENTION => {
                let exact = overlapping
                    .iter()
                    .find(|record| record.start == range.start && record.end == range.end);
                match exact.or_else(|| overlapping.first()) {
                    Some(record) => match check_mention(record, &assertion.body, &span_text) {
                        Ok(()) => AssertionOutcome::Passed,
                        Err(mismatch) => AssertionOutcome::Failed(mismatch),
                    },
                    None => AssertionOutcome::NotFound {
                        reason: format!("No mention overlaps '{}'", span_text),
                    },
                }
            }
            NO_MENTION => match overlapping.first() {
                Some(record) => AssertionOutcome::Unexpected {
                    found: record.text.clone(),
                },
                None => AssertionOutcome::Passed,
            },
            other => AssertionOutcome::UnknownType {
                span_type: other.to_string(),
            },
        };

        match_result.push(AssertionResult {
            assertion: assertion.clone(),
            paragraph: Some(paragraph.index),
            span_text,
            outcome,
        });
    }

    match_result
}

/// The outcome of running a fixtures directory.
#[derive(Debug, Default)]
pub struct HarnessReport {
    pub result: HarnessResult,
    /// Formatted failures and per-fixture summaries.
    pub output: String,
}

/// Run every fixture under `dir`, classifying failures against `expected`.
pub fn run_harness(dir: &Path, expected: &ExpectedFailures) -> SpecResult<HarnessReport> {
    let fixtures = load_all_fixtures(dir)?;
    let mut annotators: HashMap<Cohort, Annotator> = HashMap::new();
    let mut report = HarnessReport::default();

    for (path, fixture) in &fixtures {
        let config = PipelineConfig::for_fixture(path);
        let cohort = config.annotator.cohort;
        if !annotators.contains_key(&cohort) {
            annotators.insert(cohort, build_annotator(&config)?);
        }
        let Some(annotator) = annotators.get(&cohort) else {
            continue;
        };

        let name = path.to_string_lossy().replace('\\', "/");
        let result = run_fixture(fixture, annotator)?;
        let matches = check_fixture_assertions(fixture, &result);
        let (mut expected_count, mut regressions) = (0, 0);

        for passed in &matches.passed {
            report.result.record_pass();
            let reference =
                ExpectedFailures::format_ref(passed.paragraph.unwrap_or(0), &passed.assertion.target);
            if expected.get_entry(&name, &reference).is_some() {
                report.result.fixed.push(format!("{} {}", name, reference));
            }
        }
        for failed in &matches.failed {
            let reference =
                ExpectedFailures::format_ref(failed.paragraph.unwrap_or(0), &failed.assertion.target);
            let state = expected.is_expected(&name, &reference);
            report.result.record_failure(state);
            if state == FailureState::Regression {
                regressions += 1;
                let context = failed
                    .paragraph
                    .and_then(|index| fixture.paragraphs.iter().find(|p| p.index == index))
                    .map(|p| p.text.as_str());
                report.output.push_str(&format_failure(&name, failed, context));
            } else {
                expected_count += 1;
            }
        }
        report.output.push_str(&format_summary(
            &name,
            matches.passed.len(),
            matches.failed.len(),
            expected_count,
            regressions,
        ));
    }

    log::info!(
        "{} fixtures: {} passed, {} expected failures, {} regressions",
        fixtures.len(),
        report.result.passed,
        report.result.expected_failures,
        report.result.regressions
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_fixture;
    use layered_self_harm::{Polarity, Status, Temporality};

    fn record(start: usize, text: &str) -> MentionRecord {
        MentionRecord {
            id: String::new(),
            annotator: "SYSTEM".to_string(),
            class: "SELF-HARM".to_string(),
            comment: None,
            start,
            end: start + text.chars().count(),
            text: text.to_string(),
            dsh_type: "OVERDOSE".to_string(),
            polarity: Polarity::Positive,
            status: Status::Relevant,
            temporality: Temporality::Historical,
        }
    }

    #[test]
    fn injected_mentions_are_checked() {
        let fixture = parse_fixture(
            r#"
She took an «1:overdose» last year.
---
No «2:self-harm».
> [1]: Mention(temporality=HISTORICAL, dsh_type=OVERDOSE)
> [2]: NoMention()
"#,
        )
        .unwrap();
        let mut result = PipelineResult::new();
        result.mentions.push((0, record(12, "overdose")));
        // same offsets in another paragraph must not satisfy [2]
        result.mentions.push((0, record(3, "self")));

        let matches = check_fixture_assertions(&fixture, &result);
        assert!(matches.all_passed(), "{:?}", matches.failed);
        assert_eq!(matches.total(), 2);
    }

    #[test]
    fn mismatches_and_missing_mentions_fail() {
        let fixture = parse_fixture(
            r#"
She «1:took an overdose». «2:Cut» her arm.
> [1]: Mention(temporality=CURRENT)
> [2]: Mention()
> [3]: Mention()
> ["arm"]: Fancy()
"#,
        )
        .unwrap();
        let mut result = PipelineResult::new();
        result.mentions.push((0, record(12, "overdose")));

        let matches = check_fixture_assertions(&fixture, &result);
        assert_eq!(matches.passed.len(), 0);
        assert!(matches!(matches.failed[0].outcome, AssertionOutcome::Failed(_)));
        assert!(matches!(matches.failed[1].outcome, AssertionOutcome::NotFound { .. }));
        assert!(matches!(matches.failed[2].outcome, AssertionOutcome::NotFound { .. }));
        assert!(matches!(matches.failed[3].outcome, AssertionOutcome::UnknownType { .. }));
    }

    #[test]
    fn fixture_runs_through_the_annotator() {
        let fixture = parse_fixture(
            r#"
She denies «1:deliberate self-harm».
> [1]: Mention(polarity=NEGATIVE, status=NON-RELEVANT)
"#,
        )
        .unwrap();
        let annotator = build_annotator(&PipelineConfig::standard()).unwrap();
        let result = run_fixture(&fixture, &annotator).unwrap();
        let matches = check_fixture_assertions(&fixture, &result);
        assert!(matches.all_passed(), "{:?}", matches.failed);
    }
}
