//! Mentions that do not describe the patient's own behaviour.

use super::{dsh, gap, not_dsh, Cohort};
use crate::labels::HEDGING;
use layered_rules::dsl::*;
use layered_rules::{Attr, Rule};

const RELATIVES: &[&str] = &[
    "family", "mother", "father", "mum", "dad", "parent", "sister", "brother", "sibling", "aunt",
    "uncle", "cousin", "grandmother", "grandfather", "son", "daughter",
];

pub(super) fn rules(cohort: Cohort) -> Vec<Rule> {
    let mut rules = vec![
        // history of self-harm?
        Rule::new("DSH_QUESTION", vec![dsh().plus(), lemma("?")]).clear_all(Attr::Dsh),
        // plan to ... hang herself
        Rule::new(
            "PLAN_TO_DSH",
            vec![lemma_in(&["intend", "plan"]), lemma("to"), gap().plus(), dsh().plus()],
        )
        .clear_all(Attr::Dsh),
        // mother has a history of overdoses: the mention is a relative's
        // history, not the patient's
        Rule::new(
            "FAMILY_HISTORY_DSH",
            vec![
                lemma_in(RELATIVES),
                lemma("have").opt(),
                lemma("a").opt(),
                lower_in(&["history", "hx", "h/o"]),
                lemma("of").opt(),
                dsh().plus(),
            ],
        )
        .last(Attr::Hedging, HEDGING),
    ];
    if cohort == Cohort::Female {
        rules.extend([
            // he ... made suicide attempts
            Rule::new(
                "HE_DSH",
                vec![
                    lower("he"),
                    lemma_not_in(&["she", "her", "herself", ".", "?", "!", ":", ";"])
                        .and(not_dsh())
                        .star(),
                    dsh().plus(),
                ],
            )
            .clear_all(Attr::Dsh),
            Rule::new(
                "IF_SHE_DSH",
                vec![lemma("if"), lemma("she"), gap().plus(), dsh().plus()],
            )
            .clear_all(Attr::Dsh),
        ]);
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnnotatorConfig;
    use crate::Annotator;

    fn mentions(config: AnnotatorConfig, text: &str) -> Vec<String> {
        let annotator = Annotator::builder().config(config).build().unwrap();
        let doc = annotator.annotate(text).unwrap();
        doc.tokens()
            .iter()
            .filter(|t| t.attrs.is_set(Attr::Dsh))
            .map(|t| t.text.clone())
            .collect()
    }

    #[test]
    fn questions_are_not_mentions() {
        assert!(mentions(AnnotatorConfig::standard(), "Any self-harm?").is_empty());
    }

    #[test]
    fn male_subject_only_removed_for_female_cohort() {
        let text = "He cut his arm.";
        assert!(mentions(AnnotatorConfig::female_cohort(), text).is_empty());
        assert_eq!(
            mentions(AnnotatorConfig::standard(), text),
            vec!["cut", "his", "arm"]
        );
    }

    #[test]
    fn family_history_is_hedged() {
        let annotator = Annotator::builder().build().unwrap();
        let doc = annotator.annotate("Family history of self-harm.").unwrap();
        let mention = doc.tokens().iter().find(|t| t.text == "self-harm").unwrap();
        assert!(mention.attrs.is(Attr::Hedging, HEDGING));
    }
}
