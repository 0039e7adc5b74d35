//! Negation cues in front of a mention. The layer is sentence scoped.

use super::{dsh, gap, not_dsh};
use crate::labels::NEG;
use layered_rules::dsl::*;
use layered_rules::pattern::Field;
use layered_rules::{Attr, Rule};

fn negates(rule: Rule) -> Rule {
    rule.last(Attr::Neg, NEG).merged()
}

pub(super) fn rules() -> Vec<Rule> {
    vec![
        negates(Rule::new("NO_DSH", vec![lemma("no"), dsh()])),
        // no discernible evidence of self-harm
        negates(Rule::new(
            "NO_X_OF_DSH",
            vec![lemma("no"), gap().plus(), lemma("of"), dsh().plus()],
        )),
        negates(Rule::new(
            "NEVER_DSH",
            vec![
                lemma("never"),
                text_re(Field::Pos, "^V").and(not_dsh()).plus(),
                dsh().plus(),
            ],
        )),
        negates(Rule::new(
            "DENIES_DSH",
            vec![
                lemma_in(&["deny", "denie"]),
                pos("ADV").star(),
                lemma_in(&["have", "having"]).opt(),
                dsh().plus(),
            ],
        )),
        negates(Rule::new(
            "NOT_DSH",
            vec![
                lemma_in(&["never", "not"]),
                pos("ADV").star(),
                lemma_in(&["have", "having"]).opt(),
                dsh().plus(),
            ],
        )),
        // unable to keep herself from cutting
        negates(Rule::new(
            "UNABLE_X_DSH",
            vec![lemma("unable"), lemma("to"), gap().plus(), dsh().plus()],
        )),
    ]
}

#[cfg(test)]
mod tests {
    use crate::Annotator;
    use layered_rules::Attr;

    fn negated(text: &str) -> Vec<String> {
        let doc = Annotator::builder().build().unwrap().annotate(text).unwrap();
        doc.tokens()
            .iter()
            .filter(|t| t.attrs.is_set(Attr::Dsh) && t.attrs.is_set(Attr::Neg))
            .map(|t| t.text.clone())
            .collect()
    }

    #[test]
    fn denial_and_absence() {
        assert_eq!(negated("Denies self-harm."), vec!["self-harm"]);
        assert_eq!(negated("No evidence of self-harm."), vec!["self-harm"]);
        assert_eq!(negated("She has never self-harmed."), vec!["self-harmed"]);
    }

    #[test]
    fn cue_does_not_cross_sentences() {
        assert!(negated("No pain\n\nEvidence of self-harm").is_empty());
        assert_eq!(negated("No pain or evidence of self-harm"), vec!["self-harm"]);
    }
}
