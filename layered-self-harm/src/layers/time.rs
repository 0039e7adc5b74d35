//! Past and recent time expressions, then transfer of past time onto the
//! mentions they modify.

use super::{dsh, possessive, subject};
use crate::labels::{HISTORICAL, LIFE_STAGE, PAST, PRESENT};
use layered_rules::dsl::*;
use layered_rules::pattern::{Field, TokenSpec};
use layered_rules::{Attr, Rule};

fn past() -> TokenSpec {
    is(Attr::Time, PAST)
}

fn life_stage() -> TokenSpec {
    is(Attr::Time, LIFE_STAGE)
}

fn num() -> TokenSpec {
    pos("NUM")
}

/// for (over) (more than)
fn for_over() -> Vec<TokenSpec> {
    vec![
        lemma("for"),
        lemma("over").opt(),
        lemma("more").opt(),
        lemma("than").opt(),
    ]
}

pub(super) fn rules() -> Vec<Rule> {
    let mut rules = expressions();
    rules.extend(transfers());
    rules
}

fn expressions() -> Vec<Rule> {
    let mut for_n_years = for_over();
    for_n_years.extend([num(), lemma("year")]);
    let mut for_a_year = for_over();
    for_a_year.extend([lemma("a"), lemma("year")]);

    vec![
        // 2/7 ago
        Rule::new("NUM_AGO", vec![num(), lemma("year").opt(), lemma("ago")])
            .all(Attr::Time, PAST),
        Rule::new(
            "NUM_YEAR_AGO",
            vec![
                num(),
                lemma("year"),
                lemma_in(&["ago", "before", "previously", "prior"]),
            ],
        )
        .all(Attr::Time, PAST),
        // 4-5days ago
        Rule::new(
            "REGEX_NPRESENT_AGO",
            vec![lemma_re(".*(day|week|month)"), lemma("ago")],
        )
        .all(Attr::Time, PRESENT),
        Rule::new(
            "NUM_NPRESENT_AGO",
            vec![num(), lemma_in(&["day", "week", "month"]), lemma("ago")],
        )
        .all(Attr::Time, PRESENT),
        // at (the) (age) (of) 16
        Rule::new(
            "AT_AGE_X",
            vec![
                lemma("at"),
                lemma("the").opt(),
                lemma("age").opt(),
                lemma("of").opt(),
                num(),
            ],
        )
        .all(Attr::Time, PAST),
        Rule::new("AGED_X", vec![lower("aged"), num()]).all(Attr::Time, PAST),
        // when she was 28
        Rule::new(
            "WHEN_SHE_WAS_PAST",
            vec![lemma("when"), subject(), lemma("be"), num()],
        )
        .all(Attr::Time, PAST),
        // when she was a kid
        Rule::new(
            "WHEN_SHE_WAS_LIFE_STAGE",
            vec![
                lemma("when"),
                subject(),
                lemma("be"),
                lemma("a").opt(),
                life_stage(),
            ],
        )
        .all(Attr::Time, PAST),
        // in her teens
        Rule::new(
            "IN_LIFE_STAGE",
            vec![
                pos("ADP"),
                possessive().opt(),
                life_stage(),
                lemma("year").opt(),
            ],
        )
        .all(Attr::Time, PAST),
        Rule::new("AS_A_LIFE_STAGE", vec![lemma("as"), lemma("a"), life_stage()])
            .all(Attr::Time, PAST),
        // in 2002
        Rule::new(
            "IN_YEAR",
            vec![pos("ADP"), lemma_re("^(19[0-9][0-9]|2[01][0-9][0-9])$")],
        )
        .all(Attr::Time, PAST),
        Rule::new("FOR_N_YEARS", for_n_years).all(Attr::Time, PAST),
        Rule::new("FOR_A_YEAR", for_a_year).all(Attr::Time, PAST),
    ]
}

fn transfers() -> Vec<Rule> {
    vec![
        // history of self-harm
        Rule::new("HISTORY_OF_DSH", vec![past(), lemma("of"), dsh().plus()])
            .last(Attr::Time, HISTORICAL),
        // history of trying to self-harm
        Rule::new(
            "HISTORY_OF_TRY_TO_DSH",
            vec![
                past(),
                lemma("of"),
                pos("VERB"),
                lemma("to").opt(),
                dsh().plus(),
            ],
        )
        .last(Attr::Time, HISTORICAL),
        // previous overdoses
        Rule::new("HISTORY_DSH", vec![past(), dsh().plus()]).at(1, Attr::Time, HISTORICAL),
        Rule::new(
            "HISTORY_OF_TAKING_OD",
            vec![past(), lemma("of"), lemma("take"), dsh().plus()],
        )
        .last(Attr::Time, HISTORICAL),
        // has self-harmed in the past
        Rule::new("DSH_IN_THE_PAST", vec![dsh(), lemma("in"), past().plus()])
            .at(0, Attr::Time, HISTORICAL),
        // self-harmed 5 years ago
        Rule::new("DSH_PAST", vec![dsh().plus(), past().plus()]).at(0, Attr::Time, HISTORICAL),
        // self-harmed over a period of several years in the past
        Rule::new(
            "DSH_NO_VERB_PAST",
            vec![
                dsh().plus(),
                text_re(Field::Pos, "^[^V]").plus(),
                past().plus(),
            ],
        )
        .at(0, Attr::Time, HISTORICAL),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::DSH;
    use crate::Annotator;

    fn time_of(text: &str, word: &str) -> Option<String> {
        let doc = Annotator::builder().build().unwrap().annotate(text).unwrap();
        doc.tokens()
            .iter()
            .find(|t| t.text == word)
            .and_then(|t| t.attrs.get(Attr::Time).map(|l| l.to_string()))
    }

    #[test]
    fn past_in_the_past() {
        assert_eq!(time_of("She has self-harmed in the past.", "self-harmed").as_deref(), Some(HISTORICAL));
        assert_eq!(time_of("She has self-harmed in the past.", "past").as_deref(), Some(PAST));
    }

    #[test]
    fn recent_weeks_are_present() {
        assert_eq!(time_of("Took an overdose 2 weeks ago", "weeks").as_deref(), Some(PRESENT));
        assert_eq!(time_of("Took an overdose 5 years ago", "years").as_deref(), Some(PAST));
    }

    #[test]
    fn life_stage_expressions() {
        assert_eq!(time_of("She cut herself as a teenager", "teenager").as_deref(), Some(PAST));
        assert_eq!(time_of("She cut herself in her teens", "teens").as_deref(), Some(PAST));
    }

    #[test]
    fn overdose_marked_historical_from_previous() {
        let doc = Annotator::builder()
            .build()
            .unwrap()
            .annotate("previous overdose")
            .unwrap();
        assert!(doc[1].attrs.is(Attr::Dsh, DSH));
        assert!(doc[1].attrs.is(Attr::Time, HISTORICAL));
    }
}
