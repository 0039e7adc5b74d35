//! History sections: headed blocks ("Past psychiatric history: ...") and
//! sentences that open with a history cue. Everything inside is marked
//! `HISTORY`, which propagation later turns into historical time.

use super::la;
use crate::labels::{EPISODE, HISTORY, HISTORY_TYPE};
use layered_rules::dsl::*;
use layered_rules::pattern::{Field, TokenSpec};
use layered_rules::{Attr, Rule};

const SEPARATORS: &[&str] = &[":", "-", ";", "—"];
const SENTENCE_END: &[&str] = &[".", "?", "!", "*", "#"];

fn orth_re(pattern: &str) -> TokenSpec {
    text_re(Field::Orth, pattern)
}

fn separator() -> TokenSpec {
    lemma_in(SEPARATORS)
}

/// A non-space token that does not end a sentence or a heading.
fn body(excluded: &[&str]) -> TokenSpec {
    lemma_not_in(excluded).and(not_space())
}

fn historical_heading() -> Vec<TokenSpec> {
    vec![
        lower("historical"),
        lemma("risk").opt(),
        lemma("to").opt(),
        lemma("self").opt(),
        separator().plus(),
        space().opt(),
        body(&[".", "?", "!", "*", "#", "-", "—"]).plus(),
    ]
}

fn history_of() -> Vec<TokenSpec> {
    vec![
        lower("history"),
        lemma("of"),
        body(&[".", "?", "!", "*", "#", "-", "—", "present"]).plus(),
    ]
}

fn with(mut pattern: Vec<TokenSpec>, tail: TokenSpec) -> Vec<TokenSpec> {
    pattern.push(tail);
    pattern
}

pub(super) fn rules() -> Vec<Rule> {
    let sentence_body = || body(&[".", "?", "!", "*", "#", "—"]);
    vec![
        // past psychiatric and forensic history
        Rule::new(
            "HISTORY_COORD",
            vec![
                lower_in(&["past", "previous", "prior"]).opt(),
                la(HISTORY_TYPE),
                tag("CC").opt(),
                la(HISTORY_TYPE).opt(),
                lower_in(&["background", "history", "hx", "h/o"]),
            ],
        )
        .all(Attr::La, HISTORY_TYPE),
        Rule::new(
            "EPISODE_HEAD",
            vec![
                lower_in(&["historical", "past", "previous", "prior"]),
                lemma("episode"),
                lemma("of"),
            ],
        )
        .all(Attr::La, EPISODE),
        // Psychiatric history: ...
        Rule::new(
            "HISTORY_1",
            vec![la(HISTORY_TYPE).plus(), separator().plus(), not_space().plus()],
        )
        .all(Attr::History, HISTORY),
        // PERSONAL HISTORY on a line of its own, then the paragraph
        Rule::new(
            "HISTORY_2",
            vec![
                space(),
                la(HISTORY_TYPE).plus(),
                space(),
                not_space().plus(),
                space(),
            ],
        )
        .all(Attr::History, HISTORY),
        // ---------- Past psychiatric history ----------
        Rule::new(
            "HISTORY_3",
            vec![
                orth_re(r"^[-=/#:_]{5,}$"),
                la(HISTORY_TYPE).plus(),
                separator().opt(),
                not_space().plus(),
                orth_re(r"^[-=/#:_]{4,}$"),
            ],
        )
        .all(Attr::History, HISTORY),
        Rule::new("HISTORICAL_1", with(historical_heading(), lemma(".")))
            .all(Attr::History, HISTORY),
        Rule::new("HISTORICAL_2", with(historical_heading(), space()))
            .all(Attr::History, HISTORY),
        Rule::new("HISTORY_4", with(history_of(), lemma_in(SENTENCE_END)))
            .all(Attr::History, HISTORY),
        Rule::new("HISTORY_5", with(history_of(), space())).all(Attr::History, HISTORY),
        Rule::new(
            "EPISODE_SENT_1",
            vec![la(EPISODE).plus(), sentence_body().plus(), lemma_in(SENTENCE_END)],
        )
        .all(Attr::History, HISTORY),
        Rule::new(
            "EPISODE_SENT_2",
            vec![la(EPISODE), sentence_body().plus(), space(), space()],
        )
        .all(Attr::History, HISTORY),
        Rule::new(
            "HISTORICAL_SENT_1",
            vec![lower("historical"), sentence_body().plus(), lemma_in(SENTENCE_END)],
        )
        .all(Attr::History, HISTORY),
        Rule::new(
            "HISTORICAL_SENT_2",
            vec![lower("historical"), sentence_body().plus(), space()],
        )
        .all(Attr::History, HISTORY),
    ]
}

#[cfg(test)]
mod tests {
    use crate::Annotator;
    use layered_rules::Attr;

    fn history_flags(text: &str) -> Vec<(String, bool)> {
        let annotator = Annotator::builder().build().unwrap();
        let doc = annotator.annotate(text).unwrap();
        doc.tokens()
            .iter()
            .filter(|t| !t.is_space())
            .map(|t| (t.text.clone(), t.attrs.is_set(Attr::History)))
            .collect()
    }

    #[test]
    fn history_of_runs_to_sentence_end() {
        let flags = history_flags("Family history of self-harm. Seen today.");
        let marked: Vec<&str> = flags
            .iter()
            .filter(|(_, set)| *set)
            .map(|(text, _)| text.as_str())
            .collect();
        assert_eq!(marked, vec!["history", "of", "self-harm", "."]);
    }

    #[test]
    fn headed_section() {
        let flags = history_flags("Psychiatric history: overdose aged 15");
        assert!(flags.iter().all(|(_, set)| *set), "{:?}", flags);
    }
}
