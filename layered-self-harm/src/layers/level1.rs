//! Second pass over level-0 mentions: extend them over attempts and
//! coordinated body parts, hedge thoughts and plans, retract dosages and
//! headings, and type every mention.

use super::{dsh, la, possessive, BEHAVIOUR, SIDES};
use crate::labels::dsh_type::{self, SELF_HARM, SUICIDALITY};
use crate::labels::{BODY_PART, BULLET, DSH, HARM_ACTION, HEDGING, INTENT, SUICIDE};
use layered_rules::dsl::*;
use layered_rules::pattern::TokenSpec;
use layered_rules::{Attr, Rule};

const TELL: &[&str] = &["command", "compel", "compell", "incite", "say", "tell", "urge"];
const ATTEMPT: &[&str] = &["attempt", "try", "attempting", "trying"];

fn suicide() -> TokenSpec {
    la(SUICIDE)
}

/// Drop the cue word and hedge the mention it introduces.
fn hedged_cue(rule: Rule) -> Rule {
    rule.clear_at(0, Attr::Dsh).last(Attr::Hedging, HEDGING).merged()
}

/// Not a self-harm mention after all.
fn retract(rule: Rule) -> Rule {
    rule.clear_all(Attr::Dsh).merged()
}

pub(super) fn rules() -> Vec<Rule> {
    let mut rules = extensions();
    rules.extend(hedges());
    rules.extend(retractions());
    rules.extend(types());
    rules
}

fn extensions() -> Vec<Rule> {
    vec![
        // cut her wrists and (both) her arms
        Rule::new(
            "DSH_AND_BODY_PART",
            vec![
                dsh(),
                lemma("and"),
                lemma_in(&["all", "both"]).opt(),
                possessive().opt(),
                lemma_in(SIDES).star(),
                la(BODY_PART),
            ],
        )
        .all(Attr::Dsh, DSH)
        .merged(),
        Rule::new("ACT_OF_DSH", vec![lemma("act"), lemma("of"), dsh().plus()])
            .clear_at(0, Attr::Dsh)
            .merged(),
        Rule::new(
            "ATTEMPT_TO_DSH",
            vec![lemma_in(ATTEMPT), lemma_in(&["at", "to"]), dsh().plus()],
        )
        .last(Attr::Dsh, DSH)
        .merged(),
        Rule::new(
            "ATTEMPT_AT_SUICIDE",
            vec![lemma_in(&["attempt", "try"]), lemma("at").opt(), suicide().plus()],
        )
        .last(Attr::Dsh, DSH)
        .last(Attr::DshType, SUICIDALITY)
        .merged(),
        Rule::new(
            "ATTEMPT_TO_COMMIT_SUICIDE",
            vec![lemma_in(ATTEMPT), lemma_in(&["at", "to"]), suicide().plus()],
        )
        .last(Attr::Dsh, DSH)
        .last(Attr::DshType, SUICIDALITY)
        .merged(),
        // voices telling her to kill herself
        Rule::new(
            "TELL_TO_ATTEMPT_TO_DSH_SUICIDE",
            vec![
                lemma_in(TELL),
                lemma("to").opt(),
                lemma_in(&["her", "him", "them"]),
                lemma("to"),
                pos("VERB").opt(),
                pos("CCONJ").opt(),
                suicide().plus(),
            ],
        )
        .last(Attr::Dsh, DSH)
        .last(Attr::Hedging, HEDGING)
        .last(Attr::DshType, SUICIDALITY)
        .merged(),
        // voices telling her to jump out of the window
        Rule::new(
            "TELL_TO_ATTEMPT_TO_DSH",
            vec![
                lemma_in(TELL),
                lemma("to").opt(),
                lemma_in(&["her", "him", "them"]),
                lemma("to"),
                pos("VERB").opt(),
                pos("CCONJ").opt(),
                dsh().plus(),
            ],
        )
        .last(Attr::Dsh, DSH)
        .last(Attr::Hedging, HEDGING)
        .merged(),
        // cuts from self-harm
        Rule::new(
            "HARM_ACTION_N_FROM_DSH",
            vec![la(HARM_ACTION), lemma("from"), dsh().plus()],
        )
        .all(Attr::Dsh, DSH)
        .merged(),
        // made a (serious) suicide attempt
        Rule::new(
            "MAKE_SUICIDE_ATTEMPT",
            vec![
                lemma("make"),
                pos_in(&["ADJ", "DET", "NUM"]),
                pos_in(&["ADJ", "ADV"]).star(),
                suicide().plus(),
            ],
        )
        .all(Attr::Dsh, DSH)
        .all(Attr::DshType, SUICIDALITY)
        .merged(),
        Rule::new("DSH_BEHAVIOUR", vec![dsh().plus(), lemma_in(BEHAVIOUR)])
            .all(Attr::Dsh, DSH)
            .merged(),
    ]
}

fn hedges() -> Vec<Rule> {
    vec![
        hedged_cue(Rule::new(
            "THOUGHT_OF_DSH",
            vec![
                lemma_in(&["dream", "plan", "thought"]),
                lemma_in(&["about", "of"]),
                dsh().plus(),
            ],
        )),
        // plan to self-harm
        hedged_cue(Rule::new(
            "PLAN_TO_DSH",
            vec![la(INTENT), pos_in(&["PART", "ADP"]), dsh().plus()],
        )),
        Rule::new(
            "PLAN_TO_SUICIDE",
            vec![lemma_in(&["intend", "intent", "plan"]), lemma("to"), suicide().plus()],
        )
        .clear_at(0, Attr::Dsh)
        .last(Attr::Dsh, DSH)
        .last(Attr::Hedging, HEDGING),
        Rule::new(
            "THOUGHT_OF_DSH_OR_SUICIDE",
            vec![
                lemma_in(&["dream", "thought"]),
                lemma_in(&["about", "of"]),
                dsh().plus(),
                pos("CCONJ"),
                lemma("suicide"),
            ],
        )
        .clear_at(0, Attr::Dsh)
        .last(Attr::Dsh, DSH)
        .last(Attr::Hedging, HEDGING)
        .merged(),
        Rule::new("HARMFUL_THOUGHT", vec![lemma("harmful"), lemma("thought")])
            .all(Attr::Dsh, DSH)
            .all(Attr::Hedging, HEDGING)
            .all(Attr::DshType, SELF_HARM)
            .merged(),
        // suicidal or self-harm ideation
        Rule::new(
            "SUICIDAL_CCONJ_DSH_IDEATION",
            vec![
                lemma_in(&["suicidal", "suicide"]),
                pos("CCONJ"),
                dsh().plus(),
                lemma("ideation"),
            ],
        )
        .at(0, Attr::Dsh, DSH)
        .at(0, Attr::Hedging, HEDGING)
        .at(0, Attr::DshType, SUICIDALITY)
        .last(Attr::Hedging, HEDGING)
        .last(Attr::DshType, SUICIDALITY)
        .merged(),
        // prevent harm to self
        Rule::new(
            "AVOID_DSH",
            vec![
                lemma_in(&["avoid", "avert", "prevent", "stop"]),
                any().opt(),
                dsh().plus(),
            ],
        )
        .last(Attr::Hedging, HEDGING)
        .merged(),
        // a way of harming herself
        Rule::new(
            "WAY_OF_DSH",
            vec![lemma_in(&["mean", "method", "way"]), lemma("of"), dsh().plus()],
        )
        .last(Attr::Hedging, HEDGING)
        .merged(),
    ]
}

fn retractions() -> Vec<Rule> {
    let od = || lemma_in(&["od", "OD"]);
    vec![
        // Self-harm:
        retract(Rule::new("DSH_HEADING", vec![dsh().plus(), lemma(":")])),
        // Risk (overdose, self-harm, jumping from height):
        retract(Rule::new(
            "DSH_HEADING_2",
            vec![
                lemma("("),
                lemma_not_in(&["(", ")"])
                    .and(tag_not_in(&["VB", "VBD", "VBN", "VBP", "VBZ"]))
                    .plus(),
                lemma(")"),
                lemma(":"),
            ],
        )),
        // 20mg OD (once daily)
        Rule::new(
            "OD_DOSAGE",
            vec![
                lemma_re(r"^(mc?gr?s?|(micro|mill?i)?g(ram(me)?)?s?|tablet|tabs?)$"),
                od(),
            ],
        )
        .clear_at(1, Attr::Dsh)
        .merged(),
        Rule::new(
            "NUMUNIT_OD_DOSAGE",
            vec![lemma_re(r"^[0-9.,]+(mc?gs?|(micro|mill?i)?gram(me)?)$"), od()],
        )
        .clear_at(1, Attr::Dsh)
        .merged(),
        retract(Rule::new(
            "CUT_DOWN",
            vec![lemma_in(&["cut", "cutting"]), lemma("down")],
        )),
        retract(Rule::new(
            "PICK_UP",
            vec![lemma_in(&["pick", "picking"]), lemma("up")],
        )),
        retract(Rule::new("SCARED", vec![orth("scared")])),
        retract(Rule::new(
            "CLEARED_FROM_DSH",
            vec![lemma("clear"), lemma("from"), dsh().plus()],
        )),
        // interpreted as self-harm
        retract(Rule::new(
            "INTERPRET_AS_DSH",
            vec![
                lemma_in(&["appear", "interpret", "look", "seem"]),
                any(),
                lemma("be").opt(),
                dsh().plus(),
            ],
        )),
        // rather than an actual attempt to end her life
        retract(Rule::new(
            "RATHER_THAN_DSH",
            vec![
                lemma_in(&["rather", "oppose"]),
                pos_not_in(&["VERB"]).plus(),
                dsh().plus(),
            ],
        )),
        // a) self-harm
        Rule::new("BULLET_DSH", vec![la(BULLET), dsh().plus()])
            .all(Attr::Hedging, HEDGING)
            .merged(),
        Rule::new("BULLET_SUICIDE", vec![la(BULLET), suicide().plus()])
            .all(Attr::Hedging, HEDGING)
            .merged(),
    ]
}

/// `HA_TYPE` from the harm-action lexicon becomes the mention's type; any
/// mention left untyped is plain self-harm.
fn types() -> Vec<Rule> {
    let mut rules: Vec<Rule> = dsh_type::ALL
        .iter()
        .map(|label| {
            Rule::new(
                &format!("DSH_TYPE_{}", label),
                vec![is(Attr::HaType, label).plus()],
            )
            .all(Attr::DshType, label)
            .merged()
        })
        .collect();
    rules.push(
        Rule::new(
            "DSH_TYPE_DEFAULT",
            vec![dsh().and(unset(Attr::DshType)).plus()],
        )
        .all(Attr::DshType, SELF_HARM)
        .merged(),
    );
    rules
}
