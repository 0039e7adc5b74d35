//! First pass over the lexical categories: self-harm expressions built from
//! harm actions, body parts, intent markers and suicide phrases.

use super::{dsh, la, possessive, reflexive, subject, BEHAVIOUR, SIDES};
use crate::labels::dsh_type::{
    HAIR_PULLING, OVERDOSE, SELF_HARM, SUICIDALITY, TRAUMA as TRAUMA_TYPE,
};
use crate::labels::{
    BODY_PART, BULLET, DSH, HARM_ACTION, HEDGING, INTENT, MED, PAST, SUICIDE, UNCERTAIN,
};
use layered_rules::dsl::*;
use layered_rules::pattern::{Field, NumOp, TokenSpec};
use layered_rules::{Attr, Rule};

fn intent() -> TokenSpec {
    la(INTENT)
}

fn harm_action() -> TokenSpec {
    la(HARM_ACTION)
}

fn side() -> TokenSpec {
    lemma_in(SIDES).star()
}

/// Mention, hedged, of suicidality.
fn suicidal(rule: Rule) -> Rule {
    rule.all(Attr::Dsh, DSH)
        .all(Attr::Hedging, HEDGING)
        .all(Attr::DshType, SUICIDALITY)
}

fn self_harm(rule: Rule) -> Rule {
    rule.all(Attr::Dsh, DSH).all(Attr::DshType, SELF_HARM)
}

fn overdose(rule: Rule) -> Rule {
    rule.all(Attr::Dsh, DSH).all(Attr::DshType, OVERDOSE)
}

fn trauma(rule: Rule) -> Rule {
    rule.all(Attr::Dsh, DSH).all(Attr::DshType, TRAUMA_TYPE).merged()
}

pub(super) fn rules() -> Vec<Rule> {
    let mut rules = form_and_history();
    rules.extend(suicidality());
    rules.extend(self_harm_rules());
    rules.extend(overdoses());
    rules.extend(other_methods());
    rules
}

fn form_and_history() -> Vec<Rule> {
    vec![
        // a)  1.  12:
        Rule::new(
            "FORM_BULLET",
            vec![
                lemma_re(r"^([a-z]|[1-9][0-9]?)$"),
                lemma_in(&[")", ".", "-", ":"]),
            ],
        )
        .all(Attr::La, BULLET),
        Rule::new("HISTORY", vec![lemma("history")]).at(0, Attr::Time, PAST),
    ]
}

fn suicidality() -> Vec<Rule> {
    vec![
        suicidal(Rule::new(
            "SUICIDAL_IDEATION",
            vec![
                lemma_in(&["suicide", "suicidal"]),
                lemma_in(&["idea", "ideation", "thought"]),
            ],
        )),
        suicidal(Rule::new(
            "SUICIDAL_INTENTION",
            vec![lemma_in(&["suicide", "suicidal"]), intent()],
        )),
        Rule::new(
            "PLAN_FOR_SUICIDE",
            vec![lemma("plan"), lemma_in(&["for", "of"]), lemma("suicide")],
        )
        .at(2, Attr::Dsh, DSH)
        .at(2, Attr::Hedging, HEDGING)
        .at(2, Attr::DshType, SUICIDALITY),
        Rule::new(
            "THOUGHT_OF_SUICIDE",
            vec![
                lemma_in(&["dream", "thought"]),
                lemma_in(&["about", "of"]),
                lemma("suicide"),
            ],
        )
        .clear_at(0, Attr::Dsh)
        .last(Attr::Dsh, DSH)
        .last(Attr::Hedging, HEDGING)
        .last(Attr::DshType, SUICIDALITY)
        .merged(),
        suicidal(Rule::new(
            "WANT_TO_DIE",
            vec![lemma("want"), lemma("to"), lemma("die")],
        )),
        suicidal(Rule::new(
            "FEEL_SUICIDAL",
            vec![lemma("feel"), lemma("suicidal")],
        )),
        // phrases standing for suicide, consumed by level 1
        Rule::new("COMMIT_SUICIDE", vec![lemma("commit"), lemma("suicide")])
            .all(Attr::La, SUICIDE),
        Rule::new(
            "END_HER_LIFE",
            vec![
                lemma_in(&["end", "take"]),
                possessive(),
                lemma("own").opt(),
                lemma("life"),
            ],
        )
        .all(Attr::La, SUICIDE),
        Rule::new("KILL_HERSELF", vec![lemma("kill"), reflexive()]).all(Attr::La, SUICIDE),
        Rule::new("SUICIDE_ATTEMPT", vec![lemma("suicide"), lemma("attempt")])
            .all(Attr::La, SUICIDE),
        Rule::new("ATTEMPT_SUICIDE", vec![lemma("attempt"), lemma("suicide")])
            .all(Attr::La, SUICIDE),
    ]
}

fn self_harm_rules() -> Vec<Rule> {
    let reflexive_re = r"^(herself|himself|themselves|themself)\W?$";
    vec![
        Rule::new("DELIBERATE_DSH", vec![lemma("deliberate"), dsh().plus()])
            .all(Attr::Dsh, DSH),
        // self harm/suicide
        self_harm(Rule::new(
            "HARM_LEMMA",
            vec![lemma("self"), lemma_re(r"harm\W")],
        )),
        self_harm(Rule::new(
            "SELF_HARM_SPLIT",
            vec![lemma("self"), lemma("-"), lemma("harm")],
        )),
        // burnt (both) her (upper (left)) arms
        Rule::new(
            "HARM_ACTION_POSITION_BODY_PART",
            vec![
                harm_action(),
                lemma_in(&["all", "both"]).opt(),
                possessive(),
                side(),
                la(BODY_PART).and(pos("NOUN")),
            ],
        )
        .all(Attr::Dsh, DSH)
        .merged(),
        // burnt herself on the (upper (left)) arm
        Rule::new(
            "HARM_ACTION_PP_POSITION_BODY_PART",
            vec![
                harm_action(),
                reflexive(),
                pos("ADP"),
                pos("DET"),
                side(),
                la(BODY_PART),
            ],
        )
        .all(Attr::Dsh, DSH)
        .merged(),
        Rule::new(
            "PULL_HER_HAIR",
            vec![
                lemma_in(&["pull", "tug", "yank", "pulling", "tugging", "yanking"]),
                possessive(),
                lemma("hair"),
            ],
        )
        .all(Attr::Dsh, DSH)
        .all(Attr::Hedging, UNCERTAIN)
        .all(Attr::DshType, HAIR_PULLING)
        .merged(),
        // burns on (both) her (upper (left)) arm
        Rule::new(
            "HARM_ACTION_PP_HER_POSITION_BODY_PART",
            vec![
                harm_action(),
                pos("ADP"),
                lemma("both").opt(),
                possessive(),
                side(),
                la(BODY_PART),
            ],
        )
        .all(Attr::Dsh, DSH)
        .merged(),
        self_harm(Rule::new(
            "HARM_V_HERSELF",
            vec![
                intent().star(),
                lemma("harm"),
                lemma_re(reflexive_re),
                intent().star(),
            ],
        ))
        .merged(),
        self_harm(Rule::new(
            "HARM_SELF",
            vec![
                intent().star(),
                lemma("harm"),
                lemma_re(r"self\W?"),
                intent().star(),
            ],
        ))
        .merged(),
        self_harm(Rule::new(
            "HARM_V_HER_SELF",
            vec![
                intent().star(),
                lemma("harm"),
                possessive(),
                lemma_re(r"self\W?"),
                intent().star(),
            ],
        ))
        .merged(),
        // (deliberately) cut herself (deliberately)
        Rule::new(
            "HARM_ACTION_V_HERSELF_1",
            vec![intent().star(), harm_action(), reflexive(), intent().star()],
        )
        .all(Attr::Dsh, DSH)
        .merged(),
        Rule::new(
            "HARM_ACTION_N_HERSELF",
            vec![intent().star(), harm_action(), lemma("of"), reflexive()],
        )
        .all(Attr::Dsh, DSH)
        .merged(),
        Rule::new(
            "DELIBERATE_HARM_TO_HERSELF",
            vec![
                intent().star(),
                lemma("harm"),
                lemma_in(&["to", "toward", "towards"]),
                lemma_re(r"^((her|him|them)?self|themselves)\W?$"),
            ],
        )
        .all(Attr::Dsh, DSH)
        .merged(),
        Rule::new(
            "DELIBERATELY_INJURE_HERSELF",
            vec![intent().plus(), harm_action(), reflexive()],
        )
        .all(Attr::Dsh, DSH)
        .merged(),
        self_harm(Rule::new(
            "DELIBERATE_INJURY",
            vec![
                intent().plus(),
                lemma_in(&["harm", "injury", "violence"]).and(pos("NOUN")),
                lemma_in(&["to", "toward", "towards"]),
                reflexive(),
            ],
        ))
        .merged(),
        // (deliberate) self-harm (behaviour)
        Rule::new(
            "DSH_1",
            vec![
                intent().star(),
                lemma_re(r"^(self-.+)$").and(harm_action()),
                lemma("behaviour").opt(),
            ],
        )
        .all(Attr::Dsh, DSH)
        .merged(),
        self_harm(Rule::new(
            "SELF-HARMER",
            vec![lemma("self-"), lemma("harmer")],
        ))
        .merged(),
        // (deliberate) self- harm (behaviour)
        Rule::new(
            "DSH_3",
            vec![
                intent().star(),
                lemma_in(&["self-", "self"]),
                harm_action(),
                lemma("behaviour").opt(),
            ],
        )
        .all(Attr::Dsh, DSH)
        .merged(),
        self_harm(Rule::new(
            "DSH_4",
            vec![
                intent().star(),
                lemma("self"),
                lemma_in(&["harm", "harming"]),
                lemma("behaviour").opt(),
            ],
        )),
        // (deliberately) engage in cutting (behaviour)
        Rule::new(
            "ENGAGE_IN_HARM",
            vec![
                intent().star(),
                lemma_in(&["carry", "do", "engage", "perform"]),
                pos_in(&["ADP", "PART"]).opt(),
                harm_action(),
                lemma("behaviour").opt(),
            ],
        )
        .at(2, Attr::Dsh, DSH)
        .at(3, Attr::Dsh, DSH)
        .at(4, Attr::Dsh, DSH),
        // she has (deep) (self-) lacerations
        Rule::new(
            "SHE_HAS_HARM",
            vec![
                subject(),
                lemma("be").opt(),
                lemma_in(&["display", "evidence", "have", "present", "show"]).plus(),
                pos("ADP").opt(),
                pos("ADJ").opt(),
                lemma("self-").opt(),
                harm_action().plus(),
            ],
        )
        .last(Attr::Dsh, DSH),
    ]
}

fn overdoses() -> Vec<Rule> {
    let tablets = || lemma_in(&["pill", "tablet"]);
    vec![
        // took 12 paracetamol tablets
        overdose(Rule::new(
            "TAKE_NUM_MED_TABLETS",
            vec![lemma("take"), lemma_cmp(NumOp::Ge, 10.0), la(MED), tablets()],
        )),
        // took 28x paracetamol tablets
        overdose(Rule::new(
            "TAKE_NUMX_MED_TABLETS",
            vec![
                lemma("take"),
                lemma_re(r"^(1[0-9]+|[2-9][0-9]*)[xX]$"),
                any(),
                tablets(),
            ],
        )),
        // took 12 tablets of paracetamol
        overdose(Rule::new(
            "TAKE_NUM_TABLETS_OF_MED",
            vec![
                lemma("take"),
                lemma_cmp(NumOp::Ge, 10.0),
                tablets(),
                lemma("of"),
                la(MED),
            ],
        )),
        // took a pack of paracetamol
        overdose(Rule::new(
            "TAKE_NUM_PACK_MED_TABLETS",
            vec![
                lemma("take"),
                pos_in(&["DET", "NUM"]),
                pos("ADJ").opt(),
                lemma_in(&["box", "pack", "packet"]),
                lemma("of"),
                la(MED),
            ],
        )),
    ]
}

fn other_methods() -> Vec<Rule> {
    vec![
        trauma(Rule::new(
            "JUMP_OFF",
            vec![
                intent().star(),
                lemma("jump"),
                lemma_in(&["from", "off", "out"]),
                lemma_not_in(&["one"]),
            ],
        )),
        trauma(Rule::new(
            "JUMP_IN_FRONT",
            vec![
                intent().star(),
                lemma("jump"),
                lemma("in"),
                lemma("front"),
                lemma("of"),
            ],
        )),
        trauma(Rule::new(
            "THROW_HERSELF",
            vec![
                intent().star(),
                lemma("throw"),
                reflexive(),
                pos_in(&["ADP", "PART"]).plus(),
            ],
        )),
        // great risk to herself
        self_harm(Rule::new(
            "RISK_TO_HERSELF",
            vec![
                lemma_in(&[
                    "elevate", "elevated", "extreme", "great", "high", "intense", "much",
                    "serious", "worry", "worrying",
                ]),
                lemma("risk"),
                lemma("to"),
                reflexive(),
            ],
        ))
        .merged(),
        self_harm(Rule::new(
            "SELF-INFLICTED_INJURIES",
            vec![
                lemma_in(&["self-inflict", "self-inflicted", "self-inflicting"]),
                harm_action().plus(),
            ],
        ))
        .merged(),
        Rule::new(
            "SUICIDAL_BEHAVIOUR",
            vec![lemma_in(&["suicidal", "suicide"]), lemma_in(BEHAVIOUR)],
        )
        .all(Attr::Dsh, DSH)
        .all(Attr::DshType, SUICIDALITY)
        .merged(),
        // suicidal thoughts or attempts
        Rule::new(
            "SUICIDAL_N_CONJ_N",
            vec![
                lemma_in(&["suicidal", "suicide"]),
                text_re(Field::Pos, "^N"),
                pos("CCONJ"),
                pos("NOUN").and(lemma_in(BEHAVIOUR)),
            ],
        )
        .at(0, Attr::Dsh, DSH)
        .at(0, Attr::DshType, SUICIDALITY)
        .at(1, Attr::Dsh, DSH)
        .at(1, Attr::DshType, SUICIDALITY)
        .last(Attr::Dsh, DSH)
        .last(Attr::DshType, SUICIDALITY),
        self_harm(Rule::new(
            "VIOLENCE_TO_SELF",
            vec![
                lemma("violence"),
                lemma("to"),
                lemma_in(&["herself", "himself", "themselves", "self"]),
            ],
        )),
    ]
}
