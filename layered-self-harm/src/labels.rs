//! Channel values written by the lexicons, the rule layers and context
//! propagation.

// DSH
pub const DSH: &str = "DSH";
pub const NON_DSH: &str = "NON_DSH";

// NEG
pub const NEG: &str = "NEG";

// TIME
pub const PAST: &str = "PAST";
pub const PRESENT: &str = "PRESENT";
pub const LIFE_STAGE: &str = "LIFE_STAGE";
/// Set by the time layer on a mention anchored in the past.
pub const HISTORICAL: &str = "HISTORICAL";
/// Set by propagation: the mention carries past-time context.
pub const TIME: &str = "TIME";

// MODALITY / HEDGING
pub const MODALITY: &str = "MODALITY";
pub const HEDGING: &str = "HEDGING";
pub const UNCERTAIN: &str = "UNCERTAIN";

// HISTORY
pub const HISTORY: &str = "HISTORY";

// LA (lexical category)
pub const HARM_ACTION: &str = "HARM_ACTION";
pub const BODY_PART: &str = "BODY_PART";
pub const INTENT: &str = "INTENT";
pub const SUICIDE: &str = "SUICIDE";
pub const MED: &str = "MED";
pub const BULLET: &str = "BULLET";
pub const HISTORY_TYPE: &str = "HISTORY_TYPE";
pub const EPISODE: &str = "EPISODE";
pub const TRAUMA: &str = "TRAUMA";

/// Values of `DSH_TYPE` and `HA_TYPE`.
pub mod dsh_type {
    pub const SELF_HARM: &str = "SELF-HARM";
    pub const SUICIDALITY: &str = "SUICIDALITY";
    pub const OVERDOSE: &str = "OVERDOSE";
    pub const CUTTING: &str = "CUTTING";
    pub const STRANGULATION: &str = "STRANGULATION";
    pub const BURNING: &str = "BURNING";
    pub const BITING: &str = "BITING";
    pub const STABBING: &str = "STABBING";
    pub const HITTING: &str = "HITTING";
    pub const TRAUMA: &str = "TRAUMA";
    pub const SKIN_PICKING: &str = "SKIN-PICKING";
    pub const HAIR_PULLING: &str = "HAIR-PULLING";

    /// Every type with a dedicated `HA_TYPE` to `DSH_TYPE` transfer rule.
    pub const ALL: &[&str] = &[
        SELF_HARM,
        HITTING,
        OVERDOSE,
        SUICIDALITY,
        CUTTING,
        STRANGULATION,
        BURNING,
        BITING,
        STABBING,
        TRAUMA,
        SKIN_PICKING,
        HAIR_PULLING,
    ];
}
