//! Attribute channels owned by the rule engine.
//!
//! Every token carries one optional [`Label`] per [`Attr`]. Parser fields
//! (text, lemma, tags, dependencies) live on [`Token`](super::Token) itself and
//! are not reachable through this module, so rules can never overwrite them.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// The fixed set of channels a rule or lexicon may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attr {
    #[serde(rename = "DSH")]
    Dsh,
    #[serde(rename = "DSH_TYPE")]
    DshType,
    #[serde(rename = "HA_TYPE")]
    HaType,
    #[serde(rename = "LA")]
    La,
    #[serde(rename = "NEG")]
    Neg,
    #[serde(rename = "TIME")]
    Time,
    #[serde(rename = "MODALITY")]
    Modality,
    #[serde(rename = "HEDGING")]
    Hedging,
    #[serde(rename = "HISTORY")]
    History,
}

impl Attr {
    pub const COUNT: usize = 9;

    pub const ALL: [Attr; Attr::COUNT] = [
        Attr::Dsh,
        Attr::DshType,
        Attr::HaType,
        Attr::La,
        Attr::Neg,
        Attr::Time,
        Attr::Modality,
        Attr::Hedging,
        Attr::History,
    ];

    /// The upper-case name used in rule files and lexicon tables.
    pub fn name(self) -> &'static str {
        match self {
            Attr::Dsh => "DSH",
            Attr::DshType => "DSH_TYPE",
            Attr::HaType => "HA_TYPE",
            Attr::La => "LA",
            Attr::Neg => "NEG",
            Attr::Time => "TIME",
            Attr::Modality => "MODALITY",
            Attr::Hedging => "HEDGING",
            Attr::History => "HISTORY",
        }
    }

    pub fn from_name(name: &str) -> Option<Attr> {
        Attr::ALL.iter().copied().find(|attr| attr.name() == name)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A short channel value such as `"DSH"`, `"NEG"` or `"PAST"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(Cow<'static, str>);

impl Label {
    pub const fn from_static(value: &'static str) -> Self {
        Label(Cow::Borrowed(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Label {
    fn from(value: &'static str) -> Self {
        Label(Cow::Borrowed(value))
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label(Cow::Owned(value))
    }
}

impl PartialEq<str> for Label {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One optional label per [`Attr`], all unset by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrSlots {
    values: [Option<Label>; Attr::COUNT],
}

impl AttrSlots {
    pub fn get(&self, attr: Attr) -> Option<&Label> {
        self.values[attr.slot()].as_ref()
    }

    /// True when the channel holds exactly `label`.
    pub fn is(&self, attr: Attr, label: &str) -> bool {
        self.get(attr).map_or(false, |value| value == label)
    }

    pub fn is_set(&self, attr: Attr) -> bool {
        self.values[attr.slot()].is_some()
    }

    /// Writing `None` clears the channel.
    pub fn set(&mut self, attr: Attr, value: Option<Label>) {
        self.values[attr.slot()] = value;
    }

    pub fn clear(&mut self, attr: Attr) {
        self.values[attr.slot()] = None;
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Set channels in [`Attr::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Attr, &Label)> + '_ {
        Attr::ALL
            .iter()
            .filter_map(move |attr| self.get(*attr).map(|label| (*attr, label)))
    }

    /// Fill every channel that is unset here from `other`.
    pub fn fill_from(&mut self, other: &AttrSlots) {
        for (slot, value) in self.values.iter_mut().zip(other.values.iter()) {
            if slot.is_none() {
                *slot = value.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for attr in Attr::ALL {
            assert_eq!(Attr::from_name(attr.name()), Some(attr));
        }
        assert_eq!(Attr::from_name("LEMMA"), None);
        assert_eq!(Attr::from_name("dsh"), None);
    }

    #[test]
    fn slots_default_unset() {
        let slots = AttrSlots::default();
        assert!(slots.is_empty());
        assert!(!slots.is_set(Attr::Dsh));
        assert!(!slots.is(Attr::Dsh, "DSH"));
    }

    #[test]
    fn set_and_clear() {
        let mut slots = AttrSlots::default();
        slots.set(Attr::Neg, Some(Label::from("NEG")));
        assert!(slots.is(Attr::Neg, "NEG"));
        assert!(!slots.is(Attr::Neg, "NON_NEG"));
        slots.set(Attr::Neg, None);
        assert!(!slots.is_set(Attr::Neg));
    }

    #[test]
    fn fill_keeps_existing_values() {
        let mut left = AttrSlots::default();
        left.set(Attr::DshType, Some("CUTTING".into()));

        let mut right = AttrSlots::default();
        right.set(Attr::DshType, Some("SELF-HARM".into()));
        right.set(Attr::Time, Some("PAST".into()));

        left.fill_from(&right);
        assert!(left.is(Attr::DshType, "CUTTING"));
        assert!(left.is(Attr::Time, "PAST"));
        assert_eq!(
            left.iter().map(|(attr, _)| attr).collect::<Vec<_>>(),
            vec![Attr::DshType, Attr::Time]
        );
    }
}
