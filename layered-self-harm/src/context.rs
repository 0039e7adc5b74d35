//! Context propagation.
//!
//! After the rule layers have run, each mention collects negation, time,
//! modality and hedging from its surroundings: the dependency path to the
//! root, a window of preceding tokens and a window of following tokens in the
//! same sentence. The backward pass runs over every mention before the
//! forward pass starts.

use crate::labels::{DSH, HEDGING, HISTORICAL, MODALITY, NEG, NON_DSH, PAST, PRESENT, TIME};
use layered_rules::{Attr, Doc, Label, Resolver};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const REPORTING_VERBS: &[&str] = &["report", "say", "claim", "announce", "insist"];
const DEFINITE: &[&str] = &["the", "this", "that", "her"];
const ATTITUDE_VERBS: &[&str] = &[
    "believe", "desire", "dream", "feel", "imagine", "think", "want", "wish", "wonder", "worry",
    "fear",
];
const ATTITUDE_NOUNS: &[&str] = &[
    "assumption", "belief", "feeling", "desire", "dream", "idea", "opinion", "wish", "view",
    "worry", "fear",
];
const PAST_TAGS: &[&str] = &["VBD", "VBN"];

static HEDGING_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)idea(tion)?|intent|thought").unwrap());

/// Extra context checks, all off by default.
///
/// Each one trades precision for recall; enable them from the `[signals]`
/// table of the configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Signals {
    /// A governing verb or noun of belief, desire or fear hedges the mention.
    pub propositional_attitude: bool,
    pub hedging_ancestor: bool,
    pub hedging_dependent: bool,
    pub historical_ancestor: bool,
    pub historical_dependent: bool,
    /// A past tense head makes the mention historical.
    pub past_tense_governor: bool,
}

impl Signals {
    pub fn all() -> Self {
        Signals {
            propositional_attitude: true,
            hedging_ancestor: true,
            hedging_dependent: true,
            historical_ancestor: true,
            historical_dependent: true,
            past_tense_governor: true,
        }
    }
}

/// Copies context labels from nearby tokens onto mentions.
///
/// The backward window is scanned nearest token first. A `PRESENT` time
/// marker clears the mention's time and also blocks every farther `PAST`
/// marker in the window, so "years ago today she overdosed" stays current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextPropagator {
    pub backward_window: usize,
    pub forward_window: usize,
    pub signals: Signals,
}

impl Default for ContextPropagator {
    fn default() -> Self {
        ContextPropagator {
            backward_window: 10,
            forward_window: 10,
            signals: Signals::default(),
        }
    }
}

fn set(doc: &mut Doc, i: usize, attr: Attr, label: &'static str) {
    doc.set_attr(i, attr, Some(Label::from_static(label)));
}

pub fn is_mention(doc: &Doc, i: usize) -> bool {
    let attrs = &doc[i].attrs;
    attrs.is(Attr::Dsh, DSH) || attrs.is(Attr::Dsh, NON_DSH)
}

fn is_past_time(doc: &Doc, i: usize) -> bool {
    let attrs = &doc[i].attrs;
    attrs.is(Attr::Time, TIME) || attrs.is(Attr::Time, PAST)
}

/// Walk from `i` towards the root looking for a negated governor.
pub fn has_negation_ancestor(doc: &Doc, i: usize) -> bool {
    let mut visited = HashSet::new();
    let mut node = i;
    while visited.insert(node) {
        let token = &doc[node];
        let lemma = token.lemma.as_str();
        let mut children = doc.children(node);
        if REPORTING_VERBS.contains(&lemma) {
            if children.any(|c| doc[c].dep == "neg") {
                return true;
            }
        } else if lemma == "deny" {
            return true;
        } else if token.pos.starts_with('N') {
            if children.any(|c| doc[c].dep == "neg" || doc[c].lemma == "no") {
                return true;
            }
        } else if token.pos.starts_with('V') && children.any(|c| doc[c].dep == "neg") {
            return true;
        }
        if token.dep == "ROOT" || doc.is_root(node) {
            return false;
        }
        node = token.head;
    }
    false
}

/// The mention governs a definite or possessive determiner.
pub fn is_definite(doc: &Doc, i: usize) -> bool {
    doc.children(i)
        .any(|c| DEFINITE.contains(&doc[c].lemma.as_str()))
}

/// Scan back from the mention to the start of its sentence for a hedging
/// noun. A colon ends the scan.
pub fn has_hedging_noun_previous(doc: &Doc, i: usize) -> bool {
    let sent = doc.sent_range(i);
    for j in (sent.start + 1..=i).rev() {
        let token = &doc[j];
        if token.lemma == ":" {
            return false;
        }
        if token.pos.starts_with('N')
            && !token.attrs.is_set(Attr::Dsh)
            && token.attrs.is(Attr::Hedging, HEDGING)
        {
            return true;
        }
        // merged spans such as "suicidal thoughts" keep the head's lemma
        if HEDGING_HEAD.is_match(&doc[token.head].lemma) {
            return true;
        }
    }
    false
}

/// The mention is the only non-space token of its sentence.
pub fn is_singleton(doc: &Doc, i: usize) -> bool {
    doc.sent_range(i)
        .filter(|&j| j != i)
        .all(|j| doc[j].is_space())
}

/// A colon follows the mention within its sentence: a heading such as
/// "Self-harm: none".
pub fn is_section_header(doc: &Doc, i: usize) -> bool {
    (i..doc.sent_range(i).end).any(|j| doc[j].text.contains(':'))
}

pub fn has_propositional_attitude_ancestor(doc: &Doc, i: usize) -> bool {
    let mut visited = HashSet::new();
    let mut node = i;
    while visited.insert(node) && !doc.is_root(node) {
        let head = &doc[doc[node].head];
        let lemma = head.lemma.as_str();
        if (head.pos == "VERB" && ATTITUDE_VERBS.contains(&lemma))
            || (head.pos == "NOUN" && ATTITUDE_NOUNS.contains(&lemma))
        {
            return true;
        }
        if head.attrs.is(Attr::Dsh, NON_DSH) {
            return HEDGING_HEAD.is_match(lemma);
        }
        if doc[node].dep == "ROOT" {
            return false;
        }
        node = doc[node].head;
    }
    false
}

fn is_hedging(doc: &Doc, j: usize) -> bool {
    doc[j].attrs.is(Attr::Hedging, HEDGING)
}

fn is_historical(doc: &Doc, j: usize) -> bool {
    let attrs = &doc[j].attrs;
    [PAST, TIME, HISTORICAL]
        .iter()
        .any(|label| attrs.is(Attr::Time, label))
}

pub fn has_past_tense_governor(doc: &Doc, i: usize) -> bool {
    !doc.is_root(i) && PAST_TAGS.contains(&doc[doc[i].head].tag.as_str())
}

impl ContextPropagator {
    pub fn new(backward_window: usize, forward_window: usize, signals: Signals) -> Self {
        ContextPropagator {
            backward_window,
            forward_window,
            signals,
        }
    }

    /// Set the context channels of every mention. Returns whether any mention
    /// lies in a history section.
    pub fn propagate(&self, doc: &mut Doc) -> bool {
        let mentions: Vec<usize> = (0..doc.len()).filter(|&i| is_mention(doc, i)).collect();
        let mut has_history_section = false;
        for &i in &mentions {
            has_history_section |= self.backward(doc, i);
        }
        for &i in &mentions {
            self.forward(doc, i);
        }
        has_history_section
    }

    fn backward(&self, doc: &mut Doc, i: usize) -> bool {
        let in_history = doc[i].attrs.is_set(Attr::History);
        if in_history {
            set(doc, i, Attr::Time, TIME);
        }

        let definite = is_definite(doc, i);
        if has_negation_ancestor(doc, i) && !definite {
            log::debug!("negated governor for {:?}", doc[i].text);
            set(doc, i, Attr::Neg, NEG);
        }
        if has_hedging_noun_previous(doc, i) {
            log::debug!("hedging noun before {:?}", doc[i].text);
            set(doc, i, Attr::Hedging, HEDGING);
        }
        if is_singleton(doc, i) {
            log::debug!("singleton {:?}", doc[i].text);
            set(doc, i, Attr::Hedging, HEDGING);
        }
        if is_section_header(doc, i) {
            log::debug!("section header {:?}", doc[i].text);
            set(doc, i, Attr::Hedging, HEDGING);
        }
        let (hedged, historical) = self.signal_flags(doc, i);
        if hedged {
            set(doc, i, Attr::Hedging, HEDGING);
        }
        if historical {
            set(doc, i, Attr::Time, TIME);
        }

        let sent = doc.sent_range(i);
        let start = i.saturating_sub(self.backward_window).max(sent.start);
        let mut found_present = false;
        for j in (start..i).rev() {
            if !definite && doc[j].attrs.is(Attr::Neg, NEG) {
                set(doc, i, Attr::Neg, NEG);
            }
            if !found_present && is_past_time(doc, j) {
                set(doc, i, Attr::Time, TIME);
            }
            if doc[j].attrs.is(Attr::Time, PRESENT) {
                doc.set_attr(i, Attr::Time, None);
                found_present = true;
            }
            if doc[j].attrs.is(Attr::Modality, MODALITY) {
                set(doc, i, Attr::Modality, MODALITY);
            }
            if is_hedging(doc, j) {
                set(doc, i, Attr::Hedging, HEDGING);
            }
        }
        in_history
    }

    /// The optional signals: whether they hedge the mention and whether they
    /// make it historical.
    fn signal_flags(&self, doc: &Doc, i: usize) -> (bool, bool) {
        let signals = self.signals;
        let hedged = (signals.propositional_attitude && has_propositional_attitude_ancestor(doc, i))
            || (signals.hedging_ancestor && doc.ancestors(i).any(|j| is_hedging(doc, j)))
            || (signals.hedging_dependent
                && doc.descendants(i).into_iter().any(|j| is_hedging(doc, j)));
        let historical = (signals.historical_ancestor
            && doc.ancestors(i).any(|j| is_historical(doc, j)))
            || (signals.historical_dependent
                && doc.descendants(i).into_iter().any(|j| is_historical(doc, j)))
            || (signals.past_tense_governor && has_past_tense_governor(doc, i));
        (hedged, historical)
    }

    fn forward(&self, doc: &mut Doc, i: usize) {
        let end = (i + self.forward_window).min(doc.sent_range(i).end);
        let mut barrier = false;
        for j in i..end {
            if doc[j].pos == "CCONJ" {
                barrier = true;
            }
            if is_past_time(doc, j) {
                set(doc, i, Attr::Time, TIME);
            }
            if barrier {
                continue;
            }
            if doc[j].attrs.is(Attr::Modality, MODALITY) {
                set(doc, i, Attr::Modality, MODALITY);
            }
            if is_hedging(doc, j) {
                set(doc, i, Attr::Hedging, HEDGING);
            }
        }
    }
}

impl Resolver for ContextPropagator {
    fn go(&self, doc: &mut Doc) {
        self.propagate(doc);
    }
}
