//! Dictionary and context based part-of-speech tagging.
//!
//! Closed-class words come from fixed tables. Open-class words are decided
//! from their suffix, a list of known verb bases and the part of speech of
//! the word before them.

use super::lemma::{lemmatize, verb_base_in};
use super::tokenize::RawToken;
use crate::doc::is_punct_char;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tagged {
    pub pos: String,
    pub tag: String,
    pub lemma: String,
}

static CLOSED: Lazy<HashMap<&'static str, (&'static str, &'static str)>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for word in [
        "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "myself",
        "yourself", "himself", "herself", "itself", "ourselves", "themselves", "someone",
        "anyone", "everyone", "nobody", "anybody", "somebody", "something", "anything",
        "nothing", "everything",
    ] {
        table.insert(word, ("PRON", "PRP"));
    }
    for word in ["who", "whom", "what"] {
        table.insert(word, ("PRON", "WP"));
    }
    for word in ["my", "your", "his", "its", "our", "their"] {
        table.insert(word, ("DET", "PRP$"));
    }
    for word in [
        "the", "a", "an", "this", "these", "those", "any", "some", "each", "every", "all",
        "both", "either", "neither", "no", "another", "such",
    ] {
        table.insert(word, ("DET", "DT"));
    }
    table.insert("which", ("DET", "WDT"));
    for word in [
        "of", "in", "on", "at", "by", "for", "with", "from", "about", "into", "onto", "over",
        "under", "after", "before", "during", "since", "until", "without", "within", "through",
        "between", "against", "towards", "toward", "around", "despite", "via", "per", "upon",
        "across", "behind", "beside", "among", "amongst", "throughout", "like", "than",
        "following", "regarding",
    ] {
        table.insert(word, ("ADP", "IN"));
    }
    for word in ["and", "or", "but", "nor"] {
        table.insert(word, ("CCONJ", "CC"));
    }
    for word in [
        "if", "because", "while", "although", "though", "whether", "unless", "whereas", "as",
    ] {
        table.insert(word, ("SCONJ", "IN"));
    }
    for word in [
        "can", "could", "may", "might", "must", "shall", "should", "will", "would", "ca", "wo",
        "'ll", "'d",
    ] {
        table.insert(word, ("AUX", "MD"));
    }
    for word in ["not", "n't", "n’t"] {
        table.insert(word, ("PART", "RB"));
    }
    for word in ["yes", "ok", "okay", "nil"] {
        table.insert(word, ("INTJ", "UH"));
    }
    for word in [
        "never", "ever", "also", "again", "already", "always", "often", "sometimes", "still",
        "just", "now", "then", "today", "yesterday", "tonight", "ago", "here", "there", "too",
        "very", "so", "only", "even", "later", "once", "twice", "however", "perhaps", "maybe",
        "soon", "back", "away", "together", "almost", "quite", "rather", "else", "otherwise",
        "instead", "anymore", "yet", "when", "where", "why", "how", "out", "up", "down", "off",
        "not", "further", "previously", "more", "most", "less",
    ] {
        table.entry(word).or_insert(("ADV", "RB"));
    }
    for word in [
        "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
        "twelve", "twenty", "thirty", "hundred", "thousand", "several",
    ] {
        table.insert(word, ("NUM", "CD"));
    }
    table
});

static BE_FORMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("be", "VB"),
        ("am", "VBP"),
        ("'m", "VBP"),
        ("is", "VBZ"),
        ("are", "VBP"),
        ("'re", "VBP"),
        ("was", "VBD"),
        ("were", "VBD"),
        ("been", "VBN"),
        ("being", "VBG"),
    ]
    .into_iter()
    .collect()
});

static HAVE_FORMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("have", "VBP"),
        ("'ve", "VBP"),
        ("has", "VBZ"),
        ("had", "VBD"),
        ("having", "VBG"),
    ]
    .into_iter()
    .collect()
});

static DO_FORMS: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| [("do", "VBP"), ("does", "VBZ"), ("did", "VBD")].into_iter().collect());

static KNOWN_VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "say", "tell", "make", "take", "give", "get", "go", "come", "see", "feel", "think",
        "know", "want", "need", "try", "use", "cut", "harm", "burn", "stab", "hit", "punch",
        "bang", "scratch", "bite", "hang", "strangle", "overdose", "swallow", "inject", "injure",
        "hurt", "kill", "die", "jump", "drink", "eat", "sleep", "leave", "attempt", "deny",
        "report", "state", "disclose", "admit", "describe", "present", "attend", "refuse",
        "agree", "discuss", "plan", "intend", "threaten", "continue", "stop", "start", "begin",
        "keep", "seem", "appear", "require", "advise", "discharge", "assess", "review",
        "remain", "happen", "occur", "engage", "pick", "slash", "slit", "wound", "hide",
        "manage", "cope", "help", "ask", "explain", "mention", "express", "reveal", "talk",
        "speak", "visit", "send", "call", "return", "live", "work", "walk", "run", "fall",
        "lose", "find", "bring", "buy", "seek", "steal", "wake", "write", "read", "hear",
        "mean", "lacerate", "mutilate", "poison", "ligature", "self-harm", "worry", "fear",
        "wish", "consider", "contemplate", "act", "lie", "tie", "throw", "smash", "punch",
        "head-bang", "suffocate", "drown", "vomit", "collapse", "feel", "cause", "hope",
        "change", "suggest", "query", "suspect", "screen", "prevent", "avoid",
    ]
    .into_iter()
    .collect()
});

static KNOWN_ADJECTIVES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "deliberate", "intentional", "accidental", "suicidal", "superficial", "deep",
        "previous", "prior", "recent", "current", "low", "high", "severe", "mild", "risky",
        "impulsive", "unable", "able", "aware", "unlikely", "likely", "possible", "probable",
        "unknown", "known", "same", "new", "old", "young", "other", "many", "few", "much",
        "own", "good", "bad", "unwell", "sad", "angry", "upset", "tearful", "anxious", "ok",
        "fine", "safe", "unsafe", "small", "large", "multiple", "left", "right", "first",
        "last", "next", "single", "serious", "significant", "minor", "major", "chronic",
        "acute", "positive", "negative", "present", "clear", "evident", "dangerous", "fatal",
        "lethal", "potential", "historical", "daily", "weekly", "monthly", "actual", "whole",
        "entire", "various", "full", "empty", "long", "short", "wilful", "willful",
        "purposeful", "self-inflicted", "self-injurious", "self-destructive", "early",
        "elderly", "lonely", "friendly", "further", "ongoing", "frequent", "occasional",
        "repeated", "numerous", "fresh", "healed", "open", "visible", "linear", "red",
    ]
    .into_iter()
    .collect()
});

const NOT_ADVERBS: &[&str] = &[
    "family", "assembly", "reply", "supply", "belly", "ally", "bully", "jelly", "rally",
    "likely", "unlikely", "lonely", "friendly", "daily", "weekly", "monthly", "early",
    "elderly", "silly", "ugly", "holy", "only",
];

const NOT_ADJECTIVES: &[&str] = &[
    "hospital", "referral", "denial", "trial", "approval", "animal", "signal", "capital",
    "total", "interval", "arrival", "removal", "withdrawal", "individual", "professional",
    "material", "journal", "clinic", "topic", "music", "panic", "logic", "relative",
    "alternative", "objective", "motive", "detective", "tonic", "arrival", "ritual",
    "proposal", "survival", "disposal", "festival",
];

const PARTICIPLES: &[&str] = &[
    "been", "done", "taken", "made", "given", "gone", "seen", "got", "gotten", "told", "felt",
    "thought", "said", "cut", "hurt", "hit", "put", "set", "burnt", "hung", "bitten", "eaten",
    "fallen", "written", "hidden", "kept", "lost", "found", "left", "brought", "sought",
    "known", "shown", "drunk", "run", "come", "begun", "thrown",
];

fn is_adverb_like(lower: &str) -> bool {
    matches!(CLOSED.get(lower), Some(("ADV", _)) | Some(("PART", _)))
        || (lower.len() > 4 && lower.ends_with("ly") && !NOT_ADVERBS.contains(&lower))
}

fn looks_participle(token: &RawToken, lower: &str) -> bool {
    if let Some(tag) = token.special.as_ref().and_then(|case| case.tag.as_deref()) {
        return matches!(tag, "VBN" | "VBD");
    }
    PARTICIPLES.contains(&lower) || (lower.len() > 3 && lower.ends_with("ed"))
}

fn is_known_verb_base(token: &RawToken, lower: &str) -> bool {
    match token.special.as_ref().and_then(|case| case.pos.as_deref()) {
        Some(pos) => pos == "VERB",
        None => KNOWN_VERBS.contains(lower),
    }
}

fn has_adjective_suffix(lower: &str) -> bool {
    if NOT_ADJECTIVES.contains(&lower) || lower.len() < 5 {
        return false;
    }
    ["al", "ous", "ive", "ful", "less", "able", "ible", "ic", "ish"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
}

fn punct_tag(text: &str, attached: bool) -> &'static str {
    match text {
        "." | "?" | "!" | "..." | "…" => ".",
        "," => ",",
        ":" | ";" => ":",
        "(" | "[" | "{" => "-LRB-",
        ")" | "]" | "}" => "-RRB-",
        "\"" | "“" | "‘" | "'" => "``",
        "”" | "’" => "''",
        "-" | "–" | "—" if attached => "HYPH",
        "-" | "–" | "—" => ":",
        _ => "NFP",
    }
}

/// The tag implied by a coarse part of speech when a tokenizer rule fixes
/// only the latter.
fn default_tag(pos: &str) -> &'static str {
    match pos {
        "NOUN" => "NN",
        "VERB" => "VB",
        "ADJ" => "JJ",
        "ADV" => "RB",
        "PROPN" => "NNP",
        "ADP" => "IN",
        "DET" => "DT",
        "PRON" => "PRP",
        "NUM" => "CD",
        "PUNCT" => "NFP",
        "AUX" => "VB",
        "CCONJ" => "CC",
        "SCONJ" => "IN",
        "PART" => "RP",
        "INTJ" => "UH",
        "SYM" => "SYM",
        _ => "XX",
    }
}

struct Tagger<'a> {
    tokens: &'a [RawToken],
    lowers: Vec<String>,
    tagged: Vec<Tagged>,
}

impl<'a> Tagger<'a> {
    fn prev_word(&self, i: usize) -> Option<usize> {
        (0..i).rev().find(|&j| !self.tokens[j].is_space())
    }

    fn next_word(&self, i: usize) -> Option<usize> {
        (i + 1..self.tokens.len()).find(|&j| !self.tokens[j].is_space())
    }

    /// Next word after skipping adverbs and negation.
    fn next_content(&self, i: usize) -> Option<usize> {
        let mut j = self.next_word(i)?;
        while is_adverb_like(&self.lowers[j]) {
            j = self.next_word(j)?;
        }
        Some(j)
    }

    fn prev_pos(&self, i: usize) -> Option<&str> {
        self.prev_word(i).map(|j| self.tagged[j].pos.as_str())
    }

    fn at_sentence_start(&self, i: usize) -> bool {
        match self.prev_word(i) {
            None => true,
            Some(j) => {
                self.tagged[j].tag == "."
                    || self.tokens[j + 1..i]
                        .iter()
                        .any(|t| t.text.matches('\n').count() >= 2)
            }
        }
    }

    fn is_open_word(&self, j: usize) -> bool {
        let lower = &self.lowers[j];
        lower.chars().next().map_or(false, char::is_alphabetic)
            && !CLOSED.contains_key(lower.as_str())
            && !BE_FORMS.contains_key(lower.as_str())
            && !HAVE_FORMS.contains_key(lower.as_str())
            && !DO_FORMS.contains_key(lower.as_str())
            && !is_adverb_like(lower)
            && !matches!(lower.as_str(), "her" | "that" | "to")
    }

    /// Whether the next word can begin a noun phrase object.
    fn object_follows(&self, i: usize) -> bool {
        match self.next_word(i) {
            None => false,
            Some(j) => {
                let lower = self.lowers[j].as_str();
                matches!(CLOSED.get(lower), Some(("DET", _)) | Some(("PRON", _)))
                    || lower == "her"
                    || self.is_open_word(j)
            }
        }
    }

    fn classify(&self, i: usize) -> (String, String) {
        let token = &self.tokens[i];
        let lower = self.lowers[i].as_str();
        let owned = |pos: &str, tag: &str| (pos.to_string(), tag.to_string());

        if token.is_space() {
            return owned("SPACE", "_SP");
        }
        if let Some(case) = &token.special {
            if let Some(pos) = &case.pos {
                let tag = case.tag.clone().unwrap_or_else(|| default_tag(pos).to_string());
                return (pos.clone(), tag);
            }
        }
        if token.text.chars().all(is_punct_char) {
            let attached = i > 0
                && self.tokens[i - 1].whitespace.is_empty()
                && !self.tokens[i - 1].is_space()
                && token.whitespace.is_empty();
            return owned("PUNCT", punct_tag(&token.text, attached));
        }
        if token
            .text
            .chars()
            .all(|c| matches!(c, '%' | '&' | '+' | '=' | '<' | '>' | '$' | '£' | '~'))
        {
            return owned("SYM", "SYM");
        }
        if token.text.starts_with(|c: char| c.is_ascii_digit()) {
            return owned("NUM", "CD");
        }

        match lower {
            "her" => {
                return match self.next_word(i) {
                    Some(j) if self.is_open_word(j) => owned("DET", "PRP$"),
                    _ => owned("PRON", "PRP"),
                };
            }
            "that" => {
                return match self.next_word(i) {
                    Some(j) if self.is_open_word(j) => owned("DET", "DT"),
                    _ => owned("SCONJ", "IN"),
                };
            }
            "to" => {
                return match self.next_content(i) {
                    Some(j) if is_known_verb_base(&self.tokens[j], &self.lowers[j]) => {
                        owned("PART", "TO")
                    }
                    _ => owned("ADP", "IN"),
                };
            }
            "'s" | "’s" => {
                return match self.prev_pos(i) {
                    Some("PRON") => owned("AUX", "VBZ"),
                    _ => owned("PART", "POS"),
                };
            }
            _ => {}
        }

        if let Some(tag) = BE_FORMS.get(lower) {
            return owned("AUX", *tag);
        }
        if let Some(tag) = HAVE_FORMS.get(lower) {
            let auxiliary = self
                .next_content(i)
                .map_or(false, |j| looks_participle(&self.tokens[j], &self.lowers[j]));
            return owned(if auxiliary { "AUX" } else { "VERB" }, *tag);
        }
        if let Some(tag) = DO_FORMS.get(lower) {
            let auxiliary = self.next_word(i).map_or(false, |j| {
                matches!(self.lowers[j].as_str(), "not" | "n't" | "n’t")
                    || self
                        .next_content(i)
                        .map_or(false, |k| is_known_verb_base(&self.tokens[k], &self.lowers[k]))
            });
            return owned(if auxiliary { "AUX" } else { "VERB" }, *tag);
        }
        if let Some((pos, tag)) = CLOSED.get(lower) {
            return owned(*pos, *tag);
        }

        self.classify_open(i, lower)
    }

    fn classify_open(&self, i: usize, lower: &str) -> (String, String) {
        let owned = |pos: &str, tag: &str| (pos.to_string(), tag.to_string());
        if lower.len() > 4 && lower.ends_with("ly") && !NOT_ADVERBS.contains(&lower) {
            return owned("ADV", "RB");
        }
        if KNOWN_ADJECTIVES.contains(lower) {
            return owned("ADJ", "JJ");
        }
        if let Some(base) = verb_base_in(lower, |lemma| KNOWN_VERBS.contains(lemma)) {
            return self.verb_or_noun(i, lower, &base);
        }
        if lower.len() > 5 && lower.ends_with("ing") {
            return match self.prev_pos(i) {
                Some("DET") | Some("ADJ") => owned("NOUN", "NN"),
                _ => owned("VERB", "VBG"),
            };
        }
        if lower.len() > 4 && lower.ends_with("ed") {
            return match self.prev_pos(i) {
                Some("DET") => owned("ADJ", "JJ"),
                _ => (String::from("VERB"), self.verb_tag(i, lower, "")),
            };
        }
        if has_adjective_suffix(lower) {
            return owned("ADJ", "JJ");
        }
        let text = &self.tokens[i].text;
        let capitalized = text.chars().next().map_or(false, char::is_uppercase)
            && text.chars().skip(1).any(char::is_lowercase);
        if capitalized && !self.at_sentence_start(i) {
            return owned("PROPN", "NNP");
        }
        if lemmatize(lower, "NOUN") != lower {
            owned("NOUN", "NNS")
        } else {
            owned("NOUN", "NN")
        }
    }

    /// A word that inflects like a known verb: decide from the word before it.
    fn verb_or_noun(&self, i: usize, lower: &str, base: &str) -> (String, String) {
        let inflected_past = lower != base && (lower.ends_with("ed") || PARTICIPLES.contains(&lower));
        let gerund = lower.ends_with("ing") && lower != base;
        let noun = || {
            if inflected_past {
                (String::from("ADJ"), String::from("JJ"))
            } else if gerund {
                (String::from("NOUN"), String::from("NN"))
            } else if lower != base && lower.ends_with('s') {
                (String::from("NOUN"), String::from("NNS"))
            } else {
                (String::from("NOUN"), String::from("NN"))
            }
        };
        let verb = || (String::from("VERB"), self.verb_tag(i, lower, base));

        let prev = self.prev_word(i);
        match prev.map(|j| self.tagged[j].pos.as_str()) {
            _ if self.at_sentence_start(i) => {
                if inflected_past || gerund || self.object_follows(i) {
                    verb()
                } else {
                    noun()
                }
            }
            Some("DET") | Some("ADJ") | Some("NUM") | Some("ADP") => noun(),
            Some("PRON") | Some("AUX") | Some("PART") | Some("ADV") => verb(),
            Some("NOUN") | Some("PROPN") => {
                if inflected_past || gerund || self.object_follows(i) {
                    verb()
                } else {
                    noun()
                }
            }
            Some("CCONJ") => {
                let before = prev.and_then(|j| self.prev_word(j));
                match before.map(|k| self.tagged[k].pos.as_str()) {
                    Some("VERB") => verb(),
                    _ => noun(),
                }
            }
            Some("VERB") if inflected_past || gerund => verb(),
            _ => noun(),
        }
    }

    fn verb_tag(&self, i: usize, lower: &str, base: &str) -> String {
        if lower.ends_with("ing") && lower != base {
            return String::from("VBG");
        }
        let mut aux = None;
        let mut j = self.prev_word(i);
        while let Some(k) = j {
            if is_adverb_like(&self.lowers[k]) {
                j = self.prev_word(k);
                continue;
            }
            aux = Some(k);
            break;
        }
        let aux_lower = aux.map(|k| self.lowers[k].as_str());
        let aux_pos = aux.map(|k| self.tagged[k].pos.as_str());
        let aux_tag = aux.map(|k| self.tagged[k].tag.as_str());

        if lower != base && (lower.ends_with("ed") || PARTICIPLES.contains(&lower)) {
            let perfect_or_passive = aux_pos == Some("AUX")
                && aux_lower.map_or(false, |w| {
                    BE_FORMS.contains_key(w) || HAVE_FORMS.contains_key(w)
                });
            return String::from(if perfect_or_passive { "VBN" } else { "VBD" });
        }
        if aux_tag == Some("MD") || aux_tag == Some("TO") || aux_lower.map_or(false, |w| DO_FORMS.contains_key(w)) {
            return String::from("VB");
        }
        if lower != base && lower.ends_with('s') {
            return String::from("VBZ");
        }
        String::from("VBP")
    }
}

pub(crate) fn tag(tokens: &[RawToken]) -> Vec<Tagged> {
    let mut tagger = Tagger {
        tokens,
        lowers: tokens.iter().map(|t| t.text.to_lowercase()).collect(),
        tagged: Vec::with_capacity(tokens.len()),
    };
    for i in 0..tokens.len() {
        let (pos, mut tag) = tagger.classify(i);
        let token = &tokens[i];
        let lemma = match &token.special {
            Some(case) => {
                if let Some(fixed) = &case.tag {
                    tag = fixed.clone();
                }
                case.lemma.clone()
            }
            None if pos == "SPACE" => token.text.clone(),
            None => lemmatize(&tagger.lowers[i], &pos),
        };
        tagger.tagged.push(Tagged { pos, tag, lemma });
    }
    tagger.tagged
}

#[cfg(test)]
mod tests {
    use super::super::special::SpecialCases;
    use super::super::tokenize::tokenize;
    use super::*;

    fn tags(text: &str) -> Vec<String> {
        let specials = SpecialCases::parse(
            "t",
            "self-harm\tself-harm\tNN\tNOUN\nself-harmed\tself-harm\tVBD\tVERB\n",
        )
        .unwrap();
        let tokens = tokenize(text, &specials);
        tag(&tokens)
            .into_iter()
            .zip(&tokens)
            .map(|(t, raw)| format!("{}/{}/{}", raw.text, t.pos, t.lemma))
            .collect()
    }

    #[test]
    fn denial_sentence() {
        assert_eq!(
            tags("She denies deliberate self-harm."),
            vec![
                "She/PRON/she",
                "denies/VERB/deny",
                "deliberate/ADJ/deliberate",
                "self-harm/NOUN/self-harm",
                "./PUNCT/.",
            ]
        );
    }

    #[test]
    fn perfect_auxiliary() {
        assert_eq!(
            tags("She has self-harmed in the past."),
            vec![
                "She/PRON/she",
                "has/AUX/have",
                "self-harmed/VERB/self-harm",
                "in/ADP/in",
                "the/DET/the",
                "past/NOUN/past",
                "./PUNCT/.",
            ]
        );
    }

    #[test]
    fn possessive_her_and_verb_noun_ambiguity() {
        assert_eq!(
            tags("She cut her arm. Multiple cuts to arm."),
            vec![
                "She/PRON/she",
                "cut/VERB/cut",
                "her/DET/her",
                "arm/NOUN/arm",
                "./PUNCT/.",
                "Multiple/ADJ/multiple",
                "cuts/NOUN/cut",
                "to/ADP/to",
                "arm/NOUN/arm",
                "./PUNCT/.",
            ]
        );
    }

    #[test]
    fn negated_do_support() {
        assert_eq!(
            tags("He didn't want to overdose"),
            vec![
                "He/PRON/he",
                "did/AUX/do",
                "n't/PART/not",
                "want/VERB/want",
                "to/PART/to",
                "overdose/VERB/overdose",
            ]
        );
    }

    #[test]
    fn family_is_not_an_adverb() {
        assert_eq!(
            tags("Family history of overdose"),
            vec![
                "Family/NOUN/family",
                "history/NOUN/history",
                "of/ADP/of",
                "overdose/NOUN/overdose",
            ]
        );
    }
}
