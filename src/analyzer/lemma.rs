//! Rule-based English lemmatizer: an exception table plus suffix rules
//! selected by coarse part of speech.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static VERB_EXCEPTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("am", "be"),
        ("is", "be"),
        ("are", "be"),
        ("was", "be"),
        ("were", "be"),
        ("been", "be"),
        ("being", "be"),
        ("'re", "be"),
        ("'m", "be"),
        ("has", "have"),
        ("had", "have"),
        ("having", "have"),
        ("'ve", "have"),
        ("'d", "would"),
        ("does", "do"),
        ("did", "do"),
        ("done", "do"),
        ("doing", "do"),
        ("said", "say"),
        ("made", "make"),
        ("making", "make"),
        ("took", "take"),
        ("taken", "take"),
        ("taking", "take"),
        ("felt", "feel"),
        ("told", "tell"),
        ("thought", "think"),
        ("went", "go"),
        ("gone", "go"),
        ("goes", "go"),
        ("going", "go"),
        ("got", "get"),
        ("gotten", "get"),
        ("came", "come"),
        ("coming", "come"),
        ("saw", "see"),
        ("seen", "see"),
        ("began", "begin"),
        ("begun", "begin"),
        ("bit", "bite"),
        ("bitten", "bite"),
        ("biting", "bite"),
        ("hung", "hang"),
        ("burnt", "burn"),
        ("threw", "throw"),
        ("thrown", "throw"),
        ("died", "die"),
        ("dies", "die"),
        ("dying", "die"),
        ("lying", "lie"),
        ("tying", "tie"),
        ("left", "leave"),
        ("found", "find"),
        ("gave", "give"),
        ("given", "give"),
        ("giving", "give"),
        ("kept", "keep"),
        ("lost", "lose"),
        ("losing", "lose"),
        ("ran", "run"),
        ("drank", "drink"),
        ("drunk", "drink"),
        ("ate", "eat"),
        ("eaten", "eat"),
        ("fell", "fall"),
        ("fallen", "fall"),
        ("wrote", "write"),
        ("written", "write"),
        ("writing", "write"),
        ("hid", "hide"),
        ("hidden", "hide"),
        ("hiding", "hide"),
        ("used", "use"),
        ("using", "use"),
        ("caused", "cause"),
        ("causing", "cause"),
        ("coped", "cope"),
        ("coping", "cope"),
        ("hoped", "hope"),
        ("hoping", "hope"),
        ("changed", "change"),
        ("changing", "change"),
        ("added", "add"),
        ("adding", "add"),
        ("overdosed", "overdose"),
        ("overdosing", "overdose"),
        ("overdoses", "overdose"),
        ("sought", "seek"),
        ("brought", "bring"),
        ("bought", "buy"),
        ("meant", "mean"),
        ("heard", "hear"),
        ("stole", "steal"),
        ("woke", "wake"),
        ("'ll", "will"),
        ("wo", "will"),
        ("ca", "can"),
    ]
    .into_iter()
    .collect()
});

static NOUN_EXCEPTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("children", "child"),
        ("women", "woman"),
        ("men", "man"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("knives", "knife"),
        ("lives", "life"),
        ("wives", "wife"),
        ("selves", "self"),
        ("crises", "crisis"),
        ("diagnoses", "diagnosis"),
        ("overdoses", "overdose"),
        ("data", "data"),
        ("news", "news"),
        ("series", "series"),
    ]
    .into_iter()
    .collect()
});

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn has_vowel(s: &str) -> bool {
    s.chars().any(|c| is_vowel(c) || c == 'y')
}

/// Whether a stem left by stripping `-ed`/`-ing` dropped a silent `e`.
fn needs_e(stem: &[char]) -> bool {
    let n = stem.len();
    if n < 2 {
        return false;
    }
    let last = stem[n - 1];
    let prev = stem[n - 2];
    let single_vowel = is_vowel(prev) && (n < 3 || !is_vowel(stem[n - 3]));
    match last {
        'v' | 'c' => true,
        's' => prev != 's',
        'z' => prev != 'z',
        'g' => prev != 'n' && prev != 'g',
        'l' => !is_vowel(prev) && !matches!(prev, 'l' | 'r' | 'w'),
        'd' | 'k' | 'm' | 'r' | 'b' => single_vowel && prev != 'e',
        'n' => single_vowel && prev == 'i',
        't' => single_vowel && matches!(prev, 'a' | 'u'),
        _ => false,
    }
}

/// Undo consonant doubling or restore a dropped `e`.
fn restore_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n >= 3
        && chars[n - 1] == chars[n - 2]
        && !is_vowel(chars[n - 1])
        && !matches!(chars[n - 1], 'l' | 's' | 'z' | 'f')
    {
        return chars[..n - 1].iter().collect();
    }
    if needs_e(&chars) {
        return format!("{}e", stem);
    }
    stem.to_string()
}

fn strip_plural(word: &str, allow_oes: bool) -> Option<String> {
    if word.len() <= 3 {
        return None;
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() >= 2 {
            return Some(format!("{}y", stem));
        }
    }
    for suffix in ["ches", "shes", "sses", "xes", "zzes"] {
        if word.ends_with(suffix) {
            return Some(word[..word.len() - 2].to_string());
        }
    }
    if allow_oes && word.ends_with("oes") {
        return Some(word[..word.len() - 2].to_string());
    }
    if word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") && !word.ends_with("is") {
        return Some(word[..word.len() - 1].to_string());
    }
    None
}

fn verb_lemma(word: &str) -> String {
    if let Some(lemma) = VERB_EXCEPTIONS.get(word) {
        return lemma.to_string();
    }
    if word.len() > 4 {
        if let Some(stem) = word.strip_suffix("ing") {
            if has_vowel(stem) {
                return restore_stem(stem);
            }
        }
    }
    if word.len() > 3 {
        if let Some(stem) = word.strip_suffix("ied") {
            return format!("{}y", stem);
        }
        if word.ends_with("eed") {
            return word[..word.len() - 1].to_string();
        }
        if let Some(stem) = word.strip_suffix("ed") {
            if has_vowel(stem) {
                return restore_stem(stem);
            }
        }
    }
    strip_plural(word, true).unwrap_or_else(|| word.to_string())
}

/// Lemma of a lowercase word form given its coarse part of speech.
pub fn lemmatize(lower: &str, pos: &str) -> String {
    if lower == "n't" {
        return "not".to_string();
    }
    match pos {
        "VERB" | "AUX" => verb_lemma(lower),
        "NOUN" => {
            if let Some(lemma) = NOUN_EXCEPTIONS.get(lower) {
                return lemma.to_string();
            }
            strip_plural(lower, false).unwrap_or_else(|| lower.to_string())
        }
        _ => lower.to_string(),
    }
}

/// True when `lower` is a regular or irregular inflection of some verb
/// whose lemma passes `known`.
pub fn verb_base_in(lower: &str, known: impl Fn(&str) -> bool) -> Option<String> {
    let lemma = verb_lemma(lower);
    if known(&lemma) {
        Some(lemma)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs() {
        let cases = [
            ("denies", "deny"),
            ("denied", "deny"),
            ("cutting", "cut"),
            ("stabbed", "stab"),
            ("harmed", "harm"),
            ("killed", "kill"),
            ("overdosed", "overdose"),
            ("bruised", "bruise"),
            ("injured", "injure"),
            ("scratched", "scratch"),
            ("hanging", "hang"),
            ("vomiting", "vomit"),
            ("stated", "state"),
            ("decided", "decide"),
            ("choked", "choke"),
            ("scared", "scare"),
            ("pressed", "press"),
            ("agreed", "agree"),
            ("tried", "try"),
            ("took", "take"),
            ("has", "have"),
            ("was", "be"),
            ("goes", "go"),
            ("cuts", "cut"),
            ("feeling", "feel"),
            ("struggled", "struggle"),
            ("combined", "combine"),
            ("jumped", "jump"),
        ];
        for (form, lemma) in cases {
            assert_eq!(lemmatize(form, "VERB"), lemma, "{}", form);
        }
    }

    #[test]
    fn nouns() {
        let cases = [
            ("thoughts", "thought"),
            ("lacerations", "laceration"),
            ("scratches", "scratch"),
            ("overdoses", "overdose"),
            ("bruises", "bruise"),
            ("knives", "knife"),
            ("injuries", "injury"),
            ("status", "status"),
            ("crisis", "crisis"),
            ("glass", "glass"),
            ("arm", "arm"),
        ];
        for (form, lemma) in cases {
            assert_eq!(lemmatize(form, "NOUN"), lemma, "{}", form);
        }
    }

    #[test]
    fn other_parts_of_speech_are_lowercase() {
        assert_eq!(lemmatize("her", "DET"), "her");
        assert_eq!(lemmatize("deliberately", "ADV"), "deliberately");
        assert_eq!(lemmatize("n't", "PART"), "not");
    }
}
