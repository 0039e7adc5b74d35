//! Whitespace chunking, affix peeling and word segmentation.

use super::special::{SpecialCase, SpecialCases};
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+([./:,\-]\d+)*$").unwrap());

const ABBREVIATIONS: &[&str] = &["dr.", "mr.", "mrs.", "ms.", "e.g.", "i.e.", "etc.", "approx."];

const CLITICS: &[&str] = &["'s", "'re", "'ve", "'ll", "'d", "'m"];

/// A token before tagging.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawToken {
    pub idx: usize,
    pub text: String,
    pub whitespace: String,
    pub special: Option<SpecialCase>,
}

impl RawToken {
    fn new(idx: usize, text: &str) -> Self {
        RawToken {
            idx,
            text: text.to_string(),
            whitespace: String::new(),
            special: None,
        }
    }

    pub fn is_space(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

fn is_prefix(c: char, next: Option<char>) -> bool {
    match c {
        '(' | '[' | '{' | '"' | '\'' | '“' | '‘' | '*' | '«' => true,
        '-' => next.map_or(false, char::is_alphabetic),
        _ => false,
    }
}

fn is_suffix(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | ':' | ';' | '!' | '?' | ')' | ']' | '}' | '"' | '\'' | '”' | '’' | '*' | '»'
    )
}

pub(crate) fn tokenize(text: &str, specials: &SpecialCases) -> Vec<RawToken> {
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < text.len() {
        let rest = &text[i..];
        let ws = rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len());
        if ws > 0 {
            push_whitespace(&mut tokens, &rest[..ws], i);
            i += ws;
            continue;
        }
        let chunk = rest.find(char::is_whitespace).unwrap_or(rest.len());
        split_chunk(&mut tokens, &rest[..chunk], i, specials);
        i += chunk;
    }
    tokens
}

/// A single leading space belongs to the previous token; anything else
/// becomes a whitespace token of its own.
fn push_whitespace(tokens: &mut Vec<RawToken>, ws: &str, idx: usize) {
    let mut rest = ws;
    let mut offset = idx;
    if ws.starts_with(' ') {
        if let Some(prev) = tokens.last_mut() {
            prev.whitespace.push(' ');
            rest = &ws[1..];
            offset += 1;
        }
    }
    if !rest.is_empty() {
        tokens.push(RawToken::new(offset, rest));
    }
}

fn split_chunk(tokens: &mut Vec<RawToken>, chunk: &str, idx: usize, specials: &SpecialCases) {
    let mut start = 0;
    let mut end = chunk.len();
    let mut suffixes = Vec::new();
    while start < end {
        let core = &chunk[start..end];
        if let Some(case) = specials.get(core) {
            let mut token = RawToken::new(idx + start, core);
            token.special = Some(case.clone());
            tokens.push(token);
            break;
        }
        let mut chars = core.chars();
        let (first, second) = (chars.next(), chars.next());
        let last = core.chars().next_back();
        match (first, second, last) {
            (Some(first), Some(_), _) if is_prefix(first, second) => {
                tokens.push(RawToken::new(idx + start, &core[..first.len_utf8()]));
                start += first.len_utf8();
            }
            (Some(_), Some(_), Some(last))
                if is_suffix(last) && !ABBREVIATIONS.contains(&core.to_lowercase().as_str()) =>
            {
                end -= last.len_utf8();
                suffixes.push(RawToken::new(idx + end, &chunk[end..end + last.len_utf8()]));
            }
            _ => {
                split_core(tokens, core, idx + start);
                break;
            }
        }
    }
    tokens.extend(suffixes.into_iter().rev());
}

fn split_core(tokens: &mut Vec<RawToken>, core: &str, idx: usize) {
    if NUMERIC.is_match(core) || ABBREVIATIONS.contains(&core.to_lowercase().as_str()) {
        tokens.push(RawToken::new(idx, core));
        return;
    }
    let normalized = core.to_lowercase().replace('’', "'");
    let clitic_len = if normalized.len() > 3 && normalized.ends_with("n't") {
        Some("n't".len())
    } else {
        CLITICS
            .iter()
            .find(|clitic| normalized.len() > clitic.len() && normalized.ends_with(*clitic))
            .map(|clitic| clitic.len())
    };
    if let Some(len) = clitic_len {
        // the curly apostrophe is three bytes wide
        let len = len + (core.len() - normalized.len());
        let split = core.len() - len;
        if core.is_char_boundary(split) {
            push_words(tokens, &core[..split], idx);
            tokens.push(RawToken::new(idx + split, &core[split..]));
            return;
        }
    }
    push_words(tokens, core, idx);
}

fn push_words(tokens: &mut Vec<RawToken>, text: &str, idx: usize) {
    for (offset, word) in text.split_word_bound_indices() {
        tokens.push(RawToken::new(idx + offset, word));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<String> {
        let specials = SpecialCases::parse("t", "self-harm\tself-harm\tNN\tNOUN\nh/o\th/o\tNN\tNOUN\n")
            .unwrap();
        tokenize(text, &specials)
            .into_iter()
            .map(|t| format!("{}{}", t.text, if t.whitespace.is_empty() { "" } else { "·" }))
            .collect()
    }

    #[test]
    fn peels_punctuation() {
        assert_eq!(
            texts("She denies (any) cuts."),
            vec!["She·", "denies·", "(", "any", ")·", "cuts", "."]
        );
    }

    #[test]
    fn special_cases_survive_hyphens_and_affixes() {
        assert_eq!(texts("\"self-harm\","), vec!["\"", "self-harm", "\"", ","]);
        assert_eq!(texts("H/O: overdose"), vec!["H/O", ":·", "overdose"]);
        assert_eq!(texts("self-cutting"), vec!["self", "-", "cutting"]);
    }

    #[test]
    fn keeps_dates_and_numbers() {
        assert_eq!(texts("on 12/03/2019, 2.5mg"), vec!["on·", "12/03/2019", ",·", "2.5mg"]);
    }

    #[test]
    fn splits_contractions() {
        assert_eq!(texts("didn't"), vec!["did", "n't"]);
        assert_eq!(texts("can't"), vec!["ca", "n't"]);
        assert_eq!(texts("she's"), vec!["she", "'s"]);
        assert_eq!(texts("don’t"), vec!["do", "n’t"]);
    }

    #[test]
    fn whitespace_tokens() {
        let specials = SpecialCases::default();
        let tokens = tokenize("Cuts.\n\nNo  OD", &specials);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Cuts", ".", "\n\n", "No", " ", "OD"]);
        assert_eq!(tokens[3].whitespace, " ");
        assert!(tokens[2].is_space());
        assert_eq!(tokens[4].idx, 10);
    }
}
