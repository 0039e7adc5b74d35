use super::{TokenPredicate, TokenSpec};
use crate::doc::{Span, Token};
use crate::errors::ConfigError;
use std::ops::Range;

/// A compiled token pattern.
///
/// Matching simulates the pattern as a Thompson automaton from every start
/// position, so every `(start, end)` pair the pattern accepts is reported,
/// including overlapping alternatives produced by `?`, `*` and `+`.
#[derive(Debug)]
pub struct Pattern {
    elems: Vec<TokenPredicate>,
}

impl Pattern {
    pub fn compile(rule: &str, specs: &[TokenSpec]) -> Result<Pattern, ConfigError> {
        if specs.is_empty() {
            return Err(ConfigError::EmptyPattern {
                rule: rule.to_string(),
            });
        }
        let elems = specs
            .iter()
            .map(|spec| TokenPredicate::compile(rule, spec))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Pattern { elems })
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Every non-empty match inside `bounds`, sorted by `(start, end)`.
    pub fn find_all(&self, tokens: &[Token], bounds: Range<usize>) -> Vec<Span> {
        let limit = bounds.end.min(tokens.len());
        let mut found = Vec::new();
        for start in bounds.start..limit {
            for end in self.ends_from(tokens, start, limit) {
                found.push(Span::new(start, end));
            }
        }
        found
    }

    /// Add the states reachable without consuming a token.
    fn close(&self, states: &mut [bool]) {
        for k in 0..self.elems.len() {
            if states[k] && self.elems[k].op().may_skip() {
                states[k + 1] = true;
            }
        }
    }

    fn ends_from(&self, tokens: &[Token], start: usize, limit: usize) -> Vec<usize> {
        let accept = self.elems.len();
        let mut states = vec![false; accept + 1];
        states[0] = true;
        self.close(&mut states);

        let mut ends = Vec::new();
        let mut pos = start;
        while pos < limit && states[..accept].iter().any(|s| *s) {
            let token = &tokens[pos];
            let mut next = vec![false; accept + 1];
            for (k, elem) in self.elems.iter().enumerate() {
                if states[k] && elem.matches(token) {
                    next[k + 1] = true;
                    if elem.op().may_repeat() {
                        next[k] = true;
                    }
                }
            }
            self.close(&mut next);
            pos += 1;
            if next[accept] {
                ends.push(pos);
            }
            states = next;
        }
        ends
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Attr, Token};
    use crate::pattern::dsl::*;

    fn tokens(words: &[&str]) -> Vec<Token> {
        let mut offset = 0;
        words
            .iter()
            .map(|w| {
                let token = Token::new(*w, offset);
                offset += w.len() + 1;
                token
            })
            .collect()
    }

    fn spans(pattern: Vec<TokenSpec>, words: &[&str]) -> Vec<(usize, usize)> {
        let toks = tokens(words);
        Pattern::compile("TEST", &pattern)
            .unwrap()
            .find_all(&toks, 0..toks.len())
            .into_iter()
            .map(|s| (s.start, s.end))
            .collect()
    }

    #[test]
    fn plain_sequence() {
        assert_eq!(
            spans(vec![lower("cut"), lower("her")], &["she", "cut", "her", "arm"]),
            vec![(1, 3)]
        );
    }

    #[test]
    fn plus_reports_every_length() {
        assert_eq!(
            spans(vec![lower("very").plus()], &["very", "very", "sad"]),
            vec![(0, 1), (0, 2), (1, 2)]
        );
    }

    #[test]
    fn optional_and_star() {
        let pattern = vec![lower("cut"), lower("her").opt(), lower("arm")];
        assert_eq!(spans(pattern.clone(), &["cut", "arm"]), vec![(0, 2)]);
        assert_eq!(spans(pattern, &["cut", "her", "arm"]), vec![(0, 3)]);

        let pattern = vec![lower("he"), lower_not_in(&["she"]).star(), lower("arm")];
        assert_eq!(spans(pattern.clone(), &["he", "arm"]), vec![(0, 2)]);
        assert_eq!(spans(pattern.clone(), &["he", "cut", "his", "arm"]), vec![(0, 4)]);
        assert!(spans(pattern, &["he", "said", "she", "arm"]).is_empty());
    }

    #[test]
    fn trailing_optional_yields_both() {
        assert_eq!(
            spans(vec![lower("cut"), lower("arm").opt()], &["cut", "arm"]),
            vec![(0, 1), (0, 2)]
        );
    }

    #[test]
    fn all_optional_never_matches_empty() {
        assert_eq!(spans(vec![lower("a").opt()], &["b", "a"]), vec![(1, 2)]);
    }

    #[test]
    fn bounds_limit_matches() {
        let toks = tokens(&["cut", ".", "arm"]);
        let pattern = Pattern::compile("TEST", &[lower("cut"), any().plus()]).unwrap();
        assert_eq!(pattern.find_all(&toks, 0..2), vec![Span::new(0, 2)]);
        assert_eq!(pattern.find_all(&toks, 0..3).len(), 2);
    }

    #[test]
    fn sees_channels() {
        let mut toks = tokens(&["deliberate", "self-harm"]);
        toks[1].attrs.set(Attr::Dsh, Some("DSH".into()));
        let pattern = Pattern::compile("TEST", &[lower("deliberate"), is(Attr::Dsh, "DSH").plus()])
            .unwrap();
        assert_eq!(pattern.find_all(&toks, 0..2), vec![Span::new(0, 2)]);
    }

    #[test]
    fn empty_pattern_rejected() {
        assert!(matches!(
            Pattern::compile("EMPTY", &[]),
            Err(ConfigError::EmptyPattern { .. })
        ));
    }
}
