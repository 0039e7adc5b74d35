//! Lexicon-driven annotation.
//!
//! A [`Lexicon`] is a list of `phrase<TAB>label` entries. A
//! [`LexicalAnnotator`] finds every phrase in a document by comparing one
//! token key (lowercase form or lemma) per phrase word, keeps the longest
//! non-overlapping matches and writes the entry's label into one channel.

use crate::doc::{Attr, Doc, Label, Span};
use crate::errors::LexiconError;
use crate::merge::merge_non_overlapping;
use crate::resolver::Resolver;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// The token field compared against phrase words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchKey {
    Lower,
    Lemma,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    pub phrase: Vec<String>,
    pub label: Label,
    /// 1-based line in the source file.
    pub line: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    name: String,
    entries: Vec<LexiconEntry>,
}

impl Lexicon {
    /// Parse lexicon text. Blank lines and `#` comments are ignored.
    ///
    /// Malformed lines are logged and skipped, or returned as an error when
    /// `strict` is set.
    pub fn parse(name: &str, text: &str, strict: bool) -> Result<Lexicon, LexiconError> {
        let mut entries = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = raw.split('\t').collect();
            let problem = if fields.len() != 2 {
                Some(LexiconError::Malformed {
                    source_name: name.to_string(),
                    line,
                    found: fields.len(),
                })
            } else if fields[0].trim().is_empty() || fields[1].trim().is_empty() {
                Some(LexiconError::EmptyPhrase {
                    source_name: name.to_string(),
                    line,
                })
            } else {
                None
            };
            if let Some(problem) = problem {
                if strict {
                    return Err(problem);
                }
                log::warn!("{}", problem);
                continue;
            }
            entries.push(LexiconEntry {
                phrase: fields[0].split_whitespace().map(str::to_string).collect(),
                label: Label::from(fields[1].trim().to_string()),
                line,
            });
        }
        log::info!("lexicon {}: {} entries loaded", name, entries.len());
        Ok(Lexicon {
            name: name.to_string(),
            entries,
        })
    }

    pub fn load(path: &Path, strict: bool) -> Result<Lexicon, LexiconError> {
        let text = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Lexicon::parse(&name, &text, strict)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A retained lexicon match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalMatch {
    pub span: Span,
    /// Index into [`Lexicon::entries`].
    pub entry: usize,
}

pub struct LexicalAnnotator {
    name: Arc<str>,
    lexicon: Lexicon,
    key: MatchKey,
    attr: Attr,
    merge: bool,
    /// First phrase word -> entry indices, in lexicon order.
    index: HashMap<String, Vec<usize>>,
}

impl LexicalAnnotator {
    pub fn new(lexicon: Lexicon, key: MatchKey, attr: Attr) -> Self {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, entry) in lexicon.entries.iter().enumerate() {
            if let Some(first) = entry.phrase.first() {
                index.entry(first.clone()).or_default().push(i);
            }
        }
        LexicalAnnotator {
            name: lexicon.name.as_str().into(),
            lexicon,
            key,
            attr,
            merge: false,
            index,
        }
    }

    /// Collapse every retained match into one token.
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self) -> Attr {
        self.attr
    }

    fn key<'d>(&self, doc: &'d Doc, idx: usize) -> &'d str {
        match self.key {
            MatchKey::Lower => &doc[idx].lower,
            MatchKey::Lemma => &doc[idx].lemma,
        }
    }

    /// Longest non-overlapping matches, sorted by start.
    ///
    /// Among overlapping candidates the longest wins; on equal length the
    /// earliest start, then the earlier lexicon entry.
    pub fn find_matches(&self, doc: &Doc) -> Vec<LexicalMatch> {
        let mut candidates = Vec::new();
        for start in 0..doc.len() {
            let Some(entries) = self.index.get(self.key(doc, start)) else {
                continue;
            };
            for &entry in entries {
                let phrase = &self.lexicon.entries[entry].phrase;
                let end = start + phrase.len();
                if end <= doc.len()
                    && phrase
                        .iter()
                        .enumerate()
                        .all(|(k, word)| self.key(doc, start + k) == word)
                {
                    candidates.push(LexicalMatch {
                        span: Span::new(start, end),
                        entry,
                    });
                }
            }
        }

        candidates.sort_by(|a, b| {
            b.span
                .len()
                .cmp(&a.span.len())
                .then(a.span.start.cmp(&b.span.start))
                .then(a.entry.cmp(&b.entry))
        });

        let mut kept: Vec<LexicalMatch> = Vec::new();
        for candidate in candidates {
            if let Some(winner) = kept.iter().find(|k| k.span.overlaps(&candidate.span)) {
                if winner.span.len() == candidate.span.len() {
                    log::warn!(
                        "lexicon {}: {:?} at {} ({}) loses to {:?} at {} ({}) on equal length",
                        self.name,
                        self.lexicon.entries[candidate.entry].phrase.join(" "),
                        candidate.span,
                        self.lexicon.entries[candidate.entry].label,
                        self.lexicon.entries[winner.entry].phrase.join(" "),
                        winner.span,
                        self.lexicon.entries[winner.entry].label,
                    );
                }
                continue;
            }
            kept.push(candidate);
        }
        kept.sort_by_key(|m| m.span);
        kept
    }

    pub fn apply(&self, doc: &mut Doc) -> usize {
        let matches = self.find_matches(doc);
        for m in &matches {
            let label = self.lexicon.entries[m.entry].label.clone();
            for i in m.span.range() {
                doc.set_attr(i, self.attr, Some(label.clone()));
            }
            let rule: Arc<str> = label.as_str().into();
            doc.record(&self.name, &rule, m.span);
        }
        if !matches.is_empty() {
            log::debug!("lexicon {}: {} matches", self.name, matches.len());
        }

        if self.merge && !matches.is_empty() {
            let spans: Vec<Span> = matches.iter().map(|m| m.span).collect();
            merge_non_overlapping(doc, &self.name, &spans, |doc, span| {
                Some(whitespace_joined_lemma(doc, span))
            });
        }
        matches.len()
    }
}

/// Lemmas of `span` joined by the whitespace that followed each token.
fn whitespace_joined_lemma(doc: &Doc, span: Span) -> String {
    let mut lemma = String::new();
    for i in span.range() {
        lemma.push_str(&doc[i].lemma);
        if i + 1 < span.end {
            lemma.push_str(&doc[i].whitespace);
        }
    }
    lemma
}

impl Resolver for LexicalAnnotator {
    fn go(&self, doc: &mut Doc) {
        self.apply(doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::Token;

    fn doc(words: &[&str]) -> Doc {
        let text = words.join(" ");
        let mut offset = 0;
        let tokens = words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let mut token = Token::new(*w, offset);
                offset += w.len() + 1;
                if i + 1 < words.len() {
                    token.whitespace = " ".to_string();
                }
                token
            })
            .collect();
        Doc::new(text, tokens).unwrap()
    }

    fn annotate(lexicon: &str, words: &[&str]) -> Vec<String> {
        let lexicon = Lexicon::parse("test", lexicon, true).unwrap();
        let mut doc = doc(words);
        LexicalAnnotator::new(lexicon, MatchKey::Lower, Attr::Time).apply(&mut doc);
        doc.tokens()
            .iter()
            .map(|t| t.attrs.get(Attr::Time).map_or("_".to_string(), |l| l.to_string()))
            .collect()
    }

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let lexicon = Lexicon::parse("t", "# heading\n\nthe past\tPAST\nprior\tPAST\n", true).unwrap();
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.entries()[0].phrase, vec!["the", "past"]);
        assert_eq!(lexicon.entries()[0].line, 3);
    }

    #[test]
    fn lenient_parse_skips_malformed_lines() {
        let text = "past\tPAST\nbroken line\nprior\tPAST\textra\n";
        let lexicon = Lexicon::parse("t", text, false).unwrap();
        assert_eq!(lexicon.len(), 1);

        let err = Lexicon::parse("t", text, true).unwrap_err();
        assert!(matches!(err, LexiconError::Malformed { line: 2, found: 1, .. }));
    }

    #[test]
    fn longest_match_wins() {
        assert_eq!(
            annotate("past\tA\nthe past\tB\n", &["in", "the", "past"]),
            vec!["_", "B", "B"]
        );
    }

    #[test]
    fn equal_length_tie_goes_to_earliest_start() {
        assert_eq!(
            annotate("a b\tFIRST\nb c\tSECOND\n", &["a", "b", "c"]),
            vec!["FIRST", "FIRST", "_"]
        );
    }

    #[test]
    fn identical_spans_keep_first_entry() {
        assert_eq!(
            annotate("past\tPAST\npast\tPRESENT\n", &["past"]),
            vec!["PAST"]
        );
    }

    #[test]
    fn lemma_key_and_merge() {
        let lexicon = Lexicon::parse("dsh", "take overdose\tDSH\n", true).unwrap();
        let mut doc = doc(&["she", "took", "overdose"]);
        doc.set_lemma(1, "take");
        let count = LexicalAnnotator::new(lexicon, MatchKey::Lemma, Attr::Dsh)
            .with_merge(true)
            .apply(&mut doc);
        assert_eq!(count, 1);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc[1].text, "took overdose");
        assert_eq!(doc[1].lemma, "take overdose");
        assert!(doc[1].attrs.is(Attr::Dsh, "DSH"));
    }
}
