//! Tokens, sentences and the document they belong to.

mod attrs;
mod display;
mod span;
mod trace;

pub use attrs::{Attr, AttrSlots, Label};
pub use display::DocDisplay;
pub use span::{longest_non_overlapping, Span};
pub use trace::TraceEntry;

use crate::errors::DocError;
use std::collections::HashSet;
use std::ops::{Index, Range};
use std::sync::Arc;

/// One token of a parsed document.
///
/// Parser fields are fixed once the [`Doc`] is built; only [`Token::attrs`]
/// (and the lemma, through [`Doc::set_lemma`]) change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub lower: String,
    pub lemma: String,
    /// Coarse universal part of speech (`NOUN`, `VERB`, `SPACE`, ...).
    pub pos: String,
    /// Fine-grained Penn Treebank tag (`NN`, `VBD`, `_SP`, ...).
    pub tag: String,
    pub dep: String,
    /// Index of the syntactic head; a root points to itself.
    pub head: usize,
    pub sent: usize,
    /// Byte offset into the document text.
    pub idx: usize,
    /// Whitespace following the token.
    pub whitespace: String,
    pub attrs: AttrSlots,
}

impl Token {
    /// A bare token: lemma is the lowercase form, pos `X`, head 0.
    pub fn new(text: impl Into<String>, idx: usize) -> Self {
        let text = text.into();
        let lower = text.to_lowercase();
        Token {
            lemma: lower.clone(),
            lower,
            text,
            pos: String::from("X"),
            tag: String::new(),
            dep: String::from("dep"),
            head: 0,
            sent: 0,
            idx,
            whitespace: String::new(),
            attrs: AttrSlots::default(),
        }
    }

    pub fn end(&self) -> usize {
        self.idx + self.text.len()
    }

    pub fn is_space(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_whitespace)
    }

    pub fn is_punct(&self) -> bool {
        self.pos == "PUNCT" || (!self.text.is_empty() && self.text.chars().all(is_punct_char))
    }

    /// Orthographic shape: `Xxxxx`, `dd/dd`, runs capped at four characters.
    pub fn shape(&self) -> String {
        let mut shape = String::with_capacity(self.text.len());
        let mut last = None;
        let mut run = 0;
        for c in self.text.chars() {
            let mapped = if c.is_uppercase() {
                'X'
            } else if c.is_lowercase() {
                'x'
            } else if c.is_ascii_digit() {
                'd'
            } else {
                c
            };
            if Some(mapped) == last {
                run += 1;
            } else {
                run = 1;
                last = Some(mapped);
            }
            if run <= 4 {
                shape.push(mapped);
            }
        }
        shape
    }
}

pub(crate) fn is_punct_char(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | ':' | ';' | '!' | '?' | '"' | '\'' | '(' | ')' | '[' | ']' | '{' | '}'
            | '-' | '/' | '\\' | '*' | '#' | '@' | '_' | '…' | '–' | '—' | '“' | '”' | '‘'
            | '’' | '«' | '»'
    )
}

/// A tokenized, tagged and parsed document plus its attribute channels.
#[derive(Debug, Clone)]
pub struct Doc {
    text: String,
    tokens: Vec<Token>,
    sents: Vec<Range<usize>>,
    trace: Option<Vec<TraceEntry>>,
}

impl Doc {
    /// Validates token offsets, heads and sentence order, then renumbers
    /// sentences from zero.
    pub fn new(text: impl Into<String>, tokens: Vec<Token>) -> Result<Doc, DocError> {
        let text = text.into();
        let len = tokens.len();
        let mut prev_sent = 0;
        for (index, token) in tokens.iter().enumerate() {
            if text.get(token.idx..token.end()) != Some(token.text.as_str()) {
                return Err(DocError::TextMismatch {
                    index,
                    text: token.text.clone(),
                    offset: token.idx,
                });
            }
            if token.head >= len {
                return Err(DocError::HeadOutOfBounds {
                    index,
                    head: token.head,
                });
            }
            if token.sent < prev_sent {
                return Err(DocError::SentenceOrder { index });
            }
            prev_sent = token.sent;
        }

        let mut doc = Doc {
            text,
            tokens,
            sents: Vec::new(),
            trace: None,
        };
        doc.renumber_sentences();
        Ok(doc)
    }

    fn renumber_sentences(&mut self) {
        self.sents.clear();
        let mut start = 0;
        for i in 1..=self.tokens.len() {
            if i == self.tokens.len() || self.tokens[i].sent != self.tokens[start].sent {
                let sent = self.sents.len();
                for token in &mut self.tokens[start..i] {
                    token.sent = sent;
                }
                self.sents.push(start..i);
                start = i;
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    pub fn sents(&self) -> &[Range<usize>] {
        &self.sents
    }

    /// Token range of the sentence containing `idx`.
    pub fn sent_range(&self, idx: usize) -> Range<usize> {
        self.sents
            .get(self.tokens[idx].sent)
            .cloned()
            .unwrap_or(idx..idx + 1)
    }

    pub fn attrs_mut(&mut self, idx: usize) -> &mut AttrSlots {
        &mut self.tokens[idx].attrs
    }

    pub fn set_attr(&mut self, idx: usize, attr: Attr, value: Option<Label>) {
        self.tokens[idx].attrs.set(attr, value);
    }

    pub fn set_lemma(&mut self, idx: usize, lemma: impl Into<String>) {
        self.tokens[idx].lemma = lemma.into();
    }

    pub fn is_root(&self, idx: usize) -> bool {
        self.tokens[idx].head == idx
    }

    /// Direct dependents of `idx`, in token order.
    pub fn children(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter(move |(j, token)| *j != idx && token.head == idx)
            .map(|(j, _)| j)
    }

    /// Heads of `idx` up to the root, nearest first. Stops on a cycle.
    pub fn ancestors(&self, idx: usize) -> Ancestors<'_> {
        let mut visited = HashSet::new();
        visited.insert(idx);
        Ancestors {
            doc: self,
            current: idx,
            visited,
        }
    }

    /// All transitive dependents of `idx`, breadth first.
    pub fn descendants(&self, idx: usize) -> Vec<usize> {
        let mut visited = HashSet::new();
        visited.insert(idx);
        let mut queue = vec![idx];
        let mut found = Vec::new();
        while let Some(node) = queue.pop() {
            for child in self.children(node) {
                if visited.insert(child) {
                    found.push(child);
                    queue.push(child);
                }
            }
        }
        found.sort_unstable();
        found
    }

    /// Source text covered by `span`, including inner whitespace.
    pub fn span_text(&self, span: Span) -> &str {
        match (self.tokens.get(span.start), span.last().and_then(|i| self.tokens.get(i))) {
            (Some(first), Some(last)) => &self.text[first.idx..last.end()],
            _ => "",
        }
    }

    /// Character offset of a byte offset into the document text.
    pub fn char_offset(&self, byte: usize) -> usize {
        self.text
            .get(..byte)
            .map_or_else(|| self.text.chars().count(), |prefix| prefix.chars().count())
    }

    /// Collapse `span` into a single token.
    ///
    /// The merged token takes its tags and attachment from the span's
    /// syntactic root, its channels from the leftmost token that sets each one,
    /// and `lemma` (or the space-joined lemmas when `None`).
    pub fn merge(&mut self, span: Span, lemma: Option<String>) -> Result<(), DocError> {
        let len = self.tokens.len();
        if span.is_empty() || span.end > len {
            return Err(DocError::InvalidSpan {
                start: span.start,
                end: span.end,
                len,
            });
        }
        if span.len() == 1 {
            if let Some(lemma) = lemma {
                self.tokens[span.start].lemma = lemma;
            }
            return Ok(());
        }

        let range = span.range();
        let lemma = lemma.unwrap_or_else(|| {
            self.tokens[range.clone()]
                .iter()
                .map(|t| t.lemma.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        });

        let root = range
            .clone()
            .find(|&i| !span.contains(self.tokens[i].head) || self.tokens[i].head == i)
            .unwrap_or(span.start);

        let shrink = span.len() - 1;
        let remap = |head: usize| -> usize {
            if span.contains(head) {
                span.start
            } else if head >= span.end {
                head - shrink
            } else {
                head
            }
        };

        let first = &self.tokens[span.start];
        let last = &self.tokens[span.end - 1];
        let root_token = &self.tokens[root];
        let mut attrs = AttrSlots::default();
        for token in &self.tokens[range.clone()] {
            attrs.fill_from(&token.attrs);
        }
        let text = self.text[first.idx..last.end()].to_string();
        let merged = Token {
            lower: text.to_lowercase(),
            text,
            lemma,
            pos: root_token.pos.clone(),
            tag: root_token.tag.clone(),
            dep: root_token.dep.clone(),
            head: if root_token.head == root {
                span.start
            } else {
                remap(root_token.head)
            },
            sent: first.sent,
            idx: first.idx,
            whitespace: last.whitespace.clone(),
            attrs,
        };

        let tail = self.tokens.split_off(span.end);
        self.tokens.truncate(span.start);
        self.tokens.push(merged);
        self.tokens.extend(tail);

        for (i, token) in self.tokens.iter_mut().enumerate() {
            if i != span.start {
                token.head = remap(token.head);
            }
        }
        if let Some(trace) = &mut self.trace {
            for entry in trace.iter_mut() {
                entry.remap(span);
            }
        }
        self.renumber_sentences();
        Ok(())
    }

    /// Start recording rule provenance.
    pub fn enable_trace(&mut self) {
        if self.trace.is_none() {
            self.trace = Some(Vec::new());
        }
    }

    pub fn is_tracing(&self) -> bool {
        self.trace.is_some()
    }

    pub fn trace(&self) -> &[TraceEntry] {
        self.trace.as_deref().unwrap_or(&[])
    }

    /// Record a write; ignored unless tracing is enabled.
    pub fn record(&mut self, source: &Arc<str>, rule: &Arc<str>, span: Span) {
        if let Some(trace) = &mut self.trace {
            trace.push(TraceEntry::new(source.clone(), rule.clone(), span));
        }
    }

    pub fn display(&self) -> DocDisplay<'_> {
        DocDisplay::new(self)
    }
}

impl Index<usize> for Doc {
    type Output = Token;

    fn index(&self, idx: usize) -> &Token {
        &self.tokens[idx]
    }
}

/// Iterator over the head chain of a token; see [`Doc::ancestors`].
pub struct Ancestors<'a> {
    doc: &'a Doc,
    current: usize,
    visited: HashSet<usize>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let head = self.doc.tokens.get(self.current)?.head;
        if !self.visited.insert(head) {
            return None;
        }
        self.current = head;
        Some(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// "She denies deliberate self-harm ." with a hand-built tree rooted at
    /// "denies".
    fn sample() -> Doc {
        let text = "She denies deliberate self-harm.";
        let spec: [(&str, usize, &str, &str, &str, usize); 5] = [
            ("She", 0, "she", "PRON", "nsubj", 1),
            ("denies", 4, "deny", "VERB", "ROOT", 1),
            ("deliberate", 11, "deliberate", "ADJ", "amod", 3),
            ("self-harm", 22, "self-harm", "NOUN", "dobj", 1),
            (".", 31, ".", "PUNCT", "punct", 1),
        ];
        let tokens = spec
            .iter()
            .map(|(text, idx, lemma, pos, dep, head)| {
                let mut token = Token::new(*text, *idx);
                token.lemma = lemma.to_string();
                token.pos = pos.to_string();
                token.dep = dep.to_string();
                token.head = *head;
                token
            })
            .enumerate()
            .map(|(i, mut token)| {
                if i < 3 {
                    token.whitespace = " ".to_string();
                }
                token
            })
            .collect();
        Doc::new(text, tokens).unwrap()
    }

    #[test]
    fn rejects_misaligned_tokens() {
        let err = Doc::new("abc", vec![Token::new("abd", 0)]).unwrap_err();
        assert!(matches!(err, DocError::TextMismatch { index: 0, .. }));
    }

    #[test]
    fn tree_navigation() {
        let doc = sample();
        assert!(doc.is_root(1));
        assert_eq!(doc.children(1).collect::<Vec<_>>(), vec![0, 3, 4]);
        assert_eq!(doc.ancestors(2).collect::<Vec<_>>(), vec![3, 1]);
        assert_eq!(doc.descendants(1), vec![0, 2, 3, 4]);
    }

    #[test]
    fn merge_collapses_span() {
        let mut doc = sample();
        doc.set_attr(2, Attr::Dsh, Some("DSH".into()));
        doc.set_attr(3, Attr::Dsh, Some("DSH".into()));
        doc.set_attr(3, Attr::Neg, Some("NEG".into()));
        doc.merge(Span::new(2, 4), None).unwrap();

        assert_eq!(doc.len(), 4);
        let merged = &doc[2];
        assert_eq!(merged.text, "deliberate self-harm");
        assert_eq!(merged.lemma, "deliberate self-harm");
        assert_eq!(merged.pos, "NOUN");
        assert_eq!(merged.head, 1);
        assert!(merged.attrs.is(Attr::Dsh, "DSH"));
        assert!(merged.attrs.is(Attr::Neg, "NEG"));
        assert_eq!(doc[3].text, ".");
        assert_eq!(doc[3].head, 1);
        assert_eq!(doc.span_text(Span::new(1, 3)), "denies deliberate self-harm");
    }

    #[test]
    fn merge_moves_heads_past_span() {
        let mut doc = sample();
        doc.merge(Span::new(0, 2), None).unwrap();
        assert_eq!(doc[0].text, "She denies");
        assert!(doc.is_root(0));
        assert_eq!(doc[1].head, 2);
        assert_eq!(doc[2].head, 0);
        assert_eq!(doc[3].head, 0);
    }

    #[test]
    fn merge_rejects_bad_span() {
        let mut doc = sample();
        assert!(doc.merge(Span::new(4, 6), None).is_err());
        assert!(doc.merge(Span::new(2, 2), None).is_err());
    }

    #[test]
    fn char_offsets_count_characters() {
        let text = "café cut";
        let mut first = Token::new("café", 0);
        first.whitespace = " ".to_string();
        let mut second = Token::new("cut", 6);
        second.head = 1;
        let doc = Doc::new(text, vec![first, second]).unwrap();
        assert_eq!(doc.char_offset(doc[1].idx), 5);
    }

    #[test]
    fn shapes() {
        assert_eq!(Token::new("Self-harm", 0).shape(), "Xxxx-xxxx");
        assert_eq!(Token::new("12/03/2019", 0).shape(), "dd/dd/dddd");
    }
}
