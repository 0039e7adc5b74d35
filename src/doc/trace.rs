//! Rule provenance: which rule of which layer wrote to which span.
//!
//! Tracing is off by default. When enabled on a [`Doc`](super::Doc), every
//! rule application and lexicon match appends a [`TraceEntry`]. Entries follow
//! the tokens through merges so the spans always index the current token
//! sequence.

use super::span::Span;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    /// Layer or lexicon that produced the write.
    pub source: Arc<str>,
    /// Rule name, or the matched lexicon label.
    pub rule: Arc<str>,
    pub span: Span,
}

impl TraceEntry {
    pub fn new(source: Arc<str>, rule: Arc<str>, span: Span) -> Self {
        TraceEntry { source, rule, span }
    }

    /// Rewrite the span after `merged` was collapsed into one token.
    pub(crate) fn remap(&mut self, merged: Span) {
        let shrink = merged.len().saturating_sub(1);
        let remap_idx = |idx: usize, is_end: bool| -> usize {
            if idx <= merged.start {
                idx
            } else if idx >= merged.end {
                idx - shrink
            } else if is_end {
                merged.start + 1
            } else {
                merged.start
            }
        };
        self.span = Span::new(
            remap_idx(self.span.start, false),
            remap_idx(self.span.end, true),
        );
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.source, self.rule)
    }
}
