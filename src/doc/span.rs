use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A half-open token range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn single(idx: usize) -> Self {
        Span {
            start: idx,
            end: idx + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Index of the last token, if any.
    pub fn last(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.end - 1)
        }
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.start <= idx && idx < self.end
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Greedily keep the longest spans, earliest start first on equal length.
///
/// The result is sorted by start.
pub fn longest_non_overlapping(spans: &[Span]) -> Vec<Span> {
    let mut candidates: Vec<Span> = spans.to_vec();
    candidates.sort_by(|a, b| b.len().cmp(&a.len()).then(a.start.cmp(&b.start)));
    candidates.dedup();

    let mut kept: Vec<Span> = Vec::new();
    for candidate in candidates {
        if kept.iter().all(|span| !span.overlaps(&candidate)) {
            kept.push(candidate);
        }
    }
    kept.sort();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_half_open() {
        let a = Span::new(0, 2);
        assert!(a.overlaps(&Span::new(1, 3)));
        assert!(!a.overlaps(&Span::new(2, 4)));
        assert_eq!(a.last(), Some(1));
        assert_eq!(Span::new(3, 3).last(), None);
    }

    #[test]
    fn longest_prefers_length_then_start() {
        let spans = [
            Span::new(0, 2),
            Span::new(1, 3),
            Span::new(1, 4),
            Span::new(5, 6),
            Span::new(4, 6),
        ];
        assert_eq!(
            longest_non_overlapping(&spans),
            vec![Span::new(1, 4), Span::new(4, 6)]
        );
    }

    #[test]
    fn longest_tie_goes_to_earliest() {
        let spans = [Span::new(1, 3), Span::new(0, 2)];
        assert_eq!(longest_non_overlapping(&spans), vec![Span::new(0, 2)]);
    }
}
