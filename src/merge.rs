//! Span merging.

use crate::doc::{Attr, Doc, Span};

/// Collapse every maximal run of consecutive tokens whose `attr` channel is
/// set into one token with the space-joined lemma. Returns the number of
/// merges performed; running it again on its own output merges nothing.
pub fn merge_runs(doc: &mut Doc, attr: Attr) -> usize {
    let mut runs = Vec::new();
    let mut run_start: Option<usize> = None;
    for (i, token) in doc.tokens().iter().enumerate() {
        match (token.attrs.is_set(attr), run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                runs.push(Span::new(start, i));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        runs.push(Span::new(start, doc.len()));
    }

    let mut merged = 0;
    for span in runs.into_iter().rev().filter(|span| span.len() > 1) {
        match doc.merge(span, None) {
            Ok(()) => merged += 1,
            Err(err) => log::warn!("unable to merge {}: {}", span, err),
        }
    }
    merged
}

/// Merge `candidates` in order of preference, skipping any span that overlaps
/// one already accepted. `lemma` builds the merged lemma for a span.
pub fn merge_non_overlapping<F>(doc: &mut Doc, source: &str, candidates: &[Span], lemma: F) -> usize
where
    F: Fn(&Doc, Span) -> Option<String>,
{
    let mut accepted: Vec<Span> = Vec::new();
    for span in candidates {
        if accepted.contains(span) {
            continue;
        }
        if let Some(other) = accepted.iter().find(|other| other.overlaps(span)) {
            log::warn!(
                "{}: unable to merge span {} (overlaps merged span {})",
                source,
                span,
                other
            );
            continue;
        }
        accepted.push(*span);
    }

    accepted.sort_by(|a, b| b.start.cmp(&a.start));
    let mut merged = 0;
    for span in accepted {
        let new_lemma = lemma(doc, span);
        match doc.merge(span, new_lemma) {
            Ok(()) => merged += 1,
            Err(err) => log::warn!("{}: unable to merge span {}: {}", source, span, err),
        }
    }
    merged
}
