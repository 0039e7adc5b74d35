//! Sentence boundaries and a heuristic dependency tree per sentence.

use super::tagger::Tagged;
use super::tokenize::RawToken;
use std::ops::Range;

/// Sentence index per token. A sentence ends after `.`/`?`/`!` (and any
/// closing quotes, brackets or whitespace that follow) and at blank lines.
pub(crate) fn sentence_ids(tokens: &[RawToken], tagged: &[Tagged]) -> Vec<usize> {
    let mut ids = Vec::with_capacity(tokens.len());
    let mut sent = 0;
    let mut pending = false;
    for (token, tagged) in tokens.iter().zip(tagged) {
        let trailing = token.is_space() || matches!(tagged.tag.as_str(), "''" | "-RRB-" | ".");
        if pending && !trailing {
            sent += 1;
            pending = false;
        }
        ids.push(sent);
        if tagged.tag == "." {
            pending = true;
        }
        if token.is_space() && token.text.matches('\n').count() >= 2 {
            pending = true;
        }
    }
    ids
}

/// Heads are absolute token indices; the root points to itself.
pub(crate) struct Arcs {
    pub heads: Vec<usize>,
    pub deps: Vec<String>,
}

struct Sentence<'a> {
    tokens: &'a [RawToken],
    tagged: &'a [Tagged],
    range: Range<usize>,
    words: Vec<usize>,
}

impl<'a> Sentence<'a> {
    fn pos(&self, i: usize) -> &str {
        &self.tagged[i].pos
    }

    fn lower(&self, i: usize) -> String {
        self.tokens[i].text.to_lowercase()
    }

    fn is_nominal(&self, i: usize) -> bool {
        matches!(self.pos(i), "NOUN" | "PROPN")
    }

    fn word_after(&self, i: usize) -> Option<usize> {
        self.words.iter().copied().find(|&w| w > i)
    }

    fn word_before(&self, i: usize) -> Option<usize> {
        self.words.iter().rev().copied().find(|&w| w < i)
    }

    fn root(&self) -> usize {
        let first = |pred: &dyn Fn(usize) -> bool| self.words.iter().copied().find(|&w| pred(w));
        first(&|w| self.pos(w) == "VERB")
            .or_else(|| first(&|w| self.pos(w) == "AUX"))
            .or_else(|| {
                first(&|w| {
                    self.is_nominal(w) && !self.word_after(w).map_or(false, |n| self.is_nominal(n))
                })
            })
            .or_else(|| first(&|w| self.pos(w) != "PUNCT"))
            .or_else(|| self.words.first().copied())
            .unwrap_or(self.range.start)
    }

    /// Head noun of the phrase a determiner or modifier at `i` belongs to.
    fn noun_to_the_right(&self, i: usize) -> Option<usize> {
        let mut j = self.word_after(i)?;
        loop {
            match self.pos(j) {
                "VERB" | "AUX" | "ADP" | "PUNCT" | "CCONJ" | "SCONJ" | "PART" => return None,
                "NOUN" | "PROPN" => break,
                _ => j = self.word_after(j)?,
            }
        }
        while let Some(n) = self.word_after(j).filter(|&n| self.is_nominal(n)) {
            j = n;
        }
        Some(j)
    }

    fn verb_to_the_right(&self, i: usize) -> Option<usize> {
        self.words
            .iter()
            .copied()
            .filter(|&w| w > i)
            .take_while(|&w| self.tagged[w].tag != "." && self.pos(w) != "SCONJ")
            .find(|&w| self.pos(w) == "VERB")
    }

    fn verb_to_the_left(&self, i: usize) -> Option<usize> {
        self.words
            .iter()
            .rev()
            .copied()
            .filter(|&w| w < i)
            .find(|&w| self.pos(w) == "VERB")
    }

    /// The preposition governing a noun phrase that ends at `i`, looking
    /// back over its determiners, modifiers and compounds.
    fn governing_adposition(&self, i: usize) -> Option<usize> {
        let mut j = self.word_before(i)?;
        loop {
            match self.pos(j) {
                "ADP" => return Some(j),
                "DET" | "ADJ" | "NUM" | "NOUN" | "PROPN" => j = self.word_before(j)?,
                _ if self.tagged[j].tag == "HYPH" => j = self.word_before(j)?,
                _ => return None,
            }
        }
    }

    fn attach(&self, w: usize, root: usize) -> (usize, &'static str) {
        let pos = self.pos(w);
        let tag = self.tagged[w].tag.as_str();
        let lower = self.lower(w);
        match pos {
            "DET" | "ADJ" | "NUM" => {
                let dep = match (pos, tag) {
                    (_, "PRP$") => "poss",
                    ("DET", _) => "det",
                    ("ADJ", _) => "amod",
                    _ => "nummod",
                };
                match self.noun_to_the_right(w) {
                    Some(noun) => (noun, dep),
                    None if pos == "ADJ"
                        && self.word_before(w).map_or(false, |p| self.pos(p) == "AUX") =>
                    {
                        (root, "acomp")
                    }
                    None => (root, dep),
                }
            }
            "NOUN" | "PROPN" | "PRON" => {
                if pos != "PRON" && self.word_after(w).map_or(false, |n| self.is_nominal(n)) {
                    return (self.word_after(w).unwrap_or(root), "compound");
                }
                if let Some(adp) = self.governing_adposition(w) {
                    return (adp, "pobj");
                }
                if w < root {
                    (root, "nsubj")
                } else {
                    (self.verb_to_the_left(w).unwrap_or(root), "dobj")
                }
            }
            "ADP" => {
                let head = self
                    .words
                    .iter()
                    .rev()
                    .copied()
                    .filter(|&p| p < w)
                    .find(|&p| matches!(self.pos(p), "NOUN" | "PROPN" | "VERB" | "PRON" | "AUX"));
                (head.unwrap_or(root), "prep")
            }
            _ if matches!(lower.as_str(), "not" | "n't" | "n’t" | "never") => {
                let head = self
                    .verb_to_the_right(w)
                    .or_else(|| self.verb_to_the_left(w))
                    .unwrap_or(root);
                (head, "neg")
            }
            "PART" if tag == "TO" => (self.verb_to_the_right(w).unwrap_or(root), "aux"),
            "PART" if tag == "POS" => (self.word_before(w).unwrap_or(root), "case"),
            "AUX" => (self.verb_to_the_right(w).unwrap_or(root), "aux"),
            "VERB" => {
                let coordinated = self
                    .words
                    .iter()
                    .any(|&c| c > root.min(w) && c < root.max(w) && self.pos(c) == "CCONJ");
                (root, if coordinated { "conj" } else { "xcomp" })
            }
            "ADV" => {
                let next_is_verb = self
                    .word_after(w)
                    .map_or(false, |n| matches!(self.pos(n), "VERB" | "AUX"));
                let head = if next_is_verb {
                    self.word_after(w)
                } else {
                    self.verb_to_the_left(w)
                };
                (head.unwrap_or(root), "advmod")
            }
            "CCONJ" => (self.word_before(w).unwrap_or(root), "cc"),
            "SCONJ" => (self.verb_to_the_right(w).unwrap_or(root), "mark"),
            "PUNCT" => (root, "punct"),
            "INTJ" => (root, "intj"),
            _ => (root, "dep"),
        }
    }

    fn parse(&self, arcs: &mut Arcs) {
        let root = self.root();
        arcs.heads[root] = root;
        arcs.deps[root] = String::from("ROOT");
        for &w in &self.words {
            if w == root {
                continue;
            }
            let (head, dep) = self.attach(w, root);
            arcs.heads[w] = if head == w { root } else { head };
            arcs.deps[w] = dep.to_string();
        }
        for i in self.range.clone() {
            if self.tokens[i].is_space() && i != root {
                arcs.heads[i] = if i > self.range.start { i - 1 } else { root };
                arcs.deps[i] = String::from("dep");
            }
        }
        self.break_cycles(arcs, root);
    }

    /// Reattach to the root any token whose head chain never reaches it.
    fn break_cycles(&self, arcs: &mut Arcs, root: usize) {
        let limit = self.range.len();
        for i in self.range.clone() {
            let mut current = i;
            let mut steps = 0;
            while current != root && steps <= limit {
                current = arcs.heads[current];
                steps += 1;
            }
            if current != root {
                arcs.heads[i] = root;
            }
        }
    }
}

pub(crate) fn parse(tokens: &[RawToken], tagged: &[Tagged], sents: &[usize]) -> Arcs {
    let mut arcs = Arcs {
        heads: (0..tokens.len()).collect(),
        deps: vec![String::from("dep"); tokens.len()],
    };
    let mut start = 0;
    while start < tokens.len() {
        let end = (start..tokens.len())
            .find(|&i| sents[i] != sents[start])
            .unwrap_or(tokens.len());
        let sentence = Sentence {
            tokens,
            tagged,
            range: start..end,
            words: (start..end).filter(|&i| !tokens[i].is_space()).collect(),
        };
        sentence.parse(&mut arcs);
        start = end;
    }
    arcs
}

#[cfg(test)]
mod tests {
    use super::super::special::SpecialCases;
    use super::super::tagger::tag;
    use super::super::tokenize::tokenize;
    use super::*;

    fn analyze(text: &str) -> (Vec<RawToken>, Vec<usize>, Arcs) {
        let specials =
            SpecialCases::parse("t", "self-harm\tself-harm\tNN\tNOUN\nself-harmed\tself-harm\tVBD\tVERB\n")
                .unwrap();
        let tokens = tokenize(text, &specials);
        let tagged = tag(&tokens);
        let sents = sentence_ids(&tokens, &tagged);
        let arcs = parse(&tokens, &tagged, &sents);
        (tokens, sents, arcs)
    }

    #[test]
    fn splits_sentences() {
        let (_, sents, _) = analyze("No cuts. She is well.\n\nPlan: review");
        assert_eq!(sents, vec![0, 0, 0, 1, 1, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn denial_tree() {
        let (_, _, arcs) = analyze("She denies deliberate self-harm.");
        assert_eq!(arcs.heads, vec![1, 1, 3, 1, 1]);
        assert_eq!(arcs.deps, vec!["nsubj", "ROOT", "amod", "dobj", "punct"]);
    }

    #[test]
    fn prepositional_objects() {
        let (_, _, arcs) = analyze("She has self-harmed in the past.");
        assert_eq!(arcs.heads, vec![2, 2, 2, 2, 5, 3, 2]);
        assert_eq!(arcs.deps, vec!["nsubj", "aux", "ROOT", "prep", "det", "pobj", "punct"]);
    }

    #[test]
    fn negation_attaches_to_verb() {
        let (_, _, arcs) = analyze("She did not cut her arm");
        assert_eq!(arcs.heads[2], 3);
        assert_eq!(arcs.deps[2], "neg");
        assert_eq!(arcs.heads[5], 3);
        assert_eq!(arcs.deps[4], "poss");
    }

    #[test]
    fn verbless_fragment_roots_on_noun() {
        let (_, _, arcs) = analyze("Family history of self-harm.");
        assert_eq!(arcs.deps, vec!["compound", "ROOT", "prep", "pobj", "punct"]);
        assert_eq!(arcs.heads, vec![1, 1, 1, 2, 1]);
    }
}
