//! Token-sequence rule matching and attribute layering.
//!
//! A [`Doc`] is a tokenized, tagged and dependency-parsed document whose
//! tokens each carry one optional label per attribute channel ([`Attr`]).
//! Annotation passes implement [`Resolver`] and run in sequence, so later
//! passes read what earlier passes wrote:
//!
//! - [`LexicalAnnotator`] - phrase lists matched by lowercase form or lemma
//! - [`RuleLayer`] - ordered rules of quantified token predicates, each
//!   writing labels onto its matches
//! - [`merge`] - collapsing spans into single tokens
//!
//! Documents come from an [`Analyzer`] (the built-in [`SimpleAnalyzer`]) or
//! from CoNLL-U ([`conllu`]).
//!
//! ## Example
//!
//! ```
//! use layered_rules::dsl::*;
//! use layered_rules::{Analyzer, Attr, Rule, RuleLayer, SimpleAnalyzer};
//!
//! let layer = RuleLayer::new(
//!     "example",
//!     &[Rule::new("CUT", vec![lemma("cut")]).all(Attr::Dsh, "DSH")],
//! );
//! let doc = SimpleAnalyzer::new()
//!     .analyze("She cut her arm.")
//!     .unwrap()
//!     .run_resolver(&layer);
//! assert!(doc[1].attrs.is(Attr::Dsh, "DSH"));
//! ```

pub mod analyzer;
pub mod conllu;
mod doc;
pub mod errors;
pub mod lexical;
pub mod merge;
pub mod pattern;
mod resolver;
pub mod rules;

pub use analyzer::{Analyzer, SimpleAnalyzer, SpecialCases};
pub use doc::{
    longest_non_overlapping, Ancestors, Attr, AttrSlots, Doc, DocDisplay, Label, Span, Token,
    TraceEntry,
};
pub use errors::{ConfigError, ConllError, DocError, LexiconError};
pub use lexical::{LexicalAnnotator, Lexicon, MatchKey};
pub use pattern::dsl;
pub use resolver::Resolver;
pub use rules::{LayerOptions, LayerReport, Rule, RuleLayer, Target, Write};
