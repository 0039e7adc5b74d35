//! Core types for parsed `.nlp` fixture files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A parsed `.nlp` fixture document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NlpFixture {
    /// Optional title from `# Title` header
    pub title: Option<String>,
    /// Notes separated by `---`, each annotated as its own document
    pub paragraphs: Vec<Paragraph>,
    pub assertions: Vec<Assertion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    /// Paragraph index (0-based, counting empty paragraphs)
    pub index: usize,
    /// The text with markers removed
    pub text: String,
    pub spans: Vec<SpanMarker>,
}

/// A span marker extracted from `«n:text»` syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanMarker {
    pub id: usize,
    /// The marked text content (without guillemets)
    pub text: String,
    /// Character (not byte) range in the paragraph's text, comparable with
    /// mention offsets
    pub char_range: Range<usize>,
}

/// An assertion about a span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assertion {
    pub target: RefTarget,
    /// `Mention` or `NoMention`
    pub span_type: String,
    pub body: AssertionBody,
    /// Source line number for error reporting
    pub source_line: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RefTarget {
    /// A numbered span: `[1]`
    Span(usize),
    /// Text with an optional 0-based occurrence: `["text"]`, `["text"@2]`
    TextRef { text: String, occurrence: usize },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssertionBody {
    pub field_checks: Vec<FieldCheck>,
}

/// A single `field=value` check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldCheck {
    pub field: String,
    pub expected: String,
    pub operator: CompareOp,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CompareOp {
    /// `field=value`, case-insensitive
    #[default]
    Equals,
    /// `field!=value`
    NotEquals,
    /// `field~=value`, substring
    Contains,
}

impl NlpFixture {
    pub fn empty() -> Self {
        Self {
            title: None,
            paragraphs: Vec::new(),
            assertions: Vec::new(),
        }
    }

    pub fn spans(&self) -> Vec<&SpanMarker> {
        self.paragraphs.iter().flat_map(|p| &p.spans).collect()
    }

    pub fn span_by_id(&self, id: usize) -> Option<(&Paragraph, &SpanMarker)> {
        self.paragraphs
            .iter()
            .flat_map(|para| para.spans.iter().map(move |span| (para, span)))
            .find(|(_, span)| span.id == id)
    }

    /// Locate a text reference: the paragraph and character range of its
    /// `occurrence`-th appearance across all paragraphs.
    pub fn find_text(&self, text: &str, occurrence: usize) -> Option<(&Paragraph, Range<usize>)> {
        self.paragraphs
            .iter()
            .flat_map(|para| {
                para.text
                    .match_indices(text)
                    .map(move |(byte, _)| {
                        let start = para.text[..byte].chars().count();
                        (para, start..start + text.chars().count())
                    })
            })
            .nth(occurrence)
    }

    /// Resolve an assertion target to its paragraph, character range and text.
    pub fn resolve(&self, target: &RefTarget) -> Option<(&Paragraph, Range<usize>, String)> {
        match target {
            RefTarget::Span(id) => self
                .span_by_id(*id)
                .map(|(para, span)| (para, span.char_range.clone(), span.text.clone())),
            RefTarget::TextRef { text, occurrence } => self
                .find_text(text, *occurrence)
                .map(|(para, range)| (para, range, text.clone())),
        }
    }
}

impl fmt::Display for RefTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefTarget::Span(n) => write!(f, "[{}]", n),
            RefTarget::TextRef { text, occurrence } => {
                if *occurrence == 0 {
                    write!(f, "[\"{}\"]", text)
                } else {
                    write!(f, "[\"{}\"@{}]", text, occurrence)
                }
            }
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Equals => write!(f, "="),
            CompareOp::NotEquals => write!(f, "!="),
            CompareOp::Contains => write!(f, "~="),
        }
    }
}

impl fmt::Display for AssertionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, check) in self.field_checks.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}{}{}", check.field, check.operator, check.expected)?;
        }
        Ok(())
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}({})", self.target, self.span_type, self.body)
    }
}
