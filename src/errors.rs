use thiserror::Error;

/// A rule, rule file or rule layer that cannot be compiled.
///
/// The offending rule is skipped; the rest of its layer still runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("rule {rule}: pattern is empty")]
    EmptyPattern { rule: String },
    #[error("rule {rule}: invalid regular expression {pattern:?}: {message}")]
    InvalidRegex {
        rule: String,
        pattern: String,
        message: String,
    },
    #[error("rule {rule}: cannot modify built-in attribute {attr}")]
    BuiltinAttribute { rule: String, attr: String },
    #[error("rule {rule}: unknown attribute {attr}")]
    UnknownAttribute { rule: String, attr: String },
    #[error("rule file {path}: {message}")]
    RuleFile { path: String, message: String },
}

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("{source_name}:{line}: expected `phrase<TAB>label`, found {found} field(s)")]
    Malformed {
        source_name: String,
        line: usize,
        found: usize,
    },
    #[error("{source_name}:{line}: expected `orth<TAB>lemma<TAB>tag<TAB>pos`, found {found} field(s)")]
    MalformedSpecialCase {
        source_name: String,
        line: usize,
        found: usize,
    },
    #[error("{source_name}:{line}: empty phrase")]
    EmptyPhrase { source_name: String, line: usize },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DocError {
    #[error("token {index} ({text:?}) does not match the document text at byte {offset}")]
    TextMismatch {
        index: usize,
        text: String,
        offset: usize,
    },
    #[error("token {index} has head {head} outside the document")]
    HeadOutOfBounds { index: usize, head: usize },
    #[error("token {index}: sentence index decreases")]
    SentenceOrder { index: usize },
    #[error("span {start}..{end} is not a valid token range for {len} tokens")]
    InvalidSpan { start: usize, end: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum ConllError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error(transparent)]
    Doc(#[from] DocError),
}
