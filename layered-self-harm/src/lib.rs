//! Detection of deliberate self-harm (DSH) mentions in clinical notes.
//!
//! An [`Annotator`] finds DSH expressions with lexicons and ordered rule
//! layers built on [`layered_rules`], then decides for each mention
//! whether it is negated, historical, hypothetical or hedged:
//!
//! ```
//! use layered_self_harm::{Annotator, Outcome, Polarity, Temporality};
//!
//! let annotator = Annotator::builder().build().unwrap();
//! let outcome = annotator
//!     .process_text("She took an overdose years ago.", "note_1")
//!     .unwrap();
//! let mentions = outcome.mentions().unwrap();
//! assert_eq!(mentions.len(), 1);
//! assert_eq!(mentions.0[0].polarity, Polarity::Positive);
//! assert_eq!(mentions.0[0].temporality, Temporality::Historical);
//! ```
//!
//! Results go out as eHOST XML ([`ehost`]) or through the JSON service
//! envelope ([`service`]).

pub mod batch;
pub mod config;
pub mod context;
pub mod ehost;
pub mod errors;
pub mod labels;
pub mod layers;
pub mod lexicons;
pub mod mapper;
mod pipeline;
pub mod preprocess;
pub mod service;

#[cfg(test)]
mod tests {
    mod properties;
    mod scenarios;
}

pub use batch::{BatchReport, DocumentResult, Outcome, SkipReason};
pub use config::AnnotatorConfig;
pub use context::{ContextPropagator, Signals};
pub use errors::{AnnotatorError, Result, XmlError};
pub use layers::{build_layers, Cohort, LayerName};
pub use mapper::{MentionRecord, Mentions, Polarity, Status, Temporality};
pub use pipeline::{Annotator, AnnotatorBuilder};
