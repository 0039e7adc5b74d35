//! The full annotation pipeline.
//!
//! [`Annotator::annotate`] runs the analyzer, the lemma and date passes, the
//! lexicons and the rule layers. [`Annotator::process_doc`] then propagates
//! context onto the mentions, merges multi-token mentions and maps them to
//! [`Mentions`].

use crate::batch::{Outcome, SkipReason};
use crate::config::AnnotatorConfig;
use crate::context::ContextPropagator;
use crate::errors::Result;
use crate::layers::build_layers;
use crate::lexicons::{load_annotators, load_special_cases};
use crate::mapper::{self, Mentions};
use crate::preprocess::{DateTokenAnnotator, LemmaCorrector};
use layered_rules::merge::merge_runs;
use layered_rules::rules::load_rule_file;
use layered_rules::{Analyzer, Attr, Doc, LexicalAnnotator, Resolver, RuleLayer, SimpleAnalyzer};

pub struct Annotator {
    config: AnnotatorConfig,
    analyzer: Box<dyn Analyzer>,
    lexicons: Vec<LexicalAnnotator>,
    layers: Vec<RuleLayer>,
    context: ContextPropagator,
}

#[derive(Default)]
pub struct AnnotatorBuilder {
    config: AnnotatorConfig,
    analyzer: Option<Box<dyn Analyzer>>,
}

impl AnnotatorBuilder {
    pub fn config(mut self, config: AnnotatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the built-in [`SimpleAnalyzer`].
    pub fn analyzer(mut self, analyzer: impl Analyzer + 'static) -> Self {
        self.analyzer = Some(Box::new(analyzer));
        self
    }

    pub fn build(self) -> Result<Annotator> {
        let config = self.config;
        let lexicon_dir = config.lexicon_dir.as_deref();

        let analyzer = match self.analyzer {
            Some(analyzer) => analyzer,
            None => Box::new(
                SimpleAnalyzer::new().with_special_cases(load_special_cases(lexicon_dir)?),
            ),
        };
        let lexicons = load_annotators(lexicon_dir, config.strict_lexicons)?;

        let options = config.layer_options();
        let mut layers = build_layers(config.cohort, options);
        for path in &config.extra_rules {
            let layer = load_rule_file(path)?.into_layer(options);
            log::info!(
                "loaded {} rules of layer {} from {}",
                layer.len(),
                layer.name(),
                path.display()
            );
            layers.push(layer);
        }

        let context = ContextPropagator::new(
            config.backward_window,
            config.forward_window,
            config.signals,
        );
        log::info!(
            "annotator ready: cohort {}, {} lexicons, {} layers",
            config.cohort,
            lexicons.len(),
            layers.len()
        );
        Ok(Annotator {
            config,
            analyzer,
            lexicons,
            layers,
            context,
        })
    }
}

impl Annotator {
    pub fn builder() -> AnnotatorBuilder {
        AnnotatorBuilder::default()
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn analyzer(&self) -> &dyn Analyzer {
        self.analyzer.as_ref()
    }

    pub fn lexicons(&self) -> &[LexicalAnnotator] {
        &self.lexicons
    }

    pub fn layers(&self) -> &[RuleLayer] {
        &self.layers
    }

    /// Analyze `text` and run every annotation pass over it.
    pub fn annotate(&self, text: &str) -> Result<Doc> {
        let doc = self.analyzer.analyze(text)?;
        Ok(self.annotate_doc(doc))
    }

    /// Like [`annotate`](Self::annotate), recording which rule wrote what.
    pub fn annotate_traced(&self, text: &str) -> Result<Doc> {
        let mut doc = self.analyzer.analyze(text)?;
        doc.enable_trace();
        Ok(self.annotate_doc(doc))
    }

    /// Run the annotation passes over an already analyzed document, such as
    /// one read from CoNLL-U.
    pub fn annotate_doc(&self, mut doc: Doc) -> Doc {
        LemmaCorrector.go(&mut doc);
        DateTokenAnnotator.go(&mut doc);
        for lexicon in &self.lexicons {
            let matched = lexicon.apply(&mut doc);
            log::trace!("lexicon {}: {} matches", lexicon.name(), matched);
        }
        for layer in &self.layers {
            let report = layer.apply(&mut doc);
            log::trace!("layer {}: {} merged", layer.name(), report.merged);
        }
        doc
    }

    /// Propagate negation, time, modality and hedging onto the mentions.
    /// Returns whether the document has a history section.
    pub fn calculate_mention_attributes(&self, doc: &mut Doc) -> bool {
        self.context.propagate(doc)
    }

    /// Collapse every run of adjacent mention tokens into one token.
    pub fn merge_spans(&self, doc: &mut Doc) -> usize {
        merge_runs(doc, Attr::Dsh)
    }

    pub fn build_output(&self, doc: &Doc) -> Mentions {
        mapper::build_output(doc)
    }

    /// Everything after annotation: context, merging and output.
    pub fn process_doc(&self, mut doc: Doc) -> Mentions {
        if self.calculate_mention_attributes(&mut doc) {
            log::debug!("document has a history section");
        }
        let merged = self.merge_spans(&mut doc);
        log::trace!("merged {} mention spans", merged);
        self.build_output(&doc)
    }

    /// Annotate one text end to end. Texts of `max_chars` characters or
    /// more are skipped.
    pub fn process_text(&self, text: &str, text_id: &str) -> Result<Outcome> {
        let chars = text.chars().count();
        if chars >= self.config.max_chars {
            log::warn!(
                "skipping {}: {} characters (limit {})",
                text_id,
                chars,
                self.config.max_chars
            );
            return Ok(Outcome::Skipped(SkipReason::TooLong {
                chars,
                max_chars: self.config.max_chars,
            }));
        }
        let doc = self.annotate(text)?;
        let mentions = self.process_doc(doc);
        log::debug!("{}: {} mentions", text_id, mentions.len());
        Ok(Outcome::Annotated(mentions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnnotatorConfig;
    use crate::labels::DSH;
    use std::io::Write as _;

    #[test]
    fn annotate_then_process() {
        let annotator = Annotator::builder().build().unwrap();
        let doc = annotator.annotate("She took an overdose last year.").unwrap();
        assert!(doc.tokens().iter().any(|t| t.attrs.is(Attr::Dsh, DSH)));

        let mentions = annotator.process_doc(doc);
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions.0[0].id, "EHOST_Instance_1");
    }

    #[test]
    fn limit_is_inclusive() {
        let annotator = Annotator::builder()
            .config(AnnotatorConfig::standard().with_max_chars(5))
            .build()
            .unwrap();
        assert!(annotator.process_text("abcde", "t").unwrap().is_skipped());
        assert!(!annotator.process_text("abcd", "t").unwrap().is_skipped());
        // characters, not bytes
        assert!(!annotator.process_text("éééé", "t").unwrap().is_skipped());
    }

    #[test]
    fn extra_rule_files_run_last() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
    layer: "custom",
    rules: [
        (
            name: "SCRATCH_DSH",
            pattern: [(checks: [Text(LEMMA, Eq("scratch"))])],
            writes: [(target: All, attr: "DSH", value: Some("DSH"))],
        ),
    ],
)"#
        )
        .unwrap();
        let annotator = Annotator::builder()
            .config(AnnotatorConfig::standard().with_extra_rules(file.path()))
            .build()
            .unwrap();
        assert_eq!(annotator.layers().last().unwrap().name(), "custom");

        let doc = annotator.annotate("Noted to scratch.").unwrap();
        assert!(doc[2].attrs.is(Attr::Dsh, DSH));
    }

    #[test]
    fn traced_annotation_records_rules() {
        let annotator = Annotator::builder().build().unwrap();
        let doc = annotator.annotate_traced("She took an overdose.").unwrap();
        assert!(doc.is_tracing());
        assert!(!doc.trace().is_empty());
    }

    #[test]
    fn annotator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Annotator>();
    }
}
