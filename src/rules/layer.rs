use super::{Rule, Target, BUILTIN_FIELDS};
use crate::doc::{longest_non_overlapping, Attr, Doc, Label, Span};
use crate::errors::ConfigError;
use crate::merge::merge_non_overlapping;
use crate::pattern::Pattern;
use crate::resolver::Resolver;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Pipeline-wide switches that change how every layer applies its rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerOptions {
    /// Reduce the overlapping matches of each rule to the longest ones.
    pub longest_match: bool,
    /// Collapse the matches of rules marked `merge` at the end of the layer.
    pub merge_spans: bool,
}

#[derive(Debug)]
struct CompiledWrite {
    target: Target,
    attr: Attr,
    value: Option<Label>,
}

#[derive(Debug)]
struct CompiledRule {
    name: Arc<str>,
    pattern: Pattern,
    writes: Vec<CompiledWrite>,
    merge: bool,
}

impl CompiledRule {
    fn compile(rule: &Rule) -> Result<Self, ConfigError> {
        let pattern = Pattern::compile(&rule.name, &rule.pattern)?;
        let mut writes = Vec::with_capacity(rule.writes.len());
        for write in &rule.writes {
            if BUILTIN_FIELDS.contains(&write.attr.as_str()) {
                return Err(ConfigError::BuiltinAttribute {
                    rule: rule.name.clone(),
                    attr: write.attr.clone(),
                });
            }
            let attr = Attr::from_name(&write.attr).ok_or_else(|| ConfigError::UnknownAttribute {
                rule: rule.name.clone(),
                attr: write.attr.clone(),
            })?;
            writes.push(CompiledWrite {
                target: write.target,
                attr,
                value: write.value.clone().map(Label::from),
            });
        }
        writes.sort_by_key(|write| write.target.order());

        Ok(CompiledRule {
            name: rule.name.as_str().into(),
            pattern,
            writes,
            merge: rule.merge,
        })
    }

    fn apply_writes(&self, doc: &mut Doc, span: Span) {
        for write in &self.writes {
            match write.target {
                Target::All => {
                    for i in span.range() {
                        doc.set_attr(i, write.attr, write.value.clone());
                    }
                }
                Target::Last => {
                    if let Some(i) = span.last() {
                        doc.set_attr(i, write.attr, write.value.clone());
                    }
                }
                Target::At(offset) => {
                    if offset < span.len() {
                        doc.set_attr(span.start + offset, write.attr, write.value.clone());
                    }
                }
            }
        }
    }
}

/// Per-rule match counts from one application of a layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerReport {
    pub matches: Vec<(String, usize)>,
    pub merged: usize,
}

impl LayerReport {
    pub fn count(&self, rule: &str) -> usize {
        self.matches
            .iter()
            .find(|(name, _)| name == rule)
            .map_or(0, |(_, count)| *count)
    }
}

/// A named, ordered list of compiled rules applied as one pass.
///
/// Each rule sees the writes of the rules before it. A rule's own matches
/// are all found before it writes anything.
#[derive(Debug)]
pub struct RuleLayer {
    name: Arc<str>,
    rules: Vec<CompiledRule>,
    rejected: Vec<ConfigError>,
    sentence_scoped: bool,
    options: LayerOptions,
}

impl RuleLayer {
    /// Compile `rules`. Rules that fail to compile are logged and left out.
    pub fn new(name: &str, rules: &[Rule]) -> Self {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut rejected = Vec::new();
        for rule in rules {
            match CompiledRule::compile(rule) {
                Ok(rule) => compiled.push(rule),
                Err(err) => {
                    log::warn!("layer {}: skipping rule: {}", name, err);
                    rejected.push(err);
                }
            }
        }
        log::debug!("layer {}: {} rules compiled", name, compiled.len());
        RuleLayer {
            name: name.into(),
            rules: compiled,
            rejected,
            sentence_scoped: false,
            options: LayerOptions::default(),
        }
    }

    /// Keep every match inside one sentence.
    pub fn sentence_scoped(mut self, scoped: bool) -> Self {
        self.sentence_scoped = scoped;
        self
    }

    pub fn with_options(mut self, options: LayerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.iter().map(|rule| &*rule.name)
    }

    /// Rules that failed to compile.
    pub fn rejected(&self) -> &[ConfigError] {
        &self.rejected
    }

    fn find(&self, rule: &CompiledRule, doc: &Doc) -> Vec<Span> {
        let spans = if self.sentence_scoped {
            doc.sents()
                .iter()
                .flat_map(|sent| rule.pattern.find_all(doc.tokens(), sent.clone()))
                .collect()
        } else {
            rule.pattern.find_all(doc.tokens(), 0..doc.len())
        };
        if self.options.longest_match {
            longest_non_overlapping(&spans)
        } else {
            spans
        }
    }

    pub fn apply(&self, doc: &mut Doc) -> LayerReport {
        let mut report = LayerReport::default();
        let mut merge_candidates = Vec::new();

        for rule in &self.rules {
            let spans = self.find(rule, doc);
            if !spans.is_empty() {
                log::debug!("layer {}: rule {}: {} matches", self.name, rule.name, spans.len());
            }
            for span in &spans {
                rule.apply_writes(doc, *span);
                doc.record(&self.name, &rule.name, *span);
            }
            if rule.merge && self.options.merge_spans {
                merge_candidates.extend(spans.iter().copied());
            }
            report.matches.push((rule.name.to_string(), spans.len()));
        }

        if !merge_candidates.is_empty() {
            report.merged = merge_non_overlapping(doc, &self.name, &merge_candidates, |_, _| None);
        }
        report
    }
}

impl Resolver for RuleLayer {
    fn go(&self, doc: &mut Doc) {
        self.apply(doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::Token;
    use crate::dsl::*;
    use crate::rules::Write;

    /// Lowercased words, one sentence per `.`-terminated group.
    fn doc(text: &str) -> Doc {
        let mut tokens = Vec::new();
        let mut sent = 0;
        let mut offset = 0;
        for word in text.split(' ') {
            let mut token = Token::new(word, offset);
            token.whitespace = " ".to_string();
            token.sent = sent;
            token.head = tokens.len();
            if word == "." {
                sent += 1;
            }
            offset += word.len() + 1;
            tokens.push(token);
        }
        if let Some(last) = tokens.last_mut() {
            last.whitespace.clear();
        }
        Doc::new(text, tokens).unwrap()
    }

    fn labels(doc: &Doc, attr: Attr) -> Vec<&str> {
        doc.tokens()
            .iter()
            .map(|t| t.attrs.get(attr).map_or("_", |l| l.as_str()))
            .collect()
    }

    #[test]
    fn writes_apply_all_last_index() {
        let rules = [
            Rule::new("ALL", vec![lower("cut"), lower("her"), lower("arm")]).all(Attr::Dsh, "DSH"),
            Rule::new("LAST", vec![lower("cut"), lower("her"), lower("arm")]).last(Attr::La, "BODY_PART"),
            Rule::new("AT", vec![lower("cut"), lower("her"), lower("arm")])
                .at(0, Attr::La, "HARM_ACTION")
                .at(7, Attr::La, "IGNORED"),
        ];
        let mut doc = doc("she cut her arm");
        RuleLayer::new("test", &rules).apply(&mut doc);
        assert_eq!(labels(&doc, Attr::Dsh), vec!["_", "DSH", "DSH", "DSH"]);
        assert_eq!(labels(&doc, Attr::La), vec!["_", "HARM_ACTION", "_", "BODY_PART"]);
    }

    #[test]
    fn later_rules_see_earlier_writes() {
        let rules = [
            Rule::new("MARK", vec![lower("overdose")]).all(Attr::Dsh, "DSH"),
            Rule::new("CLEAR", vec![lower("an"), is(Attr::Dsh, "DSH")]).clear_last(Attr::Dsh),
        ];
        let mut doc = doc("took an overdose");
        let report = RuleLayer::new("test", &rules).apply(&mut doc);
        assert_eq!(report.count("MARK"), 1);
        assert_eq!(report.count("CLEAR"), 1);
        assert_eq!(labels(&doc, Attr::Dsh), vec!["_", "_", "_"]);
    }

    #[test]
    fn rule_matches_computed_before_its_writes() {
        // writing the first match sets TIME on "b", which would hide (1, 3)
        let rules = [Rule::new("PAIR", vec![unset(Attr::Time), unset(Attr::Time)]).all(Attr::Time, "PAST")];
        let mut doc = doc("a b c");
        let report = RuleLayer::new("test", &rules).apply(&mut doc);
        assert_eq!(report.count("PAIR"), 2);
        assert_eq!(labels(&doc, Attr::Time), vec!["PAST", "PAST", "PAST"]);
    }

    #[test]
    fn invalid_rules_are_skipped() {
        let mut builtin = Rule::new("BUILTIN", vec![lower("cut")]);
        builtin.writes.push(Write {
            target: Target::All,
            attr: "LEMMA".to_string(),
            value: Some("x".to_string()),
        });
        let mut unknown = Rule::new("UNKNOWN", vec![lower("cut")]);
        unknown.writes.push(Write {
            target: Target::All,
            attr: "SH".to_string(),
            value: Some("SH".to_string()),
        });
        let rules = [
            builtin,
            unknown,
            Rule::new("REGEX", vec![lower_re("(")]).all(Attr::Dsh, "DSH"),
            Rule::new("GOOD", vec![lower("cut")]).all(Attr::Dsh, "DSH"),
        ];
        let layer = RuleLayer::new("test", &rules);
        assert_eq!(layer.rule_names().collect::<Vec<_>>(), vec!["GOOD"]);
        assert!(matches!(layer.rejected()[0], ConfigError::BuiltinAttribute { .. }));
        assert!(matches!(layer.rejected()[1], ConfigError::UnknownAttribute { .. }));
        assert!(matches!(layer.rejected()[2], ConfigError::InvalidRegex { .. }));

        let mut doc = doc("cut");
        layer.apply(&mut doc);
        assert_eq!(labels(&doc, Attr::Dsh), vec!["DSH"]);
    }

    #[test]
    fn sentence_scoping() {
        let rules = [Rule::new("NEG_FWD", vec![lower("no"), any().star(), lower("overdose")])
            .last(Attr::Neg, "NEG")];

        let mut open = doc("no pain . overdose");
        RuleLayer::new("test", &rules).apply(&mut open);
        assert_eq!(labels(&open, Attr::Neg)[3], "NEG");

        let mut scoped = doc("no pain . overdose");
        RuleLayer::new("test", &rules)
            .sentence_scoped(true)
            .apply(&mut scoped);
        assert_eq!(labels(&scoped, Attr::Neg)[3], "_");
    }

    #[test]
    fn longest_match_option() {
        let rules = [Rule::new("RUN", vec![lower("very").plus()]).all(Attr::Modality, "MODALITY")];
        let mut doc = doc("very very sad");
        let report = RuleLayer::new("test", &rules)
            .with_options(LayerOptions {
                longest_match: true,
                merge_spans: false,
            })
            .apply(&mut doc);
        assert_eq!(report.count("RUN"), 1);
    }

    #[test]
    fn merge_only_when_enabled() {
        let rules = [Rule::new("OD", vec![lower("an"), lower("overdose")])
            .all(Attr::Dsh, "DSH")
            .merged()];

        let mut plain = doc("took an overdose");
        RuleLayer::new("test", &rules).apply(&mut plain);
        assert_eq!(plain.len(), 3);

        let mut merged = doc("took an overdose");
        let report = RuleLayer::new("test", &rules)
            .with_options(LayerOptions {
                longest_match: false,
                merge_spans: true,
            })
            .apply(&mut merged);
        assert_eq!(report.merged, 1);
        assert_eq!(merged[1].text, "an overdose");
        assert!(merged[1].attrs.is(Attr::Dsh, "DSH"));
    }

    #[test]
    fn trace_records_rule_writes() {
        let rules = [Rule::new("OD", vec![lower("overdose")]).all(Attr::Dsh, "DSH")];
        let mut doc = doc("took an overdose");
        doc.enable_trace();
        let doc = doc.run_resolver(&RuleLayer::new("level0", &rules));
        assert_eq!(doc.trace().len(), 1);
        assert_eq!(doc.trace()[0].to_string(), "level0/OD");
        assert_eq!(doc.trace()[0].span, Span::new(2, 3));
    }
}
