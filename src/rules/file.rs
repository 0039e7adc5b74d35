use super::{LayerOptions, Rule, RuleLayer};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A layer of rules stored as RON.
///
/// ```ron
/// (
///     layer: "custom",
///     rules: [
///         (
///             name: "SCRATCH_DSH",
///             pattern: [
///                 (checks: [Text(LEMMA, Eq("scratch"))]),
///                 (checks: [Attr("LA", Is("BODY_PART"))], op: OneOrMore),
///             ],
///             writes: [(target: All, attr: "DSH", value: Some("DSH"))],
///         ),
///     ],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleFile {
    pub layer: String,
    #[serde(default)]
    pub sentence_scoped: bool,
    pub rules: Vec<Rule>,
}

impl RuleFile {
    pub fn into_layer(self, options: LayerOptions) -> RuleLayer {
        RuleLayer::new(&self.layer, &self.rules)
            .sentence_scoped(self.sentence_scoped)
            .with_options(options)
    }
}

pub fn parse_rule_file(source_name: &str, text: &str) -> Result<RuleFile, ConfigError> {
    ron::from_str(text).map_err(|err| ConfigError::RuleFile {
        path: source_name.to_string(),
        message: err.to_string(),
    })
}

pub fn load_rule_file(path: &Path) -> Result<RuleFile, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|err| ConfigError::RuleFile {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    let file = parse_rule_file(&path.display().to_string(), &text)?;
    log::info!(
        "loaded {} rules for layer {} from {}",
        file.rules.len(),
        file.layer,
        path.display()
    );
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Attr, Doc, Token};
    use std::io::Write;

    const SCRATCH: &str = r#"
(
    layer: "custom",
    rules: [
        (
            name: "SCRATCH_DSH",
            pattern: [
                (checks: [Text(LEMMA, Eq("scratch"))]),
                (checks: [Text(LOWER, In(["her", "his"]))], op: Optional),
                (checks: [Text(LOWER, Eq("arm"))]),
            ],
            writes: [(target: All, attr: "DSH", value: Some("DSH"))],
        ),
        (
            name: "BAD",
            pattern: [(checks: [])],
            writes: [(target: Last, attr: "POS", value: Some("NOUN"))],
        ),
    ],
)
"#;

    #[test]
    fn parses_and_compiles() {
        let file = parse_rule_file("scratch.ron", SCRATCH).unwrap();
        assert_eq!(file.layer, "custom");
        assert_eq!(file.rules.len(), 2);

        let layer = file.into_layer(LayerOptions::default());
        assert_eq!(layer.rule_names().collect::<Vec<_>>(), vec!["SCRATCH_DSH"]);
        assert_eq!(layer.rejected().len(), 1);

        let words = ["scratch", "her", "arm"];
        let mut offset = 0;
        let mut tokens = words
            .iter()
            .map(|w| {
                let mut t = Token::new(*w, offset);
                offset += w.len() + 1;
                t.whitespace = " ".to_string();
                t
            })
            .collect::<Vec<_>>();
        if let Some(last) = tokens.last_mut() {
            last.whitespace.clear();
        }
        let mut doc = Doc::new("scratch her arm", tokens).unwrap();
        layer.apply(&mut doc);
        assert!(doc.tokens().iter().all(|t| t.attrs.is(Attr::Dsh, "DSH")));
    }

    #[test]
    fn reports_syntax_errors_with_path() {
        let err = parse_rule_file("broken.ron", "(layer: ").unwrap_err();
        assert!(matches!(err, ConfigError::RuleFile { ref path, .. } if path == "broken.ron"));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCRATCH.as_bytes()).unwrap();
        let loaded = load_rule_file(file.path()).unwrap();
        assert_eq!(loaded.rules[0].name, "SCRATCH_DSH");
    }
}
