use super::{Attr, Doc};
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

/// Internal representation of one underlined run.
struct IncludedRun {
    /// Inclusive token range.
    range: (usize, usize),
    value: String,
}

/// Renders a document as one line of tokens with the runs of selected
/// channels (and optionally the rule trace) underlined beneath it.
pub struct DocDisplay<'a> {
    doc: &'a Doc,
    include_runs: Vec<IncludedRun>,
}

// She  denies  deliberate  self-harm  .
//              ╰───────────────────╯DSH=DSH
//      ╰────╯NEG=NEG
//              ╰───────────────────╯level0/DELIBERATE_DSH
impl<'a> std::fmt::Display for DocDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SPACE_PADDING: usize = 2;
        let mut token_idx_to_start_display_char_idx = Vec::new();
        let mut token_idx_to_end_display_char_idx = Vec::new();

        let mut opening_line = String::new();
        for (i, token) in self.doc.tokens().iter().enumerate() {
            if i > 0 {
                opening_line.extend(std::iter::repeat(' ').take(SPACE_PADDING));
            }
            token_idx_to_start_display_char_idx.push(UnicodeWidthStr::width(&*opening_line));
            if token.is_space() {
                write!(&mut opening_line, "{}", token.text.escape_debug())?;
            } else {
                opening_line.push_str(&token.text);
            }
            token_idx_to_end_display_char_idx.push(UnicodeWidthStr::width(&*opening_line));
        }

        f.write_str(&opening_line)?;

        for run in self.include_runs.iter() {
            f.write_char('\n')?;

            let start_char_idx = token_idx_to_start_display_char_idx[run.range.0];
            for _ in 0..start_char_idx {
                f.write_char(' ')?;
            }

            f.write_char('╰')?;

            let end_char_idx = token_idx_to_end_display_char_idx[run.range.1];
            let char_len = end_char_idx - start_char_idx;
            for _ in (start_char_idx + 1)..end_char_idx.saturating_sub(1) {
                f.write_char('─')?;
            }

            if char_len > 1 {
                f.write_char('╯')?;
            }

            f.write_str(&run.value)?;
        }

        Ok(())
    }
}

impl<'a> DocDisplay<'a> {
    pub fn new(doc: &'a Doc) -> Self {
        DocDisplay {
            doc,
            include_runs: Vec::new(),
        }
    }

    /// Underline every maximal run of tokens sharing the same value of `attr`.
    pub fn include(&mut self, attr: Attr) {
        let tokens = self.doc.tokens();
        let mut i = 0;
        while i < tokens.len() {
            let Some(label) = tokens[i].attrs.get(attr) else {
                i += 1;
                continue;
            };
            let mut end = i;
            while end + 1 < tokens.len() && tokens[end + 1].attrs.get(attr) == Some(label) {
                end += 1;
            }
            self.include_runs.push(IncludedRun {
                range: (i, end),
                value: format!("{}={}", attr, label),
            });
            i = end + 1;
        }
    }

    /// Underline the span of every recorded rule write.
    pub fn include_trace(&mut self) {
        for entry in self.doc.trace() {
            if let Some(last) = entry.span.last() {
                self.include_runs.push(IncludedRun {
                    range: (entry.span.start, last),
                    value: entry.to_string(),
                });
            }
        }
    }

    /// Takes self
    pub fn with(mut self, attr: Attr) -> Self {
        self.include(attr);
        self
    }

    /// Takes self, includes every channel
    pub fn with_all(mut self) -> Self {
        for attr in Attr::ALL {
            self.include(attr);
        }
        self
    }

    /// Takes self, includes the rule trace
    pub fn with_trace(mut self) -> Self {
        self.include_trace();
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::doc::{Attr, Doc, Span, Token};

    fn doc(words: &[&str]) -> Doc {
        let mut text = String::new();
        let mut tokens: Vec<Token> = Vec::new();
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                text.push(' ');
                if let Some(prev) = tokens.last_mut() {
                    prev.whitespace = " ".to_string();
                }
            }
            let mut token = Token::new(*word, text.len());
            token.head = 0;
            tokens.push(token);
            text.push_str(word);
        }
        Doc::new(text, tokens).unwrap()
    }

    #[test]
    fn underlines_runs() {
        let mut doc = doc(&["She", "denies", "deliberate", "self-harm", "."]);
        doc.set_attr(2, Attr::Dsh, Some("DSH".into()));
        doc.set_attr(3, Attr::Dsh, Some("DSH".into()));
        doc.set_attr(1, Attr::Neg, Some("NEG".into()));

        insta::assert_snapshot!(doc.display().with(Attr::Dsh).with(Attr::Neg).to_string(), @r###"
        She  denies  deliberate  self-harm  .
                     ╰───────────────────╯DSH=DSH
             ╰────╯NEG=NEG
        "###);
    }

    #[test]
    fn single_char_token() {
        let mut doc = doc(&["a", "."]);
        doc.set_attr(1, Attr::Time, Some("PAST".into()));
        insta::assert_snapshot!(doc.display().with(Attr::Time).to_string(), @r###"
        a  .
           ╰TIME=PAST
        "###);
    }

    #[test]
    fn renders_trace() {
        let mut doc = doc(&["cut", "her", "arm"]);
        doc.enable_trace();
        doc.record(&"level0".into(), &"HARM_BODY_PART".into(), Span::new(0, 3));
        insta::assert_snapshot!(doc.display().with_trace().to_string(), @r###"
        cut  her  arm
        ╰───────────╯level0/HARM_BODY_PART
        "###);
    }
}
