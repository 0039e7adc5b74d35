//! Parser for `.nlp` fixture files.
//!
//! ```text
//! # Denial
//!
//! She denies «1:deliberate self-harm».
//!
//! > [1]: Mention(polarity=NEGATIVE, status=NON-RELEVANT)
//! ```

use crate::errors::{SpecError, SpecResult};
use crate::fixture::{
    Assertion, AssertionBody, CompareOp, FieldCheck, NlpFixture, Paragraph, RefTarget, SpanMarker,
};

/// Parse `«n:text»` markers out of `input`, returning the text without
/// markers and the spans, with character ranges into that text.
pub fn parse_spans(input: &str) -> SpecResult<(String, Vec<SpanMarker>)> {
    let mut spans = Vec::new();
    let mut normalized = String::new();
    let mut normalized_chars = 0;
    let mut chars = input.char_indices();

    while let Some((pos, ch)) = chars.next() {
        if ch != '«' {
            normalized.push(ch);
            normalized_chars += 1;
            continue;
        }
        let start = normalized_chars;

        let mut id_str = String::new();
        loop {
            match chars.next() {
                Some((_, ':')) => break,
                Some((_, c)) if c.is_ascii_digit() => id_str.push(c),
                Some((_, c)) => {
                    return Err(SpecError::Parse {
                        line: count_lines(input, pos),
                        message: format!("Invalid span marker: expected digit or ':', found '{}'", c),
                    });
                }
                None => {
                    return Err(SpecError::Parse {
                        line: count_lines(input, pos),
                        message: "Unclosed span marker: expected ':'".to_string(),
                    });
                }
            }
        }
        let id: usize = id_str.parse().map_err(|_| SpecError::Parse {
            line: count_lines(input, pos),
            message: format!("Invalid span ID: '{}'", id_str),
        })?;

        let mut text = String::new();
        loop {
            match chars.next() {
                Some((_, '»')) => break,
                Some((_, c)) => {
                    text.push(c);
                    normalized.push(c);
                    normalized_chars += 1;
                }
                None => {
                    return Err(SpecError::Parse {
                        line: count_lines(input, pos),
                        message: "Unclosed span marker: expected '»'".to_string(),
                    });
                }
            }
        }

        spans.push(SpanMarker {
            id,
            text,
            char_range: start..normalized_chars,
        });
    }

    Ok((normalized, spans))
}

/// Count lines up to a byte position (for error messages).
fn count_lines(input: &str, byte_pos: usize) -> usize {
    input[..byte_pos.min(input.len())]
        .chars()
        .filter(|&c| c == '\n')
        .count()
        + 1
}

/// Parse a full `.nlp` fixture file.
pub fn parse_fixture(input: &str) -> SpecResult<NlpFixture> {
    let mut title = None;
    let mut paragraph_lines: Vec<Vec<&str>> = vec![Vec::new()];
    let mut assertion_lines = Vec::new();

    for (line_num, line) in input.lines().enumerate() {
        let trimmed = line.trim();

        if let Some(header) = trimmed.strip_prefix("# ").filter(|_| title.is_none()) {
            title = Some(header.trim().to_string());
        } else if trimmed == "---" {
            paragraph_lines.push(Vec::new());
        } else if let Some(assertion) = trimmed.strip_prefix("> ") {
            assertion_lines.push((line_num + 1, assertion.trim()));
        } else if !trimmed.is_empty() && !trimmed.starts_with("//") {
            if let Some(last) = paragraph_lines.last_mut() {
                last.push(line);
            }
        }
    }

    let mut paragraphs = Vec::new();
    for (index, lines) in paragraph_lines.into_iter().enumerate() {
        if lines.is_empty() {
            continue;
        }
        let (text, spans) = parse_spans(&lines.join("\n"))?;
        paragraphs.push(Paragraph { index, text, spans });
    }

    let mut assertions = Vec::new();
    for (line_num, assertion_text) in assertion_lines {
        assertions.push(parse_assertion(assertion_text, line_num)?);
    }

    let mut seen = std::collections::HashSet::new();
    for span in paragraphs.iter().flat_map(|p| &p.spans) {
        if !seen.insert(span.id) {
            return Err(SpecError::Parse {
                line: 0,
                message: format!("Duplicate span ID {}", span.id),
            });
        }
    }

    Ok(NlpFixture {
        title,
        paragraphs,
        assertions,
    })
}

/// Parse a single assertion line: `[n]: Type(body)` or `["text"]: Type(body)`.
pub(crate) fn parse_assertion(input: &str, source_line: usize) -> SpecResult<Assertion> {
    let input = input.trim();
    if !input.starts_with('[') {
        return Err(SpecError::Parse {
            line: source_line,
            message: format!("Assertion must start with '[': {}", input),
        });
    }
    let bracket_end = input.find(']').ok_or_else(|| SpecError::Parse {
        line: source_line,
        message: format!("Unclosed bracket in assertion: {}", input),
    })?;
    let target = parse_ref_target(&input[1..bracket_end], source_line)?;

    let rest = input[bracket_end + 1..].trim_start();
    let type_and_body = rest
        .strip_prefix(':')
        .ok_or_else(|| SpecError::Parse {
            line: source_line,
            message: format!("Expected ':' after reference: {}", input),
        })?
        .trim();

    let paren_start = type_and_body.find('(').ok_or_else(|| SpecError::Parse {
        line: source_line,
        message: format!("Expected Type(body) format: {}", type_and_body),
    })?;
    if !type_and_body.ends_with(')') {
        return Err(SpecError::Parse {
            line: source_line,
            message: format!("Unclosed parenthesis: {}", type_and_body),
        });
    }
    let span_type = type_and_body[..paren_start].trim().to_string();
    let body = parse_assertion_body(
        &type_and_body[paren_start + 1..type_and_body.len() - 1],
        source_line,
    )?;

    Ok(Assertion {
        target,
        span_type,
        body,
        source_line,
    })
}

fn parse_ref_target(input: &str, source_line: usize) -> SpecResult<RefTarget> {
    let input = input.trim();

    if let Some(quoted) = input.strip_prefix('"') {
        let end_quote = quoted.find('"').ok_or_else(|| SpecError::Parse {
            line: source_line,
            message: format!("Unclosed quote in text reference: {}", input),
        })?;
        let text = quoted[..end_quote].to_string();
        let occurrence = match quoted[end_quote + 1..].strip_prefix('@') {
            Some(n) => n.parse().map_err(|_| SpecError::Parse {
                line: source_line,
                message: format!("Invalid occurrence index in '{}': expected number", input),
            })?,
            None => 0,
        };
        Ok(RefTarget::TextRef { text, occurrence })
    } else {
        let id: usize = input.parse().map_err(|_| SpecError::Parse {
            line: source_line,
            message: format!("Invalid span reference '{}': expected number", input),
        })?;
        Ok(RefTarget::Span(id))
    }
}

fn parse_assertion_body(input: &str, source_line: usize) -> SpecResult<AssertionBody> {
    let field_checks = input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| parse_field_check(part, source_line))
        .collect::<SpecResult<_>>()?;
    Ok(AssertionBody { field_checks })
}

fn parse_field_check(input: &str, source_line: usize) -> SpecResult<FieldCheck> {
    let (field, operator, expected) = if let Some(pos) = input.find("!=") {
        (&input[..pos], CompareOp::NotEquals, &input[pos + 2..])
    } else if let Some(pos) = input.find("~=") {
        (&input[..pos], CompareOp::Contains, &input[pos + 2..])
    } else if let Some(pos) = input.find('=') {
        (&input[..pos], CompareOp::Equals, &input[pos + 1..])
    } else {
        return Err(SpecError::Parse {
            line: source_line,
            message: format!("Invalid field check '{}': expected 'field=value'", input),
        });
    };

    Ok(FieldCheck {
        field: field.trim().to_string(),
        expected: expected.trim().to_string(),
        operator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_span() {
        let (normalized, spans) = parse_spans("She «1:self-harmed» before.").unwrap();
        assert_eq!(normalized, "She self-harmed before.");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].id, 1);
        assert_eq!(spans[0].text, "self-harmed");
        assert_eq!(spans[0].char_range, 4..15);
    }

    #[test]
    fn test_ranges_count_characters() {
        let (normalized, spans) = parse_spans("Café – «2:overdose»").unwrap();
        assert_eq!(normalized, "Café – overdose");
        assert_eq!(spans[0].char_range, 7..15);
    }

    #[test]
    fn test_parse_assertion() {
        let assertion =
            parse_assertion("[1]: Mention(polarity=NEGATIVE, status!=RELEVANT)", 1).unwrap();
        assert_eq!(assertion.target, RefTarget::Span(1));
        assert_eq!(assertion.span_type, "Mention");
        let checks = &assertion.body.field_checks;
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].field, "polarity");
        assert_eq!(checks[0].expected, "NEGATIVE");
        assert_eq!(checks[0].operator, CompareOp::Equals);
        assert_eq!(checks[1].operator, CompareOp::NotEquals);
        assert_eq!(assertion.to_string(), "[1]: Mention(polarity=NEGATIVE, status!=RELEVANT)");
    }

    #[test]
    fn test_parse_text_ref_with_occurrence() {
        let assertion = parse_assertion("[\"overdose\"@1]: NoMention()", 3).unwrap();
        assert_eq!(
            assertion.target,
            RefTarget::TextRef {
                text: "overdose".to_string(),
                occurrence: 1
            }
        );
        assert!(assertion.body.field_checks.is_empty());
    }

    #[test]
    fn test_parse_fixture() {
        let input = r#"# Past self-harm

She has «1:self-harmed» in the past.

---

// second note
Denies «2:self-harm».

> [1]: Mention(temporality=HISTORICAL)
> [2]: Mention(polarity=NEGATIVE)
"#;
        let fixture = parse_fixture(input).unwrap();
        assert_eq!(fixture.title.as_deref(), Some("Past self-harm"));
        assert_eq!(fixture.paragraphs.len(), 2);
        assert_eq!(fixture.paragraphs[1].index, 1);
        assert_eq!(fixture.paragraphs[1].text, "Denies self-harm.");
        assert_eq!(fixture.spans().len(), 2);
        assert_eq!(fixture.assertions.len(), 2);
        assert_eq!(fixture.assertions[1].source_line, 11);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse_spans("Denies «1:self-harm"), Err(SpecError::Parse { .. })));
        assert!(matches!(parse_spans("«T:named»"), Err(SpecError::Parse { .. })));
        assert!(parse_assertion("§T: Mention()", 1).is_err());
        assert!(parse_assertion("[1] Mention()", 1).is_err());
        assert!(parse_assertion("[1]: Mention(polarity)", 1).is_err());
        assert!(parse_fixture("«1:a» «1:b»").is_err());
    }

    #[test]
    fn test_find_text() {
        let fixture = parse_fixture("An overdose.\n---\nAnother overdose.").unwrap();
        let (para, range) = fixture.find_text("overdose", 1).unwrap();
        assert_eq!(para.index, 1);
        assert_eq!(range, 8..16);
        assert!(fixture.find_text("overdose", 2).is_none());
    }
}
