//! CoNLL-U input.
//!
//! Ten tab-separated columns per token line; sentences end at a blank line.
//! `# newdoc` starts a new document. Multi-word token ranges (`1-2`) and
//! empty nodes (`1.1`) are skipped. The document text is rebuilt from the
//! word forms, honouring `SpaceAfter=No` in the MISC column.

use crate::doc::{Doc, Token};
use crate::errors::ConllError;

struct Row {
    form: String,
    lemma: String,
    upos: String,
    xpos: String,
    head: usize,
    deprel: String,
    negated: bool,
    space_after: bool,
}

fn parse_row(line_no: usize, line: &str) -> Result<Option<Row>, ConllError> {
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() != 10 {
        return Err(ConllError::Parse {
            line: line_no,
            message: format!("expected 10 columns, found {}", cols.len()),
        });
    }
    let id = cols[0];
    if id.contains('-') || id.contains('.') {
        return Ok(None);
    }
    id.parse::<usize>().map_err(|_| ConllError::Parse {
        line: line_no,
        message: format!("invalid token id {:?}", id),
    })?;

    let head = if cols[6] == "_" {
        0
    } else {
        cols[6].parse::<usize>().map_err(|_| ConllError::Parse {
            line: line_no,
            message: format!("invalid head {:?}", cols[6]),
        })?
    };

    let form = cols[1].to_string();
    let lemma = match cols[2] {
        "_" if form != "_" => form.to_lowercase(),
        lemma => lemma.to_string(),
    };
    let placeholder = |value: &str, default: &str| {
        if value == "_" {
            default.to_string()
        } else {
            value.to_string()
        }
    };

    Ok(Some(Row {
        lemma,
        upos: placeholder(cols[3], "X"),
        xpos: placeholder(cols[4], ""),
        head,
        deprel: placeholder(cols[7], "dep"),
        negated: cols[5].split('|').any(|feat| feat == "Polarity=Neg"),
        space_after: !cols[9].split('|').any(|misc| misc == "SpaceAfter=No"),
        form,
    }))
}

#[derive(Default)]
struct DocBuilder {
    text: String,
    tokens: Vec<Token>,
    sent: usize,
    sentence: Vec<Row>,
}

impl DocBuilder {
    fn finish_sentence(&mut self, line_no: usize) -> Result<(), ConllError> {
        if self.sentence.is_empty() {
            return Ok(());
        }
        let rows = std::mem::take(&mut self.sentence);
        let base = self.tokens.len();
        let count = rows.len();

        if let Some(last) = self.tokens.last_mut() {
            if last.whitespace.is_empty() && !self.text.is_empty() {
                // sentences are separated even when the last word had no space
                last.whitespace.push(' ');
                self.text.push(' ');
            }
        }

        for (i, row) in rows.into_iter().enumerate() {
            if row.head > count {
                return Err(ConllError::Parse {
                    line: line_no,
                    message: format!("head {} outside sentence of {} tokens", row.head, count),
                });
            }
            let idx = self.text.len();
            self.text.push_str(&row.form);
            let mut token = Token::new(row.form, idx);
            token.lemma = row.lemma;
            token.pos = row.upos;
            token.tag = row.xpos;
            token.sent = self.sent;
            if row.head == 0 {
                token.head = base + i;
                token.dep = "ROOT".to_string();
            } else {
                token.head = base + row.head - 1;
                token.dep = if row.negated && row.deprel == "advmod" {
                    "neg".to_string()
                } else {
                    row.deprel
                };
            }
            if row.space_after {
                token.whitespace.push(' ');
                self.text.push(' ');
            }
            self.tokens.push(token);
        }
        self.sent += 1;
        Ok(())
    }

    fn finish(mut self, line_no: usize) -> Result<Option<Doc>, ConllError> {
        self.finish_sentence(line_no)?;
        if self.tokens.is_empty() {
            return Ok(None);
        }
        if let Some(last) = self.tokens.last_mut() {
            if !last.whitespace.is_empty() {
                last.whitespace.clear();
                self.text.pop();
            }
        }
        Ok(Some(Doc::new(self.text, self.tokens)?))
    }
}

/// Parse every document in `input`. Without `# newdoc` markers the whole
/// input is one document.
pub fn parse_documents(input: &str) -> Result<Vec<Doc>, ConllError> {
    let mut docs = Vec::new();
    let mut builder = DocBuilder::default();
    let mut line_no = 0;
    for (i, raw) in input.lines().enumerate() {
        line_no = i + 1;
        let line = raw.trim_end_matches('\r');
        if line.starts_with("# newdoc") {
            let finished = std::mem::take(&mut builder);
            docs.extend(finished.finish(line_no)?);
        } else if line.starts_with('#') {
            continue;
        } else if line.trim().is_empty() {
            builder.finish_sentence(line_no)?;
        } else if let Some(row) = parse_row(line_no, line)? {
            builder.sentence.push(row);
        }
    }
    docs.extend(builder.finish(line_no)?);
    Ok(docs)
}

/// Parse `input` as a single document, ignoring `# newdoc` boundaries.
pub fn parse_document(input: &str) -> Result<Doc, ConllError> {
    let merged: String = input
        .lines()
        .filter(|line| !line.starts_with("# newdoc"))
        .map(|line| format!("{}\n", line))
        .collect();
    match parse_documents(&merged)?.pop() {
        Some(doc) => Ok(doc),
        None => Ok(Doc::new(String::new(), Vec::new())?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# newdoc id = note-1
# text = She denies self-harm.
1\tShe\tshe\tPRON\tPRP\t_\t2\tnsubj\t_\t_
2\tdenies\tdeny\tVERB\tVBZ\t_\t0\troot\t_\t_
3\tself-harm\tself-harm\tNOUN\tNN\t_\t2\tobj\t_\tSpaceAfter=No
4\t.\t.\tPUNCT\t.\t_\t2\tpunct\t_\t_

# text = No cuts.
1\tNo\tno\tDET\tDT\t_\t2\tdet\t_\t_
2\tcuts\tcut\tNOUN\tNNS\t_\t0\troot\t_\tSpaceAfter=No
3\t.\t.\tPUNCT\t.\t_\t2\tpunct\t_\t_

# newdoc id = note-2
1\tShe\tshe\tPRON\tPRP\t_\t3\tnsubj\t_\t_
2-3\tdidn't\t_\t_\t_\t_\t_\t_\t_\t_
2\tdid\tdo\tAUX\tVBD\t_\t3\taux\t_\tSpaceAfter=No
3\tn't\tnot\tPART\tRB\tPolarity=Neg\t4\tadvmod\t_\t_
4\tcut\tcut\tVERB\tVB\t_\t0\troot\t_\t_
";

    #[test]
    fn splits_documents_and_sentences() {
        let docs = parse_documents(SAMPLE).unwrap();
        assert_eq!(docs.len(), 2);

        let first = &docs[0];
        assert_eq!(first.text(), "She denies self-harm. No cuts.");
        assert_eq!(first.sents().len(), 2);
        assert_eq!(first[1].dep, "ROOT");
        assert!(first.is_root(1));
        assert_eq!(first[2].head, 1);
        assert_eq!(first[5].head, 5);
        assert_eq!(first[4].head, 5);
        assert_eq!(first[4].sent, 1);
    }

    #[test]
    fn skips_ranges_and_marks_negation() {
        let docs = parse_documents(SAMPLE).unwrap();
        let second = &docs[1];
        assert_eq!(second.text(), "She didn't cut");
        assert_eq!(second.len(), 4);
        assert_eq!(second[2].lemma, "not");
        assert_eq!(second[2].dep, "neg");
        assert_eq!(second[2].head, 3);
    }

    #[test]
    fn single_document_view() {
        let doc = parse_document(SAMPLE).unwrap();
        assert_eq!(doc.len(), 11);
        assert_eq!(doc.sents().len(), 3);
    }

    #[test]
    fn reports_bad_lines() {
        let err = parse_documents("1\tShe\tshe\n").unwrap_err();
        assert!(matches!(err, ConllError::Parse { line: 1, .. }));
    }
}
