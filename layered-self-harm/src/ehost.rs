//! eHOST (knowtator XML) output.
//!
//! An eHOST project keeps its source notes under `corpus/` and annotation
//! files under `saved/`, named after the note with a `.txt.knowtator.xml`
//! extension.

use crate::errors::XmlError;
use crate::mapper::{mention_id, MentionRecord, Mentions};
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Component, Path, PathBuf};

pub const EXTENSION: &str = ".txt.knowtator.xml";
pub const ERROR_LOG: &str = "batch_err.log";
const FIRST_SLOT_ID: usize = 1000;

/// Where the annotation file for `input` goes: the `corpus` directory
/// component becomes `saved`, the extension becomes `.txt.knowtator.xml`.
pub fn output_path(input: &Path) -> PathBuf {
    let mut path = PathBuf::new();
    for component in input.components() {
        match component {
            Component::Normal(name) if name == "corpus" => path.push("saved"),
            other => path.push(other.as_os_str()),
        }
    }
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.set_file_name(format!("{}{}", stem, EXTENSION));
    path
}

/// The `textSource` attribute: the note's file name with a `.txt` extension.
pub fn text_source(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = name.trim_end_matches(".knowtator.xml");
    let stem = Path::new(name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}.txt", stem)
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\u{9}' | '\u{A}' | '\u{D}')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

/// Fails on the first character XML 1.0 cannot represent.
pub fn check_chars(xml: &str) -> Result<(), XmlError> {
    match xml.char_indices().find(|(_, c)| !is_xml_char(*c)) {
        Some((offset, c)) => Err(XmlError::InvalidChar {
            code: c as u32,
            offset,
        }),
        None => Ok(()),
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    fn new() -> Self {
        XmlWriter {
            out: String::from("<?xml version=\"1.0\" ?>\n"),
            depth: 0,
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push('\t');
        }
    }

    fn attrs(&mut self, attrs: &[(&str, &str)]) {
        for (name, value) in attrs {
            let _ = write!(self.out, " {}=\"{}\"", name, escape(value));
        }
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.indent();
        self.out.push('<');
        self.out.push_str(name);
        self.attrs(attrs);
        self.out.push_str(">\n");
        self.depth += 1;
    }

    fn close(&mut self, name: &str) {
        self.depth -= 1;
        self.indent();
        let _ = writeln!(self.out, "</{}>", name);
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.indent();
        self.out.push('<');
        self.out.push_str(name);
        self.attrs(attrs);
        self.out.push_str("/>\n");
    }

    fn text(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) {
        self.indent();
        self.out.push('<');
        self.out.push_str(name);
        self.attrs(attrs);
        let _ = writeln!(self.out, ">{}</{}>", escape(text), name);
    }
}

fn slots(record: &MentionRecord) -> [(&'static str, &str); 4] {
    [
        ("polarity", record.polarity.as_str()),
        ("status", record.status.as_str()),
        ("temporality", record.temporality.as_str()),
        ("dsh_type", record.dsh_type.as_str()),
    ]
}

/// Render the knowtator XML for one document. `created` fills every
/// `creationDate` element.
pub fn render(text_source: &str, mentions: &Mentions, created: &str) -> String {
    let mut xml = XmlWriter::new();
    xml.open("annotations", &[("textSource", text_source)]);
    let mut slot_id = FIRST_SLOT_ID;
    for (n, record) in mentions.iter().enumerate() {
        let id = mention_id(n + 1);
        let start = record.start.to_string();
        let end = record.end.to_string();

        xml.open("annotation", &[]);
        xml.empty("mention", &[("id", id.as_str())]);
        xml.text("annotator", &[("id", "eHOST_2010")], &record.annotator);
        xml.text("spannedText", &[], &record.text);
        if let Some(comment) = &record.comment {
            xml.text("annotationComment", &[], comment);
        }
        xml.text("creationDate", &[], created);
        xml.empty("span", &[("start", start.as_str()), ("end", end.as_str())]);
        xml.close("annotation");

        let slot_ids: Vec<String> = (0..4).map(|k| mention_id(slot_id + k)).collect();
        xml.open("classMention", &[("id", id.as_str())]);
        xml.text("mentionClass", &[("id", record.class.as_str())], &record.text);
        for slot in &slot_ids {
            xml.empty("hasSlotMention", &[("id", slot.as_str())]);
        }
        xml.close("classMention");

        for (slot, (name, value)) in slot_ids.iter().zip(slots(record)) {
            xml.open("stringSlotMention", &[("id", slot.as_str())]);
            xml.empty("mentionSlot", &[("id", name)]);
            xml.empty("stringSlotMentionValue", &[("value", value)]);
            xml.close("stringSlotMention");
        }
        slot_id += slot_ids.len();
    }

    xml.open("eHOST_Adjudication_Status", &[("version", "1.0")]);
    xml.empty("Adjudication_Selected_Annotators", &[("version", "1.0")]);
    xml.empty("Adjudication_Selected_Classes", &[("version", "1.0")]);
    xml.open("Adjudication_Others", &[]);
    for check in [
        "CHECK_OVERLAPPED_SPANS",
        "CHECK_ATTRIBUTES",
        "CHECK_RELATIONSHIP",
        "CHECK_CLASS",
        "CHECK_COMMENT",
    ] {
        xml.text(check, &[], "false");
    }
    xml.close("Adjudication_Others");
    xml.close("eHOST_Adjudication_Status");
    xml.close("annotations");
    xml.out
}

/// The eHOST document built for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EhostFile {
    pub path: PathBuf,
    pub xml: String,
    /// False when the document held characters XML cannot represent; the
    /// failure is recorded in [`ERROR_LOG`] instead.
    pub written: bool,
}

fn creation_date() -> String {
    chrono::Local::now()
        .format("%a %b %d %H:%M:%S %Z %Y")
        .to_string()
}

fn log_failure(output: &Path, err: &XmlError) -> Result<(), XmlError> {
    let log_path = output
        .parent()
        .map_or_else(|| PathBuf::from(ERROR_LOG), |dir| dir.join(ERROR_LOG));
    let mut log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|source| XmlError::Write {
            path: log_path.clone(),
            source,
        })?;
    writeln!(log, "Unable to create XML file: {} ({})", output.display(), err).map_err(|source| {
        XmlError::Write {
            path: log_path.clone(),
            source,
        }
    })
}

/// Render and save the annotation file for `input`.
pub fn write_ehost_output(input: &Path, mentions: &Mentions) -> Result<EhostFile, XmlError> {
    let path = output_path(input);
    let xml = render(&text_source(input), mentions, &creation_date());

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| XmlError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    if let Err(err) = check_chars(&xml) {
        log::error!("unable to create XML file {}: {}", path.display(), err);
        log_failure(&path, &err)?;
        return Ok(EhostFile {
            path,
            xml,
            written: false,
        });
    }

    std::fs::write(&path, &xml).map_err(|source| XmlError::Write {
        path: path.clone(),
        source,
    })?;
    log::debug!("wrote eHOST file {}", path.display());
    Ok(EhostFile {
        path,
        xml,
        written: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{Polarity, Status, Temporality};

    fn record(text: &str, start: usize) -> MentionRecord {
        MentionRecord {
            id: String::new(),
            annotator: "SYSTEM".to_string(),
            class: "SELF-HARM".to_string(),
            comment: None,
            start,
            end: start + text.chars().count(),
            text: text.to_string(),
            dsh_type: "OVERDOSE".to_string(),
            polarity: Polarity::Negative,
            status: Status::NonRelevant,
            temporality: Temporality::Current,
        }
    }

    #[test]
    fn output_paths() {
        assert_eq!(
            output_path(Path::new("project/corpus/note_01.txt")),
            PathBuf::from("project/saved/note_01.txt.knowtator.xml")
        );
        assert_eq!(
            output_path(Path::new("notes/a.txt")),
            PathBuf::from("notes/a.txt.knowtator.xml")
        );
        assert_eq!(text_source(Path::new("project/corpus/note_01.txt")), "note_01.txt");
    }

    #[test]
    fn slots_and_adjudication_block() {
        let mentions = Mentions(vec![record("overdose", 4), record("OD & cut", 20)]);
        let xml = render("note.txt", &mentions, "Mon Jan 01 00:00:00 UTC 2024");

        assert!(xml.starts_with("<?xml version=\"1.0\" ?>\n<annotations textSource=\"note.txt\">"));
        assert!(xml.contains("<mention id=\"EHOST_Instance_2\"/>"));
        assert!(xml.contains("<span start=\"4\" end=\"12\"/>"));
        assert!(xml.contains("<spannedText>OD &amp; cut</spannedText>"));
        assert!(xml.contains("<hasSlotMention id=\"EHOST_Instance_1000\"/>"));
        assert!(xml.contains("<stringSlotMention id=\"EHOST_Instance_1007\">"));
        assert!(xml.contains("<stringSlotMentionValue value=\"NON-RELEVANT\"/>"));
        assert!(xml.contains("<mentionSlot id=\"dsh_type\"/>"));
        assert!(xml.contains("<CHECK_COMMENT>false</CHECK_COMMENT>"));
        assert!(xml.ends_with("</annotations>\n"));
        assert!(check_chars(&xml).is_ok());
    }

    #[test]
    fn invalid_characters_are_logged_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("corpus").join("note.txt");
        let mentions = Mentions(vec![record("over\u{1}dose", 0)]);

        let file = write_ehost_output(&input, &mentions).unwrap();
        assert!(!file.written);
        assert!(!file.path.exists());
        let log = std::fs::read_to_string(dir.path().join("saved").join(ERROR_LOG)).unwrap();
        assert!(log.contains("note.txt.knowtator.xml"));
        assert!(log.contains("U+0001"));
    }

    #[test]
    fn writes_into_saved_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("corpus").join("note.txt");
        let file = write_ehost_output(&input, &Mentions(vec![record("overdose", 0)])).unwrap();
        assert!(file.written);
        assert_eq!(file.path, dir.path().join("saved").join("note.txt.knowtator.xml"));
        assert_eq!(std::fs::read_to_string(&file.path).unwrap(), file.xml);
    }
}
