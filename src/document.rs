use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::DocumentError;

/// What the document source handed over. `NoInput` is a normal outcome,
/// unlike a read failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Text(String),
    NoInput,
}

/// Reads the article at `path` (`-` for stdin) and keeps its non-blank
/// paragraphs, one per line. Files ending in `.docx` are read as Word
/// documents, anything else as UTF-8 text. `None`, or a document with
/// nothing but blank paragraphs, yields [`Document::NoInput`].
pub fn load(path: Option<&Path>) -> Result<Document, DocumentError> {
    let Some(path) = path else { return Ok(Document::NoInput) };
    if is_docx(path) {
        return Ok(from_text(&docx_paragraphs(path)?.join("\n")));
    }
    let bytes = if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)
            .map_err(|source| DocumentError::Io { path: PathBuf::from("<stdin>"), source })?;
        buf
    } else {
        std::fs::read(path).map_err(|source| DocumentError::Io { path: path.to_path_buf(), source })?
    };
    let raw = String::from_utf8(bytes).map_err(|_| DocumentError::Encoding { path: path.to_path_buf() })?;
    Ok(from_text(&raw))
}

pub fn from_text(raw: &str) -> Document {
    let text = paragraphs(raw).join("\n");
    if text.is_empty() { Document::NoInput } else { Document::Text(text) }
}

fn paragraphs(raw: &str) -> Vec<&str> {
    raw.lines().filter(|l| !l.trim().is_empty()).collect()
}

fn is_docx(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("docx"))
}

fn docx_paragraphs(path: &Path) -> Result<Vec<String>, DocumentError> {
    let io_err = |source| DocumentError::Io { path: path.to_path_buf(), source };
    let archive_err = |source| DocumentError::Archive { path: path.to_path_buf(), source };

    let file = File::open(path).map_err(io_err)?;
    let mut archive = zip::ZipArchive::new(file).map_err(archive_err)?;
    let mut xml = String::new();
    archive.by_name("word/document.xml").map_err(archive_err)?
        .read_to_string(&mut xml).map_err(io_err)?;

    body_paragraphs(&xml).map_err(|source| DocumentError::Markup { path: path.to_path_buf(), source })
}

/// Text of each `<w:p>` in a WordprocessingML body: runs concatenated,
/// `<w:tab/>` as a tab, `<w:br/>`/`<w:cr/>` as a newline.
fn body_paragraphs(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paras = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paras.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                b"w:p" => paras.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paras)
}
