//! Uploaded CV handling: file type detection, text extraction and content
//! hashing. Only PDF and DOCX are accepted.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported file type: {0} (only .pdf and .docx are accepted)")]
    UnsupportedType(String),

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not read DOCX: {0}")]
    Docx(String),

    #[error("no text could be extracted from {0}")]
    Empty(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Detects the kind from the file extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }
}

pub fn is_allowed_file(filename: &str) -> bool {
    DocumentKind::from_filename(filename).is_some()
}

/// Hex-encoded SHA-256 of the raw file bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Extracts plain text from an uploaded file. Blocking; run it on the
/// blocking pool.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, DocumentError> {
    let kind = DocumentKind::from_filename(filename)
        .ok_or_else(|| DocumentError::UnsupportedType(filename.to_string()))?;

    let text = match kind {
        DocumentKind::Pdf => pdf_text(bytes)?,
        DocumentKind::Docx => docx_text(bytes)?,
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(DocumentError::Empty(filename.to_string()));
    }
    Ok(text)
}

fn pdf_text(bytes: &[u8]) -> Result<String, DocumentError> {
    // pdf-extract panics on some malformed inputs.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(DocumentError::Pdf(e.to_string())),
        Err(_) => Err(DocumentError::Pdf("parser panicked".to_string())),
    }
}

fn docx_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| DocumentError::Docx(e.to_string()))?;
    let mut entry = archive
        .by_name("word/document.xml")
        .map_err(|e| DocumentError::Docx(e.to_string()))?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| DocumentError::Docx(e.to_string()))?;

    wordml_text(&xml)
}

/// Collects the text runs (`<w:t>`) of a WordprocessingML body. Paragraph
/// ends and `<w:br/>` become newlines, `<w:tab/>` becomes a tab.
fn wordml_text(xml: &str) -> Result<String, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_run = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:br" | b"w:cr" => out.push('\n'),
                b"w:tab" => out.push('\t'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_run => {
                let text = t.unescape().map_err(|e| DocumentError::Docx(e.to_string()))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocumentError::Docx(e.to_string())),
            _ => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
pub mod testing {
    use std::io::{Cursor, Write};

    /// A minimal DOCX archive whose body is the given WordprocessingML.
    pub fn docx_with_body(body: &str) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("word/document.xml", options).unwrap();
            write!(
                writer,
                r#"<?xml version="1.0" encoding="UTF-8"?><w:document><w:body>{body}</w:body></w:document>"#
            )
            .unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    pub fn docx_with_text(text: &str) -> Vec<u8> {
        docx_with_body(&format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>"))
    }
}
