//! Multi-format text extraction for uploaded documents.
//!
//! Dispatch is by file extension, resolved once into a
//! [`DocumentFormat`]. Extraction never raises past this module:
//! [`extract`] converts every failure into empty text plus a logged
//! diagnostic, and callers treat empty text as "nothing to index".

use std::io::Read;
use std::path::Path;

/// Maximum decompressed bytes to read from a single ZIP entry (zip-bomb
/// protection).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Supported document formats, resolved from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
    Unsupported,
}

impl DocumentFormat {
    /// Resolve a path's format from its extension, case-insensitively.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => Self::Pdf,
            Some("docx") => Self::Docx,
            Some("txt") => Self::Txt,
            _ => Self::Unsupported,
        }
    }

    pub fn is_supported(self) -> bool {
        self != Self::Unsupported
    }
}

/// Extraction error. Non-fatal to callers: the public [`extract`] entry
/// point converts every variant into empty text plus a diagnostic.
#[derive(Debug)]
pub enum ExtractError {
    UnsupportedFormat(String),
    Io(std::io::Error),
    Pdf(String),
    Docx(String),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::UnsupportedFormat(ext) => {
                write!(f, "unsupported file format: .{}", ext)
            }
            ExtractError::Io(e) => write!(f, "file read failed: {}", e),
            ExtractError::Pdf(e) => write!(f, "PDF extraction failed: {}", e),
            ExtractError::Docx(e) => write!(f, "DOCX extraction failed: {}", e),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<std::io::Error> for ExtractError {
    fn from(e: std::io::Error) -> Self {
        ExtractError::Io(e)
    }
}

/// Extract plain text from `path`, degrading every failure to empty text
/// with a logged diagnostic.
pub fn extract(path: &Path) -> String {
    match try_extract(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("extraction failed for {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Extract plain text from `path`, or report why it could not be done.
pub fn try_extract(path: &Path) -> Result<String, ExtractError> {
    match DocumentFormat::from_path(path) {
        DocumentFormat::Pdf => extract_pdf(&std::fs::read(path)?),
        DocumentFormat::Docx => extract_docx(&std::fs::read(path)?),
        DocumentFormat::Txt => Ok(extract_txt(std::fs::read(path)?)),
        DocumentFormat::Unsupported => Err(ExtractError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string(),
        )),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract emits page texts in page order, newline-separated.
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// Decode as UTF-8, falling back to Latin-1 for legacy exports. A Latin-1
/// byte maps to the Unicode scalar of the same value, so the fallback
/// cannot fail.
fn extract_txt(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| ExtractError::Docx(e.to_string()))?;
    let entry = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(e.to_string()))?;
    let mut doc_xml = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut doc_xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;
    if doc_xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(ExtractError::Docx(
            "word/document.xml exceeds size limit".to_string(),
        ));
    }
    paragraphs_from_document_xml(&doc_xml)
}

/// Collect `w:t` text runs, joining paragraphs (`w:p`) with newlines.
fn paragraphs_from_document_xml(xml: &[u8]) -> Result<String, ExtractError> {
    let mut out = String::new();
    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    if let Ok(quick_xml::events::Event::Text(te)) = reader.read_event_into(&mut buf)
                    {
                        out.push_str(te.unescape().unwrap_or_default().as_ref());
                    }
                }
            }
            Ok(quick_xml::events::Event::End(e)) => {
                if e.local_name().as_ref() == b"p" && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(ExtractError::Docx(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(out.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            let body = paragraphs
                .iter()
                .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
                .collect::<String>();
            let xml = format!(
                "<?xml version=\"1.0\"?><w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}</w:body></w:document>",
                body
            );
            zip.write_all(xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_format_resolution() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.pdf")), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_path(Path::new("a.DOCX")), DocumentFormat::Docx);
        assert_eq!(DocumentFormat::from_path(Path::new("dir/a.txt")), DocumentFormat::Txt);
        assert_eq!(DocumentFormat::from_path(Path::new("a.png")), DocumentFormat::Unsupported);
        assert_eq!(DocumentFormat::from_path(Path::new("noext")), DocumentFormat::Unsupported);
    }

    #[test]
    fn test_unsupported_extension_degrades_to_empty() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("image.png");
        std::fs::write(&path, b"not text").unwrap();

        let err = try_extract(&path).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
        assert_eq!(extract(&path), "");
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        assert_eq!(extract(Path::new("/nonexistent/file.txt")), "");
    }

    #[test]
    fn test_txt_utf8() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, "Plain UTF-8 text with é.").unwrap();
        assert_eq!(extract(&path), "Plain UTF-8 text with é.");
    }

    #[test]
    fn test_txt_latin1_fallback() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("legacy.txt");
        // "café" encoded as Latin-1: the 0xE9 byte is invalid UTF-8.
        std::fs::write(&path, b"caf\xe9").unwrap();
        assert_eq!(extract(&path), "café");
    }

    #[test]
    fn test_empty_txt_yields_empty_string() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();
        assert_eq!(extract(&path), "");
    }

    #[test]
    fn test_invalid_pdf_reports_error() {
        let err = extract_pdf(b"not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[test]
    fn test_invalid_docx_reports_error() {
        let err = extract_docx(b"not a zip").unwrap_err();
        assert!(matches!(err, ExtractError::Docx(_)));
    }

    #[test]
    fn test_docx_paragraphs_joined_by_newline() {
        let bytes = docx_bytes(&["First paragraph.", "Second paragraph."]);
        let text = extract_docx(&bytes).unwrap();
        assert_eq!(text, "First paragraph.\nSecond paragraph.");
    }

    #[test]
    fn test_docx_missing_document_xml_reports_error() {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            zip.start_file("other.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"<x/>").unwrap();
            zip.finish().unwrap();
        }
        let err = extract_docx(&buf).unwrap_err();
        assert!(matches!(err, ExtractError::Docx(_)));
    }
}
