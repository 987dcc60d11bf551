//! File-kind detection and per-format text extraction.

use crate::error::{ExtractError, Result};
use regex::Regex;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

/// Supported document formats, detected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    /// Detect the document kind from the path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => Ok(Self::Pdf),
            Some("docx") => Ok(Self::Docx),
            Some("txt") => Ok(Self::Text),
            _ => Err(ExtractError::UnsupportedFileType { extension }),
        }
    }
}

/// Extract the plain text of a document, dispatching on its extension.
///
/// The result is trimmed but otherwise untouched; empty output means the
/// document had no extractable text (image-only PDFs, for example) and is
/// left for the caller's short-document guard to report.
pub async fn extract_text(path: &Path) -> Result<String> {
    let kind = DocumentKind::from_path(path)?;
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!(
        "Extracting text from {} ({} bytes, {:?})",
        path.display(),
        bytes.len(),
        kind
    );

    let text = match kind {
        // The PDF parser is CPU-bound, so it runs off the async runtime.
        DocumentKind::Pdf => {
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await??
        }
        DocumentKind::Docx => {
            tokio::task::spawn_blocking(move || extract_docx_text(&bytes)).await??
        }
        DocumentKind::Text => String::from_utf8_lossy(&bytes).into_owned(),
    };

    Ok(text.trim().to_string())
}

fn paragraph_close_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</w:p>").expect("static pattern"))
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("static pattern"))
}

/// Pull the document body out of the DOCX zip container and strip its XML
/// markup, keeping paragraph boundaries as newlines.
fn extract_docx_text(bytes: &[u8]) -> Result<String> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor)
        .map_err(|e| ExtractError::Docx {
            message: format!("not a DOCX container: {e}"),
        })?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx {
            message: format!("missing word/document.xml: {e}"),
        })?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx {
            message: format!("unreadable document body: {e}"),
        })?;

    let with_breaks = paragraph_close_regex().replace_all(&xml, "\n");
    let stripped = tag_regex().replace_all(&with_breaks, "");
    Ok(decode_basic_entities(&stripped))
}

/// Decode the XML entities that appear in WordprocessingML text runs.
fn decode_basic_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_kind_detection() {
        assert_eq!(
            DocumentKind::from_path(Path::new("policy.pdf")).unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("POLICY.DOCX")).unwrap(),
            DocumentKind::Docx
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("notes.txt")).unwrap(),
            DocumentKind::Text
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let err = DocumentKind::from_path(Path::new("slides.pptx")).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::UnsupportedFileType { extension: Some(ref e) } if e == "pptx"
        ));

        let err = DocumentKind::from_path(Path::new("no_extension")).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::UnsupportedFileType { extension: None }
        ));
    }

    #[tokio::test]
    async fn test_extract_plain_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "  Clause A: everything is covered.  \n").unwrap();

        let text = extract_text(&path).await.unwrap();
        assert_eq!(text, "Clause A: everything is covered.");
    }

    #[tokio::test]
    async fn test_extract_missing_file_is_io_error() {
        let err = extract_text(Path::new("/nonexistent/doc.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }

    #[tokio::test]
    async fn test_extract_docx_from_minimal_container() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.docx");

        let file = std::fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("word/document.xml", zip::write::FileOptions::default())
            .unwrap();
        writer
            .write_all(
                b"<w:document><w:body>\
                  <w:p><w:r><w:t>Clause A: free &amp; covered.</w:t></w:r></w:p>\
                  <w:p><w:r><w:t>Clause B: up to $500.</w:t></w:r></w:p>\
                  </w:body></w:document>",
            )
            .unwrap();
        writer.finish().unwrap();

        let text = extract_text(&path).await.unwrap();
        assert_eq!(text, "Clause A: free & covered.\nClause B: up to $500.");
    }

    #[tokio::test]
    async fn test_extract_corrupt_docx() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.docx");
        std::fs::write(&path, b"definitely not a zip").unwrap();

        let err = extract_text(&path).await.unwrap_err();
        assert!(matches!(err, ExtractError::Docx { .. }));
    }
}
