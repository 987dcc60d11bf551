//! Error types for document text extraction.

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Failures while turning an uploaded file into plain text.
///
/// Extraction errors never escape the pipeline as panics: the caller renders
/// them as readable `[Error ...]` messages.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The file extension is not one of pdf, docx, or txt.
    #[error("Unsupported file type: {extension:?}")]
    UnsupportedFileType { extension: Option<String> },

    /// Reading the file from disk failed.
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// The PDF parser rejected the document.
    #[error("Error extracting PDF: {source}")]
    Pdf {
        #[from]
        source: pdf_extract::OutputError,
    },

    /// The DOCX container was missing or malformed.
    #[error("Error extracting DOCX: {message}")]
    Docx { message: String },

    /// Blocking extraction task failed to join.
    #[error("Async task failed: {source}")]
    AsyncTask {
        #[from]
        source: tokio::task::JoinError,
    },
}
