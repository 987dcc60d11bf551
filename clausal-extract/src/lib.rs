//! Text extraction for uploaded documents.
//!
//! Converts an uploaded PDF, DOCX, or plain-text file into a single plain-text
//! string for the retrieval pipeline. The file kind is detected from the
//! extension; extraction is a pure function of the file bytes with no
//! normalization beyond trimming.
//!
//! ```no_run
//! use clausal_extract::extract_text;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), clausal_extract::ExtractError> {
//! let text = extract_text(Path::new("policy.pdf")).await?;
//! println!("{} characters extracted", text.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extractor;

pub use error::{ExtractError, Result};
pub use extractor::{DocumentKind, extract_text};
