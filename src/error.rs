//! Error types for the outpdf library.

use std::io;
use thiserror::Error;

/// Result type alias for outpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during outline extraction.
///
/// Absence of structure is never an error: a document with no detectable
/// headings or title yields an empty [`Outline`](crate::model::Outline).
/// Only inability to read the input at all is reported.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted; encrypted documents are not processed.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Document exceeds the configured page limit (batch boundary).
    #[error("Document has {0} pages, exceeding the limit of {1}")]
    PageLimitExceeded(u32, u32),

    /// Error serializing the outline.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
