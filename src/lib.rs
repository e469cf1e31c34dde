//! # outpdf
//!
//! Document outline extraction for Rust: turn a PDF into a normalized
//! title + heading hierarchy (H1/H2/H3 with page numbers) as JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use outpdf::{extract_outline, render, JsonFormat};
//!
//! fn main() -> outpdf::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!     println!("{}", render::to_json(&outline, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## How it works
//!
//! - **Embedded TOC first**: a structurally valid bookmark tree is trusted
//!   and mapped directly to the outline.
//! - **Typography fallback**: otherwise body text size is estimated from a
//!   character-weighted font histogram, larger sizes become heading level
//!   candidates, and spans are classified by size, weight, and position.
//! - **Noise filtering**: URLs, form labels, bare numbers, and decorative
//!   text never become headings, however large they are set.
//!
//! Absence of structure is a valid result: documents with no detectable
//! title or headings produce an empty outline, not an error.

pub mod analyze;
pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use analyze::{
    build_from_style, clean_text, decide_from_toc, extract_title, infer_outline, parse_to_outline,
    FallbackReason, FontProfile, NoiseFilter, OutlineConfig, TocDecision,
};
pub use batch::{process_dir, process_file, BatchOptions, BatchSummary};
pub use error::{Error, Result};
pub use model::{BBox, HeadingCandidate, HeadingLevel, Metadata, Outline, TextSpan, TocEntry};
pub use parser::PdfParser;
pub use render::{to_json, JsonFormat};

use std::path::Path;

/// Extract the outline of a PDF file with default configuration.
///
/// # Example
///
/// ```no_run
/// use outpdf::extract_outline;
///
/// let outline = extract_outline("document.pdf").unwrap();
/// println!("{} ({} headings)", outline.title, outline.headings.len());
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<Outline> {
    extract_outline_with_config(path, &OutlineConfig::default())
}

/// Extract the outline of a PDF file with a custom configuration.
///
/// # Example
///
/// ```no_run
/// use outpdf::{extract_outline_with_config, OutlineConfig};
///
/// let config = OutlineConfig::new().with_max_heading_words(10);
/// let outline = extract_outline_with_config("document.pdf", &config).unwrap();
/// ```
pub fn extract_outline_with_config<P: AsRef<Path>>(
    path: P,
    config: &OutlineConfig,
) -> Result<Outline> {
    let parser = PdfParser::open(path)?;
    Ok(parse_to_outline(&parser, config))
}

/// Extract the outline of a PDF held in memory.
pub fn extract_outline_from_bytes(data: &[u8]) -> Result<Outline> {
    let parser = PdfParser::from_bytes(data)?;
    Ok(parse_to_outline(&parser, &OutlineConfig::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_outline_from_bytes_rejects_non_pdf() {
        let result = extract_outline_from_bytes(b"definitely not a pdf");
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_outline_missing_file() {
        let result = extract_outline("/nonexistent/path/document.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_public_config_roundtrip() {
        let config = OutlineConfig::new().with_bold_size_ratio(1.25);
        assert!((config.bold_size_ratio - 1.25).abs() < f32::EPSILON);
    }
}
