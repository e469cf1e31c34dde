//! Data model for outline extraction.
//!
//! These types bridge the span extraction boundary and the inference core:
//! positioned text spans in, a normalized title + heading hierarchy out.

mod metadata;
mod outline;
mod span;

pub use metadata::Metadata;
pub(crate) use metadata::parse_pdf_date;
pub use outline::{HeadingCandidate, HeadingLevel, Outline, TocEntry};
pub use span::{BBox, TextSpan};
