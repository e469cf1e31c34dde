//! Outline types: the normalized result of inference.

use serde::{Deserialize, Serialize};

/// Heading depth. The outline is capped at three levels; deeper structure
/// in source metadata is clamped to [`HeadingLevel::H3`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Map a 1-based numeric level to a heading level, clamping depths
    /// beyond 3 into H3.
    pub fn from_depth(depth: u32) -> Self {
        match depth {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadingLevel::H1 => write!(f, "H1"),
            HeadingLevel::H2 => write!(f, "H2"),
            HeadingLevel::H3 => write!(f, "H3"),
        }
    }
}

/// A span judged likely to be a section heading.
///
/// `font_size` is carried for level-monotonicity checks and diagnostics but
/// does not appear in serialized output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingCandidate {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
    #[serde(skip)]
    pub font_size: f32,
}

impl HeadingCandidate {
    /// Create a new heading candidate.
    pub fn new(text: impl Into<String>, level: HeadingLevel, page: u32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            level,
            page,
            font_size,
        }
    }
}

/// The normalized hierarchical outline of one document.
///
/// Serializes as `{"title": ..., "outline": [{"level", "text", "page"}]}`.
/// Headings are ordered by page, then by vertical position within the page
/// (top of page first). The title never appears in the heading list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Document title; empty when no plausible title was found
    pub title: String,
    /// Ordered heading sequence
    #[serde(rename = "outline")]
    pub headings: Vec<HeadingCandidate>,
}

impl Outline {
    /// Create an outline from a title and headings.
    pub fn new(title: impl Into<String>, headings: Vec<HeadingCandidate>) -> Self {
        Self {
            title: title.into(),
            headings,
        }
    }

    /// True when neither a title nor any heading was found.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.headings.is_empty()
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.headings.len()
    }
}

/// One entry of a document's embedded table of contents, as flattened from
/// the PDF bookmark tree in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Nesting depth, 1-based
    pub level: u32,
    /// Entry label
    pub text: String,
    /// Destination page (1-indexed), if the destination resolved
    pub page: Option<u32>,
}

impl TocEntry {
    /// Create a new TOC entry.
    pub fn new(level: u32, text: impl Into<String>, page: Option<u32>) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_depth_clamps() {
        assert_eq!(HeadingLevel::from_depth(1), HeadingLevel::H1);
        assert_eq!(HeadingLevel::from_depth(2), HeadingLevel::H2);
        assert_eq!(HeadingLevel::from_depth(3), HeadingLevel::H3);
        assert_eq!(HeadingLevel::from_depth(7), HeadingLevel::H3);
    }

    #[test]
    fn test_outline_serialization_shape() {
        let outline = Outline::new(
            "Sample Report",
            vec![HeadingCandidate::new(
                "Introduction",
                HeadingLevel::H1,
                1,
                18.0,
            )],
        );
        let json = serde_json::to_string(&outline).unwrap();
        assert!(json.contains("\"title\":\"Sample Report\""));
        assert!(json.contains("\"outline\":["));
        assert!(json.contains("\"level\":\"H1\""));
        assert!(json.contains("\"page\":1"));
        // font_size is an internal detail
        assert!(!json.contains("font_size"));
    }

    #[test]
    fn test_empty_outline() {
        let outline = Outline::default();
        assert!(outline.is_empty());
        let json = serde_json::to_string(&outline).unwrap();
        assert_eq!(json, "{\"title\":\"\",\"outline\":[]}");
    }
}
