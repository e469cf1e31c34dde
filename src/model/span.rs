//! Positioned text spans, as produced by the span extraction boundary.

/// An axis-aligned bounding box in page coordinates (PDF convention:
/// origin bottom-left, y increases upward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Bottom edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Horizontal extent.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Vertical extent.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A contiguous run of text sharing uniform font attributes.
///
/// Spans are immutable and request-scoped: produced fresh per extraction
/// run, consumed by the analyzer, never persisted.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Font size in points (effective, after text matrix scaling)
    pub font_size: f32,
    /// Whether the font appears to be bold
    pub is_bold: bool,
    /// Bounding box in page coordinates
    pub bbox: BBox,
    /// Page number (1-indexed)
    pub page: u32,
    /// Opaque line grouping key, unique per (page, visual line)
    pub line_id: u32,
}

impl TextSpan {
    /// Create a new span. Boldness defaults to false and the line id to 0;
    /// use the builder methods to adjust.
    pub fn new(text: impl Into<String>, font_size: f32, page: u32, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            font_size,
            is_bold: false,
            bbox,
            page,
            line_id: 0,
        }
    }

    /// Mark the span as bold.
    pub fn bold(mut self) -> Self {
        self.is_bold = true;
        self
    }

    /// Set the line grouping key.
    pub fn with_line(mut self, line_id: u32) -> Self {
        self.line_id = line_id;
        self
    }

    /// Baseline-ish vertical position used for top-down ordering.
    pub fn y(&self) -> f32 {
        self.bbox.y0
    }

    /// Infer boldness from a PDF base font name.
    pub fn bold_from_font_name(font_name: &str) -> bool {
        let lower = font_name.to_lowercase();
        lower.contains("bold") || lower.contains("black") || lower.contains("heavy")
    }
}
