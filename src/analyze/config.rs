//! Heuristic thresholds as configuration.
//!
//! Every tunable of the inference engine lives here as a named field, so
//! classification behavior can be tuned and tested without touching the
//! classifiers themselves. Defaults were validated against a mixed corpus
//! of reports, forms, and flyers.

/// Configuration for outline inference.
#[derive(Debug, Clone)]
pub struct OutlineConfig {
    /// Minimum size ratio over body text for a non-bold span to qualify as
    /// a heading. Bold spans qualify at any candidate size.
    pub bold_size_ratio: f32,

    /// Maximum symbol-to-alphanumeric character ratio before text is
    /// treated as noise.
    pub max_symbol_ratio: f32,

    /// Minimum trimmed length for heading text, in characters.
    pub min_heading_chars: usize,

    /// Maximum plausible heading length, in characters.
    pub max_heading_chars: usize,

    /// Maximum word count for a style-derived heading; longer runs are
    /// paragraph text, not headings.
    pub max_heading_words: usize,

    /// Minimum fraction of its line's horizontal extent a span must cover
    /// to count as a standalone line (unless it is the sole span).
    pub line_coverage_ratio: f32,

    /// Fraction of the page height at the top treated as the running
    /// header band and excluded from title extraction.
    pub header_band_ratio: f32,

    /// Maximum vertical gap between consecutive title lines, as a multiple
    /// of the font size, for them to merge into one multi-line title.
    pub title_line_gap_factor: f32,

    /// How many distinct font sizes title extraction tries (largest first)
    /// before giving up and reporting an empty title.
    pub title_max_attempts: usize,
}

impl OutlineConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bold/size qualification ratio.
    pub fn with_bold_size_ratio(mut self, ratio: f32) -> Self {
        self.bold_size_ratio = ratio;
        self
    }

    /// Set the maximum symbol ratio for the noise filter.
    pub fn with_max_symbol_ratio(mut self, ratio: f32) -> Self {
        self.max_symbol_ratio = ratio;
        self
    }

    /// Set the heading length bounds in characters.
    pub fn with_heading_chars(mut self, min: usize, max: usize) -> Self {
        self.min_heading_chars = min;
        self.max_heading_chars = max;
        self
    }

    /// Set the maximum heading word count.
    pub fn with_max_heading_words(mut self, words: usize) -> Self {
        self.max_heading_words = words;
        self
    }

    /// Set the standalone-line coverage ratio.
    pub fn with_line_coverage_ratio(mut self, ratio: f32) -> Self {
        self.line_coverage_ratio = ratio;
        self
    }

    /// Set the running-header band as a fraction of page height.
    pub fn with_header_band_ratio(mut self, ratio: f32) -> Self {
        self.header_band_ratio = ratio;
        self
    }

    /// Set the title line-merge gap factor.
    pub fn with_title_line_gap_factor(mut self, factor: f32) -> Self {
        self.title_line_gap_factor = factor;
        self
    }

    /// Set the number of title extraction attempts.
    pub fn with_title_max_attempts(mut self, attempts: usize) -> Self {
        self.title_max_attempts = attempts;
        self
    }
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            bold_size_ratio: 1.15,
            max_symbol_ratio: 0.5,
            min_heading_chars: 2,
            max_heading_chars: 200,
            max_heading_words: 15,
            line_coverage_ratio: 0.7,
            header_band_ratio: 0.08,
            title_line_gap_factor: 1.8,
            title_max_attempts: 3,
        }
    }
}
