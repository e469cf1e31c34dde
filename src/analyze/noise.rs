//! Structural noise rejection for heading candidates.
//!
//! Text can look heading-like (large, bold) while being semantically
//! anything but: links, form labels, decorative rules, page artifacts.
//! The filter stays permissive on uncertain cases: a missed piece of
//! noise costs less than a rejected legitimate short heading like "1."
//! or "Introduction".

use regex::Regex;

use super::config::OutlineConfig;

/// The symbol-ratio rule only applies to text at least this long; very
/// short tokens ("1.") are dominated by their punctuation and would be
/// rejected unfairly.
const SYMBOL_RATIO_MIN_LEN: usize = 4;

/// Noise classifier with patterns compiled once per document run.
pub struct NoiseFilter {
    min_chars: usize,
    max_chars: usize,
    max_symbol_ratio: f32,
    url: Regex,
    email: Regex,
    field_label: Regex,
    underscore_run: Regex,
}

impl NoiseFilter {
    /// Compile the filter for a configuration.
    pub fn new(config: &OutlineConfig) -> Self {
        Self {
            min_chars: config.min_heading_chars,
            max_chars: config.max_heading_chars,
            max_symbol_ratio: config.max_symbol_ratio,
            url: Regex::new(r"(?i)(https?://|www\.[a-z0-9-]|\.(com|org|net|edu|gov|io)(/|\s|$))")
                .unwrap(),
            email: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap(),
            field_label: Regex::new(r"^[A-Za-z][A-Za-z0-9 ]{0,15}:$").unwrap(),
            underscore_run: Regex::new(r"_{3,}").unwrap(),
        }
    }

    /// Classify text as structurally unlikely to be a heading.
    ///
    /// Pure: same input, same verdict, no side effects.
    pub fn is_noise(&self, text: &str) -> bool {
        let trimmed = text.trim();

        let char_count = trimmed.chars().count();
        if char_count < self.min_chars || char_count > self.max_chars {
            return true;
        }

        if self.url.is_match(trimmed) || self.email.is_match(trimmed) {
            return true;
        }

        // Bare numerics are page-number artifacts, not headings.
        let has_digit = trimmed.chars().any(|c| c.is_ascii_digit());
        if has_digit && trimmed.chars().all(|c| c.is_ascii_digit() || c.is_whitespace()) {
            return true;
        }

        // No alphanumeric content at all: rules, bullets, dividers.
        let alnum = trimmed.chars().filter(|c| c.is_alphanumeric()).count();
        if alnum == 0 {
            return true;
        }

        let symbols = trimmed
            .chars()
            .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
            .count();
        if char_count >= SYMBOL_RATIO_MIN_LEN
            && symbols as f32 / alnum as f32 > self.max_symbol_ratio
        {
            return true;
        }

        // Form-field shapes: "Name:", "Date:", trailing blanks, checkboxes.
        if self.field_label.is_match(trimmed) || self.underscore_run.is_match(trimmed) {
            return true;
        }
        if trimmed.contains(['\u{2610}', '\u{2611}', '\u{2612}', '\u{25A1}']) {
            return true;
        }

        false
    }
}
