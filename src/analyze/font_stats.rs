//! Document-wide font statistics for heading calibration.

use std::collections::HashMap;

use crate::model::TextSpan;

/// Typographic baseline of one document.
///
/// `body_size` is the character-weighted mode of span sizes: sizes are
/// weighted by how many characters they set, not how many spans, so a
/// single huge heading cannot out-vote dense body paragraphs.
/// `candidate_sizes` holds every distinct size strictly above the body
/// size, largest first; these are the only sizes the style strategy will
/// consider heading-like.
#[derive(Debug, Clone, Default)]
pub struct FontProfile {
    /// Body text font size
    pub body_size: f32,
    /// Character count per size key (0.1 pt precision)
    pub size_frequency: HashMap<i32, usize>,
    /// Distinct sizes above body, descending
    pub candidate_sizes: Vec<f32>,
}

impl FontProfile {
    /// Size key at 0.1 pt precision.
    pub fn size_key(size: f32) -> i32 {
        (size * 10.0).round() as i32
    }

    /// Compute the profile for one document's spans.
    ///
    /// A document with zero spans yields a zero body size and no
    /// candidates; a near-uniform document (plain text) yields an empty
    /// candidate set. Both are valid outcomes, not errors.
    pub fn analyze(spans: &[TextSpan]) -> Self {
        let mut size_frequency: HashMap<i32, usize> = HashMap::new();

        for span in spans {
            let chars = span.text.chars().filter(|c| !c.is_whitespace()).count();
            if chars == 0 {
                continue;
            }
            *size_frequency.entry(Self::size_key(span.font_size)).or_insert(0) += chars;
        }

        if size_frequency.is_empty() {
            return Self::default();
        }

        // Mode by character count; ties break toward the smaller size,
        // since body text is typically the smallest dominant size.
        let body_key = size_frequency
            .iter()
            .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(kb.cmp(ka)))
            .map(|(k, _)| *k)
            .unwrap_or(0);
        let body_size = body_key as f32 / 10.0;

        let mut candidate_sizes: Vec<f32> = size_frequency
            .keys()
            .filter(|k| **k > body_key)
            .map(|k| *k as f32 / 10.0)
            .collect();
        candidate_sizes.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        Self {
            body_size,
            size_frequency,
            candidate_sizes,
        }
    }

    /// Rank of a size among the candidates (0 = largest), if present.
    pub fn candidate_rank(&self, size: f32) -> Option<usize> {
        let key = Self::size_key(size);
        self.candidate_sizes
            .iter()
            .position(|s| Self::size_key(*s) == key)
    }

    /// True when no size stands out above body text.
    pub fn has_candidates(&self) -> bool {
        !self.candidate_sizes.is_empty()
    }
}
