//! Outline construction strategies.
//!
//! Two sources of structure exist: embedded outline metadata (the PDF
//! bookmark tree) and visual typography. Metadata wins when it is
//! structurally sound; typography is the fallback. The choice between
//! them is an explicit, inspectable value ([`TocDecision`]) rather than
//! implicit control flow, so the controller's decision can be tested in
//! isolation from span-level heuristics.

use std::collections::HashSet;

use crate::model::{HeadingCandidate, HeadingLevel, TextSpan, TocEntry};

use super::clean::clean_text;
use super::config::OutlineConfig;
use super::font_stats::FontProfile;
use super::noise::NoiseFilter;

/// Outcome of inspecting the embedded table of contents.
#[derive(Debug, Clone, PartialEq)]
pub enum TocDecision {
    /// The TOC is structurally valid and becomes the outline as-is.
    Trusted(Vec<HeadingCandidate>),
    /// The TOC is absent or broken; typography decides instead.
    Fallback(FallbackReason),
}

/// Why the embedded TOC was not trusted.
///
/// A single malformed entry rejects the whole list: partial trust in a
/// broken TOC is riskier than falling back entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The document exposes no outline entries.
    NoEntries,
    /// An entry has no usable text after cleanup.
    EmptyText { index: usize },
    /// An entry points outside the document.
    PageOutOfBounds { index: usize, page: u32 },
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::NoEntries => write!(f, "no embedded outline entries"),
            FallbackReason::EmptyText { index } => {
                write!(f, "entry {} has no usable text", index)
            }
            FallbackReason::PageOutOfBounds { index, page } => {
                write!(f, "entry {} points to out-of-bounds page {}", index, page)
            }
        }
    }
}

/// Validate the embedded TOC and convert it when trustworthy.
///
/// Acceptance requires a non-empty list where every entry has non-empty,
/// non-numeric text and a destination within `[1, page_count]`. Levels
/// deeper than 3 clamp to H3; deep nesting still carries ordering
/// information. Trusted entries bypass the noise filter: authoring-tool
/// metadata is taken at its word once it passes structural validation.
pub fn decide_from_toc(entries: &[TocEntry], page_count: u32) -> TocDecision {
    if entries.is_empty() {
        return TocDecision::Fallback(FallbackReason::NoEntries);
    }

    let mut headings = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let text = clean_text(&entry.text);
        // Digit-only labels are page-number artifacts that sometimes leak
        // into bookmark trees; treat them as malformed text.
        if text.is_empty() || text.chars().all(|c| c.is_ascii_digit()) {
            return TocDecision::Fallback(FallbackReason::EmptyText { index });
        }

        let page = match entry.page {
            Some(p) if p >= 1 && p <= page_count => p,
            other => {
                return TocDecision::Fallback(FallbackReason::PageOutOfBounds {
                    index,
                    page: other.unwrap_or(0),
                });
            }
        };

        headings.push(HeadingCandidate::new(
            text,
            HeadingLevel::from_depth(entry.level),
            page,
            0.0,
        ));
    }

    TocDecision::Trusted(headings)
}

/// Horizontal extent and population of one visual line.
struct LineExtent {
    x0: f32,
    x1: f32,
    span_count: usize,
}

/// Build the outline from typography alone.
///
/// Level assignment buckets the profile's candidate sizes by descending
/// size: largest is H1, next distinct is H2, the third and everything
/// smaller folds into H3. The deepest level absorbs the tail instead of
/// discarding it, trading precision for recall at H3.
pub fn build_from_style(
    spans: &[TextSpan],
    profile: &FontProfile,
    filter: &NoiseFilter,
    config: &OutlineConfig,
) -> Vec<HeadingCandidate> {
    if !profile.has_candidates() {
        return Vec::new();
    }

    let extents = line_extents(spans);

    // Page-then-vertical reading order, left to right within a line.
    let mut ordered: Vec<&TextSpan> = spans.iter().collect();
    ordered.sort_by(|a, b| {
        a.page
            .cmp(&b.page)
            .then(b.y().partial_cmp(&a.y()).unwrap_or(std::cmp::Ordering::Equal))
            .then(a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(std::cmp::Ordering::Equal))
    });

    // Merge consecutive same-line spans with matching size and boldness:
    // wrapped heading text split across spans becomes one run.
    let mut runs: Vec<MergedRun> = Vec::new();
    for span in ordered {
        if let Some(last) = runs.last_mut() {
            if last.page == span.page
                && last.line_id == span.line_id
                && last.size_key == FontProfile::size_key(span.font_size)
                && last.is_bold == span.is_bold
            {
                last.push(span);
                continue;
            }
        }
        runs.push(MergedRun::start(span));
    }

    let mut headings = Vec::new();
    let mut seen = HashSet::new();

    for run in runs {
        let Some(rank) = profile.candidate_rank(run.font_size) else {
            continue;
        };

        let distinct_enough =
            run.is_bold || run.font_size >= profile.body_size * config.bold_size_ratio;
        if !distinct_enough {
            continue;
        }

        if !run.standalone(&extents, config.line_coverage_ratio) {
            continue;
        }

        let text = clean_text(&run.text);
        if filter.is_noise(&text) {
            continue;
        }
        if text.split_whitespace().count() > config.max_heading_words {
            continue;
        }
        // Sentence-final punctuation marks flowing prose, not a heading.
        if text.ends_with('.') && !ends_with_numbering(&text) || text.ends_with(',') {
            continue;
        }

        if !seen.insert(text.clone()) {
            continue;
        }

        let level = match rank {
            0 => HeadingLevel::H1,
            1 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        };

        headings.push(HeadingCandidate::new(text, level, run.page, run.font_size));
    }

    headings
}

/// A numbering token like "1." or "2.1." at the end is structure, not a
/// sentence terminator.
fn ends_with_numbering(text: &str) -> bool {
    text.split_whitespace()
        .last()
        .map(|w| {
            w.chars().all(|c| c.is_ascii_digit() || c == '.')
                && w.chars().any(|c| c.is_ascii_digit())
        })
        .unwrap_or(false)
}

fn line_extents(spans: &[TextSpan]) -> std::collections::HashMap<(u32, u32), LineExtent> {
    let mut extents: std::collections::HashMap<(u32, u32), LineExtent> =
        std::collections::HashMap::new();
    for span in spans {
        let e = extents
            .entry((span.page, span.line_id))
            .or_insert(LineExtent {
                x0: span.bbox.x0,
                x1: span.bbox.x1,
                span_count: 0,
            });
        e.x0 = e.x0.min(span.bbox.x0);
        e.x1 = e.x1.max(span.bbox.x1);
        e.span_count += 1;
    }
    extents
}

/// Consecutive spans merged into one heading-candidate run.
struct MergedRun {
    text: String,
    font_size: f32,
    size_key: i32,
    is_bold: bool,
    page: u32,
    line_id: u32,
    x0: f32,
    x1: f32,
    merged_spans: usize,
}

impl MergedRun {
    fn start(span: &TextSpan) -> Self {
        Self {
            text: span.text.clone(),
            font_size: span.font_size,
            size_key: FontProfile::size_key(span.font_size),
            is_bold: span.is_bold,
            page: span.page,
            line_id: span.line_id,
            x0: span.bbox.x0,
            x1: span.bbox.x1,
            merged_spans: 1,
        }
    }

    fn push(&mut self, span: &TextSpan) {
        if !self.text.ends_with(' ') && !span.text.starts_with(' ') {
            self.text.push(' ');
        }
        self.text.push_str(&span.text);
        self.x0 = self.x0.min(span.bbox.x0);
        self.x1 = self.x1.max(span.bbox.x1);
        self.merged_spans += 1;
    }

    /// A heading occupies its line: either it is the only content, or it
    /// covers most of the line's horizontal extent. Sub-runs embedded
    /// mid-paragraph fail this.
    fn standalone(
        &self,
        extents: &std::collections::HashMap<(u32, u32), LineExtent>,
        coverage_ratio: f32,
    ) -> bool {
        let Some(extent) = extents.get(&(self.page, self.line_id)) else {
            return true;
        };
        if extent.span_count <= self.merged_spans {
            return true;
        }
        let line_width = extent.x1 - extent.x0;
        if line_width <= 0.0 {
            return true;
        }
        (self.x1 - self.x0) / line_width >= coverage_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn toc(level: u32, text: &str, page: Option<u32>) -> TocEntry {
        TocEntry::new(level, text, page)
    }

    #[test]
    fn test_toc_trusted_with_clamping() {
        let entries = vec![
            toc(1, "Chapter 1", Some(1)),
            toc(2, "Section 1.1", Some(2)),
            toc(5, "Deeply Nested", Some(3)),
        ];
        match decide_from_toc(&entries, 10) {
            TocDecision::Trusted(headings) => {
                assert_eq!(headings.len(), 3);
                assert_eq!(headings[0].level, HeadingLevel::H1);
                assert_eq!(headings[1].level, HeadingLevel::H2);
                assert_eq!(headings[2].level, HeadingLevel::H3);
                assert_eq!(headings[2].page, 3);
            }
            TocDecision::Fallback(reason) => panic!("expected trusted TOC, got {}", reason),
        }
    }

    #[test]
    fn test_toc_empty_falls_back() {
        assert_eq!(
            decide_from_toc(&[], 10),
            TocDecision::Fallback(FallbackReason::NoEntries)
        );
    }

    #[test]
    fn test_toc_out_of_bounds_page_rejects_wholesale() {
        let entries = vec![
            toc(1, "Chapter 1", Some(1)),
            toc(1, "Ghost Chapter", Some(9999)),
        ];
        assert_eq!(
            decide_from_toc(&entries, 10),
            TocDecision::Fallback(FallbackReason::PageOutOfBounds {
                index: 1,
                page: 9999
            })
        );
    }

    #[test]
    fn test_toc_missing_page_rejects_wholesale() {
        let entries = vec![toc(1, "Chapter 1", None)];
        assert_eq!(
            decide_from_toc(&entries, 10),
            TocDecision::Fallback(FallbackReason::PageOutOfBounds { index: 0, page: 0 })
        );
    }

    #[test]
    fn test_toc_empty_text_rejects_wholesale() {
        let entries = vec![toc(1, "Chapter 1", Some(1)), toc(1, "   ", Some(2))];
        assert_eq!(
            decide_from_toc(&entries, 10),
            TocDecision::Fallback(FallbackReason::EmptyText { index: 1 })
        );
    }

    #[test]
    fn test_toc_numeric_label_rejects_wholesale() {
        let entries = vec![toc(1, "7", Some(1))];
        assert!(matches!(
            decide_from_toc(&entries, 10),
            TocDecision::Fallback(FallbackReason::EmptyText { index: 0 })
        ));
    }

    // Style strategy fixtures

    fn span(text: &str, size: f32, page: u32, y: f32, line: u32) -> TextSpan {
        let width = text.len() as f32 * size * 0.5;
        TextSpan::new(text, size, page, BBox::new(72.0, y - size * 0.2, 72.0 + width, y + size * 0.8))
            .with_line(line)
    }

    fn body_block(page: u32, start_line: u32) -> Vec<TextSpan> {
        (0..6)
            .map(|i| {
                span(
                    "Plain paragraph text that anchors the body size baseline firmly.",
                    11.0,
                    page,
                    600.0 - i as f32 * 14.0,
                    start_line + i,
                )
            })
            .collect()
    }

    fn build(spans: &[TextSpan]) -> Vec<HeadingCandidate> {
        let config = OutlineConfig::default();
        let filter = NoiseFilter::new(&config);
        let profile = FontProfile::analyze(spans);
        build_from_style(spans, &profile, &filter, &config)
    }

    #[test]
    fn test_style_levels_by_size_rank() {
        let mut spans = vec![
            span("Top Level", 24.0, 1, 700.0, 0),
            span("Second Level", 18.0, 1, 660.0, 1),
            span("Third Level", 14.0, 2, 700.0, 0),
            span("Also Third", 13.0, 2, 660.0, 1),
        ];
        spans.extend(body_block(1, 10));
        spans.extend(body_block(2, 10));

        let headings = build(&spans);
        assert_eq!(headings.len(), 4);
        assert_eq!(headings[0].level, HeadingLevel::H1);
        assert_eq!(headings[1].level, HeadingLevel::H2);
        // Third and fourth distinct sizes both fold into H3.
        assert_eq!(headings[2].level, HeadingLevel::H3);
        assert_eq!(headings[3].level, HeadingLevel::H3);
    }

    #[test]
    fn test_style_merges_same_line_runs() {
        let mut spans = vec![
            span("Chapter", 20.0, 1, 700.0, 0),
            {
                let mut s = span("One", 20.0, 1, 700.0, 0);
                s.bbox.x0 = 160.0;
                s.bbox.x1 = 190.0;
                s
            },
        ];
        spans.extend(body_block(1, 10));

        let headings = build(&spans);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Chapter One");
    }

    #[test]
    fn test_style_rejects_noise_at_heading_size() {
        let mut spans = vec![
            span("https://example.com", 20.0, 1, 700.0, 0),
            span("Name: ____", 20.0, 1, 660.0, 1),
            span("Introduction", 20.0, 1, 620.0, 2),
        ];
        spans.extend(body_block(1, 10));

        let headings = build(&spans);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Introduction");
    }

    #[test]
    fn test_style_rejects_embedded_emphasis_run() {
        // A large span sharing its line with body text is emphasis inside
        // a paragraph, not a heading.
        let mut spans = vec![span("Heading Alone", 20.0, 1, 700.0, 0)];
        let mut inline = span("Emphasis", 20.0, 1, 660.0, 5);
        inline.bbox.x0 = 72.0;
        inline.bbox.x1 = 120.0;
        let mut tail = span(
            "continues with a long run of ordinary paragraph prose after it",
            11.0,
            1,
            660.0,
            5,
        );
        tail.bbox.x0 = 122.0;
        tail.bbox.x1 = 500.0;
        spans.push(inline);
        spans.push(tail);
        spans.extend(body_block(1, 10));

        let headings = build(&spans);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Heading Alone");
    }

    #[test]
    fn test_style_rejects_sentence_punctuation_and_long_runs() {
        let mut spans = vec![
            span("This big line ends like a sentence.", 20.0, 1, 700.0, 0),
            span(
                "This enormous heading candidate has far too many words to plausibly be a real section heading at all",
                20.0,
                1,
                660.0,
                1,
            ),
            span("Results 2.1", 20.0, 1, 620.0, 2),
        ];
        spans.extend(body_block(1, 10));

        let headings = build(&spans);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Results 2.1");
    }

    #[test]
    fn test_style_suppresses_duplicates() {
        let mut spans = vec![
            span("References", 20.0, 1, 700.0, 0),
            span("References", 20.0, 3, 700.0, 0),
        ];
        spans.extend(body_block(1, 10));
        spans.extend(body_block(3, 10));

        let headings = build(&spans);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].page, 1);
    }

    #[test]
    fn test_style_uniform_document_yields_nothing() {
        let spans = body_block(1, 0);
        assert!(build(&spans).is_empty());
    }

    #[test]
    fn test_style_monotonic_levels() {
        let mut spans = vec![
            span("Alpha", 24.0, 1, 700.0, 0),
            span("Beta", 18.0, 1, 660.0, 1),
            span("Gamma", 14.0, 1, 620.0, 2),
        ];
        spans.extend(body_block(1, 10));

        let headings = build(&spans);
        for a in &headings {
            for b in &headings {
                if a.level < b.level {
                    // a is shallower (H1 < H2): its size must not be smaller.
                    assert!(a.font_size >= b.font_size);
                }
            }
        }
    }
}
