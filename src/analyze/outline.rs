//! Outline controller: strategy selection and result assembly.

use crate::model::{Outline, TextSpan, TocEntry};
use crate::parser::PdfParser;

use super::config::OutlineConfig;
use super::font_stats::FontProfile;
use super::noise::NoiseFilter;
use super::strategy::{build_from_style, decide_from_toc, TocDecision};
use super::title::extract_title;

/// Infer the outline of one document from its extracted signals.
///
/// Pure: spans + metadata in, outline out. The embedded TOC is consulted
/// first; a trusted TOC short-circuits style analysis entirely. Otherwise
/// font statistics are computed fresh for this document and the style
/// strategy runs. The title is derived typographically in both branches;
/// TOC metadata frequently omits or mis-titles documents, so it never
/// supplies the title.
///
/// Never fails: a document with no extractable structure yields an
/// [`Outline`] with an empty title and empty heading list.
pub fn infer_outline(
    spans: &[TextSpan],
    toc_entries: &[TocEntry],
    page_count: u32,
    page_height: f32,
    config: &OutlineConfig,
) -> Outline {
    let filter = NoiseFilter::new(config);
    let title = extract_title(spans, page_height, &filter, config);

    match decide_from_toc(toc_entries, page_count) {
        TocDecision::Trusted(headings) => {
            log::debug!("using embedded outline ({} entries)", headings.len());
            Outline::new(title, headings)
        }
        TocDecision::Fallback(reason) => {
            log::debug!("embedded outline unusable ({}), analyzing typography", reason);

            let profile = FontProfile::analyze(spans);
            log::debug!(
                "body size {:.1}pt, {} candidate heading sizes",
                profile.body_size,
                profile.candidate_sizes.len()
            );

            let mut headings = build_from_style(spans, &profile, &filter, config);

            // The title is not a heading, even when it shares heading
            // typography on page 1.
            if !title.is_empty() {
                headings.retain(|h| !title.contains(&h.text));
            }

            Outline::new(title, headings)
        }
    }
}

/// Extract the outline of an opened document.
///
/// Gathers spans page by page (a page that fails span extraction is
/// logged and skipped rather than aborting the document), collects the
/// embedded TOC, and delegates to [`infer_outline`].
pub fn parse_to_outline(parser: &PdfParser, config: &OutlineConfig) -> Outline {
    let page_count = parser.page_count();

    let mut spans = Vec::new();
    for page in 1..=page_count {
        match parser.page_spans(page) {
            Ok(mut page_spans) => spans.append(&mut page_spans),
            Err(e) => log::warn!("skipping page {}: {}", page, e),
        }
    }

    let toc_entries = parser.toc_entries();
    let page_height = parser.page_height(1).unwrap_or(0.0);

    infer_outline(&spans, &toc_entries, page_count, page_height, config)
}
