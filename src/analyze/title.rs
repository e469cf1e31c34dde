//! Title extraction from first-page typography.

use crate::model::TextSpan;

use super::clean::clean_text;
use super::config::OutlineConfig;
use super::font_stats::FontProfile;
use super::noise::NoiseFilter;

/// Extract the document title from page-1 spans.
///
/// The dominant (largest) font size on the first page is assumed to set
/// the title; vertically adjacent lines at that size are concatenated to
/// reconstruct multi-line titles. Spans inside the running-header band at
/// the top of the page are ignored. When the candidate at one size is
/// rejected by the noise filter, the next-largest distinct size is tried,
/// up to a bounded number of attempts. Exhaustion yields an empty string.
/// Deterministic: the same spans always produce the same title.
pub fn extract_title(
    spans: &[TextSpan],
    page_height: f32,
    filter: &NoiseFilter,
    config: &OutlineConfig,
) -> String {
    let header_cutoff = if page_height > 0.0 {
        page_height * (1.0 - config.header_band_ratio)
    } else {
        f32::INFINITY
    };

    let eligible: Vec<&TextSpan> = spans
        .iter()
        .filter(|s| s.page == 1 && s.bbox.y1 <= header_cutoff && !s.text.trim().is_empty())
        .collect();

    if eligible.is_empty() {
        return String::new();
    }

    // Distinct sizes present on the page, largest first.
    let mut size_keys: Vec<i32> = eligible
        .iter()
        .map(|s| FontProfile::size_key(s.font_size))
        .collect();
    size_keys.sort_unstable_by(|a, b| b.cmp(a));
    size_keys.dedup();

    for key in size_keys.into_iter().take(config.title_max_attempts) {
        let candidate = assemble_candidate(&eligible, key, config);
        if candidate.is_empty() {
            continue;
        }
        if !filter.is_noise(&candidate) {
            return candidate;
        }
    }

    String::new()
}

/// Gather the topmost run of vertically adjacent lines at one size and
/// join them in reading order.
fn assemble_candidate(eligible: &[&TextSpan], size_key: i32, config: &OutlineConfig) -> String {
    let mut at_size: Vec<&TextSpan> = eligible
        .iter()
        .copied()
        .filter(|s| FontProfile::size_key(s.font_size) == size_key)
        .collect();
    if at_size.is_empty() {
        return String::new();
    }

    // Reading order: top-down, then left to right.
    at_size.sort_by(|a, b| {
        b.y()
            .partial_cmp(&a.y())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut parts: Vec<&str> = vec![at_size[0].text.as_str()];
    let mut prev = at_size[0];

    for &span in at_size.iter().skip(1) {
        if span.line_id == prev.line_id {
            parts.push(span.text.as_str());
            prev = span;
            continue;
        }
        // Next line down: only adjacent lines belong to the title block.
        let gap = prev.y() - span.y();
        if gap >= 0.0 && gap <= span.font_size * config.title_line_gap_factor {
            parts.push(span.text.as_str());
            prev = span;
        } else {
            break;
        }
    }

    clean_text(&parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn span(text: &str, size: f32, y: f32) -> TextSpan {
        span_at(text, size, 72.0, y)
    }

    fn span_at(text: &str, size: f32, x: f32, y: f32) -> TextSpan {
        TextSpan::new(
            text,
            size,
            1,
            BBox::new(x, y - size * 0.2, x + text.len() as f32 * size * 0.5, y + size * 0.8),
        )
    }

    fn fixture_lines(spans: &mut [TextSpan]) {
        // Assign line ids by distinct y, top-down.
        let mut ys: Vec<i32> = spans.iter().map(|s| s.y() as i32).collect();
        ys.sort_unstable_by(|a, b| b.cmp(a));
        ys.dedup();
        for s in spans.iter_mut() {
            s.line_id = ys.iter().position(|y| *y == s.y() as i32).unwrap() as u32;
        }
    }

    fn extract(spans: &mut Vec<TextSpan>) -> String {
        fixture_lines(spans);
        let config = OutlineConfig::default();
        let filter = NoiseFilter::new(&config);
        extract_title(spans, 792.0, &filter, &config)
    }

    #[test]
    fn test_single_line_title() {
        let mut spans = vec![
            span("Annual Report 2024", 28.0, 700.0),
            span("Some body text follows here", 11.0, 650.0),
        ];
        assert_eq!(extract(&mut spans), "Annual Report 2024");
    }

    #[test]
    fn test_multi_line_title_concatenates() {
        let mut spans = vec![
            span("Understanding Document", 28.0, 700.0),
            span("Structure at Scale", 28.0, 664.0),
            span("Body text", 11.0, 600.0),
        ];
        assert_eq!(extract(&mut spans), "Understanding Document Structure at Scale");
    }

    #[test]
    fn test_distant_same_size_span_not_joined() {
        let mut spans = vec![
            span("Quarterly Review", 28.0, 700.0),
            span("Unrelated Banner", 28.0, 200.0),
            span("Body text", 11.0, 600.0),
        ];
        assert_eq!(extract(&mut spans), "Quarterly Review");
    }

    #[test]
    fn test_noisy_largest_size_falls_back() {
        let mut spans = vec![
            span("www.example.com", 32.0, 700.0),
            span("Actual Title Here", 24.0, 660.0),
            span("Body text", 11.0, 600.0),
        ];
        assert_eq!(extract(&mut spans), "Actual Title Here");
    }

    #[test]
    fn test_running_header_band_excluded() {
        // 792 pt page: the top 8% band starts at y1 > 728.6.
        let mut spans = vec![
            span("CONFIDENTIAL DRAFT", 30.0, 780.0),
            span("Real Title", 22.0, 690.0),
            span("Body text", 11.0, 600.0),
        ];
        assert_eq!(extract(&mut spans), "Real Title");
    }

    #[test]
    fn test_no_spans_yields_empty() {
        let mut spans = Vec::new();
        assert_eq!(extract(&mut spans), "");
    }

    #[test]
    fn test_all_attempts_noisy_yields_empty() {
        let mut spans = vec![
            span("www.example.com", 30.0, 700.0),
            span("____", 24.0, 660.0),
            span("42", 18.0, 620.0),
        ];
        assert_eq!(extract(&mut spans), "");
    }

    #[test]
    fn test_deterministic() {
        let mut spans = vec![
            span("Understanding Document", 28.0, 700.0),
            span("Structure at Scale", 28.0, 664.0),
            span("Body text", 11.0, 600.0),
        ];
        let first = extract(&mut spans);
        for _ in 0..5 {
            assert_eq!(extract(&mut spans), first);
        }
    }
}
