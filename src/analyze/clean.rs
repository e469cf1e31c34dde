//! Text normalization for titles and heading candidates.

use unicode_normalization::UnicodeNormalization;

/// Decorative bullet markers stripped from the front of heading text.
/// Numbering tokens ("1.", "A.") are kept: numbering carries structure.
const BULLET_MARKERS: &[char] = &['\u{2022}', '\u{25CF}', '\u{25CB}', '\u{2023}', '\u{00B7}'];

/// Repeated punctuation runs are capped at this length; longer runs are
/// decoration (rules, dot leaders), not content.
const MAX_PUNCT_RUN: usize = 3;

/// Normalize span text into presentable heading/title text.
///
/// NFC normalization, non-printable removal, whitespace collapsing,
/// punctuation-run capping, and leading bullet stripping. Idempotent.
pub fn clean_text(text: &str) -> String {
    let normalized: String = text.nfc().collect();

    let mut out = String::with_capacity(normalized.len());
    let mut last_was_space = true; // also trims leading whitespace
    let mut prev_char = '\0';
    let mut run_len = 0usize;
    for c in normalized.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
            prev_char = ' ';
            run_len = 0;
        } else if !c.is_control() {
            if c == prev_char && !c.is_alphanumeric() {
                run_len += 1;
                if run_len >= MAX_PUNCT_RUN {
                    continue;
                }
            } else {
                prev_char = c;
                run_len = 0;
            }
            out.push(c);
            last_was_space = false;
        }
    }

    while out.ends_with(' ') {
        out.pop();
    }

    strip_leading_bullets(&out).to_string()
}

fn strip_leading_bullets(text: &str) -> &str {
    let mut rest = text;
    loop {
        let trimmed = rest.trim_start();
        match trimmed.chars().next() {
            Some(c) if BULLET_MARKERS.contains(&c) => {
                rest = &trimmed[c.len_utf8()..];
            }
            _ => return trimmed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean_text("  Chapter \t One \n"), "Chapter One");
    }

    #[test]
    fn test_strips_control_chars() {
        assert_eq!(clean_text("Intro\u{0000}duction"), "Introduction");
    }

    #[test]
    fn test_strips_decorative_bullets_keeps_numbering() {
        assert_eq!(clean_text("\u{2022} Overview"), "Overview");
        assert_eq!(clean_text("1. Overview"), "1. Overview");
        assert_eq!(clean_text("A. Background"), "A. Background");
    }

    #[test]
    fn test_caps_punctuation_runs() {
        assert_eq!(clean_text("Contents ........ 7"), "Contents ... 7");
        assert_eq!(clean_text("Section --- note"), "Section --- note");
        assert_eq!(clean_text("a..b"), "a..b");
    }

    #[test]
    fn test_idempotent() {
        let once = clean_text("  \u{2022}  Mixed   spacing ");
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   "), "");
    }
}
