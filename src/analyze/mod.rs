//! Outline inference: the decision core.
//!
//! Turns one document's extracted signals (text spans, embedded outline
//! metadata, page count) into a normalized title + heading hierarchy.
//! Everything here is per-document and pure: statistics are computed
//! fresh for each call and nothing is shared across invocations.

mod clean;
mod config;
mod font_stats;
mod noise;
mod outline;
mod strategy;
mod title;

pub use clean::clean_text;
pub use config::OutlineConfig;
pub use font_stats::FontProfile;
pub use noise::NoiseFilter;
pub use outline::{infer_outline, parse_to_outline};
pub use strategy::{build_from_style, decide_from_toc, FallbackReason, TocDecision};
pub use title::extract_title;
