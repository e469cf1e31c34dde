//! Batch processing over a directory of PDF files.
//!
//! Documents are processed in parallel with rayon; each document's
//! outline computation is an independent, share-nothing unit of work.
//! A failure on one document is recorded and logged, never aborting the
//! rest of the run.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::analyze::{parse_to_outline, OutlineConfig};
use crate::error::{Error, Result};
use crate::parser::PdfParser;
use crate::render::{to_json, JsonFormat};

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum accepted page count; larger documents are rejected before
    /// the core runs.
    pub max_pages: u32,

    /// JSON output format
    pub format: JsonFormat,

    /// Outline inference configuration
    pub outline: OutlineConfig,
}

impl BatchOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page count limit.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the JSON output format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the outline configuration.
    pub fn with_outline_config(mut self, config: OutlineConfig) -> Self {
        self.outline = config;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_pages: 50,
            format: JsonFormat::Pretty,
            outline: OutlineConfig::default(),
        }
    }
}

/// Result of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Output files written, one per successful input
    pub processed: Vec<PathBuf>,
    /// Inputs that failed, with the failure message
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    /// Total number of inputs seen.
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }
}

/// Process every PDF in `input_dir`, writing one JSON outline per input
/// into `output_dir` named `<input-stem>.json`.
pub fn process_dir(input_dir: &Path, output_dir: &Path, options: &BatchOptions) -> Result<BatchSummary> {
    fs::create_dir_all(output_dir)?;

    let mut files: Vec<PathBuf> = fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    let results: Vec<(PathBuf, std::result::Result<PathBuf, String>)> = files
        .par_iter()
        .map(|path| {
            let outcome = process_file(path, output_dir, options).map_err(|e| e.to_string());
            (path.clone(), outcome)
        })
        .collect();

    let mut summary = BatchSummary::default();
    for (input, outcome) in results {
        match outcome {
            Ok(output) => summary.processed.push(output),
            Err(message) => {
                log::warn!("failed to process {}: {}", input.display(), message);
                summary.failed.push((input, message));
            }
        }
    }

    Ok(summary)
}

/// Process a single file into its deterministic output location.
pub fn process_file(input: &Path, output_dir: &Path, options: &BatchOptions) -> Result<PathBuf> {
    let parser = PdfParser::open(input)?;

    let page_count = parser.page_count();
    if page_count > options.max_pages {
        return Err(Error::PageLimitExceeded(page_count, options.max_pages));
    }

    let outline = parse_to_outline(&parser, &options.outline);
    let json = to_json(&outline, options.format)?;

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let output_path = output_dir.join(format!("{}.json", stem));
    fs::write(&output_path, json)?;

    log::debug!(
        "{} -> {} ({} headings)",
        input.display(),
        output_path.display(),
        outline.len()
    );

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_options_builder() {
        let options = BatchOptions::new()
            .with_max_pages(10)
            .with_format(JsonFormat::Compact);
        assert_eq!(options.max_pages, 10);
        assert_eq!(options.format, JsonFormat::Compact);
    }

    #[test]
    fn test_batch_options_defaults() {
        let options = BatchOptions::default();
        assert_eq!(options.max_pages, 50);
        assert_eq!(options.format, JsonFormat::Pretty);
    }
}
