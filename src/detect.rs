//! PDF format detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Detect the PDF version from a file path.
///
/// # Returns
/// * `Ok(version)` (e.g., `"1.7"`) if the file starts with a valid PDF header
/// * `Err(Error::UnknownFormat)` if the file is not a PDF
pub fn detect_version_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 16];
    reader.read_exact(&mut header)?;
    detect_version_from_bytes(&header)
}

/// Detect the PDF version from the leading bytes of a document.
pub fn detect_version_from_bytes(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN {
        return Err(Error::UnknownFormat);
    }

    if !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(version)
}

/// Check if a byte slice looks like a PDF document.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_version_from_bytes(data).is_ok()
}

fn is_valid_version(version: &str) -> bool {
    let chars: Vec<char> = version.chars().collect();
    chars.len() == 3 && chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_pdf() {
        assert_eq!(detect_version_from_bytes(b"%PDF-1.7\n%test").unwrap(), "1.7");
        assert_eq!(detect_version_from_bytes(b"%PDF-2.0\n%test").unwrap(), "2.0");
    }

    #[test]
    fn test_detect_rejects_non_pdf() {
        assert!(matches!(
            detect_version_from_bytes(b"<!DOCTYPE html><html></html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            detect_version_from_bytes(b""),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            detect_version_from_bytes(b"%PDF-"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_detect_rejects_bad_version() {
        assert!(matches!(
            detect_version_from_bytes(b"%PDF-x.y\n%test"),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\ntest"));
        assert!(!is_pdf_bytes(b"Not a PDF file"));
        assert!(!is_pdf_bytes(b""));
    }
}
