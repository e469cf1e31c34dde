//! PDF document access using lopdf.
//!
//! [`PdfParser`] is the external-collaborator boundary of the outline
//! engine: it exposes the page count, per-page text spans, the embedded
//! outline (bookmark tree) flattened into [`TocEntry`] records, and the
//! Info-dictionary metadata. All inference happens elsewhere.

use std::io::Read;
use std::path::Path;

use lopdf::Document as LopdfDocument;

use crate::detect::detect_version_from_path;
use crate::error::{Error, Result};
use crate::model::{Metadata, TextSpan, TocEntry};

use super::spans::SpanExtractor;

/// Parsed PDF document handle.
pub struct PdfParser {
    doc: LopdfDocument,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Cheap magic-byte check before handing the file to lopdf.
        detect_version_from_path(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        Self::from_document(doc)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        Self::from_document(doc)
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc })
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Extract the ordered text spans of one page (1-indexed).
    pub fn page_spans(&self, page_num: u32) -> Result<Vec<TextSpan>> {
        SpanExtractor::new(&self.doc).extract_page(page_num)
    }

    /// Height of a page in points, from its MediaBox.
    pub fn page_height(&self, page_num: u32) -> Result<f32> {
        let pages = self.doc.get_pages();
        let page_id = pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;

        if let Ok(page_dict) = self.doc.get_dictionary(*page_id) {
            if let Ok(media_box) = page_dict.get(b"MediaBox") {
                if let Ok(array) = media_box.as_array() {
                    if array.len() >= 4 {
                        return Ok(array[3].as_float().unwrap_or(792.0));
                    }
                }
            }
        }

        // Letter height default
        Ok(792.0)
    }

    /// Flatten the embedded outline (bookmark tree) into document order.
    ///
    /// Returns an empty list when the document carries no outline or the
    /// tree is unreadable; the caller decides whether to trust the result.
    pub fn toc_entries(&self) -> Vec<TocEntry> {
        let mut entries = Vec::new();

        if let Ok(catalog) = self.doc.catalog() {
            if let Ok(outlines) = catalog.get(b"Outlines") {
                if let Ok(outlines_ref) = outlines.as_reference() {
                    if let Ok(outlines_dict) = self.doc.get_dictionary(outlines_ref) {
                        if let Ok(first) = outlines_dict.get(b"First") {
                            if let Ok(first_ref) = first.as_reference() {
                                let mut visited = std::collections::HashSet::new();
                                self.walk_outline_items(first_ref, 1, &mut entries, &mut visited);
                            }
                        }
                    }
                }
            }
        }

        entries
    }

    /// Depth-first walk: item, then children, then next sibling.
    /// Malformed files can contain cyclic Next references; `visited` breaks
    /// the loop.
    fn walk_outline_items(
        &self,
        item_ref: lopdf::ObjectId,
        level: u32,
        entries: &mut Vec<TocEntry>,
        visited: &mut std::collections::HashSet<lopdf::ObjectId>,
    ) {
        if !visited.insert(item_ref) {
            return;
        }

        if let Ok(item_dict) = self.doc.get_dictionary(item_ref) {
            let text = get_string_from_dict(item_dict, b"Title").unwrap_or_default();
            let page = self.outline_destination(item_dict);
            entries.push(TocEntry::new(level, text, page));

            if let Ok(first) = item_dict.get(b"First") {
                if let Ok(first_ref) = first.as_reference() {
                    self.walk_outline_items(first_ref, level + 1, entries, visited);
                }
            }

            if let Ok(next) = item_dict.get(b"Next") {
                if let Ok(next_ref) = next.as_reference() {
                    self.walk_outline_items(next_ref, level, entries, visited);
                }
            }
        }
    }

    /// Resolve an outline item's destination to a page number.
    fn outline_destination(&self, item_dict: &lopdf::Dictionary) -> Option<u32> {
        if let Ok(dest) = item_dict.get(b"Dest") {
            return self.resolve_destination(dest);
        }

        // Fall back to the action dictionary (GoTo actions).
        if let Ok(action) = item_dict.get(b"A") {
            let action_dict = match action {
                lopdf::Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
                lopdf::Object::Dictionary(d) => Some(d),
                _ => None,
            };
            if let Some(action_dict) = action_dict {
                if let Ok(dest) = action_dict.get(b"D") {
                    return self.resolve_destination(dest);
                }
            }
        }

        None
    }

    fn resolve_destination(&self, dest: &lopdf::Object) -> Option<u32> {
        let pages = self.doc.get_pages();

        if let Ok(dest_array) = dest.as_array() {
            if let Some(first) = dest_array.first() {
                if let Ok(page_ref) = first.as_reference() {
                    for (num, id) in pages.iter() {
                        if *id == page_ref {
                            return Some(*num);
                        }
                    }
                }
            }
        }

        None
    }

    /// Extract document metadata from the Info dictionary.
    pub fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.doc.version.to_string());
        metadata.page_count = self.page_count();
        metadata.encrypted = self.doc.is_encrypted();

        if let Ok(info) = self.doc.trailer.get(b"Info") {
            if let Ok(info_ref) = info.as_reference() {
                if let Ok(info_dict) = self.doc.get_dictionary(info_ref) {
                    metadata.title = get_string_from_dict(info_dict, b"Title");
                    metadata.author = get_string_from_dict(info_dict, b"Author");
                    metadata.subject = get_string_from_dict(info_dict, b"Subject");
                    metadata.creator = get_string_from_dict(info_dict, b"Creator");
                    metadata.producer = get_string_from_dict(info_dict, b"Producer");

                    if let Some(date_str) = get_string_from_dict(info_dict, b"CreationDate") {
                        metadata.created = crate::model::parse_pdf_date(&date_str);
                    }
                    if let Some(date_str) = get_string_from_dict(info_dict, b"ModDate") {
                        metadata.modified = crate::model::parse_pdf_date(&date_str);
                    }
                }
            }
        }

        metadata
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        lopdf::Object::String(bytes, _) => {
            // UTF-16BE first (PDF standard for Unicode)
            if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
                let utf16: Vec<u16> = bytes[2..]
                    .chunks(2)
                    .filter_map(|c| {
                        if c.len() == 2 {
                            Some(u16::from_be_bytes([c[0], c[1]]))
                        } else {
                            None
                        }
                    })
                    .collect();
                String::from_utf16(&utf16).ok()
            } else {
                String::from_utf8(bytes.clone())
                    .ok()
                    .or_else(|| Some(bytes.iter().map(|&b| b as char).collect()))
            }
        }
        lopdf::Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let result = PdfParser::from_bytes(b"not a pdf at all");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_bytes_rejects_truncated_header() {
        let result = PdfParser::from_bytes(b"%PDF-1.7");
        assert!(result.is_err());
    }
}
