//! Content-stream text extraction with position and font information.
//!
//! This is the span extraction boundary: raw page bytes in, ordered
//! [`TextSpan`]s out. Positions come from tracking the text matrix across
//! content stream operations; font size is the effective size after matrix
//! scaling; boldness is inferred from the base font name.

use std::collections::{BTreeMap, HashMap};

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{BBox, TextSpan};

/// Kerning adjustments beyond this many 1/1000 text-space units are treated
/// as word spaces when reassembling TJ arrays.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Spans closer than this fraction of the font size on the vertical axis
/// are grouped onto the same line.
const LINE_Y_TOLERANCE: f32 = 0.3;

/// Extracts positioned spans from the pages of a loaded document.
pub(crate) struct SpanExtractor<'a> {
    doc: &'a LopdfDocument,
}

/// A span before line grouping: raw text matrix position, no line id.
struct RawSpan {
    text: String,
    x: f32,
    y: f32,
    font_size: f32,
    is_bold: bool,
}

impl<'a> SpanExtractor<'a> {
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Extract the ordered spans of one page (1-indexed).
    pub fn extract_page(&self, page_num: u32) -> Result<Vec<TextSpan>> {
        let pages = self.doc.get_pages();
        let page_id = pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;

        let lopdf_fonts = self
            .doc
            .get_page_fonts(*page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        // Resolve base font names once; boldness comes from the name.
        let mut bold_by_font: HashMap<Vec<u8>, bool> = HashMap::new();
        for (name, font) in &lopdf_fonts {
            let base_font = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_default();
            bold_by_font.insert(name.clone(), TextSpan::bold_from_font_name(&base_font));
        }

        let content = self.page_content(*page_id)?;
        let raw = self.walk_content(&content, &bold_by_font, &lopdf_fonts)?;

        Ok(group_into_lines(raw, page_num))
    }

    /// Concatenate the page's content streams.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .decompressed_content()
                        .map_err(|e| Error::PdfParse(e.to_string()));
                }
                Err(Error::PdfParse("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    /// Walk content stream operations, tracking the text matrix.
    fn walk_content(
        &self,
        content: &[u8],
        bold_by_font: &HashMap<Vec<u8>, bool>,
        lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<RawSpan>> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut current_font_name: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut current_bold = false;
        let mut matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(font_name) = &op.operands[0] {
                            current_font_name = font_name.clone();
                            current_bold = bold_by_font
                                .get(font_name.as_slice())
                                .copied()
                                .unwrap_or(false);
                        }
                        current_font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    matrix.next_line();
                }
                "Tj" | "TJ" => {
                    if in_text_block {
                        let encoding = lopdf_fonts
                            .get(&current_font_name)
                            .and_then(|f| f.get_font_encoding(self.doc).ok());

                        let text = if op.operator == "TJ" {
                            decode_tj_array(op.operands.first(), encoding.as_ref())
                        } else if let Some(Object::String(bytes, _)) = op.operands.first() {
                            decode_string(bytes, encoding.as_ref())
                        } else {
                            String::new()
                        };

                        if !text.trim().is_empty() {
                            let (x, y) = matrix.position();
                            spans.push(RawSpan {
                                text,
                                x,
                                y,
                                font_size: current_font_size * matrix.scale(),
                                is_bold: current_bold,
                            });
                        }
                    }
                }
                "'" | "\"" => {
                    matrix.next_line();
                    if in_text_block {
                        let text_idx = if op.operator == "\"" { 2 } else { 0 };
                        if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                            let encoding = lopdf_fonts
                                .get(&current_font_name)
                                .and_then(|f| f.get_font_encoding(self.doc).ok());
                            let text = decode_string(bytes, encoding.as_ref());

                            if !text.trim().is_empty() {
                                let (x, y) = matrix.position();
                                spans.push(RawSpan {
                                    text,
                                    x,
                                    y,
                                    font_size: current_font_size * matrix.scale(),
                                    is_bold: current_bold,
                                });
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }
}

/// Decode a TJ operand array into text, turning large kerning adjustments
/// into word spaces.
fn decode_tj_array(operand: Option<&Object>, encoding: Option<&lopdf::Encoding>) -> String {
    let Some(Object::Array(arr)) = operand else {
        return String::new();
    };

    let mut combined = String::new();
    for item in arr {
        match item {
            Object::String(bytes, _) => {
                combined.push_str(&decode_string(bytes, encoding));
            }
            Object::Integer(n) => {
                if -(*n as f32) > TJ_SPACE_THRESHOLD && needs_space(&combined) {
                    combined.push(' ');
                }
            }
            Object::Real(n) => {
                if -n > TJ_SPACE_THRESHOLD && needs_space(&combined) {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }
    combined
}

fn needs_space(s: &str) -> bool {
    !s.is_empty() && !s.ends_with(' ') && !s.ends_with('\u{00A0}')
}

fn decode_string(bytes: &[u8], encoding: Option<&lopdf::Encoding>) -> String {
    match encoding {
        Some(enc) => LopdfDocument::decode_text(enc, bytes).unwrap_or_default(),
        None => decode_text_simple(bytes),
    }
}

/// Group raw spans into visual lines, assign line ids, and estimate
/// bounding boxes.
///
/// Spans are sorted top-down (PDF y is bottom-up), then left to right;
/// spans within [`LINE_Y_TOLERANCE`] of the current line's baseline share a
/// line id. Width is estimated from character count since glyph metrics are
/// not decoded at this boundary.
fn group_into_lines(mut raw: Vec<RawSpan>, page: u32) -> Vec<TextSpan> {
    raw.sort_by(|a, b| {
        let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut spans = Vec::with_capacity(raw.len());
    let mut line_id: u32 = 0;
    let mut current_y: Option<f32> = None;

    for r in raw {
        let tolerance = r.font_size * LINE_Y_TOLERANCE;
        match current_y {
            Some(y) if (r.y - y).abs() <= tolerance => {}
            Some(_) => {
                line_id += 1;
                current_y = Some(r.y);
            }
            None => {
                current_y = Some(r.y);
            }
        }

        let width = estimate_width(&r.text, r.font_size);
        // Approximate descender/ascender from the font size.
        let bbox = BBox::new(
            r.x,
            r.y - r.font_size * 0.2,
            r.x + width,
            r.y + r.font_size * 0.8,
        );

        let mut span = TextSpan::new(r.text, r.font_size, page, bbox).with_line(line_id);
        if r.is_bold {
            span = span.bold();
        }
        spans.push(span);
    }

    spans
}

/// Estimate rendered width assuming an average glyph advance of half the
/// font size.
fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5
}

/// Text matrix for tracking position in content streams.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; a TL-aware walk is not needed for outline work.
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM marker
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
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1 fallback
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str, x: f32, y: f32, size: f32) -> RawSpan {
        RawSpan {
            text: text.to_string(),
            x,
            y,
            font_size: size,
            is_bold: false,
        }
    }

    #[test]
    fn test_group_into_lines_assigns_shared_line_id() {
        let spans = group_into_lines(
            vec![
                raw("Chapter", 72.0, 700.0, 18.0),
                raw("One", 150.0, 700.5, 18.0),
                raw("Body text", 72.0, 660.0, 11.0),
            ],
            1,
        );
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].line_id, spans[1].line_id);
        assert_ne!(spans[0].line_id, spans[2].line_id);
    }

    #[test]
    fn test_group_into_lines_orders_top_down() {
        let spans = group_into_lines(
            vec![raw("lower", 72.0, 100.0, 11.0), raw("upper", 72.0, 700.0, 11.0)],
            1,
        );
        assert_eq!(spans[0].text, "upper");
        assert_eq!(spans[1].text, "lower");
    }

    #[test]
    fn test_estimate_width() {
        assert!((estimate_width("abcd", 10.0) - 20.0).abs() < f32::EPSILON);
        assert_eq!(estimate_width("", 10.0), 0.0);
    }

    #[test]
    fn test_decode_text_simple_utf16() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_text_matrix_translate_and_scale() {
        let mut m = TextMatrix::default();
        m.translate(10.0, 20.0);
        assert_eq!(m.position(), (10.0, 20.0));
        assert!((m.scale() - 1.0).abs() < f32::EPSILON);

        m.set(2.0, 0.0, 0.0, 2.0, 5.0, 5.0);
        assert!((m.scale() - 2.0).abs() < f32::EPSILON);
    }
}
