//! PDF access module: the span extraction boundary.

mod pdf_parser;
mod spans;

pub use pdf_parser::PdfParser;
