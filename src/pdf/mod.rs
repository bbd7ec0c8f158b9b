//! PDF handling
//!
//! Embedded text extraction and page rendering via MuPDF.

mod extractor;

pub use extractor::{PdfError, PdfExtractor, PdfText};
