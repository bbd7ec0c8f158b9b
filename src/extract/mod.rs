//! Extraction-translation stage
//!
//! Dispatches on file type (image OCR, PDF text layer with OCR fallback,
//! plain text), detects the language and translates to English.

mod pipeline;
mod types;

pub use pipeline::ExtractionPipeline;
pub use types::{extension_of, ExtractError, ExtractionResult, FileKind, SUPPORTED_EXTENSIONS};
