//! Language detection and translation

mod detect;
mod translator;

pub use detect::{detect_language, detect_language_code, UNKNOWN_LANGUAGE};
pub use translator::{GoogleTranslator, TranslateError, Translator};

#[cfg(test)]
pub(crate) use translator::MockTranslator;
