//! Language detection
//!
//! Thin wrapper over `whatlang` that reports ISO 639-1 codes, since those
//! are what translation endpoints and API clients expect.

use whatlang::Lang;

/// Code reported when detection cannot decide
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Best-guess language of `text`: an ISO 639-1 code where one exists,
/// ISO 639-3 otherwise
///
/// The guess is returned even when the detector marks it unreliable.
/// Returns `None` for empty input or when the detector has no answer.
pub fn detect_language(text: &str) -> Option<&'static str> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    whatlang::detect(text).map(|info| iso_639_1(info.lang()))
}

/// Detected language code, or [`UNKNOWN_LANGUAGE`]
pub fn detect_language_code(text: &str) -> String {
    detect_language(text)
        .unwrap_or(UNKNOWN_LANGUAGE)
        .to_string()
}

fn iso_639_1(lang: Lang) -> &'static str {
    match lang {
        Lang::Mal => "ml",
        Lang::Eng => "en",
        Lang::Hin => "hi",
        Lang::Tam => "ta",
        Lang::Kan => "kn",
        Lang::Tel => "te",
        Lang::Ben => "bn",
        Lang::Mar => "mr",
        Lang::Guj => "gu",
        Lang::Pan => "pa",
        Lang::Ori => "or",
        Lang::Urd => "ur",
        Lang::Ara => "ar",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Spa => "es",
        Lang::Por => "pt",
        Lang::Ita => "it",
        Lang::Nld => "nl",
        Lang::Rus => "ru",
        Lang::Cmn => "zh",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        other => other.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_malayalam() {
        let text = "കൊച്ചി മെട്രോ റെയിൽ ലിമിറ്റഡ് ട്രെയിൻ സർവീസുകൾ നാളെ രാവിലെ ആറു മണിക്ക് ആരംഭിക്കും";
        assert_eq!(detect_language_code(text), "ml");
    }

    #[test]
    fn test_detects_english() {
        let text = "The maintenance schedule for all trains will be reviewed by the operations \
                    team during the weekly planning meeting on Monday morning.";
        assert_eq!(detect_language(text), Some("en"));
    }

    #[test]
    fn test_short_text_still_gets_a_guess() {
        assert_ne!(detect_language_code("Depot closed."), UNKNOWN_LANGUAGE);
    }

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(detect_language_code("   \n"), UNKNOWN_LANGUAGE);
        assert!(detect_language("").is_none());
    }
}
