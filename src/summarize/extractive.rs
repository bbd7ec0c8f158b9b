//! Extractive summarization
//!
//! Deterministic fallback used when no generative model is available. Also
//! provides the sentence splitting and key-point selection shared with the
//! generative strategy.

use std::sync::OnceLock;

use regex::Regex;

fn sentence_boundary() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    // Sentence terminators (including the Devanagari danda) followed by whitespace
    BOUNDARY.get_or_init(|| Regex::new(r"[.!?।]+\s+").expect("valid sentence regex"))
}

/// Split text into trimmed, non-empty sentences
///
/// Terminal punctuation is dropped, matching how sentences are re-joined
/// into summaries.
pub fn split_sentences(text: &str) -> Vec<String> {
    let text = text.trim();
    let text = text.trim_end_matches(['.', '!', '?', '।']);

    sentence_boundary()
        .split(text)
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
        .collect()
}

/// The first `max_points` sentences longer than `min_chars` characters
pub fn key_points(sentences: &[String], max_points: usize, min_chars: usize) -> Vec<String> {
    sentences
        .iter()
        .filter(|s| s.chars().count() > min_chars)
        .take(max_points)
        .cloned()
        .collect()
}

/// Truncate to at most `max_chars` characters, respecting char boundaries
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// Build an extractive summary
///
/// Short texts (three sentences or fewer) are truncated to
/// `2 * max_length` characters. Longer texts use the first two sentences
/// plus the middle one, truncated the same way.
pub fn extractive_summary(text: &str, sentences: &[String], max_length: usize) -> String {
    let limit = max_length.saturating_mul(2);

    if sentences.len() <= 3 {
        return truncate_chars(text.trim(), limit);
    }

    let middle = &sentences[sentences.len() / 2];
    let picked = [sentences[0].as_str(), sentences[1].as_str(), middle.as_str()];

    let mut summary = picked.join(". ");
    summary.push('.');

    truncate_chars(&summary, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "Train 7 completed its scheduled maintenance yesterday. \
        The brake pads on coach two were replaced by the depot team. \
        Ok. \
        Cleaning crews finished the interior deep clean before midnight. \
        The train is cleared for induction into revenue service on Friday.";

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences(REPORT);
        assert_eq!(sentences.len(), 5);
        assert_eq!(sentences[0], "Train 7 completed its scheduled maintenance yesterday");
        assert_eq!(sentences[2], "Ok");
        assert_eq!(
            sentences[4],
            "The train is cleared for induction into revenue service on Friday"
        );
    }

    #[test]
    fn test_split_collapses_whitespace() {
        let sentences = split_sentences("First  line\nwraps here. Second!");
        assert_eq!(sentences, vec!["First line wraps here", "Second"]);
    }

    #[test]
    fn test_key_points_skip_short_sentences() {
        let sentences = split_sentences(REPORT);
        let points = key_points(&sentences, 5, 20);
        assert_eq!(points.len(), 4);
        assert!(!points.contains(&"Ok".to_string()));
    }

    #[test]
    fn test_key_points_capped() {
        let sentences = split_sentences(REPORT);
        assert_eq!(key_points(&sentences, 2, 20).len(), 2);
    }

    #[test]
    fn test_summary_of_long_text_uses_first_two_and_middle() {
        let sentences = split_sentences(REPORT);
        let summary = extractive_summary(REPORT, &sentences, 150);
        assert_eq!(
            summary,
            "Train 7 completed its scheduled maintenance yesterday. \
             The brake pads on coach two were replaced by the depot team. Ok."
        );
    }

    #[test]
    fn test_summary_of_short_text_is_truncated_text() {
        let text = "Only one sentence here that goes on for a while.";
        let sentences = split_sentences(text);
        assert_eq!(extractive_summary(text, &sentences, 10), truncate_chars(text, 20));
    }

    #[test]
    fn test_truncate_chars_is_utf8_safe() {
        assert_eq!(truncate_chars("മലയാളം", 2), "മല");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
