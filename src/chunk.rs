//! Fixed word-count text chunker.
//!
//! Splits the corpus document into consecutive windows of at most
//! `max_words` whitespace-delimited words. Windows do not overlap, the
//! final window may be shorter, and each window is rejoined with single
//! spaces. A chunk's identity is its position in the returned sequence,
//! which matches document order.

/// Split text into word-count windows, respecting max_words.
/// Returns an empty vec for empty (or all-whitespace) input.
pub fn chunk_words(text: &str, max_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .chunks(max_words)
        .map(|window| window.join(" "))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert!(chunk_words("", 100).is_empty());
    }

    #[test]
    fn test_whitespace_only_text() {
        assert!(chunk_words("  \n\t  ", 100).is_empty());
    }

    #[test]
    fn test_small_text_single_chunk() {
        let chunks = chunk_words("Hello, world!", 100);
        assert_eq!(chunks, vec!["Hello, world!".to_string()]);
    }

    #[test]
    fn test_exact_windows() {
        let chunks = chunk_words("alpha beta gamma delta", 2);
        assert_eq!(chunks, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn test_short_final_window() {
        let chunks = chunk_words("one two three four five", 2);
        assert_eq!(chunks, vec!["one two", "three four", "five"]);
    }

    #[test]
    fn test_whitespace_runs_normalized() {
        let chunks = chunk_words("a\t b\n\nc   d", 3);
        assert_eq!(chunks, vec!["a b c", "d"]);
    }

    #[test]
    fn test_no_window_exceeds_max_words() {
        let text = (0..53)
            .map(|i| format!("w{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = chunk_words(&text, 7);
        for c in &chunks {
            assert!(c.split_whitespace().count() <= 7);
        }
    }

    #[test]
    fn test_rejoin_recovers_words_in_order() {
        let text = "  The quick\nbrown  fox jumps\tover the lazy dog ";
        let chunks = chunk_words(text, 3);
        let rejoined = chunks.join(" ");
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(rejoined, normalized);
    }

    #[test]
    fn test_deterministic() {
        let text = "alpha beta gamma delta epsilon zeta";
        assert_eq!(chunk_words(text, 4), chunk_words(text, 4));
    }
}
