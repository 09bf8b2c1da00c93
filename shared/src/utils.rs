//! # Shared Utility Functions
//!
//! Helpers for rendering user text in logs.

/// Shorten `text` to at most `max_chars` characters, appending `...` when cut.
///
/// ```rust
/// use shared::utils::preview;
///
/// assert_eq!(preview("hello world", 5), "hello...");
/// assert_eq!(preview("hi", 5), "hi");
/// ```
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("héllo", 2), "hé...");
        assert_eq!(preview("", 3), "");
        assert_eq!(preview("abc", 3), "abc");
    }
}
