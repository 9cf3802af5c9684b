//! Text helpers for trigger matching and splicing
//!
//! All cursor offsets in this crate are character offsets, never byte offsets.
//! These helpers keep the char/byte conversion in one place.

/// Extract the last whitespace-delimited token of `text`, i.e. the word
/// sitting immediately before the cursor.
///
/// Returns `None` when the text is empty or ends in whitespace: in that case
/// there is no word touching the cursor, so nothing can be a trigger
/// candidate. This is what prevents an already-expanded word followed by a
/// space from matching again on the next input event.
pub fn last_token(text: &str) -> Option<&str> {
    match text.chars().last() {
        None => None,
        Some(ch) if ch.is_whitespace() => None,
        Some(_) => text.split_whitespace().last(),
    }
}

/// Number of characters in `s`
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Convert a character offset into a byte offset, clamped to the string end
pub fn char_to_byte(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}

/// Case-fold a string for case-insensitive trigger comparison
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}
