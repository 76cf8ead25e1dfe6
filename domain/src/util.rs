//! Text helpers for log fields and admin previews.
//!
//! Limits count characters, the same unit the chat message length limit
//! uses, so a preview never splits a multi-byte character.

/// The first `max_chars` characters of `s`.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// One-line preview of a chat message or document.
///
/// Whitespace runs (newlines included) collapse to a single space; text cut
/// at `max_chars` ends with `...`.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    let cut = truncate_chars(&flat, max_chars);
    if cut.len() < flat.len() {
        format!("{}...", cut.trim_end())
    } else {
        flat
    }
}
