/// Default preview length, in characters.
pub const DEFAULT_SNIPPET_LEN: usize = 220;

/// Suffix appended to truncated previews.
pub const ELLIPSIS: &str = "...";

/// Builds a one-line preview of `text` for display.
///
/// Whitespace runs (including newlines) collapse to single spaces and the
/// ends are trimmed. If the result is longer than `max_len` characters it is
/// cut to exactly `max_len` characters and [`ELLIPSIS`] is appended, so a
/// truncated preview is `max_len + 3` characters long.
///
/// # Examples
///
/// ```
/// use ragdesk::retrieval::snippet;
///
/// assert_eq!(snippet("  Procedure\n\n sinistre  ", 220), "Procedure sinistre");
/// assert_eq!(snippet("abcdef", 3), "abc...");
/// ```
#[must_use]
pub fn snippet(text: &str, max_len: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    match collapsed.char_indices().nth(max_len) {
        Some((cut, _)) => {
            let mut preview = collapsed[..cut].to_string();
            preview.push_str(ELLIPSIS);
            preview
        }
        None => collapsed,
    }
}
