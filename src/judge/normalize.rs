//! Canonical text form used for every answer comparison.

/// Normalise `text` for comparison.
///
/// Lowercases, deletes every character that is not a word character
/// (alphanumeric or `_`), whitespace or `-`, collapses whitespace runs to a
/// single space and trims both ends.  Hyphens survive so compound number
/// words like `"twenty-one"` stay intact.
///
/// ```
/// use voice_quiz::judge::normalize;
///
/// assert_eq!(normalize("  It's   PARIS! "), "its paris");
/// assert_eq!(normalize("Twenty-One."), "twenty-one");
/// ```
pub fn normalize(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| is_word_char(*c) || c.is_whitespace() || *c == '-')
        .collect();

    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Word characters as understood by `\w`: alphanumerics plus underscore.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
