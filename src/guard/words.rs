//! Word tokenization and limit trimming.

use std::borrow::Cow;

/// Split `text` on Unicode whitespace, dropping empty tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Truncate `text` to at most `limit` words.
///
/// Text within the limit is returned untouched. Otherwise the first `limit`
/// words are joined with single spaces and one trailing space is appended so
/// the caret can keep going after the last word.
pub fn trim_to_limit(text: &str, limit: usize) -> Cow<'_, str> {
    if word_count(text) <= limit {
        return Cow::Borrowed(text);
    }
    let mut trimmed = text
        .split_whitespace()
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ");
    trimmed.push(' ');
    Cow::Owned(trimmed)
}
