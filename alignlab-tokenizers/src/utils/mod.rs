//!
//! Text policies applied to the source text before and while tokens are
//! matched against it.
//!
use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

pub mod special_tokens;

pub use special_tokens::{clean_token, is_special_token, real_tokens, special_tokens_mask};

static DOUBLE_QUOTE_DOCSTRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)""".*?""""#).unwrap());
static SINGLE_QUOTE_DOCSTRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)'''.*?'''").unwrap());

///
/// Remove `"""..."""` and `'''...'''` blocks, newlines included.
///
pub fn remove_docstrings(code: &str) -> Cow<'_, str> {
    match DOUBLE_QUOTE_DOCSTRING.replace_all(code, "") {
        Cow::Borrowed(code) => SINGLE_QUOTE_DOCSTRING.replace_all(code, ""),
        Cow::Owned(code) => Cow::Owned(SINGLE_QUOTE_DOCSTRING.replace_all(&code, "").into_owned()),
    }
}

///
/// Find where the search for the next token should start.
///
/// Whitespace from `pos` is skipped; if the next character is the comment
/// marker the position moves to the end of that line (the newline itself,
/// or the end of the text).
///
/// # Arguments:
/// - text: the text being matched
/// - pos: byte offset of the cursor, must lie on a char boundary
/// - marker: the line comment marker
///
pub fn find_comment_end(text: &str, pos: usize, marker: char) -> usize {
    let rest = &text[pos..];
    let trimmed = rest.trim_start();
    let start = pos + (rest.len() - trimmed.len());

    if !trimmed.starts_with(marker) {
        return start;
    }

    match trimmed.find('\n') {
        Some(newline) => start + newline,
        None => text.len(),
    }
}
