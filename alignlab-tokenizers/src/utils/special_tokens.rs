use std::borrow::Cow;

///
/// A special token is a marker wrapped in angle brackets, like `<s>` or `</s>`.
/// Special tokens never receive a token index.
///
pub fn is_special_token(token: &str) -> bool {
    token.starts_with('<') && token.ends_with('>')
}

///
/// Strip the sub-word continuation marker from a token surface form.
///
/// Only the first marker is removed, tokens carry at most one.
///
/// # Arguments:
/// - token: the raw token as emitted by the tokenizer
/// - marker: the continuation marker, usually `Ġ`
///
pub fn clean_token(token: &str, marker: char) -> Cow<'_, str> {
    if token.contains(marker) {
        Cow::Owned(token.replacen(marker, "", 1))
    } else {
        Cow::Borrowed(token)
    }
}

///
/// One flag per raw token, `true` where the token is special.
///
pub fn special_tokens_mask<S: AsRef<str>>(tokens: &[S]) -> Vec<bool> {
    tokens
        .iter()
        .map(|token| is_special_token(token.as_ref()))
        .collect()
}

///
/// The real (non-special) tokens with their raw position, cleaned of the
/// sub-word marker. The n-th item is the token with dense index n.
///
pub fn real_tokens<S: AsRef<str>>(tokens: &[S], marker: char) -> Vec<(usize, Cow<'_, str>)> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| !is_special_token(token.as_ref()))
        .map(|(position, token)| (position, clean_token(token.as_ref(), marker)))
        .collect()
}
