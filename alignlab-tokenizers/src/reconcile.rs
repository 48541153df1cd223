//!
//! Matching a tokenizer's output back onto the text it came from.
//!
//! Every real token found in the text receives the next dense index, so that
//! "token 7" means the same span for the renderer and the labeling engine.
//!
use std::path::Path;

use fxhash::FxHashMap as HashMap;
use log::{debug, warn};

use alignlab_core::corpus::Corpus;
use alignlab_core::models::{Group, SampleIndex, TokenIndex};

use crate::config::ReconcileConfig;
use crate::error::TokenizerError;
use crate::utils::{clean_token, find_comment_end, is_special_token, remove_docstrings};

///
/// A piece of the reconciled text. Offsets are byte offsets into
/// [Reconciliation::text].
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextSpan {
    /// Text no token was matched to.
    Text { start: usize, end: usize },
    /// A matched token.
    Token {
        /// dense index among real tokens
        index: TokenIndex,
        /// position in the raw token list
        position: usize,
        start: usize,
        end: usize,
    },
}

impl TextSpan {
    pub fn start(&self) -> usize {
        match self {
            TextSpan::Text { start, .. } | TextSpan::Token { start, .. } => *start,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            TextSpan::Text { end, .. } | TextSpan::Token { end, .. } => *end,
        }
    }

    pub fn token_index(&self) -> Option<TokenIndex> {
        match self {
            TextSpan::Token { index, .. } => Some(*index),
            TextSpan::Text { .. } => None,
        }
    }
}

///
/// A span with the metadata a renderer needs.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotatedSpan<'a> {
    pub text: &'a str,
    pub token: Option<TokenIndex>,
    pub label: Option<usize>,
    pub highlight: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciliation {
    /// the text tokens were matched against, after docstring removal
    pub text: String,
    /// contiguous spans covering the whole text
    pub spans: Vec<TextSpan>,
    /// raw positions of real tokens that could not be found
    pub dropped: Vec<usize>,
}

impl Reconciliation {
    pub fn num_tokens(&self) -> usize {
        self.token_spans().count()
    }

    pub fn token_spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.spans
            .iter()
            .filter(|span| matches!(span, TextSpan::Token { .. }))
    }

    ///
    /// Byte range of the token with the given dense index.
    ///
    pub fn token_range(&self, index: TokenIndex) -> Option<(usize, usize)> {
        self.token_spans()
            .find(|span| span.token_index() == Some(index))
            .map(|span| (span.start(), span.end()))
    }

    pub fn slice(&self, span: &TextSpan) -> &str {
        &self.text[span.start()..span.end()]
    }

    pub fn token_text(&self, index: TokenIndex) -> Option<&str> {
        let (start, end) = self.token_range(index)?;
        Some(&self.text[start..end])
    }

    ///
    /// Attach labels and highlight groups to every token span.
    ///
    /// When a token appears under more than one label the last one wins, the
    /// engine keeps ownership exclusive so that only happens with hand-edited
    /// files.
    ///
    /// # Arguments:
    /// - labels: label -> token indices, as returned by the labeling engine for one group
    /// - highlights: highlight group -> token indices, from an external labeling
    ///
    pub fn annotate(
        &self,
        labels: &[Vec<TokenIndex>],
        highlights: &[Vec<TokenIndex>],
    ) -> Vec<AnnotatedSpan<'_>> {
        let label_of = owner_map(labels);
        let highlight_of = owner_map(highlights);

        self.spans
            .iter()
            .map(|span| {
                let token = span.token_index();
                AnnotatedSpan {
                    text: self.slice(span),
                    token,
                    label: token.and_then(|t| label_of.get(&t).copied()),
                    highlight: token.and_then(|t| highlight_of.get(&t).copied()),
                }
            })
            .collect()
    }
}

fn owner_map(groups: &[Vec<TokenIndex>]) -> HashMap<TokenIndex, usize> {
    let mut owners = HashMap::default();
    for (owner, tokens) in groups.iter().enumerate() {
        for token in tokens {
            owners.insert(*token, owner);
        }
    }
    owners
}

#[derive(Clone, Debug, Default)]
pub struct Reconciler {
    config: ReconcileConfig,
}

impl Reconciler {
    pub fn new(config: ReconcileConfig) -> Result<Self, TokenizerError> {
        if config.comment_marker.is_whitespace() {
            return Err(TokenizerError::InvalidCommentMarker(config.comment_marker));
        }
        Ok(Reconciler { config })
    }

    ///
    /// Create a reconciler from a TOML config file.
    ///
    pub fn from_config<P: AsRef<Path>>(path: P) -> Result<Self, TokenizerError> {
        let config = ReconcileConfig::try_from(path.as_ref())?;
        Reconciler::new(config)
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    ///
    /// Reconcile with the top-level policies, ignoring group overrides.
    ///
    /// # Arguments:
    /// - text: the source text
    /// - tokens: the raw tokenizer output for that text
    ///
    pub fn reconcile<S: AsRef<str>>(&self, text: &str, tokens: &[S]) -> Reconciliation {
        reconcile_with(&self.config, text, tokens)
    }

    pub fn reconcile_group<S: AsRef<str>>(
        &self,
        text: &str,
        tokens: &[S],
        group: Group,
    ) -> Reconciliation {
        reconcile_with(&self.config.for_group(group), text, tokens)
    }

    ///
    /// Reconcile one side of a corpus sample. `None` when the corpus has no
    /// such sample.
    ///
    pub fn reconcile_sample(
        &self,
        corpus: &Corpus,
        sample: SampleIndex,
        group: Group,
    ) -> Option<Reconciliation> {
        let text = corpus.text(sample, group)?;
        let tokens = corpus.tokens(sample, group)?;
        Some(self.reconcile_group(text, tokens, group))
    }
}

fn reconcile_with<S: AsRef<str>>(
    config: &ReconcileConfig,
    text: &str,
    tokens: &[S],
) -> Reconciliation {
    let text = match config.remove_docstrings {
        true => remove_docstrings(text).into_owned(),
        false => text.to_string(),
    };

    let mut spans = Vec::new();
    let mut dropped = Vec::new();
    let mut pos = 0;
    let mut index: TokenIndex = 0;

    for (position, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        if is_special_token(token) {
            continue;
        }
        let token = clean_token(token, config.subword_marker);

        let search_from = match config.skip_line_comments {
            true => find_comment_end(&text, pos, config.comment_marker),
            false => pos,
        };

        let Some(offset) = text[search_from..].find(token.as_ref()) else {
            warn!("Token {:?} at position {} not found in text, dropping it", token, position);
            dropped.push(position);
            continue;
        };

        let start = search_from + offset;
        let end = start + token.len();
        if start > pos {
            spans.push(TextSpan::Text { start: pos, end: start });
        }
        spans.push(TextSpan::Token {
            index,
            position,
            start,
            end,
        });

        pos = end;
        index += 1;
    }

    if pos < text.len() {
        spans.push(TextSpan::Text {
            start: pos,
            end: text.len(),
        });
    }

    debug!("Reconciled {} tokens, dropped {}", index, dropped.len());

    Reconciliation {
        text,
        spans,
        dropped,
    }
}
