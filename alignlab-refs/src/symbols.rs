//!
//! Unique string forms of tokens, for aligners that match tokens by text.
//!
//! A token repeated within one list keeps its surface form on the first
//! occurrence and gets the group marker plus its occurrence number after that:
//! `["a", "a", "b"]` becomes `["a", "a▲2", "b"]` for a comment.
//!
use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
use log::warn;

use alignlab_core::models::{Group, TokenIndex};
use alignlab_tokenizers::config::DEFAULT_SUBWORD_MARKER;
use alignlab_tokenizers::utils::real_tokens;

use crate::service::Alignment;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UniqueSymbols {
    pub symbols: Vec<String>,
    index_of: HashMap<String, TokenIndex>,
}

impl UniqueSymbols {
    ///
    /// Dense token index a symbol stands for.
    ///
    pub fn index_of(&self, symbol: &str) -> Option<TokenIndex> {
        self.index_of.get(symbol).copied()
    }

    pub fn symbol(&self, index: TokenIndex) -> Option<&str> {
        self.symbols.get(index as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

///
/// Turn a raw token list into unique symbols, with the default sub-word
/// marker.
///
/// Special tokens are left out and sub-word markers stripped, so the n-th
/// symbol stands for the token with dense index n.
///
/// # Arguments:
/// - tokens: raw tokenizer output
/// - group: decides the marker appended to repeated tokens
///
pub fn to_unique_symbols<S: AsRef<str>>(tokens: &[S], group: Group) -> UniqueSymbols {
    to_unique_symbols_with_marker(tokens, group, DEFAULT_SUBWORD_MARKER)
}

///
/// Same as [to_unique_symbols] for tokenizers with another sub-word marker.
///
/// A suffixed symbol never equals a real token of the list: when
/// `a▲2` is itself a token, the second `a` becomes `a▲3`.
///
pub fn to_unique_symbols_with_marker<S: AsRef<str>>(
    tokens: &[S],
    group: Group,
    subword_marker: char,
) -> UniqueSymbols {
    let tokens: Vec<String> = real_tokens(tokens, subword_marker)
        .into_iter()
        .map(|(_, token)| token.into_owned())
        .collect();
    let real: HashSet<&str> = tokens.iter().map(|t| t.as_str()).collect();

    let marker = group.symbol_marker();
    let mut last_suffix: HashMap<&str, usize> = HashMap::default();
    let mut taken: HashSet<String> = HashSet::default();
    let mut symbols = Vec::with_capacity(tokens.len());
    let mut index_of = HashMap::default();

    for (i, token) in tokens.iter().enumerate() {
        let n = last_suffix.entry(token.as_str()).or_insert(0);
        *n += 1;
        let symbol = match *n {
            1 => token.clone(),
            _ => loop {
                let candidate = format!("{}{}{}", token, marker, n);
                if !real.contains(candidate.as_str()) && !taken.contains(&candidate) {
                    break candidate;
                }
                *n += 1;
            },
        };

        taken.insert(symbol.clone());
        index_of.insert(symbol.clone(), i as TokenIndex);
        symbols.push(symbol);
    }

    UniqueSymbols { symbols, index_of }
}

///
/// Express a sample's labeling in unique symbols, e.g. to show an aligner a
/// worked example. Indices without a symbol are left out.
///
/// # Arguments:
/// - comment: unique symbols of the comment tokens
/// - code: unique symbols of the code tokens
/// - labeling: label -> group -> token indices
///
pub fn to_alignment_with_unique_tokens(
    comment: &UniqueSymbols,
    code: &UniqueSymbols,
    labeling: &[Vec<Vec<TokenIndex>>],
) -> Vec<Alignment> {
    let lookup = |symbols: &UniqueSymbols, indices: Option<&Vec<TokenIndex>>| -> Vec<String> {
        indices
            .map(|indices| {
                indices
                    .iter()
                    .filter_map(|i| symbols.symbol(*i).map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    };

    labeling
        .iter()
        .map(|groups| Alignment {
            comment_token: lookup(comment, groups.get(Group::Comment.index())),
            code_token: lookup(code, groups.get(Group::Code.index())),
        })
        .collect()
}

///
/// Map an aligner's answer back to token indices, one label per alignment.
/// Symbols the aligner made up are dropped.
///
pub fn to_alignment_with_indices(
    alignments: &[Alignment],
    comment: &UniqueSymbols,
    code: &UniqueSymbols,
) -> Vec<Vec<Vec<TokenIndex>>> {
    let lookup = |symbols: &UniqueSymbols, tokens: &[String]| -> Vec<TokenIndex> {
        tokens
            .iter()
            .filter_map(|token| {
                let index = symbols.index_of(token);
                if index.is_none() {
                    warn!("Dropping unknown symbol {:?}", token);
                }
                index
            })
            .collect()
    };

    alignments
        .iter()
        .map(|alignment| {
            vec![
                lookup(comment, &alignment.comment_token),
                lookup(code, &alignment.code_token),
            ]
        })
        .collect()
}
