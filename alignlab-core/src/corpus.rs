//!
//! The raw corpus behind a labeling session: the full-text file and the two
//! token files. All three are positional; line `i` describes sample `i`.
//!
use std::path::Path;

use anyhow::Result;
use log::{info, warn};

use crate::config::AnnotatorConfig;
use crate::models::{FullTextRecord, Group, LabeledTextSample, SampleIndex, TokenIndex};
use crate::utils::read_json_lines;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
    texts: Vec<FullTextRecord>,
    comment_tokens: Vec<Vec<String>>,
    code_tokens: Vec<Vec<String>>,
}

impl Corpus {
    pub fn new(
        texts: Vec<FullTextRecord>,
        comment_tokens: Vec<Vec<String>>,
        code_tokens: Vec<Vec<String>>,
    ) -> Self {
        Self {
            texts,
            comment_tokens,
            code_tokens,
        }
    }

    ///
    /// Load the corpus from its three files.
    ///
    /// # Arguments:
    /// - full_text: `{"code": ..., "docstring": ...}` per line
    /// - comment_tokens: a `string[]` of comment tokens per line
    /// - code_tokens: a `string[]` of code tokens per line
    ///
    pub fn from_files(full_text: &Path, comment_tokens: &Path, code_tokens: &Path) -> Result<Self> {
        let texts: Vec<FullTextRecord> = read_json_lines(full_text)?;
        let comment_tokens: Vec<Vec<String>> = read_json_lines(comment_tokens)?;
        let code_tokens: Vec<Vec<String>> = read_json_lines(code_tokens)?;

        info!(
            "Loaded corpus: {} texts, {} comment token lines, {} code token lines",
            texts.len(),
            comment_tokens.len(),
            code_tokens.len()
        );

        Ok(Corpus::new(texts, comment_tokens, code_tokens))
    }

    pub fn from_config(config: &AnnotatorConfig) -> Result<Self> {
        Corpus::from_files(
            &config.full_text_path(),
            &config.comment_tokens_path(),
            &config.code_tokens_path(),
        )
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn text(&self, sample: SampleIndex, group: Group) -> Option<&str> {
        let record = self.texts.get(sample as usize)?;
        match group {
            Group::Comment => Some(record.docstring.as_str()),
            Group::Code => Some(record.code.as_str()),
        }
    }

    pub fn tokens(&self, sample: SampleIndex, group: Group) -> Option<&[String]> {
        let lines = match group {
            Group::Comment => &self.comment_tokens,
            Group::Code => &self.code_tokens,
        };
        lines.get(sample as usize).map(|tokens| tokens.as_slice())
    }

    ///
    /// Build the samples shown for one group, in the given sample order.
    ///
    /// Samples the corpus has no text or tokens for are skipped.
    ///
    /// # Arguments:
    /// - indices: sample ids, usually the labeling engine's sample order
    /// - group: which side of the samples to build
    /// - labeling: label -> token indices of a sample for that group
    ///
    pub fn labeled_samples<F>(
        &self,
        indices: &[SampleIndex],
        group: Group,
        mut labeling: F,
    ) -> Vec<LabeledTextSample>
    where
        F: FnMut(SampleIndex) -> Vec<Vec<TokenIndex>>,
    {
        indices
            .iter()
            .filter_map(|&index| {
                let (Some(text), Some(tokens)) = (self.text(index, group), self.tokens(index, group))
                else {
                    warn!("Sample {} is missing from the corpus files", index);
                    return None;
                };
                Some(LabeledTextSample {
                    index,
                    group,
                    text: text.to_string(),
                    tokens: tokens.to_vec(),
                    labeling_ranges: labeling(index),
                })
            })
            .collect()
    }
}
