use super::{Group, SampleIndex, TokenIndex};

///
/// One group (comment or code) of a sample, as the annotation front-end shows it:
/// the raw text, its tokenizer output and the token indices of every label.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledTextSample {
    pub index: SampleIndex,
    pub group: Group,
    pub text: String,
    pub tokens: Vec<String>,
    pub labeling_ranges: Vec<Vec<TokenIndex>>,
}

impl LabeledTextSample {
    ///
    /// Label owning `token`, if any. The last label listing it wins.
    ///
    pub fn label_of(&self, token: TokenIndex) -> Option<usize> {
        self.labeling_ranges
            .iter()
            .rposition(|indices| indices.contains(&token))
    }

    pub fn num_labels(&self) -> usize {
        self.labeling_ranges.len()
    }
}
