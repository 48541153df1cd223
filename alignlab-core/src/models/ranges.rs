use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use super::TokenIndex;

///
/// Compact, paired-endpoint encoding of a set of token indices.
///
/// The value is a flat list `[start0, end0, start1, end1, ...]` where every
/// pair is a closed interval. Produced by [TokenRanges::reduce_from] the
/// intervals are sorted, non-overlapping and maximal.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenRanges {
    pub value: Vec<TokenIndex>,
}

impl TokenRanges {
    pub fn new(value: Vec<TokenIndex>) -> Self {
        Self { value }
    }

    ///
    /// Expand the ranges into every index they cover.
    ///
    /// Pairs are expanded in the order they appear. The output is neither
    /// sorted nor deduplicated, and a trailing unpaired endpoint is ignored.
    ///
    pub fn expand(&self) -> Vec<TokenIndex> {
        self.intervals()
            .flat_map(|(start, end)| start..=end)
            .collect()
    }

    ///
    /// Iterate over the `(start, end)` pairs, both ends inclusive.
    ///
    pub fn intervals(&self) -> impl Iterator<Item = (TokenIndex, TokenIndex)> + '_ {
        self.value
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
    }

    ///
    /// Compact an arbitrary list of indices into ranges.
    ///
    /// The input may be unsorted and may contain duplicates; duplicates are
    /// absorbed into the current run.
    ///
    /// # Arguments:
    /// - indices: the token indices to compact
    ///
    pub fn reduce_from(indices: &[TokenIndex]) -> Self {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();

        let mut iter = sorted.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };

        let mut value = Vec::new();
        let (mut start, mut end) = (first, first);
        for idx in iter {
            if idx <= end.saturating_add(1) {
                end = end.max(idx);
            } else {
                value.push(start);
                value.push(end);
                start = idx;
                end = idx;
            }
        }
        value.push(start);
        value.push(end);

        Self { value }
    }

    ///
    /// Number of intervals in the encoding.
    ///
    pub fn len(&self) -> usize {
        self.value.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<TokenIndex>> for TokenRanges {
    fn from(value: Vec<TokenIndex>) -> Self {
        Self { value }
    }
}

impl From<TokenRanges> for Vec<TokenIndex> {
    fn from(val: TokenRanges) -> Self {
        val.value
    }
}

impl Display for TokenRanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .intervals()
            .map(|(start, end)| match start == end {
                true => start.to_string(),
                false => format!("{}-{}", start, end),
            })
            .collect();
        write!(f, "{}", parts.join(","))
    }
}

///
/// Expand every label/group of a persisted `match` structure into plain indices.
///
pub fn match_to_indices(matches: &[Vec<Vec<TokenIndex>>]) -> Vec<Vec<Vec<TokenIndex>>> {
    matches
        .iter()
        .map(|label| {
            label
                .iter()
                .map(|group| TokenRanges::new(group.clone()).expand())
                .collect()
        })
        .collect()
}

///
/// Compact every label/group of an expanded structure into range encoding.
///
pub fn indices_to_match(indices: &[Vec<Vec<TokenIndex>>]) -> Vec<Vec<Vec<TokenIndex>>> {
    indices
        .iter()
        .map(|label| {
            label
                .iter()
                .map(|group| TokenRanges::reduce_from(group).value)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use std::collections::BTreeSet;

    #[rstest]
    #[case(vec![0, 2], vec![0, 1, 2])]
    #[case(vec![3, 3, 7, 8], vec![3, 7, 8])]
    #[case(vec![7, 8, 0, 1], vec![7, 8, 0, 1])]
    #[case(vec![], vec![])]
    #[case(vec![4], vec![])]
    #[case(vec![1, 2, 9], vec![1, 2])]
    fn test_expand(#[case] ranges: Vec<u32>, #[case] expected: Vec<u32>) {
        assert_eq!(TokenRanges::new(ranges).expand(), expected);
    }

    #[rstest]
    fn test_expand_inverted_pair_is_empty() {
        assert_eq!(TokenRanges::new(vec![5, 2]).expand(), Vec::<u32>::new());
    }

    #[rstest]
    fn test_reduce_merges_maximal_runs() {
        let ranges = TokenRanges::reduce_from(&[1, 2, 3, 7, 8, 10]);
        assert_eq!(ranges.value, vec![1, 3, 7, 8, 10, 10]);
        assert_eq!(ranges.len(), 3);
    }

    #[rstest]
    fn test_reduce_empty_input() {
        let ranges = TokenRanges::reduce_from(&[]);
        assert_eq!(ranges.value, Vec::<u32>::new());
        assert!(ranges.is_empty());
    }

    #[rstest]
    fn test_reduce_single_element() {
        assert_eq!(TokenRanges::reduce_from(&[42]).value, vec![42, 42]);
    }

    #[rstest]
    fn test_reduce_unsorted_with_duplicates() {
        let ranges = TokenRanges::reduce_from(&[5, 3, 4, 3]);
        assert_eq!(ranges.value, vec![3, 5]);
        assert_eq!(ranges.expand(), vec![3, 4, 5]);
    }

    #[rstest]
    fn test_reduce_duplicates_do_not_open_gap() {
        let ranges = TokenRanges::reduce_from(&[2, 2, 2, 3, 5, 5]);
        assert_eq!(ranges.value, vec![2, 3, 5, 5]);
    }

    #[rstest]
    fn test_reduce_handles_max_index() {
        let ranges = TokenRanges::reduce_from(&[u32::MAX, u32::MAX - 1, 0]);
        assert_eq!(ranges.value, vec![0, 0, u32::MAX - 1, u32::MAX]);
    }

    #[rstest]
    #[case(vec![9, 1, 4, 4, 2, 3, 12, 11])]
    #[case(vec![0])]
    #[case(vec![100, 50, 75, 51])]
    fn test_expand_reduce_preserves_membership(#[case] indices: Vec<u32>) {
        let expanded = TokenRanges::reduce_from(&indices).expand();
        let expected: BTreeSet<u32> = indices.into_iter().collect();
        let actual: BTreeSet<u32> = expanded.iter().copied().collect();

        assert_eq!(actual, expected);
        assert_eq!(expanded.len(), expected.len());
    }

    #[rstest]
    fn test_display() {
        let ranges = TokenRanges::reduce_from(&[1, 2, 3, 7, 10]);
        assert_eq!(ranges.to_string(), "1-3,7,10");
    }

    #[rstest]
    fn test_match_conversion() {
        let matches = vec![vec![vec![0, 2], vec![1, 1]], vec![], vec![vec![], vec![4, 5]]];
        let indices = match_to_indices(&matches);
        assert_eq!(
            indices,
            vec![vec![vec![0, 1, 2], vec![1]], vec![], vec![vec![], vec![4, 5]]]
        );
        assert_eq!(indices_to_match(&indices), matches);
    }
}
