//!
//! Labeling state of a single sample: label -> group -> token indices.
//!
//! Labels are kept in a sparse map. Growing the sample to a high label number
//! only bumps [SampleLabeling::num_labels]; the labels skipped over read as
//! empty and are written out as `[[], []]`.
//!
use std::collections::BTreeMap;

use log::warn;

use alignlab_core::models::records::MAX_GROUPS_PER_LABEL;
use alignlab_core::models::{Group, TokenIndex, indices_to_match};

/// Token indices of one label, per group.
pub type LabelGroups = BTreeMap<Group, Vec<TokenIndex>>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleLabeling {
    labels: BTreeMap<usize, LabelGroups>,
    len: usize,
}

impl SampleLabeling {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Build the labeling from its expanded form `label -> group -> indices`.
    ///
    /// Groups past the code group are dropped.
    ///
    pub fn from_expanded(expanded: &[Vec<Vec<TokenIndex>>]) -> Self {
        let mut labels = BTreeMap::new();
        for (label, groups) in expanded.iter().enumerate() {
            if groups.len() > MAX_GROUPS_PER_LABEL {
                warn!(
                    "Label {} has {} groups, keeping the first {}",
                    label,
                    groups.len(),
                    MAX_GROUPS_PER_LABEL
                );
            }
            let groups: LabelGroups = groups
                .iter()
                .take(MAX_GROUPS_PER_LABEL)
                .enumerate()
                .filter_map(|(i, tokens)| Group::from_index(i).map(|g| (g, tokens.clone())))
                .collect();
            labels.insert(label, groups);
        }

        SampleLabeling {
            labels,
            len: expanded.len(),
        }
    }

    ///
    /// The expanded form `label -> group -> indices`. Labels never written to
    /// come out as two empty groups; a label stops at its last stored group.
    ///
    pub fn to_expanded(&self) -> Vec<Vec<Vec<TokenIndex>>> {
        (0..self.len)
            .map(|label| match self.labels.get(&label) {
                None => vec![vec![]; MAX_GROUPS_PER_LABEL],
                Some(groups) => {
                    let width = groups.keys().last().map(|g| g.index() + 1).unwrap_or(0);
                    (0..width)
                        .map(|i| {
                            Group::from_index(i)
                                .and_then(|g| groups.get(&g).cloned())
                                .unwrap_or_default()
                        })
                        .collect()
                }
            })
            .collect()
    }

    ///
    /// The persisted `match` structure, every group range-encoded.
    ///
    pub fn to_match(&self) -> Vec<Vec<Vec<TokenIndex>>> {
        indices_to_match(&self.to_expanded())
    }

    pub fn num_labels(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    ///
    /// Tokens of one label and group. Labels below [Self::num_labels] that
    /// were never written read as empty; a stored label without that group
    /// reads as `None`.
    ///
    pub fn tokens(&self, group: Group, label: usize) -> Option<&[TokenIndex]> {
        if label >= self.len {
            return None;
        }
        match self.labels.get(&label) {
            None => Some(&[]),
            Some(groups) => groups.get(&group).map(|tokens| tokens.as_slice()),
        }
    }

    ///
    /// Tokens of one group for every label, missing groups as empty lists.
    ///
    pub fn tokens_on_group(&self, group: Group) -> Vec<Vec<TokenIndex>> {
        (0..self.len)
            .map(|label| self.tokens(group, label).map(|t| t.to_vec()).unwrap_or_default())
            .collect()
    }

    ///
    /// Append tokens to a label, growing the sample and the label as needed.
    /// Existing membership is not checked. `usize::MAX` is not a valid label
    /// and is ignored.
    ///
    pub fn add(&mut self, group: Group, label: usize, tokens: &[TokenIndex]) {
        let Some(len) = label.checked_add(1) else {
            warn!("Label {} is out of range, ignoring", label);
            return;
        };
        if self.len < len {
            self.len = len;
        }
        let groups = self.labels.entry(label).or_default();
        for g in Group::ALL {
            groups.entry(g).or_default();
        }
        if let Some(indices) = groups.get_mut(&group) {
            indices.extend_from_slice(tokens);
        }
    }

    ///
    /// Remove tokens from one label. Returns whether the label and group
    /// existed.
    ///
    pub fn remove(&mut self, group: Group, label: usize, tokens: &[TokenIndex]) -> bool {
        let Some(indices) = self
            .labels
            .get_mut(&label)
            .and_then(|groups| groups.get_mut(&group))
        else {
            return false;
        };
        indices.retain(|idx| !tokens.contains(idx));
        true
    }

    pub fn remove_from_all(&mut self, group: Group, tokens: &[TokenIndex]) {
        for label in 0..self.len {
            self.remove(group, label, tokens);
        }
    }
}
