use std::fs::read_to_string;
use std::path::Path;

use thiserror::Error;

use serde::{Deserialize, Serialize};

use alignlab_core::models::Group;

/// Continuation marker byte-level BPE tokenizers put in front of a word (`Ġ`).
pub const DEFAULT_SUBWORD_MARKER: char = '\u{0120}';
pub const DEFAULT_COMMENT_MARKER: char = '#';

///
/// Text policies applied while matching tokens against their source text.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Drop `"""..."""` and `'''...'''` blocks before matching.
    pub remove_docstrings: bool,
    /// Jump over a `#` line comment in front of the next token.
    pub skip_line_comments: bool,
    pub comment_marker: char,
    pub subword_marker: char,
    pub groups: GroupOverrides,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GroupOverrides {
    pub comment: Option<GroupPolicy>,
    pub code: Option<GroupPolicy>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct GroupPolicy {
    pub remove_docstrings: Option<bool>,
    pub skip_line_comments: Option<bool>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        ReconcileConfig {
            remove_docstrings: true,
            skip_line_comments: true,
            comment_marker: DEFAULT_COMMENT_MARKER,
            subword_marker: DEFAULT_SUBWORD_MARKER,
            groups: GroupOverrides::default(),
        }
    }
}

impl ReconcileConfig {
    ///
    /// Resolve the policies for one group, applying its overrides.
    ///
    /// # Arguments:
    /// - group: the group the text belongs to
    ///
    pub fn for_group(&self, group: Group) -> ReconcileConfig {
        let policy = match group {
            Group::Comment => self.groups.comment,
            Group::Code => self.groups.code,
        }
        .unwrap_or_default();

        ReconcileConfig {
            remove_docstrings: policy.remove_docstrings.unwrap_or(self.remove_docstrings),
            skip_line_comments: policy
                .skip_line_comments
                .unwrap_or(self.skip_line_comments),
            comment_marker: self.comment_marker,
            subword_marker: self.subword_marker,
            groups: GroupOverrides::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ReconcileConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl TryFrom<&Path> for ReconcileConfig {
    type Error = ReconcileConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use std::path::PathBuf;

    #[rstest]
    fn test_default_keeps_both_policies_on() {
        let config = ReconcileConfig::default();
        for group in Group::ALL {
            let resolved = config.for_group(group);
            assert_eq!(resolved.remove_docstrings, true);
            assert_eq!(resolved.skip_line_comments, true);
        }
    }

    #[rstest]
    fn test_try_from_toml() {
        let path = PathBuf::from("../tests/data/reconcile.toml");
        let config = ReconcileConfig::try_from(path.as_path()).unwrap();

        assert_eq!(config.remove_docstrings, true);
        assert_eq!(config.subword_marker, '\u{0120}');

        let comment = config.for_group(Group::Comment);
        assert_eq!(comment.skip_line_comments, false);

        let code = config.for_group(Group::Code);
        assert_eq!(code.skip_line_comments, true);
    }

    #[rstest]
    fn test_try_from_missing_file() {
        let path = PathBuf::from("../tests/data/missing.toml");
        let result = ReconcileConfig::try_from(path.as_path());
        assert_eq!(result.is_err(), true);
    }

    #[rstest]
    fn test_parse_inline_overrides() {
        let config: ReconcileConfig = toml::from_str(
            r#"
            remove_docstrings = false

            [groups.code]
            remove_docstrings = true
            "#,
        )
        .unwrap();

        assert_eq!(config.for_group(Group::Comment).remove_docstrings, false);
        assert_eq!(config.for_group(Group::Code).remove_docstrings, true);
        assert_eq!(config.comment_marker, '#');
    }
}
