use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::GroupParseError;

pub const COMMENT_GROUP: usize = 0;
pub const CODE_GROUP: usize = 1;

///
/// One of the two parallel token sequences of a sample.
///
/// The numeric position of a group inside a persisted label is fixed:
/// comment is `0`, code is `1`.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Comment,
    Code,
}

impl Group {
    pub const ALL: [Group; 2] = [Group::Comment, Group::Code];

    pub fn index(self) -> usize {
        match self {
            Group::Comment => COMMENT_GROUP,
            Group::Code => CODE_GROUP,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            COMMENT_GROUP => Some(Group::Comment),
            CODE_GROUP => Some(Group::Code),
            _ => None,
        }
    }

    ///
    /// Glyph appended to repeated tokens of this group when building unique symbols.
    ///
    pub fn symbol_marker(self) -> char {
        match self {
            Group::Comment => '▲',
            Group::Code => '■',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Group::Comment => "comment",
            Group::Code => "code",
        }
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Group {
    type Err = GroupParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "comment" | "docstring" | "0" => Ok(Group::Comment),
            "code" | "1" => Ok(Group::Code),
            _ => Err(GroupParseError(s.to_string())),
        }
    }
}

impl TryFrom<usize> for Group {
    type Error = GroupParseError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Group::from_index(value).ok_or_else(|| GroupParseError(value.to_string()))
    }
}
