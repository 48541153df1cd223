//!
//! Line-delimited JSON handling.
//!
//! This is the single place where the policy for a malformed line is applied:
//! either the whole batch is rejected ([LinePolicy::Abort]) or the offending
//! line is logged and dropped ([LinePolicy::SkipInvalid]).
//!
use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::{JsonLinesError, RecordError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinePolicy {
    /// Reject the whole batch on the first malformed line.
    #[default]
    Abort,
    /// Drop malformed lines and keep going.
    SkipInvalid,
}

impl std::str::FromStr for LinePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(LinePolicy::Abort),
            "skip" | "skip-invalid" => Ok(LinePolicy::SkipInvalid),
            _ => Err(format!(
                "Invalid line policy: {}. Valid options are 'abort' or 'skip'",
                s
            )),
        }
    }
}

///
/// Parse every non-blank line of `content` with `parse`.
///
/// Lines are trimmed before parsing and blank lines are ignored. Line numbers
/// in errors are 1-based.
///
/// # Arguments:
/// - content: the whole line-delimited text
/// - policy: what to do with a line `parse` rejects
/// - parse: validator for a single line
///
pub fn parse_json_lines<T, F>(
    content: &str,
    policy: LinePolicy,
    mut parse: F,
) -> Result<Vec<T>, JsonLinesError>
where
    F: FnMut(&str) -> Result<T, RecordError>,
{
    let mut records = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse(line) {
            Ok(record) => records.push(record),
            Err(source) => match policy {
                LinePolicy::Abort => {
                    return Err(JsonLinesError {
                        line: i + 1,
                        source,
                    });
                }
                LinePolicy::SkipInvalid => {
                    warn!("Skipping line {}: {}", i + 1, source);
                }
            },
        }
    }

    Ok(records)
}
