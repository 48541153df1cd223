pub mod group;
pub mod ranges;
pub mod records;
pub mod sample;

/// Dense, zero-based id of a non-special token within one group of a sample.
pub type TokenIndex = u32;

/// Id of a sample in the corpus (its line number in the positional files).
pub type SampleIndex = u32;

// re-export for cleaner imports
pub use self::group::{CODE_GROUP, COMMENT_GROUP, Group};
pub use self::ranges::{TokenRanges, indices_to_match, match_to_indices};
pub use self::records::{FullTextRecord, LabelingRecord, TeacherRecord, TeacherRef};
pub use self::sample::LabeledTextSample;
