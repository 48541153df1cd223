//!
//! Persisted record types and their schema validation.
//!
//! Each record type is validated from a parsed `serde_json::Value` so a
//! rejection always names the field that broke the schema. The surrounding
//! line-delimited format is handled separately in [crate::jsonl].
//!
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{SampleIndex, TokenIndex};
use crate::errors::RecordError;

/// Groups a label carries: comment and code. Further groups are dropped on load.
pub const MAX_GROUPS_PER_LABEL: usize = 2;

///
/// One line of the labeling file: `{"idx": 5, "match": [[[0, 2], [1, 1]]]}`.
///
/// `ranges[label][group]` is a flat paired-range encoding (see
/// [crate::models::TokenRanges]).
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelingRecord {
    pub idx: SampleIndex,
    #[serde(rename = "match")]
    pub ranges: Vec<Vec<Vec<TokenIndex>>>,
}

impl LabelingRecord {
    pub fn new(idx: SampleIndex, ranges: Vec<Vec<Vec<TokenIndex>>>) -> Self {
        Self { idx, ranges }
    }

    ///
    /// Parse and validate one line of a labeling file.
    ///
    pub fn parse_line(line: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(line)?;
        LabelingRecord::try_from(&value)
    }

    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl TryFrom<&Value> for LabelingRecord {
    type Error = RecordError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let object = value.as_object().ok_or(RecordError::NotAnObject)?;

        let idx = index_field(object, "idx")?;

        let raw_match = object
            .get("match")
            .ok_or(RecordError::MissingField("match"))?;
        let ranges: Vec<Vec<Vec<TokenIndex>>> = serde_json::from_value(raw_match.clone())
            .map_err(|e| RecordError::invalid("match", format!("not a number[][][]: {}", e)))?;

        Ok(LabelingRecord { idx, ranges })
    }
}

///
/// A reference sample associated with a student sample. Any fields besides
/// `teacher_idx` (pattern, cluster, ...) are carried along untouched.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeacherRef {
    pub teacher_idx: SampleIndex,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

///
/// One line of the teacher file:
/// `{"student_idx": 546, "teachers": [{"teacher_idx": 18947, "cluster": 12}]}`.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeacherRecord {
    pub student_idx: SampleIndex,
    pub teachers: Vec<TeacherRef>,
}

impl TeacherRecord {
    pub fn parse_line(line: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(line)?;
        TeacherRecord::try_from(&value)
    }
}

impl TryFrom<&Value> for TeacherRecord {
    type Error = RecordError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let object = value.as_object().ok_or(RecordError::NotAnObject)?;

        let student_idx = index_field(object, "student_idx")?;

        let teachers = object
            .get("teachers")
            .ok_or(RecordError::MissingField("teachers"))?
            .as_array()
            .ok_or_else(|| RecordError::invalid("teachers", "not an array"))?;

        let teachers = teachers
            .iter()
            .map(|teacher| {
                let teacher = teacher
                    .as_object()
                    .ok_or_else(|| RecordError::invalid("teachers", "entry is not an object"))?;
                let teacher_idx = index_field(teacher, "teacher_idx")?;
                let mut extra = teacher.clone();
                extra.remove("teacher_idx");
                Ok(TeacherRef { teacher_idx, extra })
            })
            .collect::<Result<Vec<TeacherRef>, RecordError>>()?;

        Ok(TeacherRecord {
            student_idx,
            teachers,
        })
    }
}

///
/// One line of the full-text file. Line `i` holds sample `i`.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullTextRecord {
    pub code: String,
    pub docstring: String,
}

fn index_field(object: &Map<String, Value>, field: &'static str) -> Result<SampleIndex, RecordError> {
    let value = object.get(field).ok_or(RecordError::MissingField(field))?;
    value
        .as_u64()
        .and_then(|v| SampleIndex::try_from(v).ok())
        .ok_or_else(|| RecordError::invalid(field, format!("{} is not a valid sample index", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_parse_labeling_record() {
        let record = LabelingRecord::parse_line(r#"{"idx":5,"match":[[[0,2],[1,1]]]}"#).unwrap();
        assert_eq!(record.idx, 5);
        assert_eq!(record.ranges, vec![vec![vec![0, 2], vec![1, 1]]]);
    }

    #[rstest]
    fn test_labeling_record_serializes_compactly() {
        let record = LabelingRecord::new(5, vec![vec![vec![0, 2], vec![1, 1]], vec![]]);
        assert_eq!(
            record.to_json_line().unwrap(),
            r#"{"idx":5,"match":[[[0,2],[1,1]],[]]}"#
        );
    }

    #[rstest]
    #[case(r#"{"idx":"5","match":[]}"#, Some("idx"))]
    #[case(r#"{"idx":-1,"match":[]}"#, Some("idx"))]
    #[case(r#"{"idx":1.5,"match":[]}"#, Some("idx"))]
    #[case(r#"{"match":[]}"#, Some("idx"))]
    #[case(r#"{"idx":1,"match":[[1,2]]}"#, Some("match"))]
    #[case(r#"{"idx":1,"match":[[["a"]]]}"#, Some("match"))]
    #[case(r#"{"idx":1}"#, Some("match"))]
    #[case(r#"[1, 2]"#, None)]
    #[case(r#"{"idx":1,"#, None)]
    fn test_invalid_labeling_records(#[case] line: &str, #[case] field: Option<&str>) {
        let err = LabelingRecord::parse_line(line).unwrap_err();
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn test_extra_groups_are_left_to_the_store() {
        let record = LabelingRecord::parse_line(r#"{"idx":1,"match":[[[0,0],[1,1],[2,2]]]}"#).unwrap();
        assert_eq!(record.ranges[0].len(), 3);
    }

    #[rstest]
    fn test_parse_teacher_record_keeps_metadata() {
        let line = r#"{"student_idx": 546, "teachers": [{"teacher_idx": 18947, "pattern": "ROOT:VERB_OBJ:NOUN", "cluster": 12}]}"#;
        let record = TeacherRecord::parse_line(line).unwrap();

        assert_eq!(record.student_idx, 546);
        assert_eq!(record.teachers.len(), 1);
        assert_eq!(record.teachers[0].teacher_idx, 18947);
        assert_eq!(record.teachers[0].extra["cluster"], 12);
        assert_eq!(record.teachers[0].extra.contains_key("teacher_idx"), false);
    }

    #[rstest]
    #[case(r#"{"student_idx": "1", "teachers": []}"#, "student_idx")]
    #[case(r#"{"student_idx": 1, "teachers": {}}"#, "teachers")]
    #[case(r#"{"student_idx": 1, "teachers": [{"teacher_idx": "x"}]}"#, "teacher_idx")]
    #[case(r#"{"student_idx": 1, "teachers": [3]}"#, "teachers")]
    #[case(r#"{"student_idx": 1}"#, "teachers")]
    fn test_invalid_teacher_records(#[case] line: &str, #[case] field: &str) {
        let err = TeacherRecord::parse_line(line).unwrap_err();
        assert_eq!(err.field(), Some(field));
    }

    #[rstest]
    fn test_parse_full_text_record() {
        let record: FullTextRecord =
            serde_json::from_str(r#"{"code": "def f(): pass", "docstring": "Does nothing.", "repo": "x"}"#)
                .unwrap();
        assert_eq!(record.code, "def f(): pass");
        assert_eq!(record.docstring, "Does nothing.");
    }
}
