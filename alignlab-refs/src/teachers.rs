//!
//! Student -> teacher sample lookup, loaded once per corpus.
//!
use std::str::FromStr;

use fxhash::FxHashMap as HashMap;
use log::info;

use alignlab_core::jsonl::{LinePolicy, parse_json_lines};
use alignlab_core::models::{SampleIndex, TeacherRecord, TeacherRef};

use crate::error::TeachersError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TeachersRelationshipProvider {
    teachers: HashMap<SampleIndex, Vec<TeacherRef>>,
}

impl TeachersRelationshipProvider {
    pub fn new(records: Vec<TeacherRecord>) -> Self {
        let teachers = records
            .into_iter()
            .map(|record| (record.student_idx, record.teachers))
            .collect();
        Self { teachers }
    }

    ///
    /// Replace the lookup with the content of a teacher file. On error the
    /// current lookup is kept as is.
    ///
    pub fn replace_from_str(&mut self, content: &str) -> Result<(), TeachersError> {
        *self = content.parse()?;
        Ok(())
    }

    pub fn get_teachers(&self, student: SampleIndex) -> Option<&[TeacherRef]> {
        self.teachers.get(&student).map(|teachers| teachers.as_slice())
    }

    pub fn teacher_indices(&self, student: SampleIndex) -> Vec<SampleIndex> {
        self.get_teachers(student)
            .map(|teachers| teachers.iter().map(|t| t.teacher_idx).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.teachers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teachers.is_empty()
    }
}

impl FromStr for TeachersRelationshipProvider {
    type Err = TeachersError;

    ///
    /// Parse a whole teacher file. Any malformed line rejects the file.
    ///
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let records = parse_json_lines(content, LinePolicy::Abort, TeacherRecord::parse_line)?;
        info!("Loaded teachers for {} students", records.len());
        Ok(TeachersRelationshipProvider::new(records))
    }
}
