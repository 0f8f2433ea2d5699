//! Course domain model.
//!
//! A course groups assignments by its `course_code`; the link is a plain
//! text match, never a foreign key.

use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Term-scoped academic unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    /// Short code, e.g. `INFO3130`. Matches `Assignment::course_id`.
    pub course_code: String,
    pub course_name: String,
    /// Free-text term label, e.g. `Fall 2024`.
    pub term: String,
    pub is_current_term: bool,
    /// 0-100, meaningful for current-term courses.
    pub progress: i64,
    /// Owned case study names, in insertion order.
    pub case_studies: Vec<String>,
}

impl Course {
    /// Creates a course with a generated id and no case studies.
    pub fn new(
        course_code: impl Into<String>,
        course_name: impl Into<String>,
        term: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            course_code: course_code.into(),
            course_name: course_name.into(),
            term: term.into(),
            is_current_term: false,
            progress: 0,
            case_studies: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if !(0..=100).contains(&self.progress) {
            return Err(ValidationError::CourseProgressOutOfRange(self.progress));
        }
        Ok(())
    }
}
