//! Assignment and subtask domain model.
//!
//! # Responsibility
//! - Define the assignment record and its owned, weighted subtasks.
//! - Derive completion from subtasks instead of the stored `progress`.
//!
//! # Invariants
//! - `id` is non-empty and stable for the assignment lifetime.
//! - Subtask ids are unique within one assignment and every subtask points
//!   back at its owner.
//! - Subtask weights summing to 100 is an edit-time rule, not checked here.

use crate::model::validation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

static COLOR_HEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$").expect("valid color hex regex")
});

/// Opaque assignment identifier.
///
/// Generated assignments use UUID v4 text, seeded and imported rows may use
/// any non-empty string.
pub type AssignmentId = String;

pub const PRIORITY_LOW: i64 = 0;
pub const PRIORITY_MEDIUM: i64 = 1;
pub const PRIORITY_HIGH: i64 = 2;

/// Upper bound of a single subtask weight, in percent.
pub const MAX_SUBTASK_WEIGHT: i64 = 100;

/// Card color used when none was chosen.
pub const DEFAULT_COLOR_HEX: &str = "#FBDE98";

/// Weighted, checkable sub-item of an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub assignment_id: AssignmentId,
    pub text: String,
    pub is_checked: bool,
    /// Share of the assignment in percent.
    pub weight: i64,
}

impl Subtask {
    /// Creates an unchecked subtask with a generated id.
    pub fn new(
        assignment_id: impl Into<AssignmentId>,
        text: impl Into<String>,
        weight: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            assignment_id: assignment_id.into(),
            text: text.into(),
            is_checked: false,
            weight,
        }
    }

    /// Checks that `weight` is a percentage in `0..=MAX_SUBTASK_WEIGHT`.
    pub fn check_weight(&self) -> Result<(), ValidationError> {
        if (0..=MAX_SUBTASK_WEIGHT).contains(&self.weight) {
            return Ok(());
        }
        Err(ValidationError::WeightOutOfRange {
            subtask_id: self.id.clone(),
            weight: self.weight,
        })
    }
}

/// Trackable academic task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    /// Free-text course code, matched against `Course::course_code`.
    pub course_id: String,
    /// Unix epoch milliseconds.
    pub due_date: i64,
    pub priority: i64,
    /// Stored legacy value. Use `completion_ratio()` for display.
    pub progress: i64,
    pub notes: Option<String>,
    pub estimated_time_minutes: Option<i64>,
    pub expected_grade: Option<i64>,
    pub actual_grade: Option<i64>,
    pub is_completed: bool,
    pub color_hex: String,
    pub subtasks: Vec<Subtask>,
}

impl Assignment {
    /// Creates a pending, medium-priority assignment with a generated id.
    pub fn new(title: impl Into<String>, course_id: impl Into<String>, due_date: i64) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title, course_id, due_date)
    }

    /// Creates an assignment with a caller-provided id.
    ///
    /// Used by the seed routine and import paths where identity already
    /// exists. Does not validate; repositories do.
    pub fn with_id(
        id: impl Into<AssignmentId>,
        title: impl Into<String>,
        course_id: impl Into<String>,
        due_date: i64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            course_id: course_id.into(),
            due_date,
            priority: PRIORITY_MEDIUM,
            progress: 0,
            notes: None,
            estimated_time_minutes: None,
            expected_grade: None,
            actual_grade: None,
            is_completed: false,
            color_hex: DEFAULT_COLOR_HEX.to_string(),
            subtasks: Vec::new(),
        }
    }

    /// Appends an unchecked subtask owned by this assignment and returns it.
    pub fn push_subtask(&mut self, text: impl Into<String>, weight: i64) -> &Subtask {
        let subtask = Subtask::new(self.id.clone(), text, weight);
        self.subtasks.push(subtask);
        self.subtasks.last().expect("subtask was just pushed")
    }

    /// Fraction of checked subtasks in `[0, 1]`.
    ///
    /// The denominator is clamped to 1, so an assignment without subtasks
    /// reports `0.0`.
    pub fn completion_ratio(&self) -> f64 {
        let checked = self.subtasks.iter().filter(|s| s.is_checked).count();
        let total = self.subtasks.len().max(1);
        checked as f64 / total as f64
    }

    /// Sum of all subtask weights, saturating on unvalidated values.
    pub fn total_subtask_weight(&self) -> i64 {
        self.subtasks
            .iter()
            .fold(0_i64, |total, s| total.saturating_add(s.weight))
    }

    /// Due strictly before `now_ms`. Completion is not considered.
    pub fn is_overdue(&self, now_ms: i64) -> bool {
        self.due_date < now_ms
    }

    /// Checks invariants required before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if !(PRIORITY_LOW..=PRIORITY_HIGH).contains(&self.priority) {
            return Err(ValidationError::PriorityOutOfRange(self.priority));
        }
        if !COLOR_HEX_RE.is_match(&self.color_hex) {
            return Err(ValidationError::InvalidColorHex(self.color_hex.clone()));
        }

        let mut seen = HashSet::with_capacity(self.subtasks.len());
        for subtask in &self.subtasks {
            if subtask.id.trim().is_empty() {
                return Err(ValidationError::EmptySubtaskId);
            }
            if !seen.insert(subtask.id.as_str()) {
                return Err(ValidationError::DuplicateSubtaskId(subtask.id.clone()));
            }
            if subtask.assignment_id != self.id {
                return Err(ValidationError::SubtaskOwnerMismatch {
                    subtask_id: subtask.id.clone(),
                    assignment_id: self.id.clone(),
                });
            }
            subtask.check_weight()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Assignment {
        Assignment::with_id("a1", "Essay", "ENGL1010", 1_700_000_000_000)
    }

    #[test]
    fn completion_ratio_is_zero_without_subtasks() {
        assert_eq!(sample().completion_ratio(), 0.0);
    }

    #[test]
    fn completion_ratio_counts_checked_subtasks() {
        let mut assignment = sample();
        assignment.push_subtask("outline", 30);
        assignment.push_subtask("draft", 30);
        assignment.push_subtask("edit", 20);
        assignment.push_subtask("submit", 20);
        assignment.subtasks[0].is_checked = true;

        assert_eq!(assignment.completion_ratio(), 0.25);
        assert_eq!(assignment.total_subtask_weight(), 100);
    }

    #[test]
    fn overdue_ignores_completion() {
        let mut assignment = sample();
        assignment.is_completed = true;
        assert!(assignment.is_overdue(assignment.due_date + 1));
        assert!(!assignment.is_overdue(assignment.due_date));
    }

    #[test]
    fn validate_accepts_argb_and_rgb_colors() {
        let mut assignment = sample();
        assert!(assignment.validate().is_ok());
        assignment.color_hex = "#FF6750A4".to_string();
        assert!(assignment.validate().is_ok());
        assignment.color_hex = "FBDE98".to_string();
        assert_eq!(
            assignment.validate(),
            Err(ValidationError::InvalidColorHex("FBDE98".to_string()))
        );
    }

    #[test]
    fn validate_rejects_priority_out_of_range() {
        let mut assignment = sample();
        assignment.priority = 3;
        assert_eq!(
            assignment.validate(),
            Err(ValidationError::PriorityOutOfRange(3))
        );
    }

    #[test]
    fn validate_rejects_duplicate_and_foreign_subtasks() {
        let mut assignment = sample();
        assignment.push_subtask("one", 50);
        let mut copy = assignment.subtasks[0].clone();
        copy.text = "copy".to_string();
        assignment.subtasks.push(copy.clone());
        assert_eq!(
            assignment.validate(),
            Err(ValidationError::DuplicateSubtaskId(copy.id.clone()))
        );

        assignment.subtasks.pop();
        assignment.subtasks.push(Subtask::new("other", "foreign", 50));
        assert!(matches!(
            assignment.validate(),
            Err(ValidationError::SubtaskOwnerMismatch { .. })
        ));
    }

    #[test]
    fn validate_rejects_weights_outside_percentage_range() {
        let mut assignment = sample();
        assignment.push_subtask("all of it", 100);
        assert!(assignment.validate().is_ok());

        let id = assignment.push_subtask("too much", 101).id.clone();
        assert_eq!(
            assignment.validate(),
            Err(ValidationError::WeightOutOfRange {
                subtask_id: id,
                weight: 101
            })
        );

        assignment.subtasks[1].weight = -1;
        assert!(matches!(
            assignment.validate(),
            Err(ValidationError::WeightOutOfRange { weight: -1, .. })
        ));
    }

    #[test]
    fn push_subtask_returns_the_appended_subtask() {
        let mut assignment = sample();
        let pushed = assignment.push_subtask("outline", 40).clone();
        assert_eq!(assignment.subtasks.last(), Some(&pushed));
        assert_eq!(pushed.assignment_id, "a1");
    }

    #[test]
    fn total_subtask_weight_saturates_instead_of_overflowing() {
        let mut assignment = sample();
        assignment.push_subtask("huge", i64::MAX);
        assignment.push_subtask("one more", 1);
        assert_eq!(assignment.total_subtask_weight(), i64::MAX);
    }
}
