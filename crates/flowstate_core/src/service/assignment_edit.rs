//! Assignment add/edit use-case.
//!
//! # Responsibility
//! - Parse free-text form input into typed assignment fields.
//! - Apply the edit-time subtask weight rule before saving.
//! - Create, save and delete assignments on behalf of add/edit screens.
//!
//! # Invariants
//! - A rejected draft never reaches the repository.
//! - Weights must total 100 only when the draft has subtasks; storage itself
//!   accepts any non-negative weights.

use crate::model::assignment::{
    Assignment, AssignmentId, Subtask, DEFAULT_COLOR_HEX, PRIORITY_MEDIUM,
};
use crate::model::validation::ValidationError;
use crate::repo::assignment_repo::{AssignmentRepository, RepoError, RepoResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Required total of subtask weights, in percent.
pub const REQUIRED_WEIGHT_TOTAL: i64 = 100;

/// Rejection raised by the add/edit flow.
#[derive(Debug)]
pub enum EditError {
    /// A required text field is blank.
    MissingField(&'static str),
    /// A numeric field holds something other than a whole number.
    InvalidNumber { field: &'static str, input: String },
    /// A single subtask weight is not a percentage.
    InvalidWeight(ValidationError),
    /// Subtask weights do not add up to `REQUIRED_WEIGHT_TOTAL`.
    SubtaskWeights { total: i64 },
    /// Storage-level failure, including not-found and model validation.
    Repo(RepoError),
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidNumber { field, input } => {
                write!(f, "{field} must be a whole number, got `{input}`")
            }
            Self::InvalidWeight(err) => write!(f, "{err}"),
            Self::SubtaskWeights { total } => write!(
                f,
                "subtask weights must total {REQUIRED_WEIGHT_TOTAL}% (currently {total}%)"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidWeight(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EditError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Form state of the add/edit screens.
///
/// Optional numeric fields stay as raw text until `parse_optional_number`
/// runs on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDraft {
    pub title: String,
    pub course_id: String,
    pub due_date: i64,
    pub priority: i64,
    /// Blank text is stored as no notes.
    pub notes: String,
    pub estimated_time_minutes: String,
    pub expected_grade: String,
    pub actual_grade: String,
    pub is_completed: bool,
    pub color_hex: String,
    pub subtasks: Vec<Subtask>,
}

impl AssignmentDraft {
    /// Blank draft for the add screen.
    pub fn new(due_date: i64) -> Self {
        Self {
            title: String::new(),
            course_id: String::new(),
            due_date,
            priority: PRIORITY_MEDIUM,
            notes: String::new(),
            estimated_time_minutes: String::new(),
            expected_grade: String::new(),
            actual_grade: String::new(),
            is_completed: false,
            color_hex: DEFAULT_COLOR_HEX.to_string(),
            subtasks: Vec::new(),
        }
    }

    /// Prefills the edit form from a stored assignment.
    pub fn from_assignment(assignment: &Assignment) -> Self {
        Self {
            title: assignment.title.clone(),
            course_id: assignment.course_id.clone(),
            due_date: assignment.due_date,
            priority: assignment.priority,
            notes: assignment.notes.clone().unwrap_or_default(),
            estimated_time_minutes: number_to_text(assignment.estimated_time_minutes),
            expected_grade: number_to_text(assignment.expected_grade),
            actual_grade: number_to_text(assignment.actual_grade),
            is_completed: assignment.is_completed,
            color_hex: assignment.color_hex.clone(),
            subtasks: assignment.subtasks.clone(),
        }
    }

    /// Parses and checks the draft, then writes it over `base`.
    ///
    /// `base` keeps its id and stored `progress`; subtasks are re-owned by
    /// `base.id`. On error `base` is left unchanged.
    pub fn apply_to(&self, base: &mut Assignment) -> Result<(), EditError> {
        if self.title.trim().is_empty() {
            return Err(EditError::MissingField("title"));
        }
        let estimated_time_minutes =
            parse_optional_number("estimated time", &self.estimated_time_minutes)?;
        let expected_grade = parse_optional_number("expected grade", &self.expected_grade)?;
        let actual_grade = parse_optional_number("actual grade", &self.actual_grade)?;
        check_subtask_weights(&self.subtasks)?;

        let notes = self.notes.trim();
        base.title = self.title.trim().to_string();
        base.course_id = self.course_id.trim().to_string();
        base.due_date = self.due_date;
        base.priority = self.priority;
        base.notes = (!notes.is_empty()).then(|| notes.to_string());
        base.estimated_time_minutes = estimated_time_minutes;
        base.expected_grade = expected_grade;
        base.actual_grade = actual_grade;
        base.is_completed = self.is_completed;
        base.color_hex = self.color_hex.clone();
        base.subtasks = self
            .subtasks
            .iter()
            .map(|subtask| Subtask {
                assignment_id: base.id.clone(),
                ..subtask.clone()
            })
            .collect();
        Ok(())
    }
}

/// Parses an optional whole-number form field.
///
/// Blank input means "not set"; anything else must parse as `i64`.
pub fn parse_optional_number(
    field: &'static str,
    input: &str,
) -> Result<Option<i64>, EditError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| EditError::InvalidNumber {
            field,
            input: trimmed.to_string(),
        })
}

/// Edit-time weight rule: with at least one subtask, weights total 100.
///
/// Each weight must be in `0..=100` first, which keeps the sum bounded.
pub fn check_subtask_weights(subtasks: &[Subtask]) -> Result<(), EditError> {
    if subtasks.is_empty() {
        return Ok(());
    }
    for subtask in subtasks {
        subtask.check_weight().map_err(EditError::InvalidWeight)?;
    }
    let total: i64 = subtasks.iter().map(|subtask| subtask.weight).sum();
    if total != REQUIRED_WEIGHT_TOTAL {
        return Err(EditError::SubtaskWeights { total });
    }
    Ok(())
}

/// Creates a new assignment from an add-screen draft.
pub fn create_assignment<R: AssignmentRepository>(
    repo: &mut R,
    draft: &AssignmentDraft,
) -> Result<Assignment, EditError> {
    let mut assignment = Assignment::new("", "", draft.due_date);
    if let Err(err) = draft.apply_to(&mut assignment) {
        warn!("event=assignment_add module=service status=rejected error={err}");
        return Err(err);
    }
    repo.create_assignment(&assignment)?;
    Ok(assignment)
}

/// Edit view bound to one stored assignment.
pub struct AssignmentEditor<R: AssignmentRepository> {
    repo: R,
    assignment_id: AssignmentId,
    assignment: Option<Assignment>,
}

impl<R: AssignmentRepository> AssignmentEditor<R> {
    pub fn new(repo: R, assignment_id: impl Into<AssignmentId>) -> Self {
        Self {
            repo,
            assignment_id: assignment_id.into(),
            assignment: None,
        }
    }

    /// Reads the assignment being edited.
    pub fn load(&mut self) -> RepoResult<Option<&Assignment>> {
        self.assignment = self.repo.get_assignment(&self.assignment_id)?;
        Ok(self.assignment.as_ref())
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    /// Form state for the loaded assignment.
    pub fn draft(&self) -> Option<AssignmentDraft> {
        self.assignment.as_ref().map(AssignmentDraft::from_assignment)
    }

    /// Validates the draft, saves it atomically and reloads.
    ///
    /// # Errors
    /// - `Repo(NotFound)` when nothing is loaded.
    /// - Parse and weight rejections; nothing is written in that case.
    pub fn save(&mut self, draft: &AssignmentDraft) -> Result<&Assignment, EditError> {
        let Some(loaded) = self.assignment.as_ref() else {
            return Err(RepoError::NotFound(self.assignment_id.clone()).into());
        };

        let mut updated = loaded.clone();
        if let Err(err) = draft.apply_to(&mut updated) {
            warn!(
                "event=assignment_edit module=service status=rejected assignment_id={} error={err}",
                self.assignment_id
            );
            return Err(err);
        }

        self.repo.save_assignment(&updated)?;
        info!(
            "event=assignment_edit module=service status=ok assignment_id={}",
            self.assignment_id
        );
        let assignment_id = self.assignment_id.clone();
        self.load()?
            .ok_or_else(|| RepoError::NotFound(assignment_id).into())
    }

    /// Deletes the assignment and its subtasks.
    pub fn delete(&mut self) -> RepoResult<()> {
        self.repo.delete_assignment(&self.assignment_id)?;
        self.assignment = None;
        Ok(())
    }
}

fn number_to_text(value: Option<i64>) -> String {
    value.map(|number| number.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{check_subtask_weights, parse_optional_number, EditError};
    use crate::model::assignment::Subtask;
    use crate::model::validation::ValidationError;

    #[test]
    fn parse_optional_number_accepts_blank_and_integers() {
        assert_eq!(parse_optional_number("expected grade", "  ").unwrap(), None);
        assert_eq!(
            parse_optional_number("expected grade", " 85 ").unwrap(),
            Some(85)
        );
    }

    #[test]
    fn parse_optional_number_reports_field_and_input() {
        let err = parse_optional_number("estimated time", "two hours").unwrap_err();
        assert!(matches!(
            &err,
            EditError::InvalidNumber { field: "estimated time", input } if input == "two hours"
        ));
        assert_eq!(
            err.to_string(),
            "estimated time must be a whole number, got `two hours`"
        );
    }

    #[test]
    fn weight_rule_skips_empty_subtask_lists() {
        assert!(check_subtask_weights(&[]).is_ok());
    }

    #[test]
    fn weight_rule_reports_current_total() {
        let subtasks = vec![Subtask::new("a1", "one", 60), Subtask::new("a1", "two", 30)];
        let err = check_subtask_weights(&subtasks).unwrap_err();
        assert!(matches!(err, EditError::SubtaskWeights { total: 90 }));
    }

    #[test]
    fn weight_rule_rejects_huge_weights_without_overflow() {
        let subtasks = vec![
            Subtask::new("a1", "huge", i64::MAX),
            Subtask::new("a1", "one", 1),
        ];
        let err = check_subtask_weights(&subtasks).unwrap_err();
        assert!(matches!(
            err,
            EditError::InvalidWeight(ValidationError::WeightOutOfRange {
                weight: i64::MAX,
                ..
            })
        ));
    }

    #[test]
    fn weight_rule_rejects_negative_weights_that_balance_to_100() {
        let subtasks = vec![
            Subtask::new("a1", "plus", 150),
            Subtask::new("a1", "minus", -50),
        ];
        let err = check_subtask_weights(&subtasks).unwrap_err();
        assert!(matches!(err, EditError::InvalidWeight(_)));
    }
}
