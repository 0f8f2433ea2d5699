//! Assignment detail use-case.
//!
//! # Responsibility
//! - Load one assignment and expose its derived completion progress.
//! - Route subtask toggles and full updates to the repository, then reload.
//!
//! # Invariants
//! - `progress()` is `checked / max(1, total)`, so no subtasks reads as 0.
//! - Every write is followed by a full reload; no incremental patching.

use crate::model::assignment::{Assignment, AssignmentId, Subtask};
use crate::repo::assignment_repo::{AssignmentRepository, RepoError, RepoResult};
use log::debug;

/// Detail view bound to one assignment id.
pub struct AssignmentDetailView<R: AssignmentRepository> {
    repo: R,
    assignment_id: AssignmentId,
    assignment: Option<Assignment>,
}

impl<R: AssignmentRepository> AssignmentDetailView<R> {
    /// Creates the view without touching storage. Call `load()` next.
    pub fn new(repo: R, assignment_id: impl Into<AssignmentId>) -> Self {
        Self {
            repo,
            assignment_id: assignment_id.into(),
            assignment: None,
        }
    }

    pub fn assignment_id(&self) -> &str {
        &self.assignment_id
    }

    /// Reads the assignment again. `Ok(None)` means it no longer exists.
    pub fn load(&mut self) -> RepoResult<Option<&Assignment>> {
        self.assignment = self.repo.get_assignment(&self.assignment_id)?;
        debug!(
            "event=assignment_detail_load module=service status=ok assignment_id={} found={}",
            self.assignment_id,
            self.assignment.is_some()
        );
        Ok(self.assignment.as_ref())
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    /// Subtasks of the loaded assignment, empty when nothing is loaded.
    pub fn subtasks(&self) -> &[Subtask] {
        match &self.assignment {
            Some(assignment) => &assignment.subtasks,
            None => &[],
        }
    }

    /// Completion in `[0, 1]`; `0.0` when nothing is loaded.
    pub fn progress(&self) -> f64 {
        self.assignment
            .as_ref()
            .map_or(0.0, Assignment::completion_ratio)
    }

    /// Flips the checked state of one loaded subtask and reloads.
    ///
    /// # Errors
    /// - `NotFound` when the subtask is not part of the loaded assignment.
    pub fn toggle_subtask(&mut self, subtask_id: &str) -> RepoResult<()> {
        let current = self
            .subtasks()
            .iter()
            .find(|subtask| subtask.id == subtask_id)
            .map(|subtask| subtask.is_checked)
            .ok_or_else(|| RepoError::NotFound(subtask_id.to_string()))?;

        self.repo.toggle_subtask_checked(subtask_id, !current)?;
        self.load()?;
        Ok(())
    }

    /// Saves a full replacement of the assignment and reloads.
    pub fn update_assignment(&mut self, updated: &Assignment) -> RepoResult<()> {
        self.repo.save_assignment(updated)?;
        self.load()?;
        Ok(())
    }
}
