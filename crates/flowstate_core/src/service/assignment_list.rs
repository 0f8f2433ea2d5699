//! Assignment list use-case.
//!
//! # Responsibility
//! - Hold the assignment set loaded by the last `reload()`.
//! - Apply the status and course filters, both ANDed together.
//! - Derive the course filter options and the dashboard "upcoming" slice.
//!
//! # Invariants
//! - `Overdue` means `due_date < now`; completed assignments still match.
//! - Course options start with `All Courses`, then distinct course ids in
//!   first-occurrence order.

use crate::model::assignment::Assignment;
use crate::repo::assignment_repo::{AssignmentRepository, RepoResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Label of the course filter option that disables course filtering.
pub const ALL_COURSES_LABEL: &str = "All Courses";

/// Number of assignments shown in the dashboard upcoming list.
pub const DASHBOARD_UPCOMING_LIMIT: usize = 5;

/// Completion-status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
    Overdue,
}

impl StatusFilter {
    /// Every filter in display order.
    pub const OPTIONS: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Pending,
        StatusFilter::Completed,
        StatusFilter::Overdue,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Overdue => "Overdue",
        }
    }

    /// Parses a display label; unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::OPTIONS
            .into_iter()
            .find(|filter| filter.label() == label)
    }

    pub fn matches(self, assignment: &Assignment, now_ms: i64) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !assignment.is_completed,
            Self::Completed => assignment.is_completed,
            Self::Overdue => assignment.is_overdue(now_ms),
        }
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Course filter, matched against `Assignment::course_id` by exact text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseFilter {
    #[default]
    AllCourses,
    Course(String),
}

impl CourseFilter {
    /// Maps a course option label back to a filter.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_COURSES_LABEL {
            Self::AllCourses
        } else {
            Self::Course(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::AllCourses => ALL_COURSES_LABEL,
            Self::Course(code) => code.as_str(),
        }
    }

    pub fn matches(&self, assignment: &Assignment) -> bool {
        match self {
            Self::AllCourses => true,
            Self::Course(code) => assignment.course_id == *code,
        }
    }
}

/// Pull-based list view over an assignment repository.
pub struct AssignmentListView<R: AssignmentRepository> {
    repo: R,
    assignments: Vec<Assignment>,
    status_filter: StatusFilter,
    course_filter: CourseFilter,
}

impl<R: AssignmentRepository> AssignmentListView<R> {
    /// Creates an empty view with both filters unset. Call `reload()` to
    /// populate it.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            assignments: Vec::new(),
            status_filter: StatusFilter::default(),
            course_filter: CourseFilter::default(),
        }
    }

    /// Replaces the held set with a fresh repository read.
    ///
    /// On error the previously loaded set is kept.
    pub fn reload(&mut self) -> RepoResult<&[Assignment]> {
        self.assignments = self.repo.list_assignments()?;
        debug!(
            "event=assignment_list_reload module=service status=ok count={}",
            self.assignments.len()
        );
        Ok(&self.assignments)
    }

    /// Unfiltered assignments from the last reload.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
    }

    pub fn course_filter(&self) -> &CourseFilter {
        &self.course_filter
    }

    pub fn set_course_filter(&mut self, filter: CourseFilter) {
        self.course_filter = filter;
    }

    /// Assignments matching both filters, in loaded order.
    pub fn filtered(&self, now_ms: i64) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|assignment| {
                self.status_filter.matches(assignment, now_ms)
                    && self.course_filter.matches(assignment)
            })
            .collect()
    }

    /// `All Courses` followed by the distinct course ids of loaded
    /// assignments.
    pub fn course_options(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut options = vec![ALL_COURSES_LABEL.to_string()];
        for assignment in &self.assignments {
            if seen.insert(assignment.course_id.as_str()) {
                options.push(assignment.course_id.clone());
            }
        }
        options
    }

    /// Pending assignments ordered by due date, at most `limit` of them.
    ///
    /// Ignores the active filters.
    pub fn upcoming(&self, limit: usize) -> Vec<&Assignment> {
        let mut pending: Vec<&Assignment> = self
            .assignments
            .iter()
            .filter(|assignment| !assignment.is_completed)
            .collect();
        pending.sort_by_key(|assignment| assignment.due_date);
        pending.truncate(limit);
        pending
    }

    /// Releases the underlying repository.
    pub fn into_repository(self) -> R {
        self.repo
    }
}

#[cfg(test)]
mod tests {
    use super::{CourseFilter, StatusFilter, ALL_COURSES_LABEL};
    use crate::model::assignment::Assignment;

    #[test]
    fn status_labels_roundtrip() {
        for filter in StatusFilter::OPTIONS {
            assert_eq!(StatusFilter::from_label(filter.label()), Some(filter));
        }
        assert_eq!(StatusFilter::from_label("Archived"), None);
    }

    #[test]
    fn course_filter_label_maps_all_courses() {
        assert_eq!(
            CourseFilter::from_label(ALL_COURSES_LABEL),
            CourseFilter::AllCourses
        );
        assert_eq!(
            CourseFilter::from_label("PROG3211"),
            CourseFilter::Course("PROG3211".to_string())
        );
    }

    #[test]
    fn overdue_matches_completed_assignment() {
        let now = 1_700_000_000_000;
        let mut assignment = Assignment::with_id("a1", "Lab", "PROG3211", now - 1000);
        assignment.is_completed = true;

        assert!(StatusFilter::Overdue.matches(&assignment, now));
        assert!(StatusFilter::Completed.matches(&assignment, now));
        assert!(!StatusFilter::Pending.matches(&assignment, now));
    }
}
