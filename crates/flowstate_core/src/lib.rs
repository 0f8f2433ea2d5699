//! Core domain logic for Flowstate, a local assignment tracker.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::assignment::{
    Assignment, AssignmentId, Subtask, DEFAULT_COLOR_HEX, MAX_SUBTASK_WEIGHT, PRIORITY_HIGH,
    PRIORITY_LOW, PRIORITY_MEDIUM,
};
pub use model::course::Course;
pub use model::validation::ValidationError;
pub use repo::assignment_repo::{
    AssignmentRepository, RepoError, RepoResult, SqliteAssignmentRepository,
};
pub use repo::course_repo::{CourseRepository, SqliteCourseRepository};
pub use service::assignment_detail::AssignmentDetailView;
pub use service::assignment_edit::{
    check_subtask_weights, create_assignment, parse_optional_number, AssignmentDraft,
    AssignmentEditor, EditError,
};
pub use service::assignment_list::{
    AssignmentListView, CourseFilter, StatusFilter, ALL_COURSES_LABEL, DASHBOARD_UPCOMING_LIMIT,
};
pub use service::now_epoch_ms;
pub use service::profile::ProfileView;
pub use service::seed::{seed_sample_data, SAMPLE_ASSIGNMENT_ID};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
