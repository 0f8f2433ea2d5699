//! First-launch sample data.

use crate::model::assignment::{Assignment, Subtask, PRIORITY_HIGH};
use crate::repo::assignment_repo::{AssignmentRepository, RepoResult};
use log::info;

/// Id of the seeded sample assignment.
pub const SAMPLE_ASSIGNMENT_ID: &str = "test-assignment-1";

const DAY_MS: i64 = 86_400_000;

/// Inserts one sample assignment with three subtasks when the store holds
/// no assignments. Returns whether anything was written.
pub fn seed_sample_data<R: AssignmentRepository>(repo: &mut R, now_ms: i64) -> RepoResult<bool> {
    if repo.has_assignments()? {
        return Ok(false);
    }

    let mut sample = Assignment::with_id(
        SAMPLE_ASSIGNMENT_ID,
        "PROG3211 Final Project",
        "PROG3211",
        now_ms + 3 * DAY_MS,
    );
    sample.priority = PRIORITY_HIGH;
    sample.notes = Some("Start working on UI & database".to_string());
    sample.subtasks = [
        ("st-1", "Design UI screens", 40),
        ("st-2", "Implement local DB", 40),
        ("st-3", "Test navigation", 20),
    ]
    .into_iter()
    .map(|(id, text, weight)| Subtask {
        id: id.to_string(),
        assignment_id: SAMPLE_ASSIGNMENT_ID.to_string(),
        text: text.to_string(),
        is_checked: false,
        weight,
    })
    .collect();

    repo.create_assignment(&sample)?;
    info!("event=seed module=service status=ok assignment_id={SAMPLE_ASSIGNMENT_ID}");
    Ok(true)
}
