//! Model validation errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Invariant violation detected on a model value before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identifier is empty or whitespace.
    EmptyId,
    /// Priority outside `PRIORITY_LOW..=PRIORITY_HIGH`.
    PriorityOutOfRange(i64),
    /// Color is not `#RRGGBB` or `#AARRGGBB`.
    InvalidColorHex(String),
    /// Subtask identifier is empty or whitespace.
    EmptySubtaskId,
    /// Same subtask identifier appears twice in one assignment.
    DuplicateSubtaskId(String),
    /// Subtask points at a different assignment than the one owning it.
    SubtaskOwnerMismatch {
        subtask_id: String,
        assignment_id: String,
    },
    /// Subtask weight outside `0..=MAX_SUBTASK_WEIGHT`.
    WeightOutOfRange { subtask_id: String, weight: i64 },
    /// Course progress outside `0..=100`.
    CourseProgressOutOfRange(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "id must not be empty"),
            Self::PriorityOutOfRange(value) => {
                write!(f, "priority ({value}) must be between 0 and 2")
            }
            Self::InvalidColorHex(value) => {
                write!(f, "color `{value}` must be #RRGGBB or #AARRGGBB")
            }
            Self::EmptySubtaskId => write!(f, "subtask id must not be empty"),
            Self::DuplicateSubtaskId(id) => write!(f, "duplicate subtask id `{id}`"),
            Self::SubtaskOwnerMismatch {
                subtask_id,
                assignment_id,
            } => write!(
                f,
                "subtask `{subtask_id}` does not belong to assignment `{assignment_id}`"
            ),
            Self::WeightOutOfRange { subtask_id, weight } => write!(
                f,
                "subtask `{subtask_id}` weight ({weight}) must be between 0 and 100"
            ),
            Self::CourseProgressOutOfRange(value) => {
                write!(f, "course progress ({value}) must be between 0 and 100")
            }
        }
    }
}

impl Error for ValidationError {}
