//! Domain model for assignments, subtasks and courses.
//!
//! # Responsibility
//! - Define canonical data structures used by repositories and views.
//! - Own the invariants checked before any row is written.
//!
//! # Invariants
//! - An assignment exclusively owns its subtasks; a course owns its case
//!   studies.
//! - `Assignment::progress` is stored but never authoritative; completion is
//!   derived from subtasks.

pub mod assignment;
pub mod course;
pub mod validation;
