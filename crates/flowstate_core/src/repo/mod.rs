//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Translate between stored rows and in-memory entities.
//! - Own every multi-statement write and its transaction boundary.
//!
//! # Invariants
//! - Write paths call `validate()` on the model before SQL mutations.
//! - Reads return `Ok(None)` for unknown ids; writes return `NotFound`.

pub mod assignment_repo;
pub mod course_repo;
mod schema;
