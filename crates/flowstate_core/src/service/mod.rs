//! Core use-case services.
//!
//! # Responsibility
//! - Turn repository reads into the derived views a presentation layer
//!   renders (filtered lists, progress, course summaries).
//! - Own edit-time checks that are not storage invariants.
//!
//! # Invariants
//! - Views hold the result of their last explicit `reload()`/`load()`; they
//!   never observe store changes on their own.
//! - Time-dependent results take `now_ms` from the caller.

use std::time::{SystemTime, UNIX_EPOCH};

pub mod assignment_detail;
pub mod assignment_edit;
pub mod assignment_list;
pub mod profile;
pub mod seed;

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
