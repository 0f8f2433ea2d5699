//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `flowstate_core` linkage outside any host UI.
//! - Open a store (file path argument or in-memory), seed it when empty and
//!   print the assignment list and dashboard summary.
//! - With a store path, write core logs into a `logs/` directory next to the
//!   store. In-memory runs leave logging off.

use flowstate_core::db::{open_db, open_db_in_memory};
use flowstate_core::{
    default_log_level, init_logging, now_epoch_ms, seed_sample_data, AssignmentListView,
    SqliteAssignmentRepository, StatusFilter, DASHBOARD_UPCOMING_LIMIT,
};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const LOG_DIR_NAME: &str = "logs";

fn main() -> ExitCode {
    println!("flowstate_core ping={}", flowstate_core::ping());
    println!("flowstate_core version={}", flowstate_core::core_version());

    match run(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: Option<String>) -> Result<(), Box<dyn Error>> {
    let mut conn = match db_path.as_deref() {
        Some(path) => {
            start_logging(Path::new(path));
            open_db(path)?
        }
        None => open_db_in_memory()?,
    };
    let mut repo = SqliteAssignmentRepository::try_new(&mut conn)?;
    let now = now_epoch_ms();

    if seed_sample_data(&mut repo, now)? {
        println!("seeded sample data");
    }

    let mut view = AssignmentListView::new(repo);
    view.reload()?;

    for filter in StatusFilter::OPTIONS {
        view.set_status_filter(filter);
        println!("{filter}: {}", view.filtered(now).len());
    }

    println!("courses: {}", view.course_options().join(", "));
    for assignment in view.upcoming(DASHBOARD_UPCOMING_LIMIT) {
        println!(
            "upcoming {} [{}] due={} progress={:.0}%",
            assignment.title,
            assignment.course_id,
            assignment.due_date,
            assignment.completion_ratio() * 100.0
        );
    }

    Ok(())
}

/// Best effort: a logging failure is reported but never stops the run.
fn start_logging(db_path: &Path) {
    let result = log_dir_for(db_path).and_then(|dir| {
        let dir = dir.to_string_lossy().into_owned();
        init_logging(default_log_level(), &dir).map_err(Into::into)
    });
    if let Err(err) = result {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn log_dir_for(db_path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let parent = match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok(std::fs::canonicalize(parent)?.join(LOG_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::{log_dir_for, start_logging, LOG_DIR_NAME};
    use std::path::Path;

    #[test]
    fn log_dir_sits_next_to_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = log_dir_for(&dir.path().join("store.db")).unwrap();
        assert_eq!(
            log_dir,
            std::fs::canonicalize(dir.path()).unwrap().join(LOG_DIR_NAME)
        );
    }

    #[test]
    fn bare_file_name_resolves_to_absolute_log_dir() {
        let log_dir = log_dir_for(Path::new("store.db")).unwrap();
        assert!(log_dir.is_absolute());
        assert!(log_dir.ends_with(LOG_DIR_NAME));
    }

    #[test]
    fn store_path_turns_core_logging_on() {
        let dir = tempfile::tempdir().unwrap();
        start_logging(&dir.path().join("store.db"));

        let (_, active_dir) = flowstate_core::logging_status().unwrap();
        assert_eq!(
            active_dir,
            std::fs::canonicalize(dir.path()).unwrap().join(LOG_DIR_NAME)
        );
        assert!(active_dir.is_dir());
    }
}
