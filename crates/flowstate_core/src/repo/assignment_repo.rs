//! Assignment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `assignments` and their owned `subtasks`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `save_assignment` replaces the subtask set in the same transaction as
//!   the scalar update; a failure leaves the previous set untouched.
//! - `delete_assignment` removes subtasks before the assignment row.
//! - Write paths run `Assignment::validate`. Read paths only reject
//!   structurally corrupt rows (flags other than 0/1), so one out-of-range
//!   priority or color never hides the rest of the list.

use crate::db::DbError;
use crate::model::assignment::{Assignment, AssignmentId, Subtask};
use crate::model::validation::ValidationError;
use crate::repo::schema::{bool_to_int, ensure_connection_ready, int_to_bool, RequiredTable};
use log::{error, info};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const ASSIGNMENT_SELECT_SQL: &str = "SELECT
    id,
    title,
    courseId,
    dueDate,
    priority,
    progress,
    notes,
    estimatedTimeMinutes,
    expectedGrade,
    actualGrade,
    isCompleted,
    colorHex
FROM assignments";

const SUBTASK_SELECT_SQL: &str = "SELECT
    id,
    assignmentId,
    text,
    isChecked,
    weight
FROM subtasks";

const REQUIRED_TABLES: &[RequiredTable] = &[
    (
        "assignments",
        &[
            "id",
            "title",
            "courseId",
            "dueDate",
            "priority",
            "progress",
            "notes",
            "estimatedTimeMinutes",
            "expectedGrade",
            "actualGrade",
            "isCompleted",
            "colorHex",
        ],
    ),
    (
        "subtasks",
        &["id", "assignmentId", "text", "isChecked", "weight"],
    ),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by assignment and course persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// No row matched the targeted id.
    NotFound(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for assignments and their subtasks.
pub trait AssignmentRepository {
    /// Inserts a new assignment with all of its subtasks.
    fn create_assignment(&mut self, assignment: &Assignment) -> RepoResult<AssignmentId>;
    /// Loads one assignment with its subtasks, `None` when the id is unknown.
    fn get_assignment(&self, id: &str) -> RepoResult<Option<Assignment>>;
    /// Loads every assignment in insertion order.
    fn list_assignments(&self) -> RepoResult<Vec<Assignment>>;
    /// Replaces the stored assignment and its full subtask set atomically.
    fn save_assignment(&mut self, assignment: &Assignment) -> RepoResult<()>;
    /// Deletes the assignment and every subtask it owns.
    fn delete_assignment(&mut self, id: &str) -> RepoResult<()>;
    /// Sets the checked flag of one subtask.
    fn toggle_subtask_checked(&mut self, subtask_id: &str, new_value: bool) -> RepoResult<()>;
    /// Returns whether any assignment is stored.
    fn has_assignments(&self) -> RepoResult<bool>;
}

impl<R: AssignmentRepository + ?Sized> AssignmentRepository for &mut R {
    fn create_assignment(&mut self, assignment: &Assignment) -> RepoResult<AssignmentId> {
        (**self).create_assignment(assignment)
    }

    fn get_assignment(&self, id: &str) -> RepoResult<Option<Assignment>> {
        (**self).get_assignment(id)
    }

    fn list_assignments(&self) -> RepoResult<Vec<Assignment>> {
        (**self).list_assignments()
    }

    fn save_assignment(&mut self, assignment: &Assignment) -> RepoResult<()> {
        (**self).save_assignment(assignment)
    }

    fn delete_assignment(&mut self, id: &str) -> RepoResult<()> {
        (**self).delete_assignment(id)
    }

    fn toggle_subtask_checked(&mut self, subtask_id: &str, new_value: bool) -> RepoResult<()> {
        (**self).toggle_subtask_checked(subtask_id, new_value)
    }

    fn has_assignments(&self) -> RepoResult<bool> {
        (**self).has_assignments()
    }
}

/// SQLite-backed assignment repository.
pub struct SqliteAssignmentRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteAssignmentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not run.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl AssignmentRepository for SqliteAssignmentRepository<'_> {
    fn create_assignment(&mut self, assignment: &Assignment) -> RepoResult<AssignmentId> {
        assignment.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO assignments (
                id,
                title,
                courseId,
                dueDate,
                priority,
                progress,
                notes,
                estimatedTimeMinutes,
                expectedGrade,
                actualGrade,
                isCompleted,
                colorHex
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                assignment.id.as_str(),
                assignment.title.as_str(),
                assignment.course_id.as_str(),
                assignment.due_date,
                assignment.priority,
                assignment.progress,
                assignment.notes.as_deref(),
                assignment.estimated_time_minutes,
                assignment.expected_grade,
                assignment.actual_grade,
                bool_to_int(assignment.is_completed),
                assignment.color_hex.as_str(),
            ],
        )?;
        insert_subtasks(&tx, assignment)?;
        tx.commit()?;

        info!(
            "event=assignment_create module=repo status=ok assignment_id={} subtask_count={}",
            assignment.id,
            assignment.subtasks.len()
        );
        Ok(assignment.id.clone())
    }

    fn get_assignment(&self, id: &str) -> RepoResult<Option<Assignment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ASSIGNMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let mut assignment = parse_assignment_row(row)?;
        assignment.subtasks = load_subtasks(self.conn, id)?;
        Ok(Some(assignment))
    }

    fn list_assignments(&self) -> RepoResult<Vec<Assignment>> {
        let mut subtasks_by_owner = load_all_subtasks(self.conn)?;

        let mut stmt = self
            .conn
            .prepare(&format!("{ASSIGNMENT_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next()? {
            let mut assignment = parse_assignment_row(row)?;
            assignment.subtasks = subtasks_by_owner
                .remove(&assignment.id)
                .unwrap_or_default();
            assignments.push(assignment);
        }

        Ok(assignments)
    }

    fn save_assignment(&mut self, assignment: &Assignment) -> RepoResult<()> {
        assignment.validate()?;

        let started_at = Instant::now();
        match replace_assignment(self.conn, assignment) {
            Ok(()) => {
                info!(
                    "event=assignment_save module=repo status=ok assignment_id={} subtask_count={} duration_ms={}",
                    assignment.id,
                    assignment.subtasks.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=assignment_save module=repo status=error assignment_id={} duration_ms={} error={}",
                    assignment.id,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn delete_assignment(&mut self, id: &str) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed_subtasks = tx.execute("DELETE FROM subtasks WHERE assignmentId = ?1;", [id])?;
        let removed = tx.execute("DELETE FROM assignments WHERE id = ?1;", [id])?;
        if removed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        tx.commit()?;

        info!(
            "event=assignment_delete module=repo status=ok assignment_id={id} subtask_count={removed_subtasks}"
        );
        Ok(())
    }

    fn toggle_subtask_checked(&mut self, subtask_id: &str, new_value: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE subtasks SET isChecked = ?1 WHERE id = ?2;",
            params![bool_to_int(new_value), subtask_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(subtask_id.to_string()));
        }
        Ok(())
    }

    fn has_assignments(&self) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM assignments);",
            [],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn replace_assignment(conn: &mut Connection, assignment: &Assignment) -> RepoResult<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let changed = tx.execute(
        "UPDATE assignments
         SET
            title = ?2,
            courseId = ?3,
            dueDate = ?4,
            priority = ?5,
            progress = ?6,
            notes = ?7,
            estimatedTimeMinutes = ?8,
            expectedGrade = ?9,
            actualGrade = ?10,
            isCompleted = ?11,
            colorHex = ?12
         WHERE id = ?1;",
        params![
            assignment.id.as_str(),
            assignment.title.as_str(),
            assignment.course_id.as_str(),
            assignment.due_date,
            assignment.priority,
            assignment.progress,
            assignment.notes.as_deref(),
            assignment.estimated_time_minutes,
            assignment.expected_grade,
            assignment.actual_grade,
            bool_to_int(assignment.is_completed),
            assignment.color_hex.as_str(),
        ],
    )?;
    if changed == 0 {
        return Err(RepoError::NotFound(assignment.id.clone()));
    }

    tx.execute(
        "DELETE FROM subtasks WHERE assignmentId = ?1;",
        [assignment.id.as_str()],
    )?;
    insert_subtasks(&tx, assignment)?;

    tx.commit()?;
    Ok(())
}

fn insert_subtasks(tx: &Transaction<'_>, assignment: &Assignment) -> RepoResult<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO subtasks (id, assignmentId, text, isChecked, weight)
         VALUES (?1, ?2, ?3, ?4, ?5);",
    )?;
    for subtask in &assignment.subtasks {
        stmt.execute(params![
            subtask.id.as_str(),
            assignment.id.as_str(),
            subtask.text.as_str(),
            bool_to_int(subtask.is_checked),
            subtask.weight,
        ])?;
    }
    Ok(())
}

fn load_subtasks(conn: &Connection, assignment_id: &str) -> RepoResult<Vec<Subtask>> {
    let mut stmt = conn.prepare(&format!(
        "{SUBTASK_SELECT_SQL} WHERE assignmentId = ?1 ORDER BY rowid ASC;"
    ))?;
    let mut rows = stmt.query([assignment_id])?;
    let mut subtasks = Vec::new();
    while let Some(row) = rows.next()? {
        subtasks.push(parse_subtask_row(row)?);
    }
    Ok(subtasks)
}

fn load_all_subtasks(conn: &Connection) -> RepoResult<HashMap<AssignmentId, Vec<Subtask>>> {
    let mut stmt = conn.prepare(&format!("{SUBTASK_SELECT_SQL} ORDER BY rowid ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut grouped: HashMap<AssignmentId, Vec<Subtask>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let subtask = parse_subtask_row(row)?;
        grouped
            .entry(subtask.assignment_id.clone())
            .or_default()
            .push(subtask);
    }
    Ok(grouped)
}

fn parse_assignment_row(row: &Row<'_>) -> RepoResult<Assignment> {
    Ok(Assignment {
        id: row.get("id")?,
        title: row.get("title")?,
        course_id: row.get("courseId")?,
        due_date: row.get("dueDate")?,
        priority: row.get("priority")?,
        progress: row.get("progress")?,
        notes: row.get("notes")?,
        estimated_time_minutes: row.get("estimatedTimeMinutes")?,
        expected_grade: row.get("expectedGrade")?,
        actual_grade: row.get("actualGrade")?,
        is_completed: int_to_bool(row.get("isCompleted")?, "assignments.isCompleted")?,
        color_hex: row.get("colorHex")?,
        subtasks: Vec::new(),
    })
}

fn parse_subtask_row(row: &Row<'_>) -> RepoResult<Subtask> {
    Ok(Subtask {
        id: row.get("id")?,
        assignment_id: row.get("assignmentId")?,
        text: row.get("text")?,
        is_checked: int_to_bool(row.get("isChecked")?, "subtasks.isChecked")?,
        weight: row.get("weight")?,
    })
}
