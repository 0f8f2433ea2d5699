//! Course repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist courses together with their owned case study names.
//! - Compute the current-term progress average.
//!
//! # Invariants
//! - Course rows and their case studies are written and deleted in one
//!   transaction.
//! - Case studies keep insertion order.

use crate::model::course::Course;
use crate::repo::assignment_repo::{RepoError, RepoResult};
use crate::repo::schema::{bool_to_int, ensure_connection_ready, int_to_bool, RequiredTable};
use log::info;
use rusqlite::{params, Connection, Row, TransactionBehavior};

const COURSE_SELECT_SQL: &str = "SELECT
    id,
    courseCode,
    courseName,
    term,
    isCurrentTerm,
    progress
FROM courses";

const REQUIRED_TABLES: &[RequiredTable] = &[
    (
        "courses",
        &[
            "id",
            "courseCode",
            "courseName",
            "term",
            "isCurrentTerm",
            "progress",
        ],
    ),
    ("case_studies", &["id", "courseId", "caseStudyName"]),
];

/// Repository interface for courses and case studies.
pub trait CourseRepository {
    fn create_course(&mut self, course: &Course) -> RepoResult<()>;
    /// All courses, current term first, then by term label descending.
    fn list_courses(&self) -> RepoResult<Vec<Course>>;
    /// Courses not in the current term, by term label descending.
    fn list_past_term_courses(&self) -> RepoResult<Vec<Course>>;
    /// Truncated average progress of current-term courses, 0 when none.
    fn current_term_progress(&self) -> RepoResult<i64>;
    fn delete_course(&mut self, id: &str) -> RepoResult<()>;
    fn has_courses(&self) -> RepoResult<bool>;
}

/// SQLite-backed course repository.
pub struct SqliteCourseRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCourseRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }

    fn query_courses(&self, filter_and_order: &str) -> RepoResult<Vec<Course>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COURSE_SELECT_SQL} {filter_and_order};"))?;
        let mut rows = stmt.query([])?;
        let mut courses = Vec::new();
        while let Some(row) = rows.next()? {
            let mut course = parse_course_row(row)?;
            course.case_studies = load_case_studies(self.conn, &course.id)?;
            courses.push(course);
        }
        Ok(courses)
    }
}

impl CourseRepository for SqliteCourseRepository<'_> {
    fn create_course(&mut self, course: &Course) -> RepoResult<()> {
        course.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO courses (id, courseCode, courseName, term, isCurrentTerm, progress)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                course.id.as_str(),
                course.course_code.as_str(),
                course.course_name.as_str(),
                course.term.as_str(),
                bool_to_int(course.is_current_term),
                course.progress,
            ],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO case_studies (courseId, caseStudyName) VALUES (?1, ?2);",
            )?;
            for name in &course.case_studies {
                stmt.execute(params![course.id.as_str(), name.as_str()])?;
            }
        }
        tx.commit()?;

        info!(
            "event=course_create module=repo status=ok course_id={} case_study_count={}",
            course.id,
            course.case_studies.len()
        );
        Ok(())
    }

    fn list_courses(&self) -> RepoResult<Vec<Course>> {
        self.query_courses("ORDER BY isCurrentTerm DESC, term DESC, rowid ASC")
    }

    fn list_past_term_courses(&self) -> RepoResult<Vec<Course>> {
        self.query_courses("WHERE isCurrentTerm = 0 ORDER BY term DESC, rowid ASC")
    }

    fn current_term_progress(&self) -> RepoResult<i64> {
        let average: Option<f64> = self.conn.query_row(
            "SELECT AVG(progress) FROM courses WHERE isCurrentTerm = 1;",
            [],
            |row| row.get(0),
        )?;
        Ok(average.map_or(0, |value| value.trunc() as i64))
    }

    fn delete_course(&mut self, id: &str) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM case_studies WHERE courseId = ?1;", [id])?;
        let removed = tx.execute("DELETE FROM courses WHERE id = ?1;", [id])?;
        if removed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        tx.commit()?;

        info!("event=course_delete module=repo status=ok course_id={id}");
        Ok(())
    }

    fn has_courses(&self) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM courses);",
            [],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_course_row(row: &Row<'_>) -> RepoResult<Course> {
    Ok(Course {
        id: row.get("id")?,
        course_code: row.get("courseCode")?,
        course_name: row.get("courseName")?,
        term: row.get("term")?,
        is_current_term: int_to_bool(row.get("isCurrentTerm")?, "courses.isCurrentTerm")?,
        progress: row.get("progress")?,
        case_studies: Vec::new(),
    })
}

fn load_case_studies(conn: &Connection, course_id: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT caseStudyName
         FROM case_studies
         WHERE courseId = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([course_id])?;
    let mut names = Vec::new();
    while let Some(row) = rows.next()? {
        names.push(row.get(0)?);
    }
    Ok(names)
}
