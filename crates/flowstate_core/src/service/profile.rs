//! Profile use-case: course history and current-term progress.

use crate::model::course::Course;
use crate::repo::assignment_repo::RepoResult;
use crate::repo::course_repo::CourseRepository;

/// Pull-based view over past-term courses and the current-term average.
pub struct ProfileView<R: CourseRepository> {
    repo: R,
    past_term_courses: Vec<Course>,
    current_term_progress: i64,
}

impl<R: CourseRepository> ProfileView<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            past_term_courses: Vec::new(),
            current_term_progress: 0,
        }
    }

    /// Re-reads past-term courses and the current-term progress average.
    pub fn reload(&mut self) -> RepoResult<()> {
        self.past_term_courses = self.repo.list_past_term_courses()?;
        self.current_term_progress = self.repo.current_term_progress()?;
        Ok(())
    }

    pub fn past_term_courses(&self) -> &[Course] {
        &self.past_term_courses
    }

    /// Average progress (0-100) of current-term courses.
    pub fn current_term_progress(&self) -> i64 {
        self.current_term_progress
    }

    pub fn add_course(&mut self, course: &Course) -> RepoResult<()> {
        self.repo.create_course(course)?;
        self.reload()
    }

    pub fn delete_course(&mut self, course_id: &str) -> RepoResult<()> {
        self.repo.delete_course(course_id)?;
        self.reload()
    }

    /// Every course, current term first.
    pub fn all_courses(&self) -> RepoResult<Vec<Course>> {
        self.repo.list_courses()
    }
}
