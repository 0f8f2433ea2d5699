use flowstate_core::db::open_db_in_memory;
use flowstate_core::{
    Course, CourseRepository, ProfileView, RepoError, SqliteCourseRepository, ValidationError,
};
use rusqlite::Connection;

fn course(code: &str, term: &str, current: bool, progress: i64) -> Course {
    let mut course = Course::new(code, format!("{code} name"), term);
    course.is_current_term = current;
    course.progress = progress;
    course
}

fn case_study_rows(conn: &Connection, course_id: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM case_studies WHERE courseId = ?1;",
        [course_id],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn create_and_list_roundtrip_keeps_case_study_order() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCourseRepository::try_new(&mut conn).unwrap();
    assert!(!repo.has_courses().unwrap());

    let mut info = course("INFO3130", "Fall 2024", false, 100);
    info.case_studies = vec![
        "Ridgeline Mountain Outfitters".to_string(),
        "Tradeshow System".to_string(),
        "Bank Queue".to_string(),
    ];
    repo.create_course(&info).unwrap();

    let listed = repo.list_courses().unwrap();
    assert_eq!(listed, vec![info]);
    assert!(repo.has_courses().unwrap());
}

#[test]
fn list_orders_current_term_first_then_term_descending() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCourseRepository::try_new(&mut conn).unwrap();
    repo.create_course(&course("OLD1", "Fall 2023", false, 100))
        .unwrap();
    repo.create_course(&course("NOW1", "Winter 2025", true, 40))
        .unwrap();
    repo.create_course(&course("OLD2", "Fall 2024", false, 100))
        .unwrap();

    let codes: Vec<_> = repo
        .list_courses()
        .unwrap()
        .into_iter()
        .map(|c| c.course_code)
        .collect();
    assert_eq!(codes, ["NOW1", "OLD2", "OLD1"]);

    let past: Vec<_> = repo
        .list_past_term_courses()
        .unwrap()
        .into_iter()
        .map(|c| c.course_code)
        .collect();
    assert_eq!(past, ["OLD2", "OLD1"]);
}

#[test]
fn current_term_progress_is_truncated_average() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCourseRepository::try_new(&mut conn).unwrap();
    assert_eq!(repo.current_term_progress().unwrap(), 0);

    repo.create_course(&course("A", "Winter 2025", true, 50))
        .unwrap();
    repo.create_course(&course("B", "Winter 2025", true, 25))
        .unwrap();
    repo.create_course(&course("C", "Fall 2024", false, 100))
        .unwrap();

    assert_eq!(repo.current_term_progress().unwrap(), 37);
}

#[test]
fn delete_cascades_case_studies() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCourseRepository::try_new(&mut conn).unwrap();
    let mut doomed = course("INFO3130", "Fall 2024", false, 100);
    doomed.case_studies = vec!["one".to_string(), "two".to_string()];
    repo.create_course(&doomed).unwrap();

    repo.delete_course(&doomed.id).unwrap();
    assert!(repo.list_courses().unwrap().is_empty());
    let err = repo.delete_course(&doomed.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
    drop(repo);
    assert_eq!(case_study_rows(&conn, &doomed.id), 0);
}

#[test]
fn create_rejects_out_of_range_progress() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCourseRepository::try_new(&mut conn).unwrap();

    let err = repo
        .create_course(&course("X", "Fall 2024", true, 150))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::CourseProgressOutOfRange(150))
    ));
    assert!(!repo.has_courses().unwrap());
}

#[test]
fn profile_view_tracks_past_courses_and_term_progress() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&mut conn).unwrap();
    let mut profile = ProfileView::new(repo);
    profile.reload().unwrap();
    assert!(profile.past_term_courses().is_empty());
    assert_eq!(profile.current_term_progress(), 0);

    let current = course("PROG3211", "Winter 2025", true, 60);
    profile.add_course(&current).unwrap();
    profile
        .add_course(&course("INFO3130", "Fall 2024", false, 100))
        .unwrap();
    assert_eq!(profile.current_term_progress(), 60);
    assert_eq!(profile.past_term_courses().len(), 1);
    assert_eq!(profile.all_courses().unwrap().len(), 2);

    profile.delete_course(&current.id).unwrap();
    assert_eq!(profile.current_term_progress(), 0);
    assert_eq!(profile.all_courses().unwrap().len(), 1);
}
