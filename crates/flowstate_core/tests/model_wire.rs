use flowstate_core::{Assignment, Course, Subtask};

#[test]
fn assignment_serialization_uses_snake_case_fields() {
    let mut assignment = Assignment::with_id("a1", "Essay", "ENGL1010", 1_700_000_000_000);
    assignment.expected_grade = Some(80);
    assignment.subtasks.push(Subtask {
        id: "st-1".to_string(),
        assignment_id: "a1".to_string(),
        text: "outline".to_string(),
        is_checked: true,
        weight: 100,
    });

    let json = serde_json::to_value(&assignment).unwrap();
    assert_eq!(json["id"], "a1");
    assert_eq!(json["course_id"], "ENGL1010");
    assert_eq!(json["due_date"], 1_700_000_000_000_i64);
    assert_eq!(json["priority"], 1);
    assert_eq!(json["notes"], serde_json::Value::Null);
    assert_eq!(json["expected_grade"], 80);
    assert_eq!(json["is_completed"], false);
    assert_eq!(json["color_hex"], "#FBDE98");
    assert_eq!(json["subtasks"][0]["assignment_id"], "a1");
    assert_eq!(json["subtasks"][0]["is_checked"], true);

    let decoded: Assignment = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, assignment);
}

#[test]
fn course_serialization_keeps_case_studies() {
    let mut course = Course::new("INFO3130", "Systems Analysis and Design", "Fall 2024");
    course.case_studies = vec!["Ridgeline".to_string()];

    let json = serde_json::to_value(&course).unwrap();
    assert_eq!(json["course_code"], "INFO3130");
    assert_eq!(json["is_current_term"], false);
    assert_eq!(json["case_studies"][0], "Ridgeline");
}
