use crate::{Project, ProjectStatus};

use chrono::NaiveDate;
use serde_json::{Map, Value};
use uuid::Uuid;

fn sample_project() -> Project {
    Project::new(
        "Irrigation rollout".to_string(),
        "Bring drip irrigation to the northern fields".to_string(),
        "Cut water usage by 30%".to_string(),
        NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        "Atar".to_string(),
        Uuid::new_v4(),
    )
}

#[test]
fn test_project_new() {
    let owner_id = Uuid::new_v4();
    let project = Project::new(
        "Test".to_string(),
        "Description".to_string(),
        "Objectives".to_string(),
        NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        "Nouakchott".to_string(),
        owner_id,
    );

    assert_eq!(project.title, "Test");
    assert_eq!(project.status, ProjectStatus::Draft);
    assert_eq!(project.owner_id, owner_id);
    assert!(!project.is_archived());
}

#[test]
fn test_reference_code_format() {
    let project = sample_project();
    let year = project.created_at.format("%Y").to_string();

    let parts: Vec<&str> = project.reference_code.split('-').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "PRJ");
    assert_eq!(parts[1], year);
    assert_eq!(parts[2].len(), 5);
    assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn test_state_map_contains_exactly_the_diff_fields() {
    let project = sample_project();
    let state = project.to_state_map();

    assert_eq!(state.len(), Project::DIFF_FIELDS.len());
    for field in Project::DIFF_FIELDS {
        assert!(state.contains_key(field), "missing field {field}");
    }
    assert_eq!(
        state.get("deadline"),
        Some(&Value::String("2026-12-31".to_string()))
    );
    assert_eq!(
        state.get("status"),
        Some(&Value::String("draft".to_string()))
    );
}

#[test]
fn test_apply_state_round_trips() {
    let original = sample_project();
    let mut copy = original.clone();
    copy.title = "scratched".to_string();
    copy.status = ProjectStatus::Done;
    copy.deadline = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();

    copy.apply_state(&original.to_state_map());

    assert_eq!(copy.title, original.title);
    assert_eq!(copy.status, original.status);
    assert_eq!(copy.deadline, original.deadline);
}

#[test]
fn test_apply_state_skips_malformed_and_unknown_values() {
    let mut project = sample_project();
    let before_deadline = project.deadline;

    let mut state = Map::new();
    state.insert(
        "deadline".to_string(),
        Value::String("not-a-date".to_string()),
    );
    state.insert("status".to_string(), Value::String("bogus".to_string()));
    state.insert("owner".to_string(), Value::String("intruder".to_string()));
    state.insert("title".to_string(), Value::String("Renamed".to_string()));

    project.apply_state(&state);

    assert_eq!(project.deadline, before_deadline);
    assert_eq!(project.status, ProjectStatus::Draft);
    assert_eq!(project.title, "Renamed");
}
