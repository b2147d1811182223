#![allow(dead_code)]

use chrono::{Duration, NaiveDate, Utc};
use pv_core::{
    ChangeAction, ChangeRecord, MemberRole, MemberStatus, Project, ProjectDocument, ProjectMember,
    Task,
};
use serde_json::json;
use uuid::Uuid;

/// Creates a test Project
pub fn create_test_project(owner_id: Uuid) -> Project {
    Project::new(
        "Test Project".to_string(),
        "Test project description".to_string(),
        "Test objectives".to_string(),
        NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        "Nouakchott".to_string(),
        owner_id,
    )
}

/// Creates a test ProjectMember with sensible defaults
pub fn create_test_member(project_id: Uuid, user_id: Uuid, role: MemberRole) -> ProjectMember {
    ProjectMember::new(project_id, user_id, role, MemberStatus::Active)
}

/// Creates a test Task with sensible defaults
pub fn create_test_task(project_id: Uuid, user_id: Uuid) -> Task {
    Task::new(
        project_id,
        "Test Task".to_string(),
        "Test task description".to_string(),
        None,
        Some(user_id),
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(),
    )
}

/// Creates a test ProjectDocument with an explicit version
pub fn create_test_document(project_id: Uuid, user_id: Uuid, version: i32) -> ProjectDocument {
    ProjectDocument::new(
        project_id,
        "Test Document".to_string(),
        Some("Test document description".to_string()),
        "report".to_string(),
        format!("blob://{}", Uuid::new_v4()),
        version,
        Some(user_id),
    )
}

/// Creates a test ChangeRecord
pub fn create_test_change_record(project_id: Uuid, user_id: Uuid) -> ChangeRecord {
    create_test_change_record_at(project_id, user_id, 0)
}

/// Creates a test ChangeRecord with a custom timestamp offset
pub fn create_test_change_record_at(
    project_id: Uuid,
    user_id: Uuid,
    seconds_offset: i64,
) -> ChangeRecord {
    let mut record = ChangeRecord::new(
        project_id,
        Some(user_id),
        ChangeAction::Update,
        json!({"title": {"from": "Old", "to": "New"}}),
        Some("Test change record".to_string()),
    );
    record.timestamp = Utc::now() + Duration::seconds(seconds_offset);
    record
}
