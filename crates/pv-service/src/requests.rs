//! Validated mutation payloads.
//!
//! These structs stand in for whatever request-validation layer fronts
//! the coordinator; by the time a value reaches this crate it is assumed
//! well-formed. `Option` fields on the patch types mean "leave untouched".

use chrono::{NaiveDate, Utc};
use pv_core::{MemberRole, MemberStatus, Project, ProjectStatus, Task, TaskStatus};
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub objectives: String,
    pub deadline: NaiveDate,
    pub start_date: NaiveDate,
    pub location: String,
}

/// Partial update of a project's scalar fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub objectives: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<NaiveDate>,
    pub location: Option<String>,
}

impl ProjectPatch {
    /// The patched fields only, as a state map for diffing against the
    /// pre-state. Fields left `None` never show up, so they can never be
    /// reported as changed.
    pub fn to_state_map(&self) -> Map<String, Value> {
        let mut state = Map::new();
        if let Some(ref title) = self.title {
            state.insert("title".to_string(), Value::String(title.clone()));
        }
        if let Some(ref description) = self.description {
            state.insert("description".to_string(), Value::String(description.clone()));
        }
        if let Some(ref objectives) = self.objectives {
            state.insert("objectives".to_string(), Value::String(objectives.clone()));
        }
        if let Some(deadline) = self.deadline {
            state.insert("deadline".to_string(), Value::String(deadline.to_string()));
        }
        if let Some(status) = self.status {
            state.insert(
                "status".to_string(),
                Value::String(status.as_str().to_string()),
            );
        }
        if let Some(start_date) = self.start_date {
            state.insert(
                "start_date".to_string(),
                Value::String(start_date.to_string()),
            );
        }
        if let Some(ref location) = self.location {
            state.insert("location".to_string(), Value::String(location.clone()));
        }
        state
    }

    pub fn apply_to(&self, project: &mut Project) {
        if let Some(ref title) = self.title {
            project.title = title.clone();
        }
        if let Some(ref description) = self.description {
            project.description = description.clone();
        }
        if let Some(ref objectives) = self.objectives {
            project.objectives = objectives.clone();
        }
        if let Some(deadline) = self.deadline {
            project.deadline = deadline;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(start_date) = self.start_date {
            project.start_date = start_date;
        }
        if let Some(ref location) = self.location {
            project.location = location.clone();
        }
        project.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMember {
    pub user_id: Uuid,
    pub role: MemberRole,
    #[serde(default)]
    pub status: MemberStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub assigned_to: Option<Uuid>,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(ref title) = self.title {
            task.title = title.clone();
        }
        if let Some(ref description) = self.description {
            task.description = description.clone();
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = Some(assigned_to);
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        task.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub description: Option<String>,
    pub document_type: String,
    pub content_ref: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub document_type: Option<String>,
    /// A new content reference is a re-upload and bumps the version
    /// counter for the document's title group.
    pub content_ref: Option<String>,
}
