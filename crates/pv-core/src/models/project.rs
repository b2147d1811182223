//! Project entity - the versioned root of the change ledger.

use crate::ProjectStatus;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A project's scalar fields are the unit of diffing and restore. Members,
/// tasks and documents hang off it as live rows and never enter a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    /// Human-readable identifier (e.g., "PRJ-2026-40781"), assigned once at
    /// creation and never rewritten.
    pub reference_code: String,
    pub title: String,
    pub description: String,
    pub objectives: String,
    pub deadline: NaiveDate,
    pub status: ProjectStatus,
    pub start_date: NaiveDate,
    pub location: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Scalar fields eligible for diffing and snapshot replay.
    pub const DIFF_FIELDS: [&'static str; 7] = [
        "title",
        "description",
        "objectives",
        "deadline",
        "status",
        "start_date",
        "location",
    ];

    /// Create a new project owned by `owner_id`. This is the only place a
    /// reference code is generated.
    pub fn new(
        title: String,
        description: String,
        objectives: String,
        deadline: NaiveDate,
        start_date: NaiveDate,
        location: String,
        owner_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            reference_code: generate_reference_code(now),
            title,
            description,
            objectives,
            deadline,
            status: ProjectStatus::Draft,
            start_date,
            location,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.status == ProjectStatus::Archived
    }

    /// Snapshot of the diffable fields as a JSON object. Dates serialize as
    /// ISO-8601 strings so stored diffs compare reproducibly across loads.
    pub fn to_state_map(&self) -> Map<String, Value> {
        let mut state = Map::new();
        state.insert("title".to_string(), Value::String(self.title.clone()));
        state.insert(
            "description".to_string(),
            Value::String(self.description.clone()),
        );
        state.insert(
            "objectives".to_string(),
            Value::String(self.objectives.clone()),
        );
        state.insert(
            "deadline".to_string(),
            Value::String(self.deadline.to_string()),
        );
        state.insert(
            "status".to_string(),
            Value::String(self.status.as_str().to_string()),
        );
        state.insert(
            "start_date".to_string(),
            Value::String(self.start_date.to_string()),
        );
        state.insert("location".to_string(), Value::String(self.location.clone()));
        state
    }

    /// Write a reconstructed snapshot back onto the project. Unknown and
    /// relational keys are ignored; date or status values that fail to parse
    /// are skipped rather than aborting the restore.
    pub fn apply_state(&mut self, state: &Map<String, Value>) {
        for (field, value) in state {
            match field.as_str() {
                "title" => {
                    if let Some(v) = value.as_str() {
                        self.title = v.to_string();
                    }
                }
                "description" => {
                    if let Some(v) = value.as_str() {
                        self.description = v.to_string();
                    }
                }
                "objectives" => {
                    if let Some(v) = value.as_str() {
                        self.objectives = v.to_string();
                    }
                }
                "deadline" => {
                    if let Some(v) = value.as_str()
                        && let Ok(date) = v.parse::<NaiveDate>()
                    {
                        self.deadline = date;
                    }
                }
                "status" => {
                    if let Some(v) = value.as_str()
                        && let Ok(status) = v.parse::<ProjectStatus>()
                    {
                        self.status = status;
                    }
                }
                "start_date" => {
                    if let Some(v) = value.as_str()
                        && let Ok(date) = v.parse::<NaiveDate>()
                    {
                        self.start_date = date;
                    }
                }
                "location" => {
                    if let Some(v) = value.as_str() {
                        self.location = v.to_string();
                    }
                }
                _ => {}
            }
        }
    }
}

/// Format: PRJ-YYYY-XXXXX, the year taken from the creation timestamp and
/// five digits derived from a fresh UUID.
fn generate_reference_code(created_at: DateTime<Utc>) -> String {
    let digits = Uuid::new_v4().as_u128().to_string();
    format!("PRJ-{}-{}", created_at.format("%Y"), &digits[..5])
}
