//! Change-log replay: folding a prefix of a project's ledger into a
//! point-in-time scalar snapshot.

use crate::{ChangeAction, ChangeRecord};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Relational fields never enter a snapshot; they keep their live rows
/// through every restore.
pub const RELATIONAL_FIELDS: [&str; 5] = ["owner", "owner_id", "members", "tasks", "documents"];

fn is_relational(field: &str) -> bool {
    RELATIONAL_FIELDS.contains(&field)
}

/// Fold the first `upto` records left-to-right into an accumulating state
/// map. `create` merges its payload wholesale (minus relational keys);
/// `update` takes each diff entry's `to` value. Every other action is a
/// sub-entity event and leaves the accumulator untouched.
pub fn replay(records: &[ChangeRecord], upto: usize) -> Map<String, Value> {
    let mut state = Map::new();

    for record in records.iter().take(upto) {
        match record.action {
            ChangeAction::Create => {
                if let Some(payload) = record.changes.as_object() {
                    for (field, value) in payload {
                        if !is_relational(field) {
                            state.insert(field.clone(), value.clone());
                        }
                    }
                }
            }
            ChangeAction::Update => {
                if let Some(payload) = record.changes.as_object() {
                    for (field, change) in payload {
                        if is_relational(field) {
                            continue;
                        }
                        if let Some(to) = change.get("to") {
                            state.insert(field.clone(), to.clone());
                        }
                    }
                }
            }
            _ => {}
        }
    }

    state
}

/// One row of a project's version listing. The version is the record's
/// 1-indexed position in the ordered ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionEntry {
    pub version: i64,
    pub timestamp: DateTime<Utc>,
    pub action: ChangeAction,
    pub actor: Option<Uuid>,
    pub description: Option<String>,
    pub changes: Value,
}

/// Number an ordered record list into version entries.
pub fn version_entries(records: &[ChangeRecord]) -> Vec<VersionEntry> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| VersionEntry {
            version: (index + 1) as i64,
            timestamp: record.timestamp,
            action: record.action,
            actor: record.user_id,
            description: record.description.clone(),
            changes: record.changes.clone(),
        })
        .collect()
}
