use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// What a change-log entry records. `Create`, `Update`, `Delete` and
/// `Restore` act on the project's own scalar fields; the rest are
/// sub-entity events and never enter snapshot replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
    Restore,
    TaskAdded,
    TaskUpdated,
    TaskDeleted,
    MemberAdded,
    MemberRemoved,
    DocumentAdded,
    DocumentUpdated,
    DocumentRemoved,
}

impl ChangeAction {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Restore => "restore",
            Self::TaskAdded => "task_added",
            Self::TaskUpdated => "task_updated",
            Self::TaskDeleted => "task_deleted",
            Self::MemberAdded => "member_added",
            Self::MemberRemoved => "member_removed",
            Self::DocumentAdded => "document_added",
            Self::DocumentUpdated => "document_updated",
            Self::DocumentRemoved => "document_removed",
        }
    }
}

impl FromStr for ChangeAction {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "restore" => Ok(Self::Restore),
            "task_added" => Ok(Self::TaskAdded),
            "task_updated" => Ok(Self::TaskUpdated),
            "task_deleted" => Ok(Self::TaskDeleted),
            "member_added" => Ok(Self::MemberAdded),
            "member_removed" => Ok(Self::MemberRemoved),
            "document_added" => Ok(Self::DocumentAdded),
            "document_updated" => Ok(Self::DocumentUpdated),
            "document_removed" => Ok(Self::DocumentRemoved),
            _ => Err(CoreError::InvalidChangeAction {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
