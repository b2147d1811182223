use crate::ChangeAction;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One immutable entry in a project's change ledger. Records are totally
/// ordered per project by timestamp (insertion order breaks ties); a
/// record's 1-indexed position in that order is its version number - there
/// is no stored version integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub id: Uuid,

    pub project_id: Uuid,

    /// Acting user; `None` means the change was made by the system.
    pub user_id: Option<Uuid>,

    pub action: ChangeAction,
    pub timestamp: DateTime<Utc>,

    /// Either a field diff map (`{field: {from, to}}`) or a free-form
    /// action payload, depending on `action`.
    pub changes: Value,
    pub description: Option<String>,
}

impl ChangeRecord {
    pub fn new(
        project_id: Uuid,
        user_id: Option<Uuid>,
        action: ChangeAction,
        changes: Value,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            user_id,
            action,
            timestamp: Utc::now(),
            changes,
            description,
        }
    }
}
