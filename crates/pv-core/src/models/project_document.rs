use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// File attachment metadata. `content_ref` is an opaque pointer into
/// whatever blob store the host application uses; this crate never touches
/// file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub document_type: String,
    pub content_ref: String,
    /// Upload counter per (project_id, title), starting at 1. Assigned by
    /// the repository inside the creating transaction.
    pub version: i32,
    pub uploaded_by: Option<Uuid>,
    pub uploaded_at: DateTime<Utc>,
}

impl ProjectDocument {
    pub fn new(
        project_id: Uuid,
        title: String,
        description: Option<String>,
        document_type: String,
        content_ref: String,
        version: i32,
        uploaded_by: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            title,
            description,
            document_type,
            content_ref,
            version,
            uploaded_by,
            uploaded_at: Utc::now(),
        }
    }
}
