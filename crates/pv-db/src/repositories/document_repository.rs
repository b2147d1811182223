//! Document repository.
//!
//! ## Per-title version counter
//!
//! Documents sharing a `(project_id, title)` pair form an upload group
//! whose `version` starts at 1 and increases by exactly 1 per upload.
//! `next_version_for_title` REQUIRES a Transaction - the type system
//! enforces this - so the read and the insert that uses the returned
//! number commit (or roll back) together. Unlike a pre-incremented
//! counter, a rolled-back upload leaves no gap.

use crate::{DbError, Result as DbErrorResult};

use pv_core::ProjectDocument;

use std::panic::Location;

use chrono::DateTime;
use error_location::ErrorLocation;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<ProjectDocument>> {
        let row = sqlx::query(
            r#"
                SELECT id, project_id, title, description, document_type,
                    content_ref, version, uploaded_by, uploaded_at
                FROM pv_documents
                WHERE id = ?
                "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_document_row(&r)).transpose()
    }

    pub async fn find_by_project(&self, project_id: Uuid) -> DbErrorResult<Vec<ProjectDocument>> {
        let rows = sqlx::query(
            r#"
                SELECT id, project_id, title, description, document_type,
                    content_ref, version, uploaded_by, uploaded_at
                FROM pv_documents
                WHERE project_id = ?
                ORDER BY title ASC, version ASC
                "#,
        )
        .bind(project_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_document_row).collect()
    }

    /// Next version number for an upload of `title` into `project_id`.
    /// Counter groups are independent per title.
    pub async fn next_version_for_title(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        project_id: Uuid,
        title: &str,
    ) -> DbErrorResult<i32> {
        let current: i64 = sqlx::query_scalar(
            r#"
                SELECT COALESCE(MAX(version), 0)
                FROM pv_documents
                WHERE project_id = ? AND title = ?
                "#,
        )
        .bind(project_id.to_string())
        .bind(title)
        .fetch_one(&mut **tx)
        .await?;

        Ok(current as i32 + 1)
    }

    pub async fn create<'e, E>(executor: E, document: &ProjectDocument) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                INSERT INTO pv_documents (
                    id, project_id, title, description, document_type,
                    content_ref, version, uploaded_by, uploaded_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
        )
        .bind(document.id.to_string())
        .bind(document.project_id.to_string())
        .bind(&document.title)
        .bind(document.description.clone())
        .bind(&document.document_type)
        .bind(&document.content_ref)
        .bind(document.version)
        .bind(document.uploaded_by.map(|u| u.to_string()))
        .bind(document.uploaded_at.timestamp_micros())
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn update<'e, E>(executor: E, document: &ProjectDocument) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                UPDATE pv_documents
                SET title = ?, description = ?, document_type = ?,
                    content_ref = ?, version = ?
                WHERE id = ?
                "#,
        )
        .bind(&document.title)
        .bind(document.description.clone())
        .bind(&document.document_type)
        .bind(&document.content_ref)
        .bind(document.version)
        .bind(document.id.to_string())
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> DbErrorResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query("DELETE FROM pv_documents WHERE id = ?")
            .bind(id.to_string())
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_document_row(row: &SqliteRow) -> DbErrorResult<ProjectDocument> {
    let id: String = row.try_get("id")?;
    let project_id: String = row.try_get("project_id")?;
    let version: i64 = row.try_get("version")?;
    let uploaded_by: Option<String> = row.try_get("uploaded_by")?;
    let uploaded_at: i64 = row.try_get("uploaded_at")?;

    Ok(ProjectDocument {
        id: Uuid::parse_str(&id).map_err(|e| DbError::Initialization {
            message: format!("Invalid UUID in document.id: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        project_id: Uuid::parse_str(&project_id).map_err(|e| DbError::Initialization {
            message: format!("Invalid UUID in document.project_id: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        document_type: row.try_get("document_type")?,
        content_ref: row.try_get("content_ref")?,
        version: version as i32,
        uploaded_by: uploaded_by
            .map(|u| {
                Uuid::parse_str(&u).map_err(|e| DbError::Initialization {
                    message: format!("Invalid UUID in document.uploaded_by: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })
            })
            .transpose()?,
        uploaded_at: DateTime::from_timestamp_micros(uploaded_at).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in document.uploaded_at".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
    })
}
