//! Append-only store for a project's change ledger.
//!
//! Records are immutable: there is no update or delete here. Rows only
//! disappear when the owning project cascades away. Listing order is
//! `timestamp ASC` with the autoincrement `seq` breaking sub-microsecond
//! ties, which makes the 1-indexed position of a record its version
//! number.

use crate::{DbError, Result as DbErrorResult};

use pv_core::{ChangeAction, ChangeRecord};

use std::panic::Location;
use std::str::FromStr;

use chrono::DateTime;
use error_location::ErrorLocation;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

pub struct ChangeRecordRepository;

impl ChangeRecordRepository {
    pub async fn create<'e, E>(executor: E, record: &ChangeRecord) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                INSERT INTO pv_change_log (
                    id, project_id, user_id, action, timestamp, changes, description
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
        )
        .bind(record.id.to_string())
        .bind(record.project_id.to_string())
        .bind(record.user_id.map(|u| u.to_string()))
        .bind(record.action.as_str())
        .bind(record.timestamp.timestamp_micros())
        .bind(record.changes.to_string())
        .bind(record.description.clone())
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_project<'e, E>(
        executor: E,
        project_id: Uuid,
    ) -> DbErrorResult<Vec<ChangeRecord>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query(
            r#"
                SELECT id, project_id, user_id, action, timestamp, changes, description
                FROM pv_change_log
                WHERE project_id = ?
                ORDER BY timestamp ASC, seq ASC
                "#,
        )
        .bind(project_id.to_string())
        .fetch_all(executor)
        .await?;

        rows.iter().map(map_change_record_row).collect()
    }

    pub async fn count_by_project<'e, E>(executor: E, project_id: Uuid) -> DbErrorResult<i64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM pv_change_log WHERE project_id = ?")
                .bind(project_id.to_string())
                .fetch_one(executor)
                .await?;

        Ok(count)
    }
}

fn map_change_record_row(row: &SqliteRow) -> DbErrorResult<ChangeRecord> {
    let id: String = row.try_get("id")?;
    let project_id: String = row.try_get("project_id")?;
    let user_id: Option<String> = row.try_get("user_id")?;
    let action: String = row.try_get("action")?;
    let timestamp: i64 = row.try_get("timestamp")?;
    let changes: String = row.try_get("changes")?;

    Ok(ChangeRecord {
        id: Uuid::parse_str(&id).map_err(|e| DbError::Initialization {
            message: format!("Invalid UUID in change_record.id: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        project_id: Uuid::parse_str(&project_id).map_err(|e| DbError::Initialization {
            message: format!("Invalid UUID in change_record.project_id: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        user_id: user_id
            .map(|u| {
                Uuid::parse_str(&u).map_err(|e| DbError::Initialization {
                    message: format!("Invalid UUID in change_record.user_id: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })
            })
            .transpose()?,
        action: ChangeAction::from_str(&action).map_err(|e| DbError::Initialization {
            message: format!("Invalid ChangeAction in change_record.action: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        timestamp: DateTime::from_timestamp_micros(timestamp).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in change_record.timestamp".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
        changes: serde_json::from_str(&changes).map_err(|e| DbError::Initialization {
            message: format!("Invalid JSON in change_record.changes: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        description: row.try_get("description")?,
    })
}
