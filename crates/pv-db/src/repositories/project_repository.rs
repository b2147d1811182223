//! Project repository.
//!
//! Reads go through a pool-holding instance; writes are executor-generic
//! so the coordinator can run them inside one transaction together with
//! the change-log append they belong to. The UPDATE statement never
//! touches `reference_code`, `owner_id` or `created_at` - the reference
//! code is assigned exactly once, at creation.

use crate::{DbError, Result as DbErrorResult};

use pv_core::{Project, ProjectStatus};

use std::panic::Location;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use error_location::ErrorLocation;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct ProjectRepository {
    pool: SqlitePool,
}

impl ProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<Project>> {
        let id_str = id.to_string();

        let row = sqlx::query(
            r#"
                SELECT id, reference_code, title, description, objectives,
                    deadline, status, start_date, location, owner_id,
                    created_at, updated_at
                FROM pv_projects
                WHERE id = ?
                "#,
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_project_row(&r)).transpose()
    }

    pub async fn find_by_reference(&self, reference_code: &str) -> DbErrorResult<Option<Project>> {
        let row = sqlx::query(
            r#"
                SELECT id, reference_code, title, description, objectives,
                    deadline, status, start_date, location, owner_id,
                    created_at, updated_at
                FROM pv_projects
                WHERE reference_code = ?
                "#,
        )
        .bind(reference_code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_project_row(&r)).transpose()
    }

    pub async fn find_all(&self) -> DbErrorResult<Vec<Project>> {
        let rows = sqlx::query(
            r#"
                SELECT id, reference_code, title, description, objectives,
                    deadline, status, start_date, location, owner_id,
                    created_at, updated_at
                FROM pv_projects
                ORDER BY created_at DESC
                "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_project_row).collect()
    }

    pub async fn create<'e, E>(executor: E, project: &Project) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                INSERT INTO pv_projects (
                    id, reference_code, title, description, objectives,
                    deadline, status, start_date, location, owner_id,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
        )
        .bind(project.id.to_string())
        .bind(&project.reference_code)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.objectives)
        .bind(project.deadline.to_string())
        .bind(project.status.as_str())
        .bind(project.start_date.to_string())
        .bind(&project.location)
        .bind(project.owner_id.to_string())
        .bind(project.created_at.timestamp_micros())
        .bind(project.updated_at.timestamp_micros())
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn update<'e, E>(executor: E, project: &Project) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                UPDATE pv_projects
                SET title = ?, description = ?, objectives = ?, deadline = ?,
                    status = ?, start_date = ?, location = ?, updated_at = ?
                WHERE id = ?
                "#,
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.objectives)
        .bind(project.deadline.to_string())
        .bind(project.status.as_str())
        .bind(project.start_date.to_string())
        .bind(&project.location)
        .bind(project.updated_at.timestamp_micros())
        .bind(project.id.to_string())
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Hard delete; members, tasks, documents and change records cascade.
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> DbErrorResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query("DELETE FROM pv_projects WHERE id = ?")
            .bind(id.to_string())
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_project_row(row: &SqliteRow) -> DbErrorResult<Project> {
    let id: String = row.try_get("id")?;
    let deadline: String = row.try_get("deadline")?;
    let status: String = row.try_get("status")?;
    let start_date: String = row.try_get("start_date")?;
    let owner_id: String = row.try_get("owner_id")?;
    let created_at: i64 = row.try_get("created_at")?;
    let updated_at: i64 = row.try_get("updated_at")?;

    Ok(Project {
        id: Uuid::parse_str(&id).map_err(|e| DbError::Initialization {
            message: format!("Invalid UUID in project.id: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        reference_code: row.try_get("reference_code")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        objectives: row.try_get("objectives")?,
        deadline: NaiveDate::from_str(&deadline).map_err(|e| DbError::Initialization {
            message: format!("Invalid date in project.deadline: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        status: ProjectStatus::from_str(&status).map_err(|e| DbError::Initialization {
            message: format!("Invalid ProjectStatus in project.status: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        start_date: NaiveDate::from_str(&start_date).map_err(|e| DbError::Initialization {
            message: format!("Invalid date in project.start_date: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        location: row.try_get("location")?,
        owner_id: Uuid::parse_str(&owner_id).map_err(|e| DbError::Initialization {
            message: format!("Invalid UUID in project.owner_id: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        created_at: DateTime::from_timestamp_micros(created_at).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in project.created_at".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
        updated_at: DateTime::from_timestamp_micros(updated_at).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in project.updated_at".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
    })
}
