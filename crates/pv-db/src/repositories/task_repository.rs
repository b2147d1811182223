use crate::{DbError, Result as DbErrorResult};

use pv_core::{Task, TaskStatus};

use std::panic::Location;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use error_location::ErrorLocation;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<Task>> {
        let row = sqlx::query(
            r#"
                SELECT id, project_id, title, description, assigned_to,
                    assigned_by, due_date, status, created_at, updated_at
                FROM pv_tasks
                WHERE id = ?
                "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_task_row(&r)).transpose()
    }

    pub async fn find_by_project(&self, project_id: Uuid) -> DbErrorResult<Vec<Task>> {
        let rows = sqlx::query(
            r#"
                SELECT id, project_id, title, description, assigned_to,
                    assigned_by, due_date, status, created_at, updated_at
                FROM pv_tasks
                WHERE project_id = ?
                ORDER BY created_at ASC
                "#,
        )
        .bind(project_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_task_row).collect()
    }

    pub async fn create<'e, E>(executor: E, task: &Task) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                INSERT INTO pv_tasks (
                    id, project_id, title, description, assigned_to,
                    assigned_by, due_date, status, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
        )
        .bind(task.id.to_string())
        .bind(task.project_id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.assigned_to.map(|u| u.to_string()))
        .bind(task.assigned_by.map(|u| u.to_string()))
        .bind(task.due_date.to_string())
        .bind(task.status.as_str())
        .bind(task.created_at.timestamp_micros())
        .bind(task.updated_at.timestamp_micros())
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn update<'e, E>(executor: E, task: &Task) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                UPDATE pv_tasks
                SET title = ?, description = ?, assigned_to = ?, due_date = ?,
                    status = ?, updated_at = ?
                WHERE id = ?
                "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.assigned_to.map(|u| u.to_string()))
        .bind(task.due_date.to_string())
        .bind(task.status.as_str())
        .bind(task.updated_at.timestamp_micros())
        .bind(task.id.to_string())
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> DbErrorResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query("DELETE FROM pv_tasks WHERE id = ?")
            .bind(id.to_string())
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_task_row(row: &SqliteRow) -> DbErrorResult<Task> {
    let id: String = row.try_get("id")?;
    let project_id: String = row.try_get("project_id")?;
    let assigned_to: Option<String> = row.try_get("assigned_to")?;
    let assigned_by: Option<String> = row.try_get("assigned_by")?;
    let due_date: String = row.try_get("due_date")?;
    let status: String = row.try_get("status")?;
    let created_at: i64 = row.try_get("created_at")?;
    let updated_at: i64 = row.try_get("updated_at")?;

    Ok(Task {
        id: Uuid::parse_str(&id).map_err(|e| DbError::Initialization {
            message: format!("Invalid UUID in task.id: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        project_id: Uuid::parse_str(&project_id).map_err(|e| DbError::Initialization {
            message: format!("Invalid UUID in task.project_id: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        assigned_to: assigned_to
            .map(|u| {
                Uuid::parse_str(&u).map_err(|e| DbError::Initialization {
                    message: format!("Invalid UUID in task.assigned_to: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })
            })
            .transpose()?,
        assigned_by: assigned_by
            .map(|u| {
                Uuid::parse_str(&u).map_err(|e| DbError::Initialization {
                    message: format!("Invalid UUID in task.assigned_by: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })
            })
            .transpose()?,
        due_date: NaiveDate::from_str(&due_date).map_err(|e| DbError::Initialization {
            message: format!("Invalid date in task.due_date: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        status: TaskStatus::from_str(&status).map_err(|e| DbError::Initialization {
            message: format!("Invalid TaskStatus in task.status: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        created_at: DateTime::from_timestamp_micros(created_at).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in task.created_at".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
        updated_at: DateTime::from_timestamp_micros(updated_at).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in task.updated_at".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
    })
}
