use crate::{DbError, Result as DbErrorResult};

use pv_core::{MemberRole, MemberStatus, ProjectMember};

use std::panic::Location;
use std::str::FromStr;

use chrono::DateTime;
use error_location::ErrorLocation;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct ProjectMemberRepository {
    pool: SqlitePool,
}

impl ProjectMemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user_and_project(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> DbErrorResult<Option<ProjectMember>> {
        let row = sqlx::query(
            r#"
                SELECT id, project_id, user_id, role, status, joined_at
                FROM pv_project_members
                WHERE user_id = ? AND project_id = ?
                "#,
        )
        .bind(user_id.to_string())
        .bind(project_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_member_row(&r)).transpose()
    }

    pub async fn find_by_project(&self, project_id: Uuid) -> DbErrorResult<Vec<ProjectMember>> {
        let rows = sqlx::query(
            r#"
                SELECT id, project_id, user_id, role, status, joined_at
                FROM pv_project_members
                WHERE project_id = ?
                ORDER BY joined_at ASC
                "#,
        )
        .bind(project_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_member_row).collect()
    }

    pub async fn create<'e, E>(executor: E, member: &ProjectMember) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
                INSERT INTO pv_project_members (id, project_id, user_id, role, status, joined_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
        )
        .bind(member.id.to_string())
        .bind(member.project_id.to_string())
        .bind(member.user_id.to_string())
        .bind(member.role.as_str())
        .bind(member.status.as_str())
        .bind(member.joined_at.timestamp_micros())
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> DbErrorResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query("DELETE FROM pv_project_members WHERE id = ?")
            .bind(id.to_string())
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_member_row(row: &SqliteRow) -> DbErrorResult<ProjectMember> {
    let id: String = row.try_get("id")?;
    let project_id: String = row.try_get("project_id")?;
    let user_id: String = row.try_get("user_id")?;
    let role: String = row.try_get("role")?;
    let status: String = row.try_get("status")?;
    let joined_at: i64 = row.try_get("joined_at")?;

    Ok(ProjectMember {
        id: Uuid::parse_str(&id).map_err(|e| DbError::Initialization {
            message: format!("Invalid UUID in project_member.id: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        project_id: Uuid::parse_str(&project_id).map_err(|e| DbError::Initialization {
            message: format!("Invalid UUID in project_member.project_id: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        user_id: Uuid::parse_str(&user_id).map_err(|e| DbError::Initialization {
            message: format!("Invalid UUID in project_member.user_id: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        role: MemberRole::from_str(&role).map_err(|e| DbError::Initialization {
            message: format!("Invalid MemberRole in project_member.role: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        status: MemberStatus::from_str(&status).map_err(|e| DbError::Initialization {
            message: format!("Invalid MemberStatus in project_member.status: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        joined_at: DateTime::from_timestamp_micros(joined_at).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in project_member.joined_at".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
    })
}
