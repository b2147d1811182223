#![allow(dead_code)]

use chrono::NaiveDate;
use pv_service::{MutationCoordinator, NewDocument, NewProject, NewTask};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

/// Creates an in-memory SQLite pool with migrations run
pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .expect("Failed to enable foreign keys");

    pv_db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Inserts a stub user for foreign key constraints
pub async fn create_test_user(pool: &SqlitePool, user_id: Uuid) {
    let id = user_id.to_string();
    let email = format!("test-{}@example.com", user_id);

    sqlx::query("INSERT INTO users (id, email) VALUES (?, ?)")
        .bind(&id)
        .bind(&email)
        .execute(pool)
        .await
        .expect("Failed to create test user");
}

/// A coordinator over a fresh in-memory database plus a registered user.
/// The pool is handed back so tests can register further stub users.
pub async fn setup() -> (MutationCoordinator, SqlitePool, Uuid) {
    let pool = create_test_pool().await;
    let user_id = Uuid::new_v4();
    create_test_user(&pool, user_id).await;
    (MutationCoordinator::new(pool.clone()), pool, user_id)
}

pub fn new_project(title: &str) -> NewProject {
    NewProject {
        title: title.to_string(),
        description: "Drip irrigation for the northern fields".to_string(),
        objectives: "Cut water usage by 30%".to_string(),
        deadline: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        location: "Atar".to_string(),
    }
}

pub fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: "Task description".to_string(),
        assigned_to: None,
        due_date: NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(),
    }
}

pub fn new_document(title: &str) -> NewDocument {
    NewDocument {
        title: title.to_string(),
        description: Some("Document description".to_string()),
        document_type: "report".to_string(),
        content_ref: format!("blob://{}", Uuid::new_v4()),
    }
}
