mod common;

use common::{create_test_pool, create_test_project, create_test_user};

use pv_core::ProjectStatus;
use pv_db::ProjectRepository;

use chrono::Utc;
use googletest::prelude::*;
use uuid::Uuid;

#[tokio::test]
async fn given_valid_project_when_created_then_can_be_found_by_id() {
    // Given: A test database with a user
    let pool = create_test_pool().await;
    let user_id = Uuid::new_v4();
    create_test_user(&pool, user_id).await;

    let project = create_test_project(user_id);
    let repo = ProjectRepository::new(pool.clone());

    // When: Creating the project
    ProjectRepository::create(&pool, &project).await.unwrap();

    // Then: Finding by ID returns the project
    let result = repo.find_by_id(project.id).await.unwrap();

    assert_that!(result, some(anything()));
    let found = result.unwrap();
    assert_that!(found.id, eq(project.id));
    assert_that!(found.title, eq(&project.title));
    assert_that!(found.reference_code, eq(&project.reference_code));
    assert_that!(found.status, eq(ProjectStatus::Draft));
    assert_that!(found.deadline, eq(project.deadline));
}

#[tokio::test]
async fn given_valid_project_when_created_then_can_be_found_by_reference() {
    // Given: A test database with a user
    let pool = create_test_pool().await;
    let user_id = Uuid::new_v4();
    create_test_user(&pool, user_id).await;

    let project = create_test_project(user_id);
    let repo = ProjectRepository::new(pool.clone());

    // When: Creating the project
    ProjectRepository::create(&pool, &project).await.unwrap();

    // Then: Finding by reference code returns the project
    let result = repo
        .find_by_reference(&project.reference_code)
        .await
        .unwrap();

    assert_that!(result, some(anything()));
    assert_that!(result.unwrap().id, eq(project.id));
}

#[tokio::test]
async fn given_empty_database_when_finding_nonexistent_id_then_returns_none() {
    // Given: An empty database
    let pool = create_test_pool().await;
    let repo = ProjectRepository::new(pool);

    // When: Finding a project that doesn't exist
    let result = repo.find_by_id(Uuid::new_v4()).await.unwrap();

    // Then: Returns None
    assert_that!(result, none());
}

#[tokio::test]
async fn given_existing_project_when_updated_then_changes_are_persisted() {
    // Given: A project exists in the database
    let pool = create_test_pool().await;
    let user_id = Uuid::new_v4();
    create_test_user(&pool, user_id).await;

    let repo = ProjectRepository::new(pool.clone());
    let mut project = create_test_project(user_id);
    ProjectRepository::create(&pool, &project).await.unwrap();

    // When: Updating the project's title and status
    project.title = "Updated Project".to_string();
    project.status = ProjectStatus::InProgress;
    project.updated_at = Utc::now();
    ProjectRepository::update(&pool, &project).await.unwrap();

    // Then: The changes are persisted
    let found = repo.find_by_id(project.id).await.unwrap().unwrap();
    assert_that!(found.title, eq("Updated Project"));
    assert_that!(found.status, eq(ProjectStatus::InProgress));
}

#[tokio::test]
async fn given_existing_project_when_updated_then_reference_code_is_unchanged() {
    // Given: A project exists in the database
    let pool = create_test_pool().await;
    let user_id = Uuid::new_v4();
    create_test_user(&pool, user_id).await;

    let repo = ProjectRepository::new(pool.clone());
    let mut project = create_test_project(user_id);
    let original_reference = project.reference_code.clone();
    ProjectRepository::create(&pool, &project).await.unwrap();

    // When: Updating with a tampered reference code on the struct
    project.reference_code = "PRJ-9999-00000".to_string();
    project.title = "Renamed".to_string();
    ProjectRepository::update(&pool, &project).await.unwrap();

    // Then: The stored reference code is untouched
    let found = repo.find_by_id(project.id).await.unwrap().unwrap();
    assert_that!(found.reference_code, eq(&original_reference));
    assert_that!(found.title, eq("Renamed"));
}

#[tokio::test]
async fn given_existing_project_when_deleted_then_not_found() {
    // Given: A project exists in the database
    let pool = create_test_pool().await;
    let user_id = Uuid::new_v4();
    create_test_user(&pool, user_id).await;

    let repo = ProjectRepository::new(pool.clone());
    let project = create_test_project(user_id);
    ProjectRepository::create(&pool, &project).await.unwrap();

    // When: Deleting the project
    let deleted = ProjectRepository::delete(&pool, project.id).await.unwrap();

    // Then: The delete reports a hit and find_by_id returns None
    assert_that!(deleted, eq(true));
    assert_that!(repo.find_by_id(project.id).await.unwrap(), none());
}

#[tokio::test]
async fn given_multiple_projects_when_finding_all_then_returns_all() {
    // Given: Multiple projects
    let pool = create_test_pool().await;
    let user_id = Uuid::new_v4();
    create_test_user(&pool, user_id).await;

    let repo = ProjectRepository::new(pool.clone());
    let project1 = create_test_project(user_id);
    let project2 = create_test_project(user_id);

    ProjectRepository::create(&pool, &project1).await.unwrap();
    ProjectRepository::create(&pool, &project2).await.unwrap();

    // When: Finding all projects
    let projects = repo.find_all().await.unwrap();

    // Then: Both are returned
    assert_that!(projects, len(eq(2)));
    let ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
    assert_that!(ids, contains(eq(&project1.id)));
    assert_that!(ids, contains(eq(&project2.id)));
}
