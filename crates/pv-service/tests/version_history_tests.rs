mod common;

use common::{new_project, setup};

use pv_core::ChangeAction;
use pv_service::{ProjectPatch, ServiceError};

use googletest::prelude::*;
use serde_json::json;

fn rename(to: &str) -> ProjectPatch {
    ProjectPatch {
        title: Some(to.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn given_create_update_noop_restore_then_counts_follow_the_ledger() {
    // The canonical scenario: create "Alpha" -> update to "Beta" ->
    // identical update -> restore to version 1.
    let (coordinator, _pool, user_id) = setup().await;

    // create -> 1 record
    let project = coordinator
        .create_project(new_project("Alpha"), user_id)
        .await
        .unwrap();
    assert_that!(
        coordinator.list_versions(project.id).await.unwrap(),
        len(eq(1))
    );

    // update -> 2 records
    coordinator
        .update_project(project.id, rename("Beta"), user_id)
        .await
        .unwrap();
    let versions = coordinator.list_versions(project.id).await.unwrap();
    assert_that!(versions, len(eq(2)));
    assert_that!(versions[1].action, eq(ChangeAction::Update));
    assert_that!(
        versions[1].changes,
        eq(&json!({"title": {"from": "Alpha", "to": "Beta"}}))
    );

    // no-op update -> still 2 records
    coordinator
        .update_project(project.id, rename("Beta"), user_id)
        .await
        .unwrap();
    assert_that!(
        coordinator.list_versions(project.id).await.unwrap(),
        len(eq(2))
    );

    // restore to version 1 -> 3 records, title back to Alpha
    let restored = coordinator
        .restore_version(project.id, 1, user_id)
        .await
        .unwrap();
    assert_that!(restored.title, eq("Alpha"));
    let versions = coordinator.list_versions(project.id).await.unwrap();
    assert_that!(versions, len(eq(3)));
    assert_that!(versions[2].action, eq(ChangeAction::Restore));
}

#[tokio::test]
async fn given_restore_then_prior_records_are_untouched() {
    // Given: A project with two versions
    let (coordinator, _pool, user_id) = setup().await;
    let project = coordinator
        .create_project(new_project("Alpha"), user_id)
        .await
        .unwrap();
    coordinator
        .update_project(project.id, rename("Beta"), user_id)
        .await
        .unwrap();
    let before = coordinator.list_versions(project.id).await.unwrap();

    // When: Restoring to version 1
    coordinator
        .restore_version(project.id, 1, user_id)
        .await
        .unwrap();

    // Then: Exactly one record appended; the prefix is identical
    let after = coordinator.list_versions(project.id).await.unwrap();
    assert_that!(after.len(), eq(before.len() + 1));
    let prefix: Vec<_> = after[..before.len()].to_vec();
    assert_that!(prefix, eq(&before));
}

#[tokio::test]
async fn given_restore_record_then_it_carries_the_pre_restore_state() {
    // Given
    let (coordinator, _pool, user_id) = setup().await;
    let project = coordinator
        .create_project(new_project("Alpha"), user_id)
        .await
        .unwrap();
    coordinator
        .update_project(project.id, rename("Beta"), user_id)
        .await
        .unwrap();

    // When
    coordinator
        .restore_version(project.id, 1, user_id)
        .await
        .unwrap();

    // Then: The restore payload names the target and both states
    let versions = coordinator.list_versions(project.id).await.unwrap();
    let payload = &versions[2].changes;
    assert_that!(payload.get("restored_to_version"), eq(Some(&json!(1))));
    assert_that!(
        payload.pointer("/previous_state/title"),
        eq(Some(&json!("Beta")))
    );
    assert_that!(
        payload.pointer("/restored_state/title"),
        eq(Some(&json!("Alpha")))
    );
}

#[tokio::test]
async fn given_out_of_range_target_when_restoring_then_fails_and_nothing_changes() {
    // Given: Two records
    let (coordinator, _pool, user_id) = setup().await;
    let project = coordinator
        .create_project(new_project("Alpha"), user_id)
        .await
        .unwrap();
    coordinator
        .update_project(project.id, rename("Beta"), user_id)
        .await
        .unwrap();

    // When: Restoring to version 99
    let result = coordinator.restore_version(project.id, 99, user_id).await;

    // Then: OutOfRange, no record appended, state unchanged
    assert_that!(
        matches!(
            result,
            Err(ServiceError::VersionOutOfRange {
                requested: 99,
                max: 2,
                ..
            })
        ),
        eq(true)
    );
    assert_that!(
        coordinator.list_versions(project.id).await.unwrap(),
        len(eq(2))
    );
    assert_that!(
        coordinator.project(project.id).await.unwrap().title,
        eq("Beta")
    );
}

#[tokio::test]
async fn given_zero_target_when_restoring_then_out_of_range() {
    let (coordinator, _pool, user_id) = setup().await;
    let project = coordinator
        .create_project(new_project("Alpha"), user_id)
        .await
        .unwrap();

    let result = coordinator.restore_version(project.id, 0, user_id).await;

    assert_that!(
        matches!(result, Err(ServiceError::VersionOutOfRange { .. })),
        eq(true)
    );
}

#[tokio::test]
async fn given_update_history_when_reconstructing_latest_then_matches_live_state() {
    // Given: Several updates
    let (coordinator, _pool, user_id) = setup().await;
    let project = coordinator
        .create_project(new_project("Alpha"), user_id)
        .await
        .unwrap();
    coordinator
        .update_project(project.id, rename("Beta"), user_id)
        .await
        .unwrap();
    let patch = ProjectPatch {
        location: Some("Kiffa".to_string()),
        ..Default::default()
    };
    coordinator
        .update_project(project.id, patch, user_id)
        .await
        .unwrap();

    // When: Reconstructing at the ledger head
    let count = coordinator.list_versions(project.id).await.unwrap().len() as i64;
    let snapshot = coordinator.reconstruct(project.id, count).await.unwrap();

    // Then: The snapshot equals the live scalar state
    let live = coordinator.project(project.id).await.unwrap();
    assert_that!(snapshot, eq(&live.to_state_map()));
}

#[tokio::test]
async fn given_intermediate_version_when_reconstructing_then_later_changes_are_absent() {
    // Given
    let (coordinator, _pool, user_id) = setup().await;
    let project = coordinator
        .create_project(new_project("Alpha"), user_id)
        .await
        .unwrap();
    coordinator
        .update_project(project.id, rename("Beta"), user_id)
        .await
        .unwrap();
    coordinator
        .update_project(project.id, rename("Gamma"), user_id)
        .await
        .unwrap();

    // When: Reconstructing version 2 (create + first rename)
    let snapshot = coordinator.reconstruct(project.id, 2).await.unwrap();

    // Then
    assert_that!(snapshot.get("title"), eq(Some(&json!("Beta"))));
}

#[tokio::test]
async fn given_sub_entity_events_then_version_count_matches_logged_mutations() {
    // Given: A mixed history of root and sub-entity mutations
    let (coordinator, _pool, user_id) = setup().await;
    let project = coordinator
        .create_project(new_project("Alpha"), user_id)
        .await
        .unwrap();
    let task = coordinator
        .create_task(project.id, common::new_task("dig wells"), user_id)
        .await
        .unwrap();
    coordinator
        .update_project(project.id, rename("Beta"), user_id)
        .await
        .unwrap();
    coordinator
        .delete_task(project.id, task.id, user_id)
        .await
        .unwrap();

    // Then: create + task_added + update + task_deleted = 4
    let versions = coordinator.list_versions(project.id).await.unwrap();
    assert_that!(versions, len(eq(4)));
    let actions: Vec<ChangeAction> = versions.iter().map(|v| v.action).collect();
    assert_that!(
        actions,
        eq(&vec![
            ChangeAction::Create,
            ChangeAction::TaskAdded,
            ChangeAction::Update,
            ChangeAction::TaskDeleted,
        ])
    );
}
