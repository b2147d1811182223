//! The mutation coordinator.
//!
//! Every structural change to a project or its sub-entities runs here as
//! one all-or-nothing unit: capture the pre-state, apply the storage
//! mutation, and append exactly one change record - or none of it. The
//! per-project lock is held across the whole capture-diff-append
//! sequence; the SQLite transaction makes the writes atomic.
//!
//! The ledger itself is append-only. Restoring is forward-only: a restore
//! replays a prefix of the ledger into a snapshot and applies it as a new,
//! separately logged mutation. History is never rewritten.

use crate::error::{Result as ServiceResult, ServiceError};
use crate::locks::ProjectLocks;
use crate::requests::{
    DocumentPatch, NewDocument, NewMember, NewProject, NewTask, ProjectPatch, TaskPatch,
};

use pv_core::{
    ChangeAction, ChangeRecord, MemberRole, MemberStatus, Project, ProjectDocument, ProjectMember,
    Task, VersionEntry, changes_to_value, diff_states, history,
};
use pv_db::{
    ChangeRecordRepository, DbError, DocumentRepository, ProjectMemberRepository,
    ProjectRepository, TaskRepository,
};

use serde_json::{Map, Value, json};
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct MutationCoordinator {
    pool: SqlitePool,
    locks: ProjectLocks,
    projects: ProjectRepository,
    members: ProjectMemberRepository,
    tasks: TaskRepository,
    documents: DocumentRepository,
}

impl MutationCoordinator {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            projects: ProjectRepository::new(pool.clone()),
            members: ProjectMemberRepository::new(pool.clone()),
            tasks: TaskRepository::new(pool.clone()),
            documents: DocumentRepository::new(pool.clone()),
            locks: ProjectLocks::new(),
            pool,
        }
    }

    // ---------------------------------------------------------------- //
    // Project lifecycle
    // ---------------------------------------------------------------- //

    /// Create a project, its owner membership, and the initial `create`
    /// record in one transaction. The record's payload is the full scalar
    /// snapshot, which later seeds every reconstruction.
    pub async fn create_project(
        &self,
        request: NewProject,
        acting_user: Uuid,
    ) -> ServiceResult<Project> {
        let project = Project::new(
            request.title,
            request.description,
            request.objectives,
            request.deadline,
            request.start_date,
            request.location,
            acting_user,
        );
        let owner = ProjectMember::new(
            project.id,
            acting_user,
            MemberRole::Owner,
            MemberStatus::Active,
        );
        let record = ChangeRecord::new(
            project.id,
            Some(acting_user),
            ChangeAction::Create,
            Value::Object(project.to_state_map()),
            Some("Initial project creation".to_string()),
        );

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        ProjectRepository::create(&mut *tx, &project).await?;
        ProjectMemberRepository::create(&mut *tx, &owner).await?;
        ChangeRecordRepository::create(&mut *tx, &record).await?;
        tx.commit().await.map_err(DbError::from)?;

        log::info!(
            "Created project {} ({})",
            project.id,
            project.reference_code
        );

        Ok(project)
    }

    /// Apply a partial update. A non-empty diff logs one `update` record
    /// with the field-level delta; an empty diff is a successful no-op
    /// that leaves the ledger untouched.
    pub async fn update_project(
        &self,
        project_id: Uuid,
        patch: ProjectPatch,
        acting_user: Uuid,
    ) -> ServiceResult<Project> {
        let lock = self.locks.lock_for(project_id);
        let _guard = lock.lock().await;

        let mut project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| ServiceError::project_not_found(project_id))?;

        let changes = diff_states(&project.to_state_map(), &patch.to_state_map());
        if changes.is_empty() {
            log::debug!("No-op update for project {}, nothing logged", project_id);
            return Ok(project);
        }

        patch.apply_to(&mut project);

        let record = ChangeRecord::new(
            project_id,
            Some(acting_user),
            ChangeAction::Update,
            changes_to_value(&changes),
            Some("Project updated".to_string()),
        );

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        ProjectRepository::update(&mut *tx, &project).await?;
        ChangeRecordRepository::create(&mut *tx, &record).await?;
        tx.commit().await.map_err(DbError::from)?;

        log::info!(
            "Updated project {} ({} field(s) changed)",
            project_id,
            changes.len()
        );

        Ok(project)
    }

    /// Delete a project. The `delete` record is appended in the same
    /// transaction immediately before the cascade, which also sweeps the
    /// ledger away - the project owns its records.
    pub async fn delete_project(&self, project_id: Uuid, acting_user: Uuid) -> ServiceResult<()> {
        let lock = self.locks.lock_for(project_id);
        let _guard = lock.lock().await;

        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| ServiceError::project_not_found(project_id))?;

        let record = ChangeRecord::new(
            project_id,
            Some(acting_user),
            ChangeAction::Delete,
            Value::Object(Map::new()),
            Some("Project deleted".to_string()),
        );

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        ChangeRecordRepository::create(&mut *tx, &record).await?;
        ProjectRepository::delete(&mut *tx, project_id).await?;
        tx.commit().await.map_err(DbError::from)?;

        self.locks.forget(project_id);

        log::info!(
            "Deleted project {} ({})",
            project_id,
            project.reference_code
        );

        Ok(())
    }

    // ---------------------------------------------------------------- //
    // Members
    // ---------------------------------------------------------------- //

    /// Add a member. The owner role is assigned once, at project
    /// creation; granting it here is a conflict, as is duplicating an
    /// existing membership.
    pub async fn add_member(
        &self,
        project_id: Uuid,
        request: NewMember,
        acting_user: Uuid,
    ) -> ServiceResult<ProjectMember> {
        if request.role == MemberRole::Owner {
            return Err(ServiceError::conflict("Project already has an owner"));
        }

        let lock = self.locks.lock_for(project_id);
        let _guard = lock.lock().await;

        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| ServiceError::project_not_found(project_id))?;

        if self
            .members
            .find_by_user_and_project(request.user_id, project_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::conflict(
                "User is already a member of the project",
            ));
        }

        let member = ProjectMember::new(project_id, request.user_id, request.role, request.status);
        let record = ChangeRecord::new(
            project_id,
            Some(acting_user),
            ChangeAction::MemberAdded,
            json!({
                "user_id": member.user_id,
                "role": member.role.as_str(),
            }),
            Some(format!("Added member {} as {}", member.user_id, member.role)),
        );

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        ProjectMemberRepository::create(&mut *tx, &member).await?;
        ChangeRecordRepository::create(&mut *tx, &record).await?;
        tx.commit().await.map_err(DbError::from)?;

        log::info!("Added member {} to project {}", member.user_id, project_id);

        Ok(member)
    }

    /// Remove a member. The owner membership cannot be removed.
    pub async fn remove_member(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        acting_user: Uuid,
    ) -> ServiceResult<()> {
        let lock = self.locks.lock_for(project_id);
        let _guard = lock.lock().await;

        let member = self
            .members
            .find_by_user_and_project(user_id, project_id)
            .await?
            .ok_or_else(|| ServiceError::member_not_found(project_id, user_id))?;

        if member.is_owner() {
            return Err(ServiceError::conflict(
                "Cannot remove the project owner",
            ));
        }

        let record = ChangeRecord::new(
            project_id,
            Some(acting_user),
            ChangeAction::MemberRemoved,
            json!({
                "user_id": member.user_id,
                "role": member.role.as_str(),
            }),
            Some(format!("Removed member {}", member.user_id)),
        );

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        ProjectMemberRepository::delete(&mut *tx, member.id).await?;
        ChangeRecordRepository::create(&mut *tx, &record).await?;
        tx.commit().await.map_err(DbError::from)?;

        log::info!("Removed member {} from project {}", user_id, project_id);

        Ok(())
    }

    // ---------------------------------------------------------------- //
    // Tasks
    // ---------------------------------------------------------------- //

    pub async fn create_task(
        &self,
        project_id: Uuid,
        request: NewTask,
        acting_user: Uuid,
    ) -> ServiceResult<Task> {
        let lock = self.locks.lock_for(project_id);
        let _guard = lock.lock().await;

        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| ServiceError::project_not_found(project_id))?;

        let task = Task::new(
            project_id,
            request.title,
            request.description,
            request.assigned_to,
            Some(acting_user),
            request.due_date,
        );
        let record = ChangeRecord::new(
            project_id,
            Some(acting_user),
            ChangeAction::TaskAdded,
            json!({
                "task_id": task.id,
                "title": task.title,
                "assigned_to": task.assigned_to,
            }),
            Some(format!("Added task: {}", task.title)),
        );

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        TaskRepository::create(&mut *tx, &task).await?;
        ChangeRecordRepository::create(&mut *tx, &record).await?;
        tx.commit().await.map_err(DbError::from)?;

        log::info!("Added task {} to project {}", task.id, project_id);

        Ok(task)
    }

    /// Update a task. A status transition is the only task edit that
    /// produces a change record; every other edit persists silently.
    pub async fn update_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        patch: TaskPatch,
        acting_user: Uuid,
    ) -> ServiceResult<Task> {
        let lock = self.locks.lock_for(project_id);
        let _guard = lock.lock().await;

        let mut task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .filter(|t| t.project_id == project_id)
            .ok_or_else(|| ServiceError::task_not_found(task_id))?;

        let old_status = task.status;
        patch.apply_to(&mut task);

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        TaskRepository::update(&mut *tx, &task).await?;
        if old_status != task.status {
            let record = ChangeRecord::new(
                project_id,
                Some(acting_user),
                ChangeAction::TaskUpdated,
                json!({
                    "task_id": task.id,
                    "title": task.title,
                    "status": {
                        "from": old_status.as_str(),
                        "to": task.status.as_str(),
                    },
                }),
                Some(format!("Task status changed: {}", task.title)),
            );
            ChangeRecordRepository::create(&mut *tx, &record).await?;
        }
        tx.commit().await.map_err(DbError::from)?;

        Ok(task)
    }

    pub async fn delete_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        acting_user: Uuid,
    ) -> ServiceResult<()> {
        let lock = self.locks.lock_for(project_id);
        let _guard = lock.lock().await;

        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .filter(|t| t.project_id == project_id)
            .ok_or_else(|| ServiceError::task_not_found(task_id))?;

        let record = ChangeRecord::new(
            project_id,
            Some(acting_user),
            ChangeAction::TaskDeleted,
            json!({
                "task_id": task.id,
                "title": task.title,
            }),
            Some(format!("Removed task: {}", task.title)),
        );

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        ChangeRecordRepository::create(&mut *tx, &record).await?;
        TaskRepository::delete(&mut *tx, task_id).await?;
        tx.commit().await.map_err(DbError::from)?;

        log::info!("Removed task {} from project {}", task_id, project_id);

        Ok(())
    }

    // ---------------------------------------------------------------- //
    // Documents
    // ---------------------------------------------------------------- //

    /// Upload a document. The version counter for the (project, title)
    /// group is assigned first, inside the transaction, so concurrent
    /// uploads of one title cannot collide.
    pub async fn add_document(
        &self,
        project_id: Uuid,
        request: NewDocument,
        acting_user: Uuid,
    ) -> ServiceResult<ProjectDocument> {
        let lock = self.locks.lock_for(project_id);
        let _guard = lock.lock().await;

        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| ServiceError::project_not_found(project_id))?;

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        let version =
            DocumentRepository::next_version_for_title(&mut tx, project_id, &request.title).await?;

        let document = ProjectDocument::new(
            project_id,
            request.title,
            request.description,
            request.document_type,
            request.content_ref,
            version,
            Some(acting_user),
        );
        let record = ChangeRecord::new(
            project_id,
            Some(acting_user),
            ChangeAction::DocumentAdded,
            json!({
                "document_id": document.id,
                "title": document.title,
                "document_type": document.document_type,
            }),
            Some(format!("Added document: {}", document.title)),
        );

        DocumentRepository::create(&mut *tx, &document).await?;
        ChangeRecordRepository::create(&mut *tx, &record).await?;
        tx.commit().await.map_err(DbError::from)?;

        log::info!(
            "Added document {} v{} to project {}",
            document.id,
            document.version,
            project_id
        );

        Ok(document)
    }

    /// Update a document. A changed content reference counts as a
    /// re-upload of the title and bumps the version counter; metadata
    /// edits keep the current version. Either way one `document_updated`
    /// record is logged carrying the old and new version numbers.
    pub async fn update_document(
        &self,
        project_id: Uuid,
        document_id: Uuid,
        patch: DocumentPatch,
        acting_user: Uuid,
    ) -> ServiceResult<ProjectDocument> {
        let lock = self.locks.lock_for(project_id);
        let _guard = lock.lock().await;

        let mut document = self
            .documents
            .find_by_id(document_id)
            .await?
            .filter(|d| d.project_id == project_id)
            .ok_or_else(|| ServiceError::document_not_found(document_id))?;

        let old_version = document.version;

        if let Some(ref title) = patch.title {
            document.title = title.clone();
        }
        if let Some(ref description) = patch.description {
            document.description = Some(description.clone());
        }
        if let Some(ref document_type) = patch.document_type {
            document.document_type = document_type.clone();
        }
        let reuploaded = match patch.content_ref {
            Some(ref content_ref) if *content_ref != document.content_ref => {
                document.content_ref = content_ref.clone();
                true
            }
            _ => false,
        };

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        if reuploaded {
            document.version =
                DocumentRepository::next_version_for_title(&mut tx, project_id, &document.title)
                    .await?;
        }

        let record = ChangeRecord::new(
            project_id,
            Some(acting_user),
            ChangeAction::DocumentUpdated,
            json!({
                "document_id": document.id,
                "title": document.title,
                "old_version": old_version,
                "new_version": document.version,
            }),
            Some(format!("Updated document: {}", document.title)),
        );

        DocumentRepository::update(&mut *tx, &document).await?;
        ChangeRecordRepository::create(&mut *tx, &record).await?;
        tx.commit().await.map_err(DbError::from)?;

        Ok(document)
    }

    pub async fn remove_document(
        &self,
        project_id: Uuid,
        document_id: Uuid,
        acting_user: Uuid,
    ) -> ServiceResult<()> {
        let lock = self.locks.lock_for(project_id);
        let _guard = lock.lock().await;

        let document = self
            .documents
            .find_by_id(document_id)
            .await?
            .filter(|d| d.project_id == project_id)
            .ok_or_else(|| ServiceError::document_not_found(document_id))?;

        let record = ChangeRecord::new(
            project_id,
            Some(acting_user),
            ChangeAction::DocumentRemoved,
            json!({
                "document_id": document.id,
                "title": document.title,
                "version": document.version,
            }),
            Some(format!("Removed document: {}", document.title)),
        );

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        ChangeRecordRepository::create(&mut *tx, &record).await?;
        DocumentRepository::delete(&mut *tx, document_id).await?;
        tx.commit().await.map_err(DbError::from)?;

        log::info!(
            "Removed document {} from project {}",
            document_id,
            project_id
        );

        Ok(())
    }

    // ---------------------------------------------------------------- //
    // Version history
    // ---------------------------------------------------------------- //

    /// The project's ordered ledger as 1-indexed version entries.
    pub async fn list_versions(&self, project_id: Uuid) -> ServiceResult<Vec<VersionEntry>> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| ServiceError::project_not_found(project_id))?;

        let records = ChangeRecordRepository::find_by_project(&self.pool, project_id).await?;
        Ok(history::version_entries(&records))
    }

    /// Replay the ledger up to `target_version` into a scalar snapshot
    /// without touching the live project.
    pub async fn reconstruct(
        &self,
        project_id: Uuid,
        target_version: i64,
    ) -> ServiceResult<Map<String, Value>> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| ServiceError::project_not_found(project_id))?;

        let records = ChangeRecordRepository::find_by_project(&self.pool, project_id).await?;
        check_version_in_range(target_version, records.len())?;

        Ok(history::replay(&records, target_version as usize))
    }

    /// Restore the project to `target_version`. The reconstructed
    /// snapshot is applied as a normal mutation and logged as one new
    /// `restore` record carrying the pre-restore state; no prior record
    /// is changed or removed.
    pub async fn restore_version(
        &self,
        project_id: Uuid,
        target_version: i64,
        acting_user: Uuid,
    ) -> ServiceResult<Project> {
        let lock = self.locks.lock_for(project_id);
        let _guard = lock.lock().await;

        let mut project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| ServiceError::project_not_found(project_id))?;

        let records = ChangeRecordRepository::find_by_project(&self.pool, project_id).await?;
        check_version_in_range(target_version, records.len())?;

        let previous_state = project.to_state_map();
        let restored_state = history::replay(&records, target_version as usize);

        project.apply_state(&restored_state);
        project.updated_at = chrono::Utc::now();

        let record = ChangeRecord::new(
            project_id,
            Some(acting_user),
            ChangeAction::Restore,
            json!({
                "restored_to_version": target_version,
                "previous_state": previous_state,
                "restored_state": restored_state,
            }),
            Some(format!("Restored to version {}", target_version)),
        );

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        ProjectRepository::update(&mut *tx, &project).await?;
        ChangeRecordRepository::create(&mut *tx, &record).await?;
        tx.commit().await.map_err(DbError::from)?;

        log::info!(
            "Restored project {} to version {}",
            project_id,
            target_version
        );

        Ok(project)
    }

    // ---------------------------------------------------------------- //
    // Read surface for the transport layer
    // ---------------------------------------------------------------- //

    pub async fn project(&self, project_id: Uuid) -> ServiceResult<Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| ServiceError::project_not_found(project_id))
    }

    pub async fn projects(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.projects.find_all().await?)
    }

    pub async fn members(&self, project_id: Uuid) -> ServiceResult<Vec<ProjectMember>> {
        Ok(self.members.find_by_project(project_id).await?)
    }

    pub async fn tasks(&self, project_id: Uuid) -> ServiceResult<Vec<Task>> {
        Ok(self.tasks.find_by_project(project_id).await?)
    }

    pub async fn documents(&self, project_id: Uuid) -> ServiceResult<Vec<ProjectDocument>> {
        Ok(self.documents.find_by_project(project_id).await?)
    }
}

/// Versions are 1-indexed positions in the ledger; anything outside
/// `1..=len` does not exist.
fn check_version_in_range(target_version: i64, record_count: usize) -> ServiceResult<()> {
    if target_version < 1 || target_version > record_count as i64 {
        return Err(ServiceError::version_out_of_range(
            target_version,
            record_count as i64,
        ));
    }
    Ok(())
}
