//! Per-project mutual exclusion.
//!
//! A project's capture-diff-append sequence must not interleave with a
//! concurrent mutation of the same project, or both writers would diff
//! against a stale pre-state and log a wrong record. Handing each project
//! its own async mutex serializes mutations per project while leaving
//! different projects fully independent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

#[derive(Default)]
pub struct ProjectLocks {
    inner: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl ProjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `project_id`'s lock, created on first use. The returned
    /// Arc keeps the lock alive across the await points of a mutation.
    pub fn lock_for(&self, project_id: Uuid) -> Arc<AsyncMutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        map.entry(project_id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Drop the registry entry once a project is gone. Outstanding handles
    /// stay valid; only the map shrinks.
    pub fn forget(&self, project_id: Uuid) {
        let mut map = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        map.remove(&project_id);
    }
}
