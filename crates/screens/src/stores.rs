use std::sync::Arc;

use tasks::{StoreResult, Task, TaskStore};
use tracing::warn;

/// Remote and local store as seen by effect handlers.
///
/// Writes go to the remote first, then to the local store. There is no
/// rollback: a failure after the remote write leaves both stores out of sync.
#[derive(Clone)]
pub struct Stores {
    pub remote: Arc<dyn TaskStore>,
    pub local: Arc<dyn TaskStore>,
}

impl Stores {
    pub fn new(remote: Arc<dyn TaskStore>, local: Arc<dyn TaskStore>) -> Self {
        Self { remote, local }
    }

    pub fn save(&self, task: &Task) -> StoreResult<()> {
        self.remote.save_task(task)?;
        self.local.save_task(task)
    }

    pub fn delete(&self, id: &str) -> StoreResult<()> {
        self.remote.delete_task(id)?;
        self.local.delete_task(id)
    }

    /// Fire-and-forget save: tries both stores, logs failures.
    pub(crate) fn save_best_effort(&self, task: &Task) {
        if let Err(e) = self.remote.save_task(task) {
            warn!(id = task.id(), error = %e, "remote save failed");
        }
        if let Err(e) = self.local.save_task(task) {
            warn!(id = task.id(), error = %e, "local save failed");
        }
    }

    pub(crate) fn delete_best_effort(&self, id: &str) {
        if let Err(e) = self.remote.delete_task(id) {
            warn!(id, error = %e, "remote delete failed");
        }
        if let Err(e) = self.local.delete_task(id) {
            warn!(id, error = %e, "local delete failed");
        }
    }
}
