use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::{self, BoxStream, StreamExt};
use tracing::{info, warn};

use crate::errors::StoreError;
use crate::local::LocalTaskStore;
use crate::store::{StoreResult, TaskStore};
use crate::task::{Task, TaskDetails};

pub const DEFAULT_LATENCY: Duration = Duration::from_millis(3000);

/// Stand-in for a server-side store.
///
/// Reads are delayed by `latency`. In failing mode every operation returns
/// [`StoreError::Unavailable`].
pub struct SimulatedRemote<S> {
    inner: S,
    latency: Duration,
    failing: AtomicBool,
}

impl SimulatedRemote<LocalTaskStore> {
    pub fn in_memory(latency: Duration) -> Self {
        Self::new(LocalTaskStore::in_memory(), latency)
    }

    /// File-backed remote. Seeded with the sample tasks when `file` does not
    /// exist yet; an existing file is taken as is, even if empty.
    pub async fn open(file: impl Into<PathBuf>, latency: Duration) -> StoreResult<Self> {
        let file = file.into();
        let created = !file.exists();
        let remote = Self::new(LocalTaskStore::open(file)?, latency);
        if created {
            remote.seed_defaults().await?;
        }
        Ok(remote)
    }
}

impl<S: TaskStore> SimulatedRemote<S> {
    pub fn new(inner: S, latency: Duration) -> Self {
        Self {
            inner,
            latency,
            failing: AtomicBool::new(false),
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn is_failing(&self) -> bool {
        self.failing.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Insert the two sample tasks.
    ///
    /// Only meant for a store that was just created: ids are never reused,
    /// so a store emptied by the user must stay empty.
    pub async fn seed_defaults(&self) -> StoreResult<()> {
        for task in sample_tasks() {
            self.inner.save_task(&task)?;
        }
        info!("seeded remote store with sample tasks");
        Ok(())
    }

    fn check(&self, operation: &str) -> StoreResult<()> {
        if self.is_failing() {
            warn!(operation, "simulated remote is failing");
            return Err(StoreError::Unavailable(format!("remote {operation} failed")));
        }
        Ok(())
    }
}

fn sample_tasks() -> [Task; 2] {
    [
        Task::new(
            "1234",
            TaskDetails::new(
                "Build tower in Pisa",
                "Ground looks good, no foundation work required.",
            ),
        ),
        Task::new(
            "4321",
            TaskDetails::new(
                "Finish bridge in Tacoma",
                "Found awesome girders at half the cost!",
            ),
        ),
    ]
}

impl<S: TaskStore> TaskStore for SimulatedRemote<S> {
    fn tasks(&self) -> BoxStream<'static, StoreResult<Vec<Task>>> {
        if let Err(e) = self.check("list") {
            return stream::once(future::ready(Err(e))).boxed();
        }
        let delay = tokio::time::sleep(self.latency);
        let inner = self.inner.tasks();
        stream::once(async move {
            delay.await;
            inner
        })
        .flatten()
        .boxed()
    }

    fn task(&self, id: &str) -> BoxFuture<'static, StoreResult<Option<Task>>> {
        if let Err(e) = self.check("get") {
            return future::ready(Err(e)).boxed();
        }
        let delay = tokio::time::sleep(self.latency);
        let inner = self.inner.task(id);
        async move {
            delay.await;
            inner.await
        }
        .boxed()
    }

    fn save_task(&self, task: &Task) -> StoreResult<()> {
        self.check("save")?;
        self.inner.save_task(task)
    }

    fn delete_task(&self, id: &str) -> StoreResult<()> {
        self.check("delete")?;
        self.inner.delete_task(id)
    }

    fn delete_all_tasks(&self) -> StoreResult<()> {
        self.check("delete all")?;
        self.inner.delete_all_tasks()
    }
}
