/*!
Execution contexts for effect handlers.

Every handler invocation is packaged as a [`Job`] and handed to an
[`Executor`]. The loop itself never decides *where* a job runs; the handler
registration does, by binding a handler to one of:

- [`Inline`]: run the job right away on the dispatching task. Only for jobs
  that complete without awaiting runtime resources (plain sync handlers).
- [`Background`]: spawn the job on a Tokio runtime. Jobs run concurrently.
- [`Serial`]: a single worker task pulls jobs from an unbounded channel and
  runs them one after another in submission order. This is the "UI thread"
  equivalent: everything bound to the same `Serial` never overlaps.

`Serial` is `Clone` (cheap – clones the sender). Pending jobs are dropped
silently once every handle is gone.
*/

use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::LoopError;

/// Unit of work submitted by the handler registry.
pub type Job = BoxFuture<'static, ()>;

/// Something that runs jobs.
pub trait Executor: Send + Sync + 'static {
    fn execute(&self, job: Job);
}

/// Runs each job to completion on the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl Executor for Inline {
    fn execute(&self, job: Job) {
        futures::executor::block_on(job);
    }
}

/// Spawns each job on a Tokio runtime.
#[derive(Debug, Clone)]
pub struct Background {
    handle: Handle,
}

impl Background {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Bind to the runtime of the calling context.
    pub fn current() -> Result<Self, LoopError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| LoopError::NoRuntime(e.to_string()))
    }
}

impl Executor for Background {
    fn execute(&self, job: Job) {
        self.handle.spawn(job);
    }
}

/// Runs jobs strictly one at a time, in submission order.
#[derive(Clone)]
pub struct Serial {
    tx: mpsc::UnboundedSender<Job>,
    id: u64,
}

impl Serial {
    /// Create the executor and spawn its worker on the given runtime.
    pub fn new(handle: &Handle) -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel::<Job>();
        handle.spawn(Worker { rx, id }.run());
        Self { tx, id }
    }

    /// Like [`Serial::new`], using the runtime of the calling context.
    pub fn current() -> Result<Self, LoopError> {
        let handle = Handle::try_current().map_err(|e| LoopError::NoRuntime(e.to_string()))?;
        Ok(Self::new(&handle))
    }
}

impl Executor for Serial {
    fn execute(&self, job: Job) {
        if self.tx.send(job).is_err() {
            warn!("serial executor {} is gone; job dropped", self.id);
        }
    }
}

struct Worker {
    rx: mpsc::UnboundedReceiver<Job>,
    id: u64,
}

impl Worker {
    async fn run(mut self) {
        while let Some(job) = self.rx.recv().await {
            job.await;
        }
        debug!("serial executor {} stopped (channel closed)", self.id);
    }
}
