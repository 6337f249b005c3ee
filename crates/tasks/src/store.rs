use futures::future::BoxFuture;
use futures::stream::BoxStream;

use crate::errors::StoreError;
use crate::task::Task;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage boundary for tasks.
///
/// Reads are asynchronous, writes complete before returning. Writes are
/// serialized by the implementation; callers never lock.
pub trait TaskStore: Send + Sync + 'static {
    /// All tasks in insertion order. The first item is the current content,
    /// later items follow every change.
    fn tasks(&self) -> BoxStream<'static, StoreResult<Vec<Task>>>;

    fn task(&self, id: &str) -> BoxFuture<'static, StoreResult<Option<Task>>>;

    /// Insert or replace by id. Last write wins.
    fn save_task(&self, task: &Task) -> StoreResult<()>;

    /// Removing an unknown id is not an error.
    fn delete_task(&self, id: &str) -> StoreResult<()>;

    fn delete_all_tasks(&self) -> StoreResult<()>;
}
