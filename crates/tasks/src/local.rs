use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::{self, BoxStream, StreamExt};
use indexmap::IndexMap;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::errors::StoreError;
use crate::store::{StoreResult, TaskStore};
use crate::task::Task;

/// Insertion-ordered task store.
///
/// With a backing file every write is persisted before it becomes visible
/// (write to `<file>.tmp`, then rename). Subscribers of [`TaskStore::tasks`]
/// see every successful write.
pub struct LocalTaskStore {
    file: Option<PathBuf>,
    tasks: Mutex<IndexMap<String, Task>>,
    changes: watch::Sender<Vec<Task>>,
}

impl Default for LocalTaskStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl LocalTaskStore {
    pub fn in_memory() -> Self {
        Self::from_map(None, IndexMap::new())
    }

    /// Open (or create on first write) a JSON file store.
    pub fn open(file: impl Into<PathBuf>) -> StoreResult<Self> {
        let file = file.into();
        let tasks = if file.exists() {
            let content = fs::read_to_string(&file)?;
            if content.trim().is_empty() {
                IndexMap::new()
            } else {
                let list: Vec<Task> = serde_json::from_str(&content)?;
                list.into_iter()
                    .map(|task| (task.id().to_owned(), task))
                    .collect()
            }
        } else {
            IndexMap::new()
        };
        info!(file = %file.display(), count = tasks.len(), "opened task store");
        Ok(Self::from_map(Some(file), tasks))
    }

    fn from_map(file: Option<PathBuf>, tasks: IndexMap<String, Task>) -> Self {
        let (changes, _) = watch::channel(tasks.values().cloned().collect());
        Self {
            file,
            tasks: Mutex::new(tasks),
            changes,
        }
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Current content, synchronously.
    pub fn snapshot(&self) -> Vec<Task> {
        self.changes.borrow().clone()
    }

    fn write(&self, change: impl FnOnce(&mut IndexMap<String, Task>)) -> StoreResult<()> {
        let mut tasks = self.tasks.lock().map_err(|_| StoreError::Poisoned)?;
        let mut next = tasks.clone();
        change(&mut next);
        if let Some(file) = &self.file {
            persist(file, &next)?;
        }
        *tasks = next;
        self.changes.send_replace(tasks.values().cloned().collect());
        Ok(())
    }
}

fn persist(file: &Path, tasks: &IndexMap<String, Task>) -> StoreResult<()> {
    if let Some(dir) = file.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    let list: Vec<&Task> = tasks.values().collect();
    let json = serde_json::to_string_pretty(&list)?;
    let tmp = file.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, file)?;
    debug!(file = %file.display(), count = list.len(), "persisted tasks");
    Ok(())
}

impl TaskStore for LocalTaskStore {
    fn tasks(&self) -> BoxStream<'static, StoreResult<Vec<Task>>> {
        let rx = self.changes.subscribe();
        stream::unfold((rx, true), |(mut rx, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            let tasks = rx.borrow_and_update().clone();
            Some((Ok(tasks), (rx, false)))
        })
        .boxed()
    }

    fn task(&self, id: &str) -> BoxFuture<'static, StoreResult<Option<Task>>> {
        let found = self
            .tasks
            .lock()
            .map(|tasks| tasks.get(id).cloned())
            .map_err(|_| StoreError::Poisoned);
        future::ready(found).boxed()
    }

    fn save_task(&self, task: &Task) -> StoreResult<()> {
        self.write(|tasks| {
            tasks.insert(task.id().to_owned(), task.clone());
        })
    }

    fn delete_task(&self, id: &str) -> StoreResult<()> {
        self.write(|tasks| {
            tasks.shift_remove(id);
        })
    }

    fn delete_all_tasks(&self) -> StoreResult<()> {
        self.write(IndexMap::clear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskDetails;

    fn task(id: &str) -> Task {
        Task::new(id, TaskDetails::new(format!("title {id}"), ""))
    }

    #[tokio::test]
    async fn upsert_keeps_insertion_order() {
        let store = LocalTaskStore::in_memory();
        store.save_task(&task("a")).unwrap();
        store.save_task(&task("b")).unwrap();
        store.save_task(&task("a").complete()).unwrap();

        let ids: Vec<_> = store.snapshot().iter().map(|t| t.id().to_owned()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(store.task("a").await.unwrap().unwrap().is_completed());
        assert_eq!(store.task("zzz").await.unwrap(), None);
    }

    #[tokio::test]
    async fn stream_starts_with_current_content() {
        let store = LocalTaskStore::in_memory();
        store.save_task(&task("a")).unwrap();

        let mut updates = store.tasks();
        assert_eq!(updates.next().await.unwrap().unwrap(), vec![task("a")]);

        store.delete_task("a").unwrap();
        assert_eq!(updates.next().await.unwrap().unwrap(), vec![]);
    }
}
