use std::time::Duration;

use futures::StreamExt;
use pretty_assertions::assert_eq;
use tasks::{LocalTaskStore, SimulatedRemote, StoreError, Task, TaskDetails, TaskStore};
use tempfile::tempdir;

fn task(id: &str, title: &str) -> Task {
    Task::new(id, TaskDetails::new(title, "details"))
}

#[tokio::test]
async fn local_store_survives_reopen() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("nested").join("tasks.json");

    let store = LocalTaskStore::open(&file).unwrap();
    store.save_task(&task("b", "second")).unwrap();
    store.save_task(&task("a", "first")).unwrap();
    store.save_task(&task("b", "second").complete()).unwrap();
    drop(store);

    let reopened = LocalTaskStore::open(&file).unwrap();
    assert_eq!(
        reopened.snapshot(),
        vec![task("b", "second").complete(), task("a", "first")]
    );
    assert_eq!(reopened.file(), Some(file.as_path()));

    reopened.delete_all_tasks().unwrap();
    assert!(LocalTaskStore::open(&file).unwrap().snapshot().is_empty());
}

#[tokio::test]
async fn empty_file_opens_as_empty_store() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("tasks.json");
    std::fs::write(&file, "  \n").unwrap();

    let store = LocalTaskStore::open(&file).unwrap();
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn corrupt_file_is_a_serialization_error() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("tasks.json");
    std::fs::write(&file, "{ not json").unwrap();

    assert!(matches!(
        LocalTaskStore::open(&file),
        Err(StoreError::Serialization(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn remote_reads_are_delayed() {
    let remote = SimulatedRemote::in_memory(Duration::from_millis(3000));
    remote.save_task(&task("1", "one")).unwrap();

    let started = tokio::time::Instant::now();
    let first = remote.tasks().next().await.unwrap().unwrap();
    assert_eq!(first, vec![task("1", "one")]);
    assert!(started.elapsed() >= Duration::from_millis(3000));

    let found = remote.task("1").await.unwrap();
    assert_eq!(found, Some(task("1", "one")));
}

#[tokio::test]
async fn failing_remote_rejects_everything() {
    let remote = SimulatedRemote::in_memory(Duration::ZERO);
    remote.set_failing(true);

    assert!(matches!(
        remote.save_task(&task("1", "one")),
        Err(StoreError::Unavailable(_))
    ));
    assert!(matches!(remote.delete_task("1"), Err(StoreError::Unavailable(_))));
    assert!(matches!(remote.task("1").await, Err(StoreError::Unavailable(_))));
    let mut list = remote.tasks();
    assert!(matches!(list.next().await, Some(Err(StoreError::Unavailable(_)))));
    assert!(list.next().await.is_none());

    remote.set_failing(false);
    remote.save_task(&task("1", "one")).unwrap();
    assert_eq!(remote.inner().snapshot().len(), 1);
}

#[tokio::test]
async fn remote_is_seeded_once_when_its_file_is_created() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("remote.json");

    let remote = SimulatedRemote::open(&file, Duration::ZERO).await.unwrap();
    let ids: Vec<_> = remote
        .inner()
        .snapshot()
        .iter()
        .map(|t| t.id().to_owned())
        .collect();
    assert_eq!(ids, vec!["1234", "4321"]);
    assert_eq!(remote.inner().snapshot()[0].title(), "Build tower in Pisa");

    remote.delete_task("1234").unwrap();
    remote.delete_task("4321").unwrap();
    drop(remote);

    let reopened = SimulatedRemote::open(&file, Duration::ZERO).await.unwrap();
    assert!(reopened.inner().snapshot().is_empty());
    let mut list = reopened.tasks();
    assert_eq!(list.next().await.unwrap().unwrap(), Vec::<Task>::new());
}
