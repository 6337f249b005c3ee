use std::path::Path;
use std::sync::Arc;

use app::AppConfig;
use pretty_assertions::assert_eq;
use screens::tasks_list::TasksFilter;
use todo::{Cmd, Console, Session};

fn config(root: &Path, remote_failing: bool) -> AppConfig {
    AppConfig {
        data_dir: root.join("data"),
        config_dir: root.join("config"),
        log_level: "debug".into(),
        remote_latency_ms: 0,
        remote_failing,
    }
}

/// One invocation of the binary against `root`.
async fn run(root: &Path, remote_failing: bool, cmd: Cmd) -> color_eyre::Result<Vec<String>> {
    let config = config(root, remote_failing);
    config.ensure_dirs()?;
    let console = Arc::new(Console::captured());
    Session::open(&config, console.clone()).await?.run(cmd).await?;
    Ok(console.lines())
}

fn list() -> Cmd {
    Cmd::List {
        filter: None,
        refresh: false,
    }
}

#[tokio::test]
async fn first_list_pulls_the_remote_tasks() {
    let root = tempfile::tempdir().unwrap();

    let lines = run(root.path(), false, list()).await.unwrap();

    assert_eq!(
        lines,
        vec![
            "All TO-DOs",
            "  [ ] 1234  Build tower in Pisa",
            "  [ ] 4321  Finish bridge in Tacoma",
        ]
    );
    assert!(root.path().join("data/screens/tasks_list.json").is_file());
    assert!(root.path().join("data/tasks.json").is_file());
}

#[tokio::test]
async fn completing_shows_feedback_and_updates_statistics() {
    let root = tempfile::tempdir().unwrap();
    run(root.path(), false, list()).await.unwrap();

    let lines = run(root.path(), false, Cmd::Complete { id: "1234".into() })
        .await
        .unwrap();
    assert!(lines.contains(&"Task marked complete".to_owned()));
    assert!(lines.contains(&"  [x] 1234  Build tower in Pisa".to_owned()));

    let lines = run(root.path(), false, Cmd::Stats).await.unwrap();
    assert_eq!(lines, vec!["Active tasks: 1", "Completed tasks: 1"]);

    let lines = run(root.path(), false, Cmd::ClearCompleted).await.unwrap();
    assert!(lines.contains(&"Completed tasks cleared".to_owned()));
    assert!(!lines.iter().any(|l| l.contains("1234")));
}

#[tokio::test]
async fn unknown_id_is_rejected() {
    let root = tempfile::tempdir().unwrap();

    let err = run(root.path(), false, Cmd::Complete { id: "nope".into() })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "no task with id nope");

    let err = run(root.path(), false, Cmd::Show { id: "nope".into() })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "no task with id nope");
}

#[tokio::test]
async fn filter_is_restored_from_the_snapshot() {
    let root = tempfile::tempdir().unwrap();
    run(
        root.path(),
        false,
        Cmd::List {
            filter: Some(TasksFilter::Completed),
            refresh: false,
        },
    )
    .await
    .unwrap();

    let lines = run(root.path(), false, list()).await.unwrap();
    assert_eq!(lines, vec!["Completed TO-DOs", "  You have no completed TO-DOs!"]);
}

#[tokio::test]
async fn added_task_shows_up_in_the_list() {
    let root = tempfile::tempdir().unwrap();

    let lines = run(
        root.path(),
        false,
        Cmd::Add {
            title: " Buy milk ".into(),
            description: String::new(),
        },
    )
    .await
    .unwrap();

    assert!(lines.contains(&"TO-DO saved".to_owned()));
    assert!(lines.iter().any(|l| l.ends_with("  Buy milk")));
}

#[tokio::test]
async fn empty_task_is_refused() {
    let root = tempfile::tempdir().unwrap();

    let lines = run(
        root.path(),
        false,
        Cmd::Add {
            title: "  ".into(),
            description: String::new(),
        },
    )
    .await
    .unwrap();

    assert_eq!(lines, vec!["Tasks cannot be empty"]);
}

#[tokio::test]
async fn failed_edit_keeps_the_task() {
    let root = tempfile::tempdir().unwrap();
    run(root.path(), false, list()).await.unwrap();

    let lines = run(
        root.path(),
        true,
        Cmd::Edit {
            id: "1234".into(),
            title: Some("Renamed".into()),
            description: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(lines, vec!["Could not save the task"]);

    let lines = run(root.path(), false, Cmd::Show { id: "1234".into() })
        .await
        .unwrap();
    assert_eq!(
        lines,
        vec![
            "[ ] Build tower in Pisa",
            "    Ground looks good, no foundation work required.",
        ]
    );
}

#[tokio::test]
async fn deleted_task_is_gone() {
    let root = tempfile::tempdir().unwrap();
    run(root.path(), false, list()).await.unwrap();

    let lines = run(root.path(), false, Cmd::Delete { id: "4321".into() })
        .await
        .unwrap();
    assert_eq!(lines, vec!["Task deleted"]);

    assert!(run(root.path(), false, Cmd::Show { id: "4321".into() })
        .await
        .is_err());
}

#[tokio::test]
async fn deleted_tasks_stay_deleted_after_refresh() {
    let root = tempfile::tempdir().unwrap();
    run(root.path(), false, list()).await.unwrap();
    run(root.path(), false, Cmd::Delete { id: "1234".into() })
        .await
        .unwrap();
    run(root.path(), false, Cmd::Delete { id: "4321".into() })
        .await
        .unwrap();

    let lines = run(
        root.path(),
        false,
        Cmd::List {
            filter: None,
            refresh: true,
        },
    )
    .await
    .unwrap();
    assert_eq!(lines, vec!["All TO-DOs", "  You have no TO-DOs!"]);
}

#[tokio::test]
async fn statistics_follow_task_changes() {
    let root = tempfile::tempdir().unwrap();
    run(root.path(), false, list()).await.unwrap();

    let lines = run(root.path(), false, Cmd::Stats).await.unwrap();
    assert_eq!(lines, vec!["Active tasks: 2", "Completed tasks: 0"]);

    run(root.path(), false, Cmd::Complete { id: "1234".into() })
        .await
        .unwrap();
    run(
        root.path(),
        false,
        Cmd::Add {
            title: "new".into(),
            description: String::new(),
        },
    )
    .await
    .unwrap();

    let lines = run(root.path(), false, Cmd::Stats).await.unwrap();
    assert_eq!(lines, vec!["Active tasks: 2", "Completed tasks: 1"]);
}
