use std::sync::{Arc, Mutex};
use std::time::Duration;

use engine::{Controller, Inline, LoopStatus};
use pretty_assertions::assert_eq;
use screens::add_edit::{
    AddEditTaskEvent, AddEditTaskHandlers, AddEditTaskLogic, AddEditTaskModel,
    AddEditTaskViewActions,
};
use screens::statistics::{StatisticsHandlers, StatisticsLogic, StatisticsState};
use screens::task_detail::{
    TaskDetailEvent, TaskDetailHandlers, TaskDetailLogic, TaskDetailViewActions,
};
use screens::tasks_list::{
    FeedbackType, TasksListEvent, TasksListHandlers, TasksListLogic, TasksListModel,
    TasksListViewActions,
};
use screens::Stores;
use tasks::{LocalTaskStore, SimulatedRemote, Task, TaskDetails, TaskStore};

#[derive(Default)]
struct Recorder {
    log: Mutex<Vec<String>>,
}

impl Recorder {
    fn record(&self, entry: impl Into<String>) {
        self.log.lock().unwrap().push(entry.into());
    }

    fn entries(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl TasksListViewActions for Recorder {
    fn show_feedback(&self, feedback: FeedbackType) {
        self.record(format!("feedback:{feedback:?}"));
    }

    fn show_task_details(&self, task: &Task) {
        self.record(format!("details:{}", task.id()));
    }

    fn show_add_task(&self) {
        self.record("add");
    }
}

impl TaskDetailViewActions for Recorder {
    fn show_task_marked_complete(&self) {
        self.record("marked complete");
    }

    fn show_task_marked_active(&self) {
        self.record("marked active");
    }

    fn show_task_save_failed(&self) {
        self.record("save failed");
    }

    fn show_task_deletion_failed(&self) {
        self.record("deletion failed");
    }

    fn open_task_editor(&self, task: &Task) {
        self.record(format!("edit:{}", task.id()));
    }

    fn exit(&self) {
        self.record("exit");
    }
}

impl AddEditTaskViewActions for Recorder {
    fn show_empty_task_error(&self) {
        self.record("empty");
    }

    fn exit(&self, successful: bool) {
        self.record(format!("exit:{successful}"));
    }
}

struct Fixture {
    remote: Arc<SimulatedRemote<LocalTaskStore>>,
    local: Arc<LocalTaskStore>,
    view: Arc<Recorder>,
}

impl Fixture {
    async fn seeded() -> Self {
        let remote = Arc::new(SimulatedRemote::in_memory(Duration::ZERO));
        remote.seed_defaults().await.unwrap();
        Self {
            remote,
            local: Arc::new(LocalTaskStore::in_memory()),
            view: Arc::new(Recorder::default()),
        }
    }

    fn stores(&self) -> Stores {
        Stores::new(self.remote.clone(), self.local.clone())
    }

    fn tasks_list(&self, model: TasksListModel) -> Controller<TasksListLogic, TasksListHandlers> {
        let handlers = TasksListHandlers::new(self.stores(), self.view.clone(), Arc::new(Inline));
        Controller::new(TasksListLogic, handlers, model)
    }
}

fn ids(tasks: &[Task]) -> Vec<String> {
    tasks.iter().map(|t| t.id().to_owned()).collect()
}

#[tokio::test]
async fn task_list_refreshes_from_remote_on_first_entry() {
    let fx = Fixture::seeded().await;
    let mut list = fx.tasks_list(TasksListModel::default());

    list.start().unwrap();
    list.settled().await;

    let model = list.stop().unwrap();
    assert!(!model.loading);
    assert_eq!(ids(model.tasks.as_deref().unwrap()), vec!["1234", "4321"]);
    assert_eq!(ids(&fx.local.snapshot()), vec!["1234", "4321"]);
}

#[tokio::test]
async fn failed_refresh_shows_loading_error() {
    let fx = Fixture::seeded().await;
    fx.remote.set_failing(true);
    let mut list = fx.tasks_list(TasksListModel::default());

    list.start().unwrap();
    list.settled().await;

    let model = list.stop().unwrap();
    assert!(!model.loading);
    assert!(model.tasks.unwrap_or_default().is_empty());
    assert_eq!(fx.view.entries(), vec!["feedback:LoadingError"]);
}

#[tokio::test]
async fn toggles_and_clearing_reach_both_stores() {
    let fx = Fixture::seeded().await;
    let mut list = fx.tasks_list(TasksListModel::default());
    list.start().unwrap();
    list.settled().await;

    list.dispatch(TasksListEvent::TaskMarkedComplete("1234".into()));
    list.settled().await;
    assert!(fx.remote.inner().snapshot()[0].is_completed());
    assert!(fx.local.snapshot()[0].is_completed());

    list.dispatch(TasksListEvent::ClearCompletedTasksRequested);
    list.settled().await;
    assert_eq!(ids(&fx.local.snapshot()), vec!["4321"]);
    assert_eq!(ids(&fx.remote.inner().snapshot()), vec!["4321"]);
    assert_eq!(
        fx.view.entries(),
        vec!["feedback:MarkedComplete", "feedback:ClearedCompleted"]
    );
}

#[tokio::test]
async fn unknown_task_fails_the_list_loop() {
    let fx = Fixture::seeded().await;
    let mut list = fx.tasks_list(TasksListModel::default());
    list.start().unwrap();
    list.settled().await;

    list.dispatch(TasksListEvent::TaskMarkedActive("nope".into()));
    list.settled().await;

    assert!(matches!(list.status(), LoopStatus::Failed(reason) if reason.contains("nope")));
}

#[tokio::test]
async fn navigation_and_creation_go_to_the_view() {
    let fx = Fixture::seeded().await;
    let mut list = fx.tasks_list(TasksListModel::default());
    list.start().unwrap();
    list.settled().await;

    list.dispatch(TasksListEvent::NavigateToTaskDetailsRequested("4321".into()));
    list.dispatch(TasksListEvent::NewTaskClicked);
    list.dispatch(TasksListEvent::TaskCreated);
    list.settled().await;

    assert_eq!(
        fx.view.entries(),
        vec!["details:4321", "add", "feedback:SavedSuccessfully"]
    );
}

#[tokio::test]
async fn detail_completion_is_saved_and_notified() {
    let fx = Fixture::seeded().await;
    let task = Task::new("1234", TaskDetails::new("Build tower in Pisa", ""));
    let handlers = TaskDetailHandlers::new(fx.stores(), fx.view.clone(), Arc::new(Inline));
    let mut detail = Controller::new(TaskDetailLogic, handlers, task.clone());

    detail.start().unwrap();
    detail.dispatch(TaskDetailEvent::CompleteTaskRequested);
    detail.dispatch(TaskDetailEvent::EditTaskRequested);
    detail.settled().await;

    assert_eq!(detail.model(), task.complete());
    assert_eq!(fx.local.task("1234").await.unwrap(), Some(task.complete()));
    let mut entries = fx.view.entries();
    entries.sort();
    assert_eq!(entries, vec!["edit:1234", "marked complete"]);
}

#[tokio::test]
async fn detail_failures_are_surfaced() {
    let fx = Fixture::seeded().await;
    fx.remote.set_failing(true);
    let task = Task::new("1234", TaskDetails::new("Build tower in Pisa", ""));
    let handlers = TaskDetailHandlers::new(fx.stores(), fx.view.clone(), Arc::new(Inline));
    let mut detail = Controller::new(TaskDetailLogic, handlers, task);

    detail.start().unwrap();
    detail.dispatch(TaskDetailEvent::DeleteTaskRequested);
    detail.settled().await;
    detail.dispatch(TaskDetailEvent::ActivateTaskRequested);
    detail.dispatch(TaskDetailEvent::CompleteTaskRequested);
    detail.settled().await;

    assert_eq!(fx.view.entries(), vec!["deletion failed", "save failed"]);

    fx.remote.set_failing(false);
    detail.dispatch(TaskDetailEvent::DeleteTaskRequested);
    detail.settled().await;
    assert_eq!(fx.view.entries().last().map(String::as_str), Some("exit"));
    assert_eq!(fx.remote.inner().task("1234").await.unwrap(), None);
}

#[tokio::test]
async fn adding_a_task_stores_it_under_a_fresh_id() {
    let fx = Fixture::seeded().await;
    let handlers = AddEditTaskHandlers::new(fx.stores(), fx.view.clone(), Arc::new(Inline));
    let mut add = Controller::new(AddEditTaskLogic, handlers, AddEditTaskModel::add());

    add.start().unwrap();
    add.dispatch(AddEditTaskEvent::definition_completed(" ", ""));
    add.dispatch(AddEditTaskEvent::definition_completed(" Buy milk ", ""));
    add.settled().await;

    let local = fx.local.snapshot();
    assert_eq!(local.len(), 1);
    assert_eq!(local[0].title(), "Buy milk");
    assert_eq!(local[0].id().len(), 36);
    assert_eq!(fx.view.entries(), vec!["empty", "exit:true"]);
}

#[tokio::test]
async fn failed_edit_exits_unsuccessfully() {
    let fx = Fixture::seeded().await;
    fx.remote.set_failing(true);
    let original = Task::new("4321", TaskDetails::new("Finish bridge in Tacoma", ""));
    let handlers = AddEditTaskHandlers::new(fx.stores(), fx.view.clone(), Arc::new(Inline));
    let mut edit = Controller::new(AddEditTaskLogic, handlers, AddEditTaskModel::edit(&original));

    edit.start().unwrap();
    edit.dispatch(AddEditTaskEvent::definition_completed("Renamed", ""));
    edit.settled().await;

    assert_eq!(fx.view.entries(), vec!["exit:false"]);
    assert_eq!(fx.local.task("4321").await.unwrap(), None);
}

#[tokio::test]
async fn statistics_count_local_tasks() {
    let local = Arc::new(LocalTaskStore::in_memory());
    local
        .save_task(&Task::new("1", TaskDetails::new("a", "")))
        .unwrap();
    local
        .save_task(&Task::new("2", TaskDetails::new("b", "")).complete())
        .unwrap();
    local
        .save_task(&Task::new("3", TaskDetails::new("c", "")).complete())
        .unwrap();

    let mut stats = Controller::new(
        StatisticsLogic,
        StatisticsHandlers::new(local),
        StatisticsState::Failed,
    );
    stats.start().unwrap();
    stats.settled().await;

    assert_eq!(
        stats.stop().unwrap(),
        StatisticsState::Loaded {
            active: 1,
            completed: 2
        }
    );
}
