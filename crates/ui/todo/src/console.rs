//! Line-based rendering of the screens.

use std::sync::{Arc, Mutex};

use engine::{EventSink, Observer};
use screens::add_edit::AddEditTaskViewActions;
use screens::statistics::StatisticsState;
use screens::task_detail::{TaskDetailViewActions, TaskDetailViewData};
use screens::tasks_list::{FeedbackType, TasksListViewActions, TasksListViewData, ViewState};
use tasks::Task;

/// Output sink shared by every screen's view actions.
///
/// Either prints to stdout or, for tests, keeps the lines.
#[derive(Default)]
pub struct Console {
    captured: Option<Mutex<Vec<String>>>,
    exit: Mutex<Option<bool>>,
}

impl Console {
    pub fn stdout() -> Self {
        Self::default()
    }

    pub fn captured() -> Self {
        Self {
            captured: Some(Mutex::new(Vec::new())),
            ..Self::default()
        }
    }

    pub fn line(&self, line: impl Into<String>) {
        let line = line.into();
        match &self.captured {
            Some(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(line);
                }
            }
            None => println!("{line}"),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.captured
            .as_ref()
            .and_then(|lines| lines.lock().ok().map(|l| l.clone()))
            .unwrap_or_default()
    }

    /// Result of the last add/edit screen, taken once.
    pub fn take_exit(&self) -> Option<bool> {
        self.exit.lock().ok().and_then(|mut exit| exit.take())
    }

    pub fn print_tasks(&self, view: &TasksListViewData) {
        let suffix = if view.loading { " (refreshing)" } else { "" };
        self.line(format!("{}{suffix}", view.filter_label));
        match &view.state {
            ViewState::AwaitingTasks => self.line("  loading..."),
            ViewState::EmptyTasks { message } => self.line(format!("  {message}")),
            ViewState::HasTasks(tasks) => {
                for task in tasks {
                    let mark = if task.completed { 'x' } else { ' ' };
                    self.line(format!("  [{mark}] {}  {}", task.id, task.title));
                }
            }
        }
    }

    pub fn print_task(&self, view: &TaskDetailViewData) {
        let mark = if view.completed { 'x' } else { ' ' };
        self.line(format!("[{mark}] {}", view.title.as_deref().unwrap_or("(untitled)")));
        if let Some(description) = &view.description {
            self.line(format!("    {description}"));
        }
    }

    pub fn print_statistics(&self, state: &StatisticsState) {
        match state {
            StatisticsState::Loading => self.line("Loading statistics..."),
            StatisticsState::Failed => self.line("Statistics are not available"),
            StatisticsState::Loaded { active, completed } if active + completed == 0 => {
                self.line("You have no tasks.")
            }
            StatisticsState::Loaded { active, completed } => {
                self.line(format!("Active tasks: {active}"));
                self.line(format!("Completed tasks: {completed}"));
            }
        }
    }
}

impl TasksListViewActions for Console {
    fn show_feedback(&self, feedback: FeedbackType) {
        self.line(feedback.to_string());
    }

    fn show_task_details(&self, task: &Task) {
        self.line(format!("-> task {}", task.id()));
    }

    fn show_add_task(&self) {
        self.line("-> new task");
    }
}

impl TaskDetailViewActions for Console {
    fn show_task_marked_complete(&self) {
        self.line("Task marked complete");
    }

    fn show_task_marked_active(&self) {
        self.line("Task marked active");
    }

    fn show_task_save_failed(&self) {
        self.line("Could not save the task");
    }

    fn show_task_deletion_failed(&self) {
        self.line("Could not delete the task");
    }

    fn open_task_editor(&self, task: &Task) {
        self.line(format!("-> edit task {}", task.id()));
    }

    fn exit(&self) {
        self.line("Task deleted");
    }
}

impl AddEditTaskViewActions for Console {
    fn show_empty_task_error(&self) {
        self.line("Tasks cannot be empty");
    }

    fn exit(&self, successful: bool) {
        if !successful {
            self.line("Could not save the task");
        }
        if let Ok(mut exit) = self.exit.lock() {
            *exit = Some(successful);
        }
    }
}

/// Observer keeping the projection of the latest model.
pub struct Latest<M, V> {
    project: fn(&M) -> V,
    slot: Arc<Mutex<Option<V>>>,
}

impl<M, V> Latest<M, V> {
    pub fn new(project: fn(&M) -> V) -> Self {
        Self {
            project,
            slot: Arc::new(Mutex::new(None)),
        }
    }

    pub fn take(&self) -> Option<V> {
        self.slot.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl<M, V> Clone for Latest<M, V> {
    fn clone(&self) -> Self {
        Self {
            project: self.project,
            slot: self.slot.clone(),
        }
    }
}

impl<M, E, V> Observer<M, E> for Latest<M, V>
where
    M: 'static,
    V: Send + 'static,
{
    fn connect(&mut self, _events: EventSink<E>) {}

    fn on_model_changed(&mut self, model: &M) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some((self.project)(model));
        }
    }
}
