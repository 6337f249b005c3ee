use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tasks::Task;
use thiserror::Error;

/// Which tasks the list shows. Never changes the stored list.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum TasksFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TasksFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TasksFilter::All => true,
            TasksFilter::Active => !task.is_completed(),
            TasksFilter::Completed => task.is_completed(),
        }
    }

    /// Order-preserving projection of `tasks`.
    pub fn apply(self, tasks: &[Task]) -> Vec<Task> {
        tasks.iter().filter(|t| self.matches(t)).cloned().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksListModel {
    /// `None` until the first load.
    pub tasks: Option<Vec<Task>>,
    pub loading: bool,
    pub filter: TasksFilter,
}

impl TasksListModel {
    pub fn with_tasks(&self, tasks: Vec<Task>) -> Self {
        Self {
            tasks: Some(tasks),
            ..self.clone()
        }
    }

    pub fn with_loading(&self, loading: bool) -> Self {
        Self {
            loading,
            ..self.clone()
        }
    }

    pub fn with_filter(&self, filter: TasksFilter) -> Self {
        Self {
            filter,
            ..self.clone()
        }
    }

    /// Tasks matching the current filter, `None` while not loaded.
    pub fn visible_tasks(&self) -> Option<Vec<Task>> {
        self.tasks.as_deref().map(|tasks| self.filter.apply(tasks))
    }

    /// Position and task for `id` in the unfiltered list.
    pub fn find_task(&self, id: &str) -> Result<(usize, &Task), TasksListError> {
        let tasks = self.tasks.as_ref().ok_or(TasksListError::NotLoaded)?;
        tasks
            .iter()
            .enumerate()
            .find(|(_, t)| t.id() == id)
            .ok_or_else(|| TasksListError::UnknownTask(id.to_owned()))
    }
}

/// Events the list reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TasksListEvent {
    RefreshRequested,
    NewTaskClicked,
    NavigateToTaskDetailsRequested(String),
    TaskMarkedComplete(String),
    TaskMarkedActive(String),
    ClearCompletedTasksRequested,
    FilterSelected(TasksFilter),
    TasksLoaded(Vec<Task>),
    TaskCreated,
    TasksRefreshed,
    TasksRefreshFailed,
    TasksLoadingFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TasksListEffect {
    RefreshTasks,
    LoadTasks,
    SaveTask(Task),
    DeleteTasks(Vec<Task>),
    ShowFeedback(FeedbackType),
    NavigateToTaskDetails(Task),
    StartTaskCreationFlow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FeedbackType {
    #[strum(to_string = "TO-DO saved")]
    SavedSuccessfully,
    #[strum(to_string = "Task marked active")]
    MarkedActive,
    #[strum(to_string = "Task marked complete")]
    MarkedComplete,
    #[strum(to_string = "Completed tasks cleared")]
    ClearedCompleted,
    #[strum(to_string = "Error while loading tasks")]
    LoadingError,
}

/// An event referenced a task the list cannot know about.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TasksListError {
    #[error("tasks have not been loaded yet")]
    NotLoaded,

    #[error("task {0} does not exist")]
    UnknownTask(String),
}
