use serde::{Deserialize, Serialize};
use tasks::{Task, TaskDetails};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Add,
    Edit(String),
}

/// Working copy of the task being written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddEditTaskModel {
    pub mode: Mode,
    pub details: TaskDetails,
}

impl AddEditTaskModel {
    pub fn add() -> Self {
        Self::default()
    }

    /// Edit an existing task, starting from its current details.
    pub fn edit(task: &Task) -> Self {
        Self {
            mode: Mode::Edit(task.id().to_owned()),
            details: task.details().clone(),
        }
    }

    pub fn with_details(&self, details: TaskDetails) -> Self {
        Self {
            mode: self.mode.clone(),
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddEditTaskEvent {
    TaskDefinitionCompleted { title: String, description: String },
    TaskCreatedSuccessfully,
    TaskCreationFailed(String),
    TaskUpdatedSuccessfully,
    TaskUpdateFailed(String),
}

impl AddEditTaskEvent {
    pub fn definition_completed(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::TaskDefinitionCompleted {
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddEditTaskEffect {
    NotifyEmptyTaskNotAllowed,
    CreateTask(TaskDetails),
    SaveTask(Task),
    /// Leave the screen; `true` when the task was stored.
    Exit(bool),
}
