use serde::{Deserialize, Serialize};

/// User-editable part of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskDetails {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl TaskDetails {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            completed: false,
        }
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// A task: stable id plus details.
///
/// The id never changes; edits produce a new `Task` with replaced details.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    id: String,
    details: TaskDetails,
}

impl Task {
    pub fn new(id: impl Into<String>, details: TaskDetails) -> Self {
        Self {
            id: id.into(),
            details,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn details(&self) -> &TaskDetails {
        &self.details
    }

    pub fn title(&self) -> &str {
        &self.details.title
    }

    pub fn description(&self) -> &str {
        &self.details.description
    }

    pub fn is_completed(&self) -> bool {
        self.details.completed
    }

    /// Same task, different details.
    pub fn with_details(&self, details: TaskDetails) -> Self {
        Self {
            id: self.id.clone(),
            details,
        }
    }

    pub fn complete(&self) -> Self {
        self.with_details(self.details.clone().with_completed(true))
    }

    pub fn activate(&self) -> Self {
        self.with_details(self.details.clone().with_completed(false))
    }
}
