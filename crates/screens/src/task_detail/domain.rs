use tasks::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskDetailEvent {
    DeleteTaskRequested,
    CompleteTaskRequested,
    ActivateTaskRequested,
    EditTaskRequested,
    TaskDeleted,
    TaskMarkedComplete,
    TaskMarkedActive,
    TaskSaveFailed,
    TaskDeletionFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskDetailEffect {
    DeleteTask(Task),
    SaveTask(Task),
    NotifyTaskMarkedComplete,
    NotifyTaskMarkedActive,
    NotifyTaskSaveFailed,
    NotifyTaskDeletionFailed,
    OpenTaskEditor(Task),
    Exit,
}

/// Render-ready projection of the task. Empty texts are hidden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetailViewData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: bool,
}

impl From<&Task> for TaskDetailViewData {
    fn from(task: &Task) -> Self {
        let visible = |text: &str| (!text.is_empty()).then(|| text.to_owned());
        Self {
            title: visible(task.title()),
            description: visible(task.description()),
            completed: task.is_completed(),
        }
    }
}
