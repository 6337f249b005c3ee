use tasks::Task;

use super::domain::{TasksFilter, TasksListModel};

/// Render-ready projection of [`TasksListModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksListViewData {
    pub filter_label: &'static str,
    pub loading: bool,
    pub state: ViewState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    AwaitingTasks,
    EmptyTasks { message: &'static str },
    HasTasks(Vec<TaskViewData>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskViewData {
    pub id: String,
    /// Title, or the description for untitled tasks.
    pub title: String,
    pub completed: bool,
}

impl From<&Task> for TaskViewData {
    fn from(task: &Task) -> Self {
        let title = if task.title().is_empty() {
            task.description()
        } else {
            task.title()
        };
        Self {
            id: task.id().to_owned(),
            title: title.to_owned(),
            completed: task.is_completed(),
        }
    }
}

impl TasksFilter {
    pub fn label(self) -> &'static str {
        match self {
            TasksFilter::All => "All TO-DOs",
            TasksFilter::Active => "Active TO-DOs",
            TasksFilter::Completed => "Completed TO-DOs",
        }
    }

    fn empty_message(self) -> &'static str {
        match self {
            TasksFilter::All => "You have no TO-DOs!",
            TasksFilter::Active => "You have no active TO-DOs!",
            TasksFilter::Completed => "You have no completed TO-DOs!",
        }
    }
}

impl From<&TasksListModel> for TasksListViewData {
    fn from(model: &TasksListModel) -> Self {
        let state = match model.visible_tasks() {
            None => ViewState::AwaitingTasks,
            Some(tasks) if tasks.is_empty() => ViewState::EmptyTasks {
                message: model.filter.empty_message(),
            },
            Some(tasks) => ViewState::HasTasks(tasks.iter().map(TaskViewData::from).collect()),
        };
        Self {
            filter_label: model.filter.label(),
            loading: model.loading,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use tasks::TaskDetails;

    use super::*;

    #[test]
    fn not_loaded_is_awaiting() {
        let view = TasksListViewData::from(&TasksListModel::default());
        assert_eq!(view.state, ViewState::AwaitingTasks);
        assert_eq!(view.filter_label, "All TO-DOs");
    }

    #[test]
    fn empty_message_depends_on_filter() {
        let model = TasksListModel::default()
            .with_tasks(vec![Task::new("1", TaskDetails::new("open", ""))])
            .with_filter(TasksFilter::Completed);
        assert_eq!(
            TasksListViewData::from(&model).state,
            ViewState::EmptyTasks {
                message: "You have no completed TO-DOs!"
            }
        );
    }

    #[test]
    fn untitled_tasks_show_description() {
        let model = TasksListModel::default()
            .with_tasks(vec![Task::new("1", TaskDetails::new("", "just a note"))]);
        let ViewState::HasTasks(rows) = TasksListViewData::from(&model).state else {
            panic!("expected rows");
        };
        assert_eq!(rows[0].title, "just a note");
    }
}
