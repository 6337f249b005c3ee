use std::sync::Arc;

use engine::{Dispatch, EffectHandlers, Executor, Handler};
use futures::StreamExt;
use tasks::{Task, TaskStore};
use tracing::{debug, warn};

use super::domain::{FeedbackType, TasksListEffect as Effect, TasksListEvent as Event};
use crate::stores::Stores;

/// What the task list asks of its UI.
pub trait TasksListViewActions: Send + Sync + 'static {
    fn show_feedback(&self, feedback: FeedbackType);

    fn show_task_details(&self, task: &Task);

    fn show_add_task(&self);
}

pub struct TasksListHandlers {
    refresh_tasks: Handler<(), Event>,
    load_tasks: Handler<(), Event>,
    save_task: Handler<Task, Event>,
    delete_tasks: Handler<Vec<Task>, Event>,
    show_feedback: Handler<FeedbackType, Event>,
    navigate_to_details: Handler<Task, Event>,
    start_task_creation: Handler<(), Event>,
}

impl TasksListHandlers {
    /// Store handlers run on the loop's background executor, view actions
    /// on `ui`.
    pub fn new(stores: Stores, view: Arc<dyn TasksListViewActions>, ui: Arc<dyn Executor>) -> Self {
        Self {
            refresh_tasks: {
                let stores = stores.clone();
                Handler::transformer(move |()| refresh_tasks(stores.clone()))
            },
            load_tasks: {
                let local = stores.local.clone();
                Handler::transformer(move |()| load_tasks(local.clone()))
            },
            save_task: {
                let stores = stores.clone();
                Handler::consumer(move |task: Task| stores.save_best_effort(&task))
            },
            delete_tasks: Handler::consumer(move |tasks: Vec<Task>| {
                for task in &tasks {
                    stores.delete_best_effort(task.id());
                }
            }),
            show_feedback: {
                let view = view.clone();
                Handler::consumer(move |feedback| view.show_feedback(feedback)).on(ui.clone())
            },
            navigate_to_details: {
                let view = view.clone();
                Handler::consumer(move |task: Task| view.show_task_details(&task)).on(ui.clone())
            },
            start_task_creation: Handler::action(move || view.show_add_task()).on(ui),
        }
    }
}

impl EffectHandlers for TasksListHandlers {
    type Effect = Effect;
    type Event = Event;

    fn handle(&self, effect: Effect, dispatch: &Dispatch<Event>) {
        match effect {
            Effect::RefreshTasks => self.refresh_tasks.invoke((), dispatch),
            Effect::LoadTasks => self.load_tasks.invoke((), dispatch),
            Effect::SaveTask(task) => self.save_task.invoke(task, dispatch),
            Effect::DeleteTasks(tasks) => self.delete_tasks.invoke(tasks, dispatch),
            Effect::ShowFeedback(feedback) => self.show_feedback.invoke(feedback, dispatch),
            Effect::NavigateToTaskDetails(task) => self.navigate_to_details.invoke(task, dispatch),
            Effect::StartTaskCreationFlow => self.start_task_creation.invoke((), dispatch),
        }
    }
}

/// Pull the full remote list and copy it into the local store.
pub(crate) async fn refresh_tasks(stores: Stores) -> Event {
    let remote = match stores.remote.tasks().next().await {
        Some(Ok(tasks)) => tasks,
        Some(Err(e)) => {
            warn!(error = %e, "fetching remote tasks failed");
            return Event::TasksRefreshFailed;
        }
        None => {
            warn!("remote task stream ended without a value");
            return Event::TasksRefreshFailed;
        }
    };
    for task in &remote {
        if let Err(e) = stores.local.save_task(task) {
            warn!(id = task.id(), error = %e, "copying remote task failed");
            return Event::TasksRefreshFailed;
        }
    }
    debug!(count = remote.len(), "tasks refreshed");
    Event::TasksRefreshed
}

/// First emission of the local store.
pub(crate) async fn load_tasks(local: Arc<dyn TaskStore>) -> Event {
    match local.tasks().next().await {
        Some(Ok(tasks)) => Event::TasksLoaded(tasks),
        Some(Err(e)) => {
            warn!(error = %e, "loading tasks failed");
            Event::TasksLoadingFailed
        }
        None => Event::TasksLoadingFailed,
    }
}
