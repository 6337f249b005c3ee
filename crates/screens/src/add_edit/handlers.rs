use std::sync::Arc;

use engine::{Dispatch, EffectHandlers, Executor, Handler};
use tasks::{Task, TaskDetails};
use tracing::{info, warn};
use uuid::Uuid;

use super::domain::{AddEditTaskEffect as Effect, AddEditTaskEvent as Event};
use crate::stores::Stores;

pub trait AddEditTaskViewActions: Send + Sync + 'static {
    fn show_empty_task_error(&self);

    fn exit(&self, successful: bool);
}

pub struct AddEditTaskHandlers {
    notify_empty_task: Handler<(), Event>,
    create_task: Handler<TaskDetails, Event>,
    save_task: Handler<Task, Event>,
    exit: Handler<bool, Event>,
}

impl AddEditTaskHandlers {
    pub fn new(stores: Stores, view: Arc<dyn AddEditTaskViewActions>, ui: Arc<dyn Executor>) -> Self {
        Self {
            notify_empty_task: {
                let view = view.clone();
                Handler::action(move || view.show_empty_task_error()).on(ui.clone())
            },
            create_task: {
                let stores = stores.clone();
                Handler::function(move |details| create_task(&stores, details))
            },
            save_task: Handler::function(move |task: Task| save_task(&stores, &task)),
            exit: Handler::consumer(move |successful| view.exit(successful)).on(ui),
        }
    }
}

impl EffectHandlers for AddEditTaskHandlers {
    type Effect = Effect;
    type Event = Event;

    fn handle(&self, effect: Effect, dispatch: &Dispatch<Event>) {
        match effect {
            Effect::NotifyEmptyTaskNotAllowed => self.notify_empty_task.invoke((), dispatch),
            Effect::CreateTask(details) => self.create_task.invoke(details, dispatch),
            Effect::SaveTask(task) => self.save_task.invoke(task, dispatch),
            Effect::Exit(successful) => self.exit.invoke(successful, dispatch),
        }
    }
}

fn create_task(stores: &Stores, details: TaskDetails) -> Event {
    let task = Task::new(Uuid::new_v4().to_string(), details);
    match stores.save(&task) {
        Ok(()) => {
            info!(id = task.id(), "task created");
            Event::TaskCreatedSuccessfully
        }
        Err(e) => {
            warn!(error = %e, "creating task failed");
            Event::TaskCreationFailed(e.to_string())
        }
    }
}

fn save_task(stores: &Stores, task: &Task) -> Event {
    match stores.save(task) {
        Ok(()) => Event::TaskUpdatedSuccessfully,
        Err(e) => {
            warn!(id = task.id(), error = %e, "updating task failed");
            Event::TaskUpdateFailed(e.to_string())
        }
    }
}
