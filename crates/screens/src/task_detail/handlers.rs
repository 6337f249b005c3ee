use std::sync::Arc;

use engine::{Dispatch, EffectHandlers, Executor, Handler};
use tasks::Task;
use tracing::warn;

use super::domain::{TaskDetailEffect as Effect, TaskDetailEvent as Event};
use crate::stores::Stores;

pub trait TaskDetailViewActions: Send + Sync + 'static {
    fn show_task_marked_complete(&self);

    fn show_task_marked_active(&self);

    fn show_task_save_failed(&self);

    fn show_task_deletion_failed(&self);

    fn open_task_editor(&self, task: &Task);

    /// Leave the screen.
    fn exit(&self);
}

pub struct TaskDetailHandlers {
    delete_task: Handler<Task, Event>,
    save_task: Handler<Task, Event>,
    notify_marked_complete: Handler<(), Event>,
    notify_marked_active: Handler<(), Event>,
    notify_save_failed: Handler<(), Event>,
    notify_deletion_failed: Handler<(), Event>,
    open_task_editor: Handler<Task, Event>,
    exit: Handler<(), Event>,
}

impl TaskDetailHandlers {
    pub fn new(stores: Stores, view: Arc<dyn TaskDetailViewActions>, ui: Arc<dyn Executor>) -> Self {
        let on_ui = |f: fn(&dyn TaskDetailViewActions)| -> Handler<(), Event> {
            let view = view.clone();
            Handler::action(move || f(view.as_ref())).on(ui.clone())
        };
        Self {
            delete_task: {
                let stores = stores.clone();
                Handler::function(move |task: Task| delete_task(&stores, &task))
            },
            save_task: Handler::function(move |task: Task| save_task(&stores, &task)),
            notify_marked_complete: on_ui(|v| v.show_task_marked_complete()),
            notify_marked_active: on_ui(|v| v.show_task_marked_active()),
            notify_save_failed: on_ui(|v| v.show_task_save_failed()),
            notify_deletion_failed: on_ui(|v| v.show_task_deletion_failed()),
            exit: on_ui(|v| v.exit()),
            open_task_editor: Handler::consumer(move |task: Task| view.open_task_editor(&task))
                .on(ui.clone()),
        }
    }
}

impl EffectHandlers for TaskDetailHandlers {
    type Effect = Effect;
    type Event = Event;

    fn handle(&self, effect: Effect, dispatch: &Dispatch<Event>) {
        match effect {
            Effect::DeleteTask(task) => self.delete_task.invoke(task, dispatch),
            Effect::SaveTask(task) => self.save_task.invoke(task, dispatch),
            Effect::NotifyTaskMarkedComplete => self.notify_marked_complete.invoke((), dispatch),
            Effect::NotifyTaskMarkedActive => self.notify_marked_active.invoke((), dispatch),
            Effect::NotifyTaskSaveFailed => self.notify_save_failed.invoke((), dispatch),
            Effect::NotifyTaskDeletionFailed => self.notify_deletion_failed.invoke((), dispatch),
            Effect::OpenTaskEditor(task) => self.open_task_editor.invoke(task, dispatch),
            Effect::Exit => self.exit.invoke((), dispatch),
        }
    }
}

fn save_task(stores: &Stores, task: &Task) -> Event {
    match stores.save(task) {
        Ok(()) if task.is_completed() => Event::TaskMarkedComplete,
        Ok(()) => Event::TaskMarkedActive,
        Err(e) => {
            warn!(id = task.id(), error = %e, "saving task failed");
            Event::TaskSaveFailed
        }
    }
}

fn delete_task(stores: &Stores, task: &Task) -> Event {
    match stores.delete(task.id()) {
        Ok(()) => Event::TaskDeleted,
        Err(e) => {
            warn!(id = task.id(), error = %e, "deleting task failed");
            Event::TaskDeletionFailed
        }
    }
}
