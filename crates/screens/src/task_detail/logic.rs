use engine::{ContractViolation, Logic, Next};
use tasks::Task;

use super::domain::{TaskDetailEffect as Effect, TaskDetailEvent as Event};

pub fn update(task: &Task, event: Event) -> Next<Task, Effect> {
    match event {
        Event::DeleteTaskRequested => Next::dispatch([Effect::DeleteTask(task.clone())]),
        Event::CompleteTaskRequested if task.is_completed() => Next::no_change(),
        Event::CompleteTaskRequested => {
            let completed = task.complete();
            Next::next_with(completed.clone(), [Effect::SaveTask(completed)])
        }
        Event::ActivateTaskRequested if !task.is_completed() => Next::no_change(),
        Event::ActivateTaskRequested => {
            let active = task.activate();
            Next::next_with(active.clone(), [Effect::SaveTask(active)])
        }
        Event::EditTaskRequested => Next::dispatch([Effect::OpenTaskEditor(task.clone())]),
        Event::TaskDeleted => Next::dispatch([Effect::Exit]),
        Event::TaskMarkedComplete => Next::dispatch([Effect::NotifyTaskMarkedComplete]),
        Event::TaskMarkedActive => Next::dispatch([Effect::NotifyTaskMarkedActive]),
        Event::TaskSaveFailed => Next::dispatch([Effect::NotifyTaskSaveFailed]),
        Event::TaskDeletionFailed => Next::dispatch([Effect::NotifyTaskDeletionFailed]),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskDetailLogic;

impl Logic for TaskDetailLogic {
    type Model = Task;
    type Event = Event;
    type Effect = Effect;

    fn update(&self, task: &Task, event: Event) -> Result<Next<Task, Effect>, ContractViolation> {
        Ok(update(task, event))
    }
}
