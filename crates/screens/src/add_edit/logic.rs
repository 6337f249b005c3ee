use engine::{ContractViolation, Logic, Next};
use tasks::Task;

use super::domain::{
    AddEditTaskEffect as Effect, AddEditTaskEvent as Event, AddEditTaskModel as Model, Mode,
};

pub fn update(model: &Model, event: Event) -> Next<Model, Effect> {
    match event {
        Event::TaskDefinitionCompleted { title, description } => {
            definition_completed(model, title.trim(), description.trim())
        }
        Event::TaskCreatedSuccessfully | Event::TaskUpdatedSuccessfully => {
            Next::dispatch([Effect::Exit(true)])
        }
        Event::TaskCreationFailed(_) | Event::TaskUpdateFailed(_) => {
            Next::dispatch([Effect::Exit(false)])
        }
    }
}

fn definition_completed(model: &Model, title: &str, description: &str) -> Next<Model, Effect> {
    if title.is_empty() && description.is_empty() {
        return Next::dispatch([Effect::NotifyEmptyTaskNotAllowed]);
    }
    let mut details = model.details.clone();
    details.title = title.to_owned();
    details.description = description.to_owned();
    let next = model.with_details(details);
    let effect = match &next.mode {
        Mode::Add => Effect::CreateTask(next.details.clone()),
        Mode::Edit(id) => Effect::SaveTask(Task::new(id.clone(), next.details.clone())),
    };
    Next::next_with(next, [effect])
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AddEditTaskLogic;

impl Logic for AddEditTaskLogic {
    type Model = Model;
    type Event = Event;
    type Effect = Effect;

    fn update(&self, model: &Model, event: Event) -> Result<Next<Model, Effect>, ContractViolation> {
        Ok(update(model, event))
    }
}
