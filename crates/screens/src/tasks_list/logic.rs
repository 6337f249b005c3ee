use engine::{ContractViolation, First, Logic, Next};
use tasks::Task;

use super::domain::{
    FeedbackType, TasksListEffect as Effect, TasksListError, TasksListEvent as Event,
    TasksListModel as Model,
};

type Step = Result<Next<Model, Effect>, TasksListError>;

pub fn init(model: Model) -> First<Model, Effect> {
    if model.tasks.is_some() {
        First::first_with(model, [Effect::LoadTasks])
    } else {
        First::first_with(
            model.with_loading(true),
            [Effect::RefreshTasks, Effect::LoadTasks],
        )
    }
}

pub fn update(model: &Model, event: Event) -> Step {
    match event {
        Event::RefreshRequested => Ok(Next::next_with(
            model.with_loading(true),
            [Effect::RefreshTasks],
        )),
        Event::NewTaskClicked => Ok(Next::dispatch([Effect::StartTaskCreationFlow])),
        Event::NavigateToTaskDetailsRequested(id) => {
            let (_, task) = model.find_task(&id)?;
            Ok(Next::dispatch([Effect::NavigateToTaskDetails(task.clone())]))
        }
        Event::TaskMarkedComplete(id) => {
            update_task(model, &id, Task::complete, FeedbackType::MarkedComplete)
        }
        Event::TaskMarkedActive(id) => {
            update_task(model, &id, Task::activate, FeedbackType::MarkedActive)
        }
        Event::ClearCompletedTasksRequested => Ok(clear_completed(model)),
        Event::FilterSelected(filter) => Ok(Next::next(model.with_filter(filter))),
        Event::TasksLoaded(tasks) => Ok(tasks_loaded(model, tasks)),
        Event::TaskCreated => Ok(Next::dispatch([Effect::ShowFeedback(
            FeedbackType::SavedSuccessfully,
        )])),
        Event::TasksRefreshed => Ok(Next::next_with(
            model.with_loading(false),
            [Effect::LoadTasks],
        )),
        Event::TasksRefreshFailed | Event::TasksLoadingFailed => Ok(Next::next_with(
            model.with_loading(false),
            [Effect::ShowFeedback(FeedbackType::LoadingError)],
        )),
    }
}

fn update_task(
    model: &Model,
    id: &str,
    change: impl Fn(&Task) -> Task,
    feedback: FeedbackType,
) -> Step {
    let (index, task) = model.find_task(id)?;
    let changed = change(task);
    let mut tasks = model.tasks.clone().unwrap_or_default();
    tasks[index] = changed.clone();
    Ok(Next::next_with(
        model.with_tasks(tasks),
        [Effect::SaveTask(changed), Effect::ShowFeedback(feedback)],
    ))
}

fn clear_completed(model: &Model) -> Next<Model, Effect> {
    let Some(tasks) = &model.tasks else {
        return Next::no_change();
    };
    let (completed, remaining): (Vec<Task>, Vec<Task>) =
        tasks.iter().cloned().partition(Task::is_completed);
    if completed.is_empty() {
        return Next::no_change();
    }
    Next::next_with(
        model.with_tasks(remaining),
        [
            Effect::DeleteTasks(completed),
            Effect::ShowFeedback(FeedbackType::ClearedCompleted),
        ],
    )
}

fn tasks_loaded(model: &Model, tasks: Vec<Task>) -> Next<Model, Effect> {
    if model.loading && tasks.is_empty() {
        return Next::no_change();
    }
    if model.tasks.as_ref() == Some(&tasks) {
        return Next::no_change();
    }
    Next::next(model.with_tasks(tasks))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TasksListLogic;

impl Logic for TasksListLogic {
    type Model = Model;
    type Event = Event;
    type Effect = Effect;

    fn init(&self, model: Model) -> First<Model, Effect> {
        init(model)
    }

    fn update(&self, model: &Model, event: Event) -> Result<Next<Model, Effect>, ContractViolation> {
        update(model, event).map_err(ContractViolation::new)
    }
}
