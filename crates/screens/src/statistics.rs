//! Statistics screen: counts of active and completed tasks.

use std::sync::Arc;

use engine::{ContractViolation, Dispatch, EffectHandlers, First, Handler, Logic, Next};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tasks::{Task, TaskStore};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatisticsState {
    #[default]
    Loading,
    Loaded {
        active: usize,
        completed: usize,
    },
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatisticsEvent {
    TasksLoaded(Vec<Task>),
    TasksLoadingFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticsEffect {
    LoadTasks,
}

/// A previous failure is retried on re-entry.
pub fn init(state: StatisticsState) -> First<StatisticsState, StatisticsEffect> {
    match state {
        StatisticsState::Loaded { .. } => First::first(state),
        StatisticsState::Loading | StatisticsState::Failed => {
            First::first_with(StatisticsState::Loading, [StatisticsEffect::LoadTasks])
        }
    }
}

pub fn update(
    _state: &StatisticsState,
    event: StatisticsEvent,
) -> Next<StatisticsState, StatisticsEffect> {
    match event {
        StatisticsEvent::TasksLoaded(tasks) => {
            let completed = tasks.iter().filter(|t| t.is_completed()).count();
            Next::next(StatisticsState::Loaded {
                active: tasks.len() - completed,
                completed,
            })
        }
        StatisticsEvent::TasksLoadingFailed => Next::next(StatisticsState::Failed),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsLogic;

impl Logic for StatisticsLogic {
    type Model = StatisticsState;
    type Event = StatisticsEvent;
    type Effect = StatisticsEffect;

    fn init(&self, state: StatisticsState) -> First<StatisticsState, StatisticsEffect> {
        init(state)
    }

    fn update(
        &self,
        state: &StatisticsState,
        event: StatisticsEvent,
    ) -> Result<Next<StatisticsState, StatisticsEffect>, ContractViolation> {
        Ok(update(state, event))
    }
}

pub struct StatisticsHandlers {
    load_tasks: Handler<(), StatisticsEvent>,
}

impl StatisticsHandlers {
    pub fn new(local: Arc<dyn TaskStore>) -> Self {
        Self {
            load_tasks: Handler::transformer(move |()| load_tasks(local.clone())),
        }
    }
}

impl EffectHandlers for StatisticsHandlers {
    type Effect = StatisticsEffect;
    type Event = StatisticsEvent;

    fn handle(&self, effect: StatisticsEffect, dispatch: &Dispatch<StatisticsEvent>) {
        match effect {
            StatisticsEffect::LoadTasks => self.load_tasks.invoke((), dispatch),
        }
    }
}

async fn load_tasks(local: Arc<dyn TaskStore>) -> StatisticsEvent {
    match local.tasks().next().await {
        Some(Ok(tasks)) => StatisticsEvent::TasksLoaded(tasks),
        Some(Err(e)) => {
            warn!(error = %e, "loading tasks for statistics failed");
            StatisticsEvent::TasksLoadingFailed
        }
        None => StatisticsEvent::TasksLoadingFailed,
    }
}
