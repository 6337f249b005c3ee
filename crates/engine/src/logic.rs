use std::fmt;

use thiserror::Error;

use crate::next::{First, Next};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The loop was fed an event that is impossible in the current state
/// (e.g. an id that is not part of the loaded list).
///
/// Returned from [`Logic::update`]; the loop treats it as fatal and stops.
#[derive(Debug, Error)]
#[error("contract violation: {0}")]
pub struct ContractViolation(#[source] BoxError);

impl ContractViolation {
    pub fn new(err: impl Into<BoxError>) -> Self {
        Self(err.into())
    }

    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

/// Pure state transitions of one feature.
///
/// Neither function may block or perform I/O; everything that touches the
/// outside world is described as an `Effect` and executed by the feature's
/// [`EffectHandlers`](crate::EffectHandlers).
pub trait Logic: Send + Sync + 'static {
    type Model: Clone + Send + Sync + fmt::Debug + 'static;
    type Event: Send + fmt::Debug + 'static;
    type Effect: Send + fmt::Debug + 'static;

    /// Called once when a loop starts, with the default or restored model.
    fn init(&self, model: Self::Model) -> First<Self::Model, Self::Effect> {
        First::first(model)
    }

    fn update(
        &self,
        model: &Self::Model,
        event: Self::Event,
    ) -> Result<Next<Self::Model, Self::Effect>, ContractViolation>;
}
