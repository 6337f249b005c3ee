//! Results of the pure `init` and `update` functions.

/// Result of an update step.
///
/// `model == None` means "no change". This is not the same as returning an
/// equal model: observers are only notified when a new model is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Next<M, F> {
    model: Option<M>,
    effects: Vec<F>,
}

impl<M, F> Next<M, F> {
    /// New model, no effects.
    pub fn next(model: M) -> Self {
        Self {
            model: Some(model),
            effects: Vec::new(),
        }
    }

    /// New model plus effects, dispatched in the given order.
    pub fn next_with(model: M, effects: impl IntoIterator<Item = F>) -> Self {
        Self {
            model: Some(model),
            effects: effects.into_iter().collect(),
        }
    }

    /// Keep the model, only dispatch effects.
    pub fn dispatch(effects: impl IntoIterator<Item = F>) -> Self {
        Self {
            model: None,
            effects: effects.into_iter().collect(),
        }
    }

    pub fn no_change() -> Self {
        Self {
            model: None,
            effects: Vec::new(),
        }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }

    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    pub fn effects(&self) -> &[F] {
        &self.effects
    }

    pub fn into_parts(self) -> (Option<M>, Vec<F>) {
        (self.model, self.effects)
    }
}

/// Result of `init`: the starting model plus the effects that kick off the
/// screen (typically loads).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct First<M, F> {
    model: M,
    effects: Vec<F>,
}

impl<M, F> First<M, F> {
    pub fn first(model: M) -> Self {
        Self {
            model,
            effects: Vec::new(),
        }
    }

    pub fn first_with(model: M, effects: impl IntoIterator<Item = F>) -> Self {
        Self {
            model,
            effects: effects.into_iter().collect(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn effects(&self) -> &[F] {
        &self.effects
    }

    pub fn into_parts(self) -> (M, Vec<F>) {
        (self.model, self.effects)
    }
}
