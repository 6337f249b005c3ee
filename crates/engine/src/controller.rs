use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::error::LoopError;
use crate::executor::{Executor, Inline};
use crate::handler::{EffectHandlers, EventSink};
use crate::logic::Logic;
use crate::r#loop::{Loop, LoopStatus, Render};
use crate::source::EventSource;

/// UI side of a controller.
///
/// `connect` hands the observer a sink for user events; it stays valid across
/// restarts of the controller. `on_model_changed` is called on the
/// controller's UI executor with every accepted model.
pub trait Observer<M, E>: Send + 'static {
    fn connect(&mut self, events: EventSink<E>);

    fn on_model_changed(&mut self, model: &M);

    fn disconnect(&mut self) {}
}

type SharedObserver<M, E> = Arc<Mutex<Box<dyn Observer<M, E>>>>;

enum State<L: Logic> {
    Stopped { model: L::Model, last: LoopStatus },
    Running { engine: Loop<L> },
}

/// Lifecycle wrapper around a [`Loop`].
///
/// While stopped the controller holds the frozen model, which can be read or
/// replaced (e.g. restored from a snapshot). `start` runs `init` on it and
/// spawns a fresh loop, `stop` freezes the loop's latest model again.
pub struct Controller<L: Logic, H> {
    logic: Arc<L>,
    handlers: Arc<H>,
    background: Option<Arc<dyn Executor>>,
    ui: Arc<dyn Executor>,
    source: Option<Arc<dyn EventSource<L::Event>>>,
    view: Option<SharedObserver<L::Model, L::Event>>,
    target: Arc<Mutex<Option<EventSink<L::Event>>>>,
    state: State<L>,
}

impl<L, H> Controller<L, H>
where
    L: Logic,
    H: EffectHandlers<Effect = L::Effect, Event = L::Event>,
{
    pub fn new(logic: L, handlers: H, model: L::Model) -> Self {
        Self {
            logic: Arc::new(logic),
            handlers: Arc::new(handlers),
            background: None,
            ui: Arc::new(Inline),
            source: None,
            view: None,
            target: Arc::new(Mutex::new(None)),
            state: State::Stopped {
                model,
                last: LoopStatus::Stopped,
            },
        }
    }

    /// Executor on which the observer is notified. Defaults to [`Inline`].
    pub fn with_ui_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.ui = executor;
        self
    }

    pub fn with_background(mut self, executor: Arc<dyn Executor>) -> Self {
        self.background = Some(executor);
        self
    }

    pub fn with_event_source(mut self, source: Arc<dyn EventSource<L::Event>>) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach the UI observer. Only allowed while stopped.
    pub fn connect(&mut self, mut view: impl Observer<L::Model, L::Event>) -> Result<(), LoopError> {
        if self.view.is_some() {
            return Err(LoopError::AlreadyConnected);
        }
        if self.is_running() {
            return Err(LoopError::Running("connect a view"));
        }
        let target = self.target.clone();
        view.connect(EventSink::new(move |event: L::Event| {
            let sink = match target.lock() {
                Ok(target) => target.clone(),
                Err(_) => None,
            };
            match sink {
                Some(sink) => sink.send(event),
                None => debug!(?event, "controller not running; view event dropped"),
            }
        }));
        let view: Box<dyn Observer<L::Model, L::Event>> = Box::new(view);
        self.view = Some(Arc::new(Mutex::new(view)));
        Ok(())
    }

    /// Detach the observer. Future model changes are no longer delivered;
    /// jobs already queued on the UI executor are not flushed.
    pub fn disconnect(&mut self) -> Result<(), LoopError> {
        if self.is_running() {
            return Err(LoopError::Running("disconnect the view"));
        }
        let view = self.view.take().ok_or(LoopError::NotConnected)?;
        if let Ok(mut view) = view.lock() {
            view.disconnect();
        }
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), LoopError> {
        let model = match &self.state {
            State::Running { .. } => return Err(LoopError::AlreadyRunning),
            State::Stopped { model, .. } => model.clone(),
        };

        let mut builder = Loop::builder(self.logic.clone(), self.handlers.clone());
        if let Some(background) = &self.background {
            builder = builder.background(background.clone());
        }
        if let Some(source) = &self.source {
            builder = builder.event_source(source.clone());
        }
        if let Some(view) = &self.view {
            let view = view.clone();
            let render: Render<L::Model> = Arc::new(move |model: &L::Model| {
                if let Ok(mut view) = view.lock() {
                    view.on_model_changed(model);
                }
            });
            builder = builder.render(render, self.ui.clone());
        }

        let engine = builder.start(model)?;
        if let Ok(mut target) = self.target.lock() {
            *target = Some(engine.event_sink());
        }
        self.state = State::Running { engine };
        info!("controller started");
        Ok(())
    }

    /// Stop the loop and return the frozen model.
    pub fn stop(&mut self) -> Result<L::Model, LoopError> {
        let State::Running { engine } = &self.state else {
            return Err(LoopError::NotRunning);
        };
        let model = engine.stop();
        let last = engine.status();
        if let LoopStatus::Failed(reason) = &last {
            warn!(%reason, "stopping a failed loop");
        }
        if let Ok(mut target) = self.target.lock() {
            *target = None;
        }
        self.state = State::Stopped {
            model: model.clone(),
            last,
        };
        info!("controller stopped");
        Ok(model)
    }

    /// True between `start` and `stop`, even if the loop failed meanwhile.
    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    pub fn model(&self) -> L::Model {
        match &self.state {
            State::Stopped { model, .. } => model.clone(),
            State::Running { engine } => engine.model(),
        }
    }

    /// Replace the frozen model, e.g. with one restored from a snapshot.
    pub fn replace_model(&mut self, model: L::Model) -> Result<(), LoopError> {
        match &mut self.state {
            State::Running { .. } => Err(LoopError::Running("replace the model")),
            State::Stopped { model: current, .. } => {
                *current = model;
                Ok(())
            }
        }
    }

    /// Status of the running loop, or how the last one ended.
    pub fn status(&self) -> LoopStatus {
        match &self.state {
            State::Stopped { last, .. } => last.clone(),
            State::Running { engine } => engine.status(),
        }
    }

    /// Enqueue an event. Dropped while stopped.
    pub fn dispatch(&self, event: L::Event) {
        match &self.state {
            State::Running { engine } => engine.dispatch(event),
            State::Stopped { .. } => debug!(?event, "controller not running; event dropped"),
        }
    }

    /// Wait until the running loop is idle. Returns at once while stopped.
    pub async fn settled(&self) {
        if let State::Running { engine } = &self.state {
            engine.settled().await;
        }
    }
}
