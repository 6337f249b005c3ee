//! The running loop: one worker task per instance that owns the model,
//! applies events strictly one at a time and hands the resulting effects to
//! the feature's handler set.

use std::fmt;
use std::sync::Arc;

use futures::{FutureExt, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::activity::{Activity, ActivityGuard};
use crate::error::LoopError;
use crate::executor::{Background, Executor};
use crate::handler::{Dispatch, EffectHandlers, EventSink};
use crate::logic::Logic;
use crate::source::EventSource;

/// Model observer invoked on every accepted model replacement.
pub type Render<M> = Arc<dyn Fn(&M) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopStatus {
    Running,
    Stopped,
    /// Stopped by a contract violation.
    Failed(String),
}

impl fmt::Display for LoopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopStatus::Running => f.write_str("running"),
            LoopStatus::Stopped => f.write_str("stopped"),
            LoopStatus::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

pub struct LoopBuilder<L: Logic, H> {
    logic: Arc<L>,
    handlers: Arc<H>,
    background: Option<Arc<dyn Executor>>,
    source: Option<Arc<dyn EventSource<L::Event>>>,
    render: Option<(Render<L::Model>, Arc<dyn Executor>)>,
}

impl<L, H> LoopBuilder<L, H>
where
    L: Logic,
    H: EffectHandlers<Effect = L::Effect, Event = L::Event>,
{
    pub fn new(logic: Arc<L>, handlers: Arc<H>) -> Self {
        Self {
            logic,
            handlers,
            background: None,
            source: None,
            render: None,
        }
    }

    /// Executor for handlers without an explicit binding. Defaults to
    /// [`Background`] on the current runtime.
    pub fn background(mut self, executor: Arc<dyn Executor>) -> Self {
        self.background = Some(executor);
        self
    }

    pub fn event_source(mut self, source: Arc<dyn EventSource<L::Event>>) -> Self {
        self.source = Some(source);
        self
    }

    /// Call `render` with every new model, on `executor`.
    pub fn render(mut self, render: Render<L::Model>, executor: Arc<dyn Executor>) -> Self {
        self.render = Some((render, executor));
        self
    }

    /// Run `init` on `model` and spawn the worker on the current runtime.
    pub fn start(self, model: L::Model) -> Result<Loop<L>, LoopError> {
        let runtime = Handle::try_current().map_err(|e| LoopError::NoRuntime(e.to_string()))?;
        let background = match self.background {
            Some(executor) => executor,
            None => Arc::new(Background::new(runtime.clone())),
        };

        let cancel = CancellationToken::new();
        let activity = Activity::default();
        let (tx, rx) = mpsc::unbounded_channel::<(L::Event, ActivityGuard)>();
        let events = {
            let cancel = cancel.clone();
            let activity = activity.clone();
            EventSink::new(move |event: L::Event| {
                if cancel.is_cancelled() {
                    debug!(?event, "loop stopped; event dropped");
                    return;
                }
                if let Err(mpsc::error::SendError((event, _))) = tx.send((event, activity.enter()))
                {
                    debug!(?event, "loop worker gone; event dropped");
                }
            })
        };

        let (model, effects) = self.logic.init(model).into_parts();
        let (model_tx, model_rx) = watch::channel(model.clone());
        let (status, _) = watch::channel(LoopStatus::Running);
        let status = Arc::new(status);

        let worker = Worker {
            logic: self.logic,
            handlers: self.handlers,
            dispatch: Dispatch::with_activity(events.clone(), background, activity.clone()),
            model: model_tx,
            render: self.render,
            status: status.clone(),
            cancel: cancel.clone(),
            activity: activity.clone(),
        };
        info!(?model, "loop started");
        worker.notify(model);
        worker.handle_effects(effects);
        runtime.spawn(worker.run(rx));

        if let Some(source) = self.source {
            let mut stream = source.subscribe().fuse();
            let events = events.clone();
            let cancel = cancel.clone();
            // held until already buffered source events are queued
            let warmup = activity.enter();
            runtime.spawn(async move {
                while let Some(Some(event)) = stream.next().now_or_never() {
                    events.send(event);
                }
                drop(warmup);
                loop {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        next = stream.next() => match next {
                            Some(event) => events.send(event),
                            None => break,
                        },
                    }
                }
            });
        }

        Ok(Loop {
            events,
            model: model_rx,
            status,
            cancel,
            activity,
        })
    }
}

/// A running (or stopped) loop instance.
///
/// Dropping the handle stops the loop.
pub struct Loop<L: Logic> {
    events: EventSink<L::Event>,
    model: watch::Receiver<L::Model>,
    status: Arc<watch::Sender<LoopStatus>>,
    cancel: CancellationToken,
    activity: Activity,
}

impl<L: Logic> Loop<L> {
    pub fn builder<H>(logic: Arc<L>, handlers: Arc<H>) -> LoopBuilder<L, H>
    where
        H: EffectHandlers<Effect = L::Effect, Event = L::Event>,
    {
        LoopBuilder::new(logic, handlers)
    }

    /// Enqueue an event. Ignored once the loop is stopped.
    pub fn dispatch(&self, event: L::Event) {
        self.events.send(event)
    }

    pub fn event_sink(&self) -> EventSink<L::Event> {
        self.events.clone()
    }

    /// Latest model.
    pub fn model(&self) -> L::Model {
        self.model.borrow().clone()
    }

    /// Receiver that observes every model replacement.
    pub fn subscribe(&self) -> watch::Receiver<L::Model> {
        self.model.clone()
    }

    pub fn status(&self) -> LoopStatus {
        self.status.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Wait until no event is queued and no effect job is in flight.
    pub async fn settled(&self) {
        self.activity.settled().await
    }

    /// Freeze the model and detach from the effect pipeline.
    pub fn stop(&self) -> L::Model {
        self.cancel.cancel();
        self.status.send_if_modified(|status| match status {
            LoopStatus::Running => {
                *status = LoopStatus::Stopped;
                true
            }
            _ => false,
        });
        self.model()
    }
}

impl<L: Logic> Drop for Loop<L> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Worker<L: Logic, H> {
    logic: Arc<L>,
    handlers: Arc<H>,
    dispatch: Dispatch<L::Event>,
    model: watch::Sender<L::Model>,
    render: Option<(Render<L::Model>, Arc<dyn Executor>)>,
    status: Arc<watch::Sender<LoopStatus>>,
    cancel: CancellationToken,
    activity: Activity,
}

impl<L, H> Worker<L, H>
where
    L: Logic,
    H: EffectHandlers<Effect = L::Effect, Event = L::Event>,
{
    async fn run(self, mut rx: mpsc::UnboundedReceiver<(L::Event, ActivityGuard)>) {
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                next = rx.recv() => match next {
                    Some((event, guard)) => {
                        self.step(event);
                        drop(guard);
                    }
                    None => break,
                },
            }
        }
        let status = self.status.borrow().clone();
        debug!(%status, "loop worker finished");
    }

    fn step(&self, event: L::Event) {
        trace!(?event, "applying event");
        let next = {
            let current = self.model.borrow();
            self.logic.update(&current, event)
        };
        match next {
            Ok(next) => {
                let (model, effects) = next.into_parts();
                if let Some(model) = model {
                    self.model.send_replace(model.clone());
                    self.notify(model);
                }
                self.handle_effects(effects);
            }
            Err(violation) => {
                error!(error = %violation, "update rejected event; stopping loop");
                self.status
                    .send_replace(LoopStatus::Failed(violation.to_string()));
                self.cancel.cancel();
            }
        }
    }

    fn notify(&self, model: L::Model) {
        let Some((render, executor)) = &self.render else {
            return;
        };
        let render = render.clone();
        let cancel = self.cancel.clone();
        let guard = self.activity.enter();
        executor.execute(
            async move {
                if !cancel.is_cancelled() {
                    render(&model);
                }
                drop(guard);
            }
            .boxed(),
        );
    }

    fn handle_effects(&self, effects: Vec<L::Effect>) {
        for effect in effects {
            if self.cancel.is_cancelled() {
                debug!(?effect, "loop stopped; effect dropped");
                continue;
            }
            trace!(?effect, "dispatching effect");
            self.handlers.handle(effect, &self.dispatch);
        }
    }
}
