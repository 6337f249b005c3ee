//! Effect handler registry.
//!
//! A feature's handler set is a plain struct with one [`Handler`] field per
//! effect variant, plus an [`EffectHandlers`] impl that matches the effect
//! enum exhaustively and forwards the payload to the right field. Adding an
//! effect variant without a handler therefore fails to compile.
//!
//! Handlers come in four shapes:
//!
//! | shape         | input   | output                     |
//! |---------------|---------|----------------------------|
//! | `action`      | –       | –                          |
//! | `consumer`    | payload | –                          |
//! | `function`    | payload | exactly one event (sync)   |
//! | `transformer` | payload | exactly one event (async)  |
//!
//! A transformer is called once per effect occurrence and returns a future
//! resolving to that occurrence's terminal event (success or typed failure).
//! Occurrences run independently of each other.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::activity::{Activity, ActivityGuard};
use crate::executor::{Executor, Job};

/// Where handlers and views push events back into a loop.
///
/// Sending never fails from the caller's perspective: once the target loop
/// is stopped the event is dropped.
pub struct EventSink<E> {
    deliver: Arc<dyn Fn(E) + Send + Sync>,
}

impl<E> Clone for EventSink<E> {
    fn clone(&self) -> Self {
        Self {
            deliver: self.deliver.clone(),
        }
    }
}

impl<E> fmt::Debug for EventSink<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink").finish_non_exhaustive()
    }
}

impl<E> EventSink<E> {
    pub fn new(deliver: impl Fn(E) + Send + Sync + 'static) -> Self {
        Self {
            deliver: Arc::new(deliver),
        }
    }

    pub fn send(&self, event: E) {
        (self.deliver)(event)
    }
}

/// Context handed to [`EffectHandlers::handle`]: the loop's event sink and
/// the executor used for handlers without an explicit binding.
pub struct Dispatch<E> {
    events: EventSink<E>,
    background: Arc<dyn Executor>,
    activity: Activity,
}

impl<E> Clone for Dispatch<E> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            background: self.background.clone(),
            activity: self.activity.clone(),
        }
    }
}

impl<E> Dispatch<E> {
    /// Standalone dispatch context, e.g. to drive a handler set in tests.
    pub fn new(events: EventSink<E>, background: Arc<dyn Executor>) -> Self {
        Self::with_activity(events, background, Activity::default())
    }

    pub(crate) fn with_activity(
        events: EventSink<E>,
        background: Arc<dyn Executor>,
        activity: Activity,
    ) -> Self {
        Self {
            events,
            background,
            activity,
        }
    }

    pub fn events(&self) -> &EventSink<E> {
        &self.events
    }

    /// Number of events and jobs this context has submitted that are not
    /// finished yet.
    pub fn pending(&self) -> usize {
        self.activity.pending()
    }

    pub async fn settled(&self) {
        self.activity.settled().await
    }

    fn submit(&self, executor: Option<&Arc<dyn Executor>>, job: Job) {
        executor.unwrap_or(&self.background).execute(job);
    }

    fn enter(&self) -> ActivityGuard {
        self.activity.enter()
    }
}

/// Label of a handler's shape (logging, assertions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerShape {
    Action,
    Consumer,
    Function,
    Transformer,
}

enum Shape<I, E> {
    Action(Arc<dyn Fn() + Send + Sync>),
    Consumer(Arc<dyn Fn(I) + Send + Sync>),
    Function(Arc<dyn Fn(I) -> E + Send + Sync>),
    Transformer(Arc<dyn Fn(I) -> BoxFuture<'static, E> + Send + Sync>),
}

impl<I, E> Clone for Shape<I, E> {
    fn clone(&self) -> Self {
        match self {
            Shape::Action(f) => Shape::Action(f.clone()),
            Shape::Consumer(f) => Shape::Consumer(f.clone()),
            Shape::Function(f) => Shape::Function(f.clone()),
            Shape::Transformer(f) => Shape::Transformer(f.clone()),
        }
    }
}

/// Handler bound to a single effect variant with payload `I`.
pub struct Handler<I, E> {
    shape: Shape<I, E>,
    executor: Option<Arc<dyn Executor>>,
}

impl<I, E> Clone for Handler<I, E> {
    fn clone(&self) -> Self {
        Self {
            shape: self.shape.clone(),
            executor: self.executor.clone(),
        }
    }
}

impl<I, E> Handler<I, E> {
    /// Bind the handler to an execution context. Unbound handlers run on the
    /// loop's background executor.
    pub fn on(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn shape(&self) -> HandlerShape {
        match self.shape {
            Shape::Action(_) => HandlerShape::Action,
            Shape::Consumer(_) => HandlerShape::Consumer,
            Shape::Function(_) => HandlerShape::Function,
            Shape::Transformer(_) => HandlerShape::Transformer,
        }
    }
}

impl<I, E> fmt::Debug for Handler<I, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("shape", &self.shape())
            .field("bound", &self.executor.is_some())
            .finish()
    }
}

impl<I, E> Handler<I, E>
where
    I: Send + 'static,
    E: Send + 'static,
{
    pub fn action(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self::unbound(Shape::Action(Arc::new(f)))
    }

    pub fn consumer(f: impl Fn(I) + Send + Sync + 'static) -> Self {
        Self::unbound(Shape::Consumer(Arc::new(f)))
    }

    pub fn function(f: impl Fn(I) -> E + Send + Sync + 'static) -> Self {
        Self::unbound(Shape::Function(Arc::new(f)))
    }

    pub fn transformer<Fut>(f: impl Fn(I) -> Fut + Send + Sync + 'static) -> Self
    where
        Fut: Future<Output = E> + Send + 'static,
    {
        Self::unbound(Shape::Transformer(Arc::new(move |input| f(input).boxed())))
    }

    fn unbound(shape: Shape<I, E>) -> Self {
        Self {
            shape,
            executor: None,
        }
    }

    /// Run the handler for one effect occurrence.
    ///
    /// The job is tracked by the dispatch context until it finished and, for
    /// functions and transformers, until its event has been queued.
    pub fn invoke(&self, input: I, dispatch: &Dispatch<E>) {
        let guard = dispatch.enter();
        let events = dispatch.events.clone();
        let job: Job = match &self.shape {
            Shape::Action(f) => {
                let f = f.clone();
                drop(input);
                async move {
                    f();
                    drop(guard);
                }
                .boxed()
            }
            Shape::Consumer(f) => {
                let f = f.clone();
                async move {
                    f(input);
                    drop(guard);
                }
                .boxed()
            }
            Shape::Function(f) => {
                let f = f.clone();
                async move {
                    events.send(f(input));
                    drop(guard);
                }
                .boxed()
            }
            Shape::Transformer(f) => {
                let work = f(input);
                async move {
                    events.send(work.await);
                    drop(guard);
                }
                .boxed()
            }
        };
        dispatch.submit(self.executor.as_ref(), job);
    }
}

/// Exhaustive routing of a feature's effects to its handlers.
pub trait EffectHandlers: Send + Sync + 'static {
    type Effect: Send + 'static;
    type Event: Send + 'static;

    fn handle(&self, effect: Self::Effect, dispatch: &Dispatch<Self::Event>);
}
