//! Unidirectional Model → Event → Effect → Event loop.
//!
//! A feature is described by a pure [`Logic`] (init + update) and an
//! [`EffectHandlers`] set. A [`Loop`] owns the current model, applies events
//! one at a time on its worker task and hands every emitted effect to the
//! handler set. Handlers run on an explicit [`Executor`] and feed their
//! results back as events. A [`Controller`] wraps the loop lifecycle and the
//! connection to a UI [`Observer`].
//!
//! ```ignore
//! let mut controller = Controller::new(logic, handlers, Model::default());
//! controller.connect(view)?;
//! controller.start()?;
//! controller.dispatch(Event::RefreshRequested);
//! controller.settled().await;
//! let model = controller.stop()?;
//! ```

mod activity;
pub mod controller;
pub mod error;
pub mod executor;
pub mod handler;
pub mod logic;
pub mod r#loop;
pub mod next;
pub mod source;

pub use controller::{Controller, Observer};
pub use error::LoopError;
pub use executor::{Background, Executor, Inline, Job, Serial};
pub use handler::{Dispatch, EffectHandlers, EventSink, Handler, HandlerShape};
pub use logic::{BoxError, ContractViolation, Logic};
pub use r#loop::{Loop, LoopBuilder, LoopStatus, Render};
pub use next::{First, Next};
pub use source::{Deferred, EventSource, Injector};
