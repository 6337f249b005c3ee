//! Tasks and where they are kept.
//!
//! [`Task`] is an immutable value: an id plus [`TaskDetails`] that are
//! replaced wholesale. [`TaskStore`] is the storage boundary used by the
//! screens; two implementations live here:
//!
//! * [`LocalTaskStore`]: insertion-ordered, optionally persisted as JSON.
//! * [`SimulatedRemote`]: wraps another store, adds read latency and a
//!   switch that makes every operation fail.

mod errors;
mod local;
mod remote;
mod store;
mod task;

pub use errors::StoreError;
pub use local::LocalTaskStore;
pub use remote::{SimulatedRemote, DEFAULT_LATENCY};
pub use store::{StoreResult, TaskStore};
pub use task::{Task, TaskDetails};
