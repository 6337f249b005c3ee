//! The four screens of the to-do app.
//!
//! Every screen follows the same layout:
//!
//! * `domain`: model, events, effects (closed enums)
//! * `logic`: pure `init` / `update` plus the [`engine::Logic`] impl
//! * `handlers`: the effect handler set and the view-action trait the UI
//!   implements
//!
//! Handlers that touch a store get a [`Stores`] pair; handlers that touch the
//! UI are bound to the UI executor passed in at construction.

pub mod add_edit;
pub mod snapshot;
pub mod statistics;
pub mod task_detail;
pub mod tasks_list;

mod stores;

pub use snapshot::{Persisted, Snapshot, SnapshotError};
pub use stores::Stores;
