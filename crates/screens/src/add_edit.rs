//! Add/edit task screen.

pub mod domain;
pub mod handlers;
pub mod logic;

pub use domain::{AddEditTaskEffect, AddEditTaskEvent, AddEditTaskModel, Mode};
pub use handlers::{AddEditTaskHandlers, AddEditTaskViewActions};
pub use logic::{update, AddEditTaskLogic};
