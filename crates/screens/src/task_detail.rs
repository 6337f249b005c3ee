//! Task detail screen. The model is the task under view.

pub mod domain;
pub mod handlers;
pub mod logic;

pub use domain::{TaskDetailEffect, TaskDetailEvent, TaskDetailViewData};
pub use handlers::{TaskDetailHandlers, TaskDetailViewActions};
pub use logic::{update, TaskDetailLogic};
