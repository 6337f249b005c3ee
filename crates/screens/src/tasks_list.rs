//! Task list screen: loading, refreshing, filtering, toggling and clearing
//! tasks.

pub mod domain;
pub mod handlers;
pub mod logic;
pub mod view_data;

pub use domain::{
    FeedbackType, TasksFilter, TasksListEffect, TasksListError, TasksListEvent, TasksListModel,
};
pub use handlers::{TasksListHandlers, TasksListViewActions};
pub use logic::{init, update, TasksListLogic};
pub use view_data::{TaskViewData, TasksListViewData, ViewState};
