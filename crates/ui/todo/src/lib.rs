//! Command line front end: every subcommand enters one or two screens,
//! drives them with the events the command stands for and prints the
//! outcome.

pub mod cli;
pub mod console;
pub mod errors;
pub mod session;

pub use cli::{Cli, Cmd};
pub use console::Console;
pub use session::Session;

/// Application identity; also the environment prefix (`TODO_DATA`, ...).
pub struct TodoApp;

impl app::Application for TodoApp {
    const APP_ID: &'static str = "todo";
    const ORGANIZATION: &'static str = "todo";
}
