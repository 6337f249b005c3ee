use std::path::PathBuf;

use clap::{Parser, Subcommand};
use screens::tasks_list::TasksFilter;

#[derive(Parser, Debug)]
#[command(name = "todo", version, about = "Keep track of your TO-DOs")]
pub struct Cli {
    /// Where tasks, screen snapshots and logs are kept
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Also log to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Show the task list
    List {
        /// all, active or completed
        #[arg(long)]
        filter: Option<TasksFilter>,
        /// Pull the latest tasks from the remote first
        #[arg(long)]
        refresh: bool,
    },
    /// Create a task
    Add {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change title and/or description of a task
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Mark a task as done
    Complete { id: String },
    /// Mark a task as not done
    Activate { id: String },
    /// Delete all completed tasks
    ClearCompleted,
    /// Show a single task
    Show { id: String },
    /// Delete a task
    Delete { id: String },
    /// Count active and completed tasks
    Stats,
}
