//! Persisted screen state.
//!
//! A screen's model is saved as an opaque [`Snapshot`] when the screen is
//! torn down and restored when it is entered again. Snapshots are tagged
//! with the screen they belong to, so a file cannot be restored into the
//! wrong model.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tasks::Task;
use thiserror::Error;
use tracing::debug;

use crate::add_edit::AddEditTaskModel;
use crate::statistics::StatisticsState;
use crate::tasks_list::TasksListModel;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot belongs to screen {found:?}, expected {expected:?}")]
    WrongScreen {
        expected: &'static str,
        found: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    screen: String,
    state: serde_json::Value,
}

impl Snapshot {
    pub fn screen(&self) -> &str {
        &self.screen
    }

    pub fn write_to(&self, file: &Path) -> Result<(), SnapshotError> {
        if let Some(dir) = file.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let tmp = file.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(self)?)?;
        fs::rename(&tmp, file)?;
        debug!(screen = %self.screen, file = %file.display(), "snapshot written");
        Ok(())
    }

    /// `Ok(None)` when there is no snapshot yet.
    pub fn read_from(file: &Path) -> Result<Option<Self>, SnapshotError> {
        if !file.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(file)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

/// Models that survive screen teardown.
pub trait Persisted: Serialize + DeserializeOwned {
    const SCREEN: &'static str;

    fn save(&self) -> Result<Snapshot, SnapshotError> {
        Ok(Snapshot {
            screen: Self::SCREEN.to_owned(),
            state: serde_json::to_value(self)?,
        })
    }

    fn restore(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        if snapshot.screen != Self::SCREEN {
            return Err(SnapshotError::WrongScreen {
                expected: Self::SCREEN,
                found: snapshot.screen.clone(),
            });
        }
        Ok(serde_json::from_value(snapshot.state.clone())?)
    }
}

impl Persisted for TasksListModel {
    const SCREEN: &'static str = "tasks_list";
}

impl Persisted for Task {
    const SCREEN: &'static str = "task_detail";
}

impl Persisted for AddEditTaskModel {
    const SCREEN: &'static str = "add_edit";
}

impl Persisted for StatisticsState {
    const SCREEN: &'static str = "statistics";
}
