//! Process bootstrap shared by the front ends: configuration, directories
//! and logging.

pub mod config;
pub mod logging;

use std::marker::PhantomData;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

pub use crate::config::{AppConfig, ConfigError, Directories};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("logging already initialised: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

/// Application infrastructure context.
pub struct AppContext {
    pub config: AppConfig,
    pub version: &'static str,
    /// Keeps the non-blocking log writer alive so pending lines are flushed.
    _log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.config.data_dir
    }
}

/// Application metadata.
pub trait Application: Sized + 'static {
    /// Also the prefix of the environment variables (`TODO_DATA`, ...).
    const APP_ID: &'static str;
    /// Organization part of the platform directories.
    const ORGANIZATION: &'static str;
}

/// Builder for an [`AppContext`].
///
/// `new` loads the configuration; `build` creates the directories and
/// installs logging.
pub struct AppBuilder<A: Application> {
    config: AppConfig,
    version: &'static str,
    verbose: bool,
    logging: bool,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    pub fn new(version: &'static str) -> Result<Self, AppError> {
        Ok(Self::with_config(AppConfig::load(A::ORGANIZATION, A::APP_ID)?, version))
    }

    pub fn with_config(config: AppConfig, version: &'static str) -> Self {
        Self {
            config,
            version,
            verbose: false,
            logging: true,
            _marker: PhantomData,
        }
    }

    pub fn data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.config = self.config.with_data_dir(dir);
        }
        self
    }

    /// Mirror log output to stderr.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Skip installing the global subscriber.
    pub fn without_logging(mut self) -> Self {
        self.logging = false;
        self
    }

    pub fn build(self) -> Result<AppContext, AppError> {
        self.config.ensure_dirs()?;
        let guard = if self.logging {
            Some(logging::init(
                &self.config.data_dir,
                &self.config.log_level,
                self.verbose,
            )?)
        } else {
            None
        };
        info!(
            app = A::APP_ID,
            version = self.version,
            data_dir = %self.config.data_dir.display(),
            "application context ready"
        );
        Ok(AppContext {
            config: self.config,
            version: self.version,
            _log_guard: guard,
        })
    }
}
