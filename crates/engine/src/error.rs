use thiserror::Error;

/// Lifecycle misuse of a [`Loop`](crate::Loop) or [`Controller`](crate::Controller).
///
/// These are programmer errors; callers usually bubble them up unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoopError {
    #[error("loop is already running")]
    AlreadyRunning,

    #[error("loop is not running")]
    NotRunning,

    #[error("cannot {0} while the loop is running")]
    Running(&'static str),

    #[error("a view is already connected")]
    AlreadyConnected,

    #[error("no view is connected")]
    NotConnected,

    #[error("no tokio runtime available: {0}")]
    NoRuntime(String),
}
