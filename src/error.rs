//! Error types for the clay exercise
//!
//! Only deployment problems are errors here: a missing clay target, a target
//! with unusable size tags, or a bad config file. Clays leaving the screen or
//! getting hit are ordinary state transitions and never surface as errors.

use thiserror::Error;

/// Errors raised while configuring or running the exercise
#[derive(Debug, Error)]
pub enum ExerciseError {
    /// The host could not load a required target asset
    #[error("the clay target {asset} does not exist")]
    MissingAsset {
        /// Asset identifier as passed to the host
        asset: String,
    },

    /// A freshly added target lacks one of its default perceived tags
    #[error("target {asset} has no `{key}` tag")]
    MissingTag { asset: String, key: &'static str },

    /// A default perceived tag is present but not an integer
    #[error("tag `{key}` has non-integer value {value:?}")]
    InvalidTag { key: &'static str, value: String },

    /// Config values that would make the exercise meaningless
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Command sent to an exercise that has already been destroyed
    #[error("exercise is not running")]
    NotRunning,

    /// The controller was started outside a tokio runtime
    #[error("no tokio runtime to drive the exercise: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// The exercise task panicked or was aborted
    #[error("exercise task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ExerciseError>;
