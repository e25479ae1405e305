//! Configuration errors
//!
//! Detected once at setup. The owning component is not created and the
//! runner continues without it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A collaborator the component cannot run without was not wired
    #[error("{0} is missing or not enabled")]
    MissingCollaborator(&'static str),

    /// The locomotion sequence has no frames
    #[error("the running animation has no frames")]
    EmptyAnimation,

    #[error("no cactus models to dress obstacles with")]
    NoObstacleModels,

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::InvalidTuning(err.to_string())
    }
}
