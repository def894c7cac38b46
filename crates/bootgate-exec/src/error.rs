use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("group not found: {0}")]
    GroupNotFound(String),

    #[error("failed to look up {name}: {source}")]
    Lookup { name: String, source: io::Error },

    #[error("failed to fix ownership of {path}: {source}")]
    Ownership { path: PathBuf, source: io::Error },

    #[error("failed to remove stale pid file {path}: {source}")]
    PidFile { path: PathBuf, source: io::Error },

    #[error("failed to spawn '{program}': {source}")]
    Spawn { program: String, source: io::Error },

    #[error("step '{step}' failed: {reason}")]
    StepFailed { step: String, reason: String },

    #[error("failed to exec '{program}': {source}")]
    Exec { program: String, source: io::Error },

    #[error("invalid command: {0}")]
    InvalidSpec(String),

    #[error("interrupted by termination signal")]
    Interrupted,

    #[error("not supported on this platform: {0}")]
    Unsupported(&'static str),
}
