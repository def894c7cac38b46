use thiserror::Error;

use bootgate_model::ModelError;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Invalid log format: {0} (expected: text|json|journald)")]
    InvalidFormat(String),

    #[error("Journald is not supported on this platform")]
    JournaldNotSupported,

    #[error("Failed to initialize journald: {0}")]
    JournaldInitFailed(String),

    #[error("Logger already initialized")]
    AlreadyInitialized,

    #[error("Invalid timezone: {0} (expected: utc|local)")]
    InvalidTimeZone(String),

    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    #[error("Invalid logger configuration: {0}")]
    Config(#[from] ModelError),
}

pub type LoggerResult<T> = Result<T, LoggerError>;
