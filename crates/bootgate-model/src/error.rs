use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("required environment variable is not set: {0}")]
    MissingEnv(String),

    #[error("invalid value for environment variable {key}: {value:?} ({reason})")]
    InvalidEnv {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown role: {0} (expected: web|worker|beat|exec)")]
    UnknownRole(String),

    #[error("invalid flag value: {0} (expected: 1|0|true|false|yes|no|on|off)")]
    InvalidFlag(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
