use thiserror::Error;

use bootgate_model::ModelError;

use crate::probe::ConnectError;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("configuration error: {0}")]
    Config(#[from] ModelError),

    #[error("database {target} unavailable after {attempts} attempts")]
    DatabaseUnavailable { target: String, attempts: u32 },

    #[error("unexpected error while probing database: {0}")]
    Probe(ConnectError),

    #[error("interrupted by termination signal")]
    Interrupted,
}

pub type GateResult<T> = Result<T, GateError>;
