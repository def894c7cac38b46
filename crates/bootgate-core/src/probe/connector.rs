use async_trait::async_trait;
use sqlx::{
    Connection,
    postgres::{PgConnectOptions, PgConnection},
};
use thiserror::Error;
use tracing::debug;

use bootgate_model::ConnectionParams;

/// Failure of a single connection attempt.
#[derive(Debug, Clone, Error)]
pub enum ConnectError {
    /// The database is not accepting connections yet; worth retrying.
    #[error("{0}")]
    Connectivity(String),

    /// Anything else; retrying will not help.
    #[error("{0}")]
    Unexpected(String),
}

impl ConnectError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }
}

/// Opens (and immediately closes) a connection to the database.
///
/// The probe only needs a yes/no answer; implementations must not keep the
/// connection around.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, params: &ConnectionParams) -> Result<(), ConnectError>;
}

/// PostgreSQL connector backed by `sqlx`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnector;

impl PgConnector {
    fn options(params: &ConnectionParams) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(params.host())
            .port(params.port())
            .database(params.database())
            .username(params.user())
            .password(params.password())
            .application_name("bootgate")
    }
}

#[async_trait]
impl Connector for PgConnector {
    async fn connect(&self, params: &ConnectionParams) -> Result<(), ConnectError> {
        let conn = PgConnection::connect_with(&Self::options(params))
            .await
            .map_err(classify)?;

        if let Err(e) = conn.close().await {
            debug!(error = %e, "failed to close probe connection cleanly");
        }
        Ok(())
    }
}

/// Server-side rejections ("the database system is starting up", auth not
/// yet provisioned) count as connectivity: the server exists but is not
/// ready for us.
fn classify(err: sqlx::Error) -> ConnectError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Database(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut => ConnectError::Connectivity(err.to_string()),
        other => ConnectError::Unexpected(other.to_string()),
    }
}
