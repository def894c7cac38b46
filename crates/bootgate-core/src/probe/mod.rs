//! Database readiness probe.
//!
//! [`await_database`] makes up to `max_attempts` connection attempts through a
//! [`Connector`], sleeping `poll_interval` between failures. Connectivity
//! failures are retried; anything else ends the probe immediately.
mod config;
pub use config::ProbeConfig;

mod connector;
pub use connector::{ConnectError, Connector, PgConnector};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use bootgate_model::{ConnectionParams, ReadinessState};

use crate::error::{GateError, GateResult};

/// Block until the database accepts a connection or the attempt budget runs out.
///
/// Returns:
/// - `Ok(Ready)` on the first successful attempt, without sleeping afterwards;
/// - `Ok(Failed)` after `max_attempts` connectivity failures;
/// - `Err(GateError::Probe)` on an unexpected (non-retryable) error;
/// - `Err(GateError::Interrupted)` if `cancel` fires while waiting.
pub async fn await_database<C>(
    connector: &C,
    params: &ConnectionParams,
    cfg: &ProbeConfig,
    cancel: &CancellationToken,
) -> GateResult<ReadinessState>
where
    C: Connector + ?Sized,
{
    let mut state = ReadinessState::Waiting;
    debug!(
        target_db = %params,
        max_attempts = cfg.max_attempts,
        timeout_ms = cfg.attempt_timeout.as_millis() as u64,
        interval_ms = cfg.poll_interval.as_millis() as u64,
        "waiting for database",
    );

    for attempt in 1..=cfg.max_attempts {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GateError::Interrupted),
            res = tokio::time::timeout(cfg.attempt_timeout, connector.connect(params)) => res,
        };

        let err = match outcome {
            Ok(Ok(())) => {
                state = ReadinessState::Ready;
                info!(target_db = %params, attempt, "database is ready");
                break;
            }
            Ok(Err(e)) => e,
            Err(_) => ConnectError::Connectivity(format!(
                "connect timed out after {}ms",
                cfg.attempt_timeout.as_millis()
            )),
        };

        if !err.is_retryable() {
            error!(target_db = %params, attempt, error = %err, "database probe failed");
            return Err(GateError::Probe(err));
        }
        warn!(
            attempt,
            max_attempts = cfg.max_attempts,
            error = %err,
            "database not ready",
        );

        if attempt < cfg.max_attempts {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(GateError::Interrupted),
                _ = tokio::time::sleep(cfg.poll_interval) => {}
            }
        }
    }

    if state == ReadinessState::Waiting {
        state = ReadinessState::Failed;
        error!(
            target_db = %params,
            attempts = cfg.max_attempts,
            "database did not become ready",
        );
    }
    Ok(state)
}
