use std::process::Stdio;

use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use bootgate_model::LaunchSpec;

use crate::{ExecError, PrivilegeConfig, subprocess::build_command};

/// Run a management step to completion.
///
/// The child inherits stdout/stderr so its output lands in the container
/// log next to ours; stdin is closed. A non-zero exit or death by signal is
/// a [`ExecError::StepFailed`]. Cancellation kills the child and returns
/// [`ExecError::Interrupted`].
pub async fn run_step(
    spec: &LaunchSpec,
    privilege: &PrivilegeConfig,
    cancel: &CancellationToken,
) -> Result<(), ExecError> {
    let mut cmd = Command::from(build_command(spec, privilege)?);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    info!(step = %spec, "running management step");

    let mut child = cmd.spawn().map_err(|source| ExecError::Spawn {
        program: spec.program.clone(),
        source,
    })?;

    tokio::select! {
        res = child.wait() => {
            let status = res.map_err(|e| ExecError::StepFailed {
                step: spec.to_string(),
                reason: format!("wait failed: {e}"),
            })?;
            if status.success() {
                debug!(step = %spec, "management step finished");
                return Ok(());
            }
            let reason = match status.code() {
                Some(code) => format!("process exited with non-zero code: {code}"),
                None => "process terminated by signal".to_string(),
            };
            Err(ExecError::StepFailed { step: spec.to_string(), reason })
        }
        _ = cancel.cancelled() => {
            debug!(step = %spec, "cancellation requested; killing management step");
            if let Err(e) = child.kill().await {
                debug!("failed to kill management step: {e}");
            }
            Err(ExecError::Interrupted)
        }
    }
}
