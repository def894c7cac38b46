use std::process::Command;

use tracing::trace;

use bootgate_model::LaunchSpec;

use crate::{ExecError, PrivilegeConfig, attach_privilege};

/// Build a [`Command`] for `spec` with the privilege drop attached.
///
/// Environment is inherited from the gate; stdio is left to the caller.
pub fn build_command(spec: &LaunchSpec, privilege: &PrivilegeConfig) -> Result<Command, ExecError> {
    spec.validate()
        .map_err(|e| ExecError::InvalidSpec(e.to_string()))?;

    trace!(
        program = %spec.program,
        args = ?spec.args,
        cwd = ?spec.cwd,
        "building command"
    );

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args);
    if let Some(cwd) = &spec.cwd {
        cmd.current_dir(cwd);
    }
    attach_privilege(&mut cmd, privilege);
    Ok(cmd)
}
