//! Hand-off to the application: the gate `execve`s into the planned command
//! so the application inherits PID 1 and receives container signals directly.
use std::{convert::Infallible, io, path::Path};

use tracing::{debug, info};

use bootgate_core::LaunchPlan;

use crate::{ExecError, PrivilegeConfig, subprocess::build_command};

/// Delete a pid file left behind by a previous run.
///
/// Returns whether a file was removed; a missing file is not an error.
pub fn remove_stale_pidfile(path: &Path) -> Result<bool, ExecError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "removed stale pid file");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no stale pid file");
            Ok(false)
        }
        Err(source) => Err(ExecError::PidFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Replace the current process with the plan's target.
///
/// Only returns on failure.
#[cfg(unix)]
pub fn replace_process(
    plan: &LaunchPlan,
    privilege: &PrivilegeConfig,
) -> Result<Infallible, ExecError> {
    use std::os::unix::process::CommandExt;

    if let Some(pidfile) = &plan.stale_pidfile {
        remove_stale_pidfile(pidfile)?;
    }

    let mut cmd = build_command(&plan.target, privilege)?;
    info!(role = %plan.role, command = %plan.target, "handing over to application");

    // exec() only comes back on error.
    let source = cmd.exec();
    Err(ExecError::Exec {
        program: plan.target.program.clone(),
        source,
    })
}

#[cfg(not(unix))]
pub fn replace_process(
    _plan: &LaunchPlan,
    _privilege: &PrivilegeConfig,
) -> Result<Infallible, ExecError> {
    Err(ExecError::Unsupported("process replacement"))
}

#[cfg(all(test, unix))]
mod tests {
    use bootgate_model::{LaunchSpec, Role};

    use super::*;

    #[test]
    fn stale_pidfile_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let pidfile = dir.path().join("celerybeat.pid");
        std::fs::write(&pidfile, b"1234").unwrap();

        assert!(remove_stale_pidfile(&pidfile).unwrap());
        assert!(!pidfile.exists());
    }

    #[test]
    fn missing_pidfile_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!remove_stale_pidfile(&dir.path().join("celerybeat.pid")).unwrap());
    }

    #[test]
    fn pidfile_that_is_a_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = remove_stale_pidfile(dir.path()).unwrap_err();
        assert!(matches!(err, ExecError::PidFile { .. }));
    }

    #[test]
    fn failed_exec_is_reported_after_pidfile_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let pidfile = dir.path().join("celerybeat.pid");
        std::fs::write(&pidfile, b"1").unwrap();

        let plan = LaunchPlan {
            role: Role::Scheduler,
            target: LaunchSpec::new("bootgate-definitely-not-a-binary", ["beat"]),
            stale_pidfile: Some(pidfile.clone()),
        };

        let err = replace_process(&plan, &PrivilegeConfig::default()).unwrap_err();
        assert!(matches!(err, ExecError::Exec { ref program, .. } if program == "bootgate-definitely-not-a-binary"));
        assert!(!pidfile.exists());
    }
}
