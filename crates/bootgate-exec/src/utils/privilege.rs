//! Privilege drop for launched processes.
//!
//! ## Overview
//!
//! The gate runs as root (it has to `chown` the runtime directories), but
//! nothing it launches should. [`attach_privilege`] installs a `pre_exec`
//! hook that runs in the child after `fork()` and right before `execve()`:
//!
//! 1. `setgroups` to the account's supplementary groups;
//! 2. `setgid` to its primary group;
//! 3. `setuid` to the account (irreversible, so it goes last);
//! 4. `PR_SET_NO_NEW_PRIVS` (Linux), if requested.
//!
//! Every step is fatal: a child that cannot drop privileges never runs.
//!
//! When the gate itself is not root (local runs, rootless containers) the
//! switch is skipped with a warning and the child inherits the gate's ids.
use std::process::Command;

use tracing::{debug, warn};

use bootgate_model::Account;

/// Identity and hardening applied to every launched process.
#[derive(Debug, Clone, Default)]
pub struct PrivilegeConfig {
    /// Account to switch to; `None` keeps the current identity.
    pub account: Option<Account>,
    /// Set `no_new_privs` so setuid binaries cannot regain privileges.
    pub no_new_privs: bool,
}

impl PrivilegeConfig {
    pub fn new(account: Account) -> Self {
        Self {
            account: Some(account),
            no_new_privs: false,
        }
    }

    pub fn with_no_new_privs(mut self, enabled: bool) -> Self {
        self.no_new_privs = enabled;
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.account.is_none() && !self.no_new_privs
    }
}

/// Attach the privilege drop to `cmd`.
///
/// Also points `HOME`, `USER` and `LOGNAME` at the target account, since
/// the child would otherwise inherit root's.
pub fn attach_privilege(cmd: &mut Command, config: &PrivilegeConfig) {
    if config.is_empty() {
        return;
    }

    let mut account = config.account.clone();
    if let Some(acc) = &account {
        cmd.env("HOME", &acc.home)
            .env("USER", &acc.name)
            .env("LOGNAME", &acc.name);

        if !running_as_root() {
            warn!(
                user = %acc.name,
                "not running as root; launching without switching user"
            );
            account = None;
        } else {
            debug!(user = %acc.name, uid = acc.uid, gid = acc.gid, "dropping privileges");
        }
    }

    #[cfg(unix)]
    {
        unix_impl::attach(cmd, account, config.no_new_privs);
    }

    #[cfg(not(unix))]
    {
        let _ = account;
        warn!(
            "privilege drop is only enforced on Unix; current OS={}",
            std::env::consts::OS
        );
    }
}

#[cfg(unix)]
fn running_as_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn running_as_root() -> bool {
    false
}

#[cfg(unix)]
mod unix_impl {
    use std::{io, os::unix::process::CommandExt, process::Command};

    use bootgate_model::Account;

    use crate::utils::log::pre_exec_log;

    pub fn attach(cmd: &mut Command, account: Option<Account>, no_new_privs: bool) {
        if account.is_none() && !no_new_privs {
            return;
        }

        // Everything the hook needs is moved in up front; the hook itself
        // must not allocate.
        let ids = account.map(|a| (a.uid, a.gid, a.groups));

        unsafe {
            cmd.pre_exec(move || {
                if let Some((uid, gid, groups)) = &ids {
                    switch_identity(*uid, *gid, groups)?;
                }
                if no_new_privs {
                    set_no_new_privs()?;
                }
                Ok(())
            });
        }
    }

    fn switch_identity(uid: u32, gid: u32, groups: &[u32]) -> io::Result<()> {
        if unsafe { libc::setgroups(groups.len() as _, groups.as_ptr()) } != 0 {
            return fail(b"bootgate: setgroups failed:");
        }
        if unsafe { libc::setgid(gid) } != 0 {
            return fail(b"bootgate: setgid failed:");
        }
        if unsafe { libc::setuid(uid) } != 0 {
            return fail(b"bootgate: setuid failed:");
        }
        Ok(())
    }

    #[cfg(target_os = "linux")]
    fn set_no_new_privs() -> io::Result<()> {
        if unsafe { libc::prctl(libc::PR_SET_NO_NEW_PRIVS, 1, 0, 0, 0) } != 0 {
            return fail(b"bootgate: PR_SET_NO_NEW_PRIVS failed:");
        }
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn set_no_new_privs() -> io::Result<()> {
        Ok(())
    }

    fn fail(msg: &[u8]) -> io::Result<()> {
        let err = io::Error::last_os_error();
        pre_exec_log(msg, err.raw_os_error());
        Err(err)
    }
}
