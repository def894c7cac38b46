//! User and group lookup through the system databases (`getpwnam_r`,
//! `getgrnam_r`, `getgrouplist`).
//!
//! Names that fail to resolve but parse as integers are taken as raw ids, the
//! way `chown 1000:1000` works for accounts that only exist on the host.
use std::path::PathBuf;

use bootgate_model::{Account, Owner};

use crate::ExecError;

/// Resolve `name` to a full account: ids, home directory and supplementary groups.
pub fn lookup_account(name: &str) -> Result<Account, ExecError> {
    match unix_impl::passwd_by_name(name)? {
        Some(account) => Ok(account),
        None => match name.parse::<u32>() {
            // No passwd entry means no group membership either: the only
            // group is the same-numbered primary one.
            Ok(uid) => Ok(Account {
                name: name.to_string(),
                uid,
                gid: uid,
                home: PathBuf::from("/"),
                groups: Vec::new(),
            }),
            Err(_) => Err(ExecError::UserNotFound(name.to_string())),
        },
    }
}

/// Resolve a group name to its gid.
pub fn lookup_group(name: &str) -> Result<u32, ExecError> {
    match unix_impl::gid_by_name(name)? {
        Some(gid) => Ok(gid),
        None => name
            .parse::<u32>()
            .map_err(|_| ExecError::GroupNotFound(name.to_string())),
    }
}

/// Resolve an [`Owner`] to a `(uid, gid)` pair.
pub fn resolve_owner(owner: &Owner) -> Result<(u32, u32), ExecError> {
    let uid = lookup_account(&owner.user)?.uid;
    let gid = lookup_group(&owner.group)?;
    Ok((uid, gid))
}

#[cfg(unix)]
mod unix_impl {
    use std::{
        ffi::{CStr, CString, OsStr},
        io,
        os::unix::ffi::OsStrExt,
        path::PathBuf,
        ptr,
    };

    use bootgate_model::Account;

    use crate::ExecError;

    /// Starting buffer for the `*_r` lookups; doubled on `ERANGE`.
    const INITIAL_BUF: usize = 1024;
    /// Give up growing past this; no sane passwd/group entry is this large.
    const MAX_BUF: usize = 1 << 20;

    fn c_name(name: &str) -> Result<CString, ExecError> {
        CString::new(name).map_err(|_| ExecError::InvalidSpec(format!("name contains NUL: {name:?}")))
    }

    fn lookup_error(name: &str, rc: libc::c_int) -> ExecError {
        ExecError::Lookup {
            name: name.to_string(),
            source: io::Error::from_raw_os_error(rc),
        }
    }

    pub fn passwd_by_name(name: &str) -> Result<Option<Account>, ExecError> {
        let cname = c_name(name)?;
        let mut buf: Vec<libc::c_char> = vec![0; INITIAL_BUF];
        let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::passwd = ptr::null_mut();

        loop {
            let rc = unsafe {
                libc::getpwnam_r(
                    cname.as_ptr(),
                    &mut pwd,
                    buf.as_mut_ptr(),
                    buf.len(),
                    &mut result,
                )
            };
            match rc {
                0 => break,
                libc::ERANGE if buf.len() < MAX_BUF => buf.resize(buf.len() * 2, 0),
                // Some libcs report "no such user" as an errno instead of a null result.
                libc::ENOENT | libc::ESRCH | libc::EBADF | libc::EPERM => return Ok(None),
                rc => return Err(lookup_error(name, rc)),
            }
        }
        if result.is_null() {
            return Ok(None);
        }

        let home = if pwd.pw_dir.is_null() {
            PathBuf::from("/")
        } else {
            let bytes = unsafe { CStr::from_ptr(pwd.pw_dir) }.to_bytes();
            PathBuf::from(OsStr::from_bytes(bytes))
        };
        let groups = group_list(&cname, pwd.pw_gid);

        Ok(Some(Account {
            name: name.to_string(),
            uid: pwd.pw_uid,
            gid: pwd.pw_gid,
            home,
            groups,
        }))
    }

    pub fn gid_by_name(name: &str) -> Result<Option<u32>, ExecError> {
        let cname = c_name(name)?;
        let mut buf: Vec<libc::c_char> = vec![0; INITIAL_BUF];
        let mut grp: libc::group = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::group = ptr::null_mut();

        loop {
            let rc = unsafe {
                libc::getgrnam_r(
                    cname.as_ptr(),
                    &mut grp,
                    buf.as_mut_ptr(),
                    buf.len(),
                    &mut result,
                )
            };
            match rc {
                0 => break,
                libc::ERANGE if buf.len() < MAX_BUF => buf.resize(buf.len() * 2, 0),
                libc::ENOENT | libc::ESRCH | libc::EBADF | libc::EPERM => return Ok(None),
                rc => return Err(lookup_error(name, rc)),
            }
        }
        if result.is_null() {
            return Ok(None);
        }
        Ok(Some(grp.gr_gid))
    }

    /// Supplementary groups of `user`, primary gid first.
    #[cfg(target_os = "linux")]
    fn group_list(user: &CStr, gid: libc::gid_t) -> Vec<u32> {
        let mut ngroups: libc::c_int = 16;
        loop {
            let mut groups: Vec<libc::gid_t> = vec![0; ngroups as usize];
            let prev = ngroups;
            let rc = unsafe {
                libc::getgrouplist(user.as_ptr(), gid, groups.as_mut_ptr(), &mut ngroups)
            };
            if rc >= 0 {
                groups.truncate(ngroups as usize);
                return with_primary_first(groups, gid);
            }
            // -1 with ngroups updated to the required size.
            if ngroups <= prev {
                ngroups = prev * 2;
            }
            if ngroups > 65_536 {
                return vec![gid];
            }
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn group_list(_user: &CStr, gid: libc::gid_t) -> Vec<u32> {
        vec![gid]
    }

    #[cfg(target_os = "linux")]
    fn with_primary_first(mut groups: Vec<u32>, gid: u32) -> Vec<u32> {
        groups.retain(|g| *g != gid);
        groups.insert(0, gid);
        groups
    }
}

#[cfg(not(unix))]
mod unix_impl {
    use bootgate_model::Account;

    use crate::ExecError;

    pub fn passwd_by_name(_name: &str) -> Result<Option<Account>, ExecError> {
        Err(ExecError::Unsupported("account lookup"))
    }

    pub fn gid_by_name(_name: &str) -> Result<Option<u32>, ExecError> {
        Err(ExecError::Unsupported("group lookup"))
    }
}
