//! Recursive ownership repair for the application's runtime directories.
//!
//! Volumes mounted into the container (static, media, logs) are often owned
//! by root or by whatever uid created them on the host. Before the app drops
//! privileges, every entry under each configured path is handed to the
//! application account.
//!
//! Rules:
//! - a missing directory is created, then chowned;
//! - symlinks are chowned themselves (`lchown`) and never followed;
//! - entries that already have the right owner are left alone, so running
//!   the gate again on a warm volume does no writes.
use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use bootgate_model::OwnershipRule;

use crate::{ExecError, resolve_owner};

/// Counters from an ownership pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnershipReport {
    /// Entries inspected.
    pub visited: u64,
    /// Entries whose owner was changed.
    pub changed: u64,
}

impl OwnershipReport {
    fn merge(&mut self, other: OwnershipReport) {
        self.visited += other.visited;
        self.changed += other.changed;
    }
}

/// Apply every rule in order. The first failure aborts the pass.
pub fn ensure_ownership(rules: &[OwnershipRule]) -> Result<OwnershipReport, ExecError> {
    let mut total = OwnershipReport::default();

    for rule in rules {
        let (uid, gid) = resolve_owner(&rule.owner)?;
        let report = ensure_tree_owned(&rule.path, uid, gid)?;

        info!(
            path = %rule.path.display(),
            owner = %rule.owner,
            visited = report.visited,
            changed = report.changed,
            "runtime directory ready"
        );
        total.merge(report);
    }
    Ok(total)
}

/// Make `root` and everything below it owned by `uid:gid`.
pub(crate) fn ensure_tree_owned(root: &Path, uid: u32, gid: u32) -> Result<OwnershipReport, ExecError> {
    match std::fs::symlink_metadata(root) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %root.display(), "creating missing directory");
            std::fs::create_dir_all(root).map_err(|e| ownership_err(root, e))?;
        }
        Err(e) => return Err(ownership_err(root, e)),
    }

    let mut report = OwnershipReport::default();
    let mut stack: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(path) = stack.pop() {
        let meta = std::fs::symlink_metadata(&path).map_err(|e| ownership_err(&path, e))?;
        report.visited += 1;

        if fix_owner(&path, &meta, uid, gid)? {
            report.changed += 1;
        }

        if meta.file_type().is_dir() {
            let entries = std::fs::read_dir(&path).map_err(|e| ownership_err(&path, e))?;
            for entry in entries {
                let entry = entry.map_err(|e| ownership_err(&path, e))?;
                stack.push(entry.path());
            }
        }
    }
    Ok(report)
}

#[cfg(unix)]
fn fix_owner(path: &Path, meta: &std::fs::Metadata, uid: u32, gid: u32) -> Result<bool, ExecError> {
    use std::os::unix::fs::MetadataExt;

    if meta.uid() == uid && meta.gid() == gid {
        return Ok(false);
    }
    std::os::unix::fs::lchown(path, Some(uid), Some(gid)).map_err(|e| ownership_err(path, e))?;
    Ok(true)
}

#[cfg(not(unix))]
fn fix_owner(_: &Path, _: &std::fs::Metadata, _: u32, _: u32) -> Result<bool, ExecError> {
    Err(ExecError::Unsupported("ownership changes"))
}

fn ownership_err(path: &Path, source: io::Error) -> ExecError {
    ExecError::Ownership {
        path: path.to_path_buf(),
        source,
    }
}
