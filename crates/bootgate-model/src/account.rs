use std::{fmt, path::PathBuf};

/// Resolved unprivileged account the application runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub home: PathBuf,
    /// Supplementary group ids, primary gid included.
    pub groups: Vec<u32>,
}

impl Account {
    /// Replace the primary group. The old primary gid is dropped from the
    /// supplementary list; the new one goes first.
    pub fn with_primary_group(mut self, gid: u32) -> Self {
        let old = self.gid;
        self.groups.retain(|g| *g != old && *g != gid);
        self.groups.insert(0, gid);
        self.gid = gid;
        self
    }
}

/// Desired `user:group` owner of a path, by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub user: String,
    pub group: String,
}

impl Owner {
    pub fn new(user: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            group: group.into(),
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user, self.group)
    }
}

/// A directory tree that must be owned by `owner` before the app starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipRule {
    pub path: PathBuf,
    pub owner: Owner,
}

impl OwnershipRule {
    pub fn new(path: impl Into<PathBuf>, owner: Owner) -> Self {
        Self {
            path: path.into(),
            owner,
        }
    }
}
