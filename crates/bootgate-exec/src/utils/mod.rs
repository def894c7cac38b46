mod account;
pub use account::{lookup_account, lookup_group, resolve_owner};

mod ownership;
pub use ownership::{OwnershipReport, ensure_ownership};

mod privilege;
pub use privilege::{PrivilegeConfig, attach_privilege};

mod log;
