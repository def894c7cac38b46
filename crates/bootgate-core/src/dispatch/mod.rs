//! Role selection and dispatch planning.
//!
//! The role is either given explicitly by the caller or sniffed from the
//! command line by [`classify_command`]. [`plan_launch`] then turns the role
//! and argv into the concrete program to exec.
mod classify;
pub use classify::{classify_command, needs_database};

mod plan;
pub use plan::{DEFAULT_APP_DIR, DispatchConfig, LaunchPlan, plan_launch};

mod web;
pub use web::WebServerCommand;
