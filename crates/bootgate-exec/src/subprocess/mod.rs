//! Child processes: management steps run to completion, and the command
//! builder shared with the final exec.
//!
//! Every command is built through [`build_command`] so the working directory
//! and privilege drop are applied the same way whether the gate waits for
//! the child or replaces itself with it.
mod command;
mod step;

pub use command::build_command;
pub use step::run_step;
