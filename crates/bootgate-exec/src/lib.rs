mod error;
pub use error::ExecError;

mod utils;
pub use utils::*;

mod replace;
pub use replace::{remove_stale_pidfile, replace_process};

pub mod subprocess;
pub use subprocess::run_step;
