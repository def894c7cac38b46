mod env;
pub use env::{Env, KeyValue};

mod flag;
pub use flag::Flag;

mod constants;
pub use constants::*;
