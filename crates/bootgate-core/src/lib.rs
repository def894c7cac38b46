pub mod dispatch;
pub mod error;
pub mod prepare;
pub mod probe;

pub use dispatch::{
    DispatchConfig, LaunchPlan, WebServerCommand, classify_command, needs_database, plan_launch,
};
pub use error::{GateError, GateResult};
pub use prepare::{ManagementSteps, management_steps};
pub use probe::{ConnectError, Connector, PgConnector, ProbeConfig, await_database};
