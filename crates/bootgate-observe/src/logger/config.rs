use std::io::IsTerminal;

use bootgate_model::{ENV_LOG_COLOR, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_LOG_TZ, Env, Flag};

use crate::logger::{
    error::LoggerResult,
    object::{LoggerFormat, LoggerLevel, LoggerTimeZone},
};

/// Logger configuration.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Filter expression (e.g. `"info"`, `"bootgate_core=debug,info"`).
    pub level: LoggerLevel,
    /// Timezone for timestamps.
    pub tz: LoggerTimeZone,
    /// Include module/target names.
    pub with_targets: bool,
    /// Colored output; only honored when stderr is a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Reads `LOG_FORMAT`, `LOG_LEVEL`, `LOG_TZ` and `LOG_COLOR`.
    ///
    /// | Env Var      | Default |
    /// |--------------|---------|
    /// | `LOG_FORMAT` | `text`  |
    /// | `LOG_LEVEL`  | `info`  |
    /// | `LOG_TZ`     | `utc`   |
    /// | `LOG_COLOR`  | `on`    |
    pub fn from_env(env: &Env) -> LoggerResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            format: env.parsed_or(ENV_LOG_FORMAT, defaults.format)?,
            level: env.parsed_or(ENV_LOG_LEVEL, defaults.level)?,
            tz: env.parsed_or(ENV_LOG_TZ, defaults.tz)?,
            with_targets: defaults.with_targets,
            use_color: env.flag(ENV_LOG_COLOR, Flag::enabled())?.is_enabled(),
        })
    }

    /// Color is used only when enabled in config AND stderr is a terminal.
    ///
    /// Evaluate at logger initialization, not while parsing config.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stderr().is_terminal()
    }
}
