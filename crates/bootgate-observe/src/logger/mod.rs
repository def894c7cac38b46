mod config;
mod error;
mod logger;
mod object;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use object::LoggerFormat;
pub use object::LoggerLevel;
pub use object::{LoggerTimeZone, init_local_offset};

/// Installs the global tracing subscriber described by `cfg`.
///
/// Call once, early in `main`. A second call returns [`LoggerError::AlreadyInitialized`].
///
/// # Local timestamps
/// `LoggerTimeZone::Local` needs [`init_local_offset`] to run before any
/// thread is spawned (i.e. before the tokio runtime is built); otherwise
/// timestamps fall back to UTC.
///
/// # Examples
/// ```rust
/// use bootgate_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("logger");
/// tracing::info!("gate starting");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LoggerFormat::Text => logger::logger_text(cfg),
        LoggerFormat::Json => logger::logger_json(cfg),
        LoggerFormat::Journald => logger::logger_journald(cfg),
    }
}
