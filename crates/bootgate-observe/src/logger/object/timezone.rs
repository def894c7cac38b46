use std::{fmt, str::FromStr, sync::OnceLock};

use time::UtcOffset;

use crate::logger::error::LoggerError;

/// Local offset detected by [`init_local_offset`].
///
/// The gate is a short-lived bootstrap, so the offset is captured once and
/// never refreshed.
static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Timezone for log timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoggerTimeZone {
    #[default]
    Utc,
    Local,
}

impl LoggerTimeZone {
    /// Offset to apply to a UTC timestamp.
    pub(crate) fn offset(self) -> UtcOffset {
        match self {
            Self::Utc => UtcOffset::UTC,
            Self::Local => LOCAL_OFFSET.get().copied().unwrap_or(UtcOffset::UTC),
        }
    }
}

impl FromStr for LoggerTimeZone {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(LoggerError::InvalidTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for LoggerTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoggerTimeZone::Utc => "utc",
            LoggerTimeZone::Local => "local",
        })
    }
}

/// Detects the local UTC offset.
///
/// Must run in `main()` **before** the tokio runtime (or any other thread)
/// starts: `time` refuses to read the offset in a multi-threaded process on
/// most Unix platforms. Falls back to UTC when detection fails.
///
/// ```no_run
/// fn main() {
///     bootgate_observe::init_local_offset();
///     // build the runtime afterwards
/// }
/// ```
pub fn init_local_offset() {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let _ = LOCAL_OFFSET.set(offset);
}
