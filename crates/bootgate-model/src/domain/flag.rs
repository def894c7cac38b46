use std::{fmt, str::FromStr};

use crate::ModelError;

/// Boolean switch read from the environment.
///
/// Accepts the spellings commonly found in compose files and shell scripts:
/// `1|true|yes|on` and `0|false|no|off`, case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flag(bool);

impl Flag {
    pub const fn enabled() -> Self {
        Self(true)
    }

    pub const fn disabled() -> Self {
        Self(false)
    }

    pub const fn is_enabled(&self) -> bool {
        self.0
    }

    pub const fn is_disabled(&self) -> bool {
        !self.0
    }
}

impl Default for Flag {
    fn default() -> Self {
        Self::disabled()
    }
}

impl From<bool> for Flag {
    fn from(b: bool) -> Self {
        Self(b)
    }
}

impl From<Flag> for bool {
    fn from(f: Flag) -> Self {
        f.0
    }
}

impl FromStr for Flag {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Self::enabled()),
            "0" | "false" | "no" | "off" => Ok(Self::disabled()),
            _ => Err(ModelError::InvalidFlag(s.to_string())),
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "on" } else { "off" })
    }
}

#[cfg(test)]
mod tests {
    use super::Flag;

    #[test]
    fn default_is_disabled() {
        assert!(Flag::default().is_disabled());
    }

    #[test]
    fn parses_truthy_and_falsy_values() {
        for v in ["1", "true", "TRUE", "yes", "On", " on "] {
            assert!(v.parse::<Flag>().unwrap().is_enabled(), "{v:?}");
        }
        for v in ["0", "false", "No", "OFF"] {
            assert!(v.parse::<Flag>().unwrap().is_disabled(), "{v:?}");
        }
    }

    #[test]
    fn rejects_unknown_values() {
        for v in ["", "2", "enabled", "y"] {
            assert!(v.parse::<Flag>().is_err(), "{v:?}");
        }
    }

    #[test]
    fn bool_conversions() {
        let f: Flag = true.into();
        assert!(f.is_enabled());
        assert!(!bool::from(Flag::disabled()));
    }
}
