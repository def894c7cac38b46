use std::time::Duration;

use bootgate_model::{
    ENV_DB_WAIT_ATTEMPTS, ENV_DB_WAIT_INTERVAL_SECS, ENV_DB_WAIT_TIMEOUT_SECS, Env, ModelError,
    ModelResult,
};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Retry bounds of the readiness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Total connection attempts, at least 1.
    pub max_attempts: u32,
    /// Upper bound for a single connection attempt.
    pub attempt_timeout: Duration,
    /// Pause after a failed attempt.
    pub poll_interval: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ProbeConfig {
    /// | Env Var                 | Default |
    /// |-------------------------|---------|
    /// | `DB_WAIT_ATTEMPTS`      | `30`    |
    /// | `DB_WAIT_TIMEOUT_SECS`  | `2`     |
    /// | `DB_WAIT_INTERVAL_SECS` | `1`     |
    pub fn from_env(env: &Env) -> ModelResult<Self> {
        let cfg = Self {
            max_attempts: env.parsed_or(ENV_DB_WAIT_ATTEMPTS, DEFAULT_MAX_ATTEMPTS)?,
            attempt_timeout: Duration::from_secs(
                env.parsed_or(ENV_DB_WAIT_TIMEOUT_SECS, DEFAULT_ATTEMPT_TIMEOUT.as_secs())?,
            ),
            poll_interval: Duration::from_secs(
                env.parsed_or(ENV_DB_WAIT_INTERVAL_SECS, DEFAULT_POLL_INTERVAL.as_secs())?,
            ),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.max_attempts == 0 {
            return Err(ModelError::InvalidEnv {
                key: ENV_DB_WAIT_ATTEMPTS.to_string(),
                value: "0".into(),
                reason: "at least one attempt is required".into(),
            });
        }
        if self.attempt_timeout.is_zero() {
            return Err(ModelError::InvalidEnv {
                key: ENV_DB_WAIT_TIMEOUT_SECS.to_string(),
                value: "0".into(),
                reason: "attempt timeout cannot be zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_thirty_two_one() {
        let cfg = ProbeConfig::from_env(&Env::new()).unwrap();

        assert_eq!(cfg.max_attempts, 30);
        assert_eq!(cfg.attempt_timeout, Duration::from_secs(2));
        assert_eq!(cfg.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn overrides_are_read() {
        let env: Env = [
            ("DB_WAIT_ATTEMPTS", "5"),
            ("DB_WAIT_TIMEOUT_SECS", "10"),
            ("DB_WAIT_INTERVAL_SECS", "0"),
        ]
        .into_iter()
        .collect();

        let cfg = ProbeConfig::from_env(&env).unwrap();
        assert_eq!(cfg.max_attempts, 5);
        assert_eq!(cfg.attempt_timeout, Duration::from_secs(10));
        assert!(cfg.poll_interval.is_zero());
    }

    #[test]
    fn zero_attempts_or_timeout_is_rejected() {
        for (key, value) in [("DB_WAIT_ATTEMPTS", "0"), ("DB_WAIT_TIMEOUT_SECS", "0")] {
            let env: Env = [(key, value)].into_iter().collect();
            assert!(ProbeConfig::from_env(&env).is_err(), "{key}={value}");
        }
    }

    #[test]
    fn garbage_is_rejected() {
        let env: Env = [("DB_WAIT_ATTEMPTS", "lots")].into_iter().collect();
        assert!(ProbeConfig::from_env(&env).is_err());
    }
}
