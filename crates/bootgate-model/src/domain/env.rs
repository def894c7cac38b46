use std::{fmt::Display, str::FromStr};

use crate::{Flag, ModelError, ModelResult};

/// Single environment entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    key: String,
    value: String,
}

impl KeyValue {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Snapshot of the environment the gate was started with.
///
/// Stored as an ordered list; lookups scan from the end so later entries
/// override earlier ones. All configuration readers take an `Env` instead of
/// touching `std::env`, which keeps them testable against synthetic input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env(Vec<KeyValue>);

impl Env {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Capture the current process environment.
    ///
    /// Entries that are not valid UTF-8 are skipped: none of the variables
    /// the gate reads can carry such values meaningfully.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.0.iter()
    }

    /// Append an entry; it overrides any earlier entry with the same key.
    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.push(KeyValue::new(key, value));
    }

    /// Return the value for `key`, last entry wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|kv| kv.key() == key)
            .map(|kv| kv.value())
    }

    /// Return the trimmed value for `key`, treating blank values as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Return the value for a mandatory variable.
    ///
    /// A variable set to an empty (or whitespace-only) string counts as missing.
    pub fn require(&self, key: &str) -> ModelResult<&str> {
        self.get_non_empty(key)
            .ok_or_else(|| ModelError::MissingEnv(key.to_string()))
    }

    /// Parse a mandatory variable.
    pub fn require_parsed<T>(&self, key: &str) -> ModelResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.require(key)?;
        parse_value(key, raw)
    }

    /// Parse an optional variable, falling back to `default` when unset.
    pub fn parsed_or<T>(&self, key: &str, default: T) -> ModelResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get_non_empty(key) {
            Some(raw) => parse_value(key, raw),
            None => Ok(default),
        }
    }

    /// Read a boolean switch, falling back to `default` when unset.
    pub fn flag(&self, key: &str, default: Flag) -> ModelResult<Flag> {
        self.parsed_or(key, default)
    }

    /// Read a comma-separated list; blank items are dropped.
    ///
    /// Returns `None` when the variable is unset or blank.
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        self.get_non_empty(key).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

impl<K, V> FromIterator<(K, V)> for Env
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| KeyValue::new(k, v))
                .collect(),
        )
    }
}

fn parse_value<T>(key: &str, raw: &str) -> ModelResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>().map_err(|e| ModelError::InvalidEnv {
        key: key.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_entry_wins() {
        let mut env = Env::new();
        env.push("POSTGRES_HOST", "one");
        env.push("POSTGRES_PORT", "5432");
        env.push("POSTGRES_HOST", "two");

        assert_eq!(env.get("POSTGRES_HOST"), Some("two"));
        assert_eq!(env.get("POSTGRES_PORT"), Some("5432"));
        assert!(env.get("POSTGRES_DB").is_none());
    }

    #[test]
    fn require_treats_blank_as_missing() {
        let env: Env = [("POSTGRES_USER", "  ")].into_iter().collect();

        let err = env.require("POSTGRES_USER").unwrap_err();
        assert!(matches!(err, ModelError::MissingEnv(ref k) if k == "POSTGRES_USER"));

        let err = env.require("POSTGRES_DB").unwrap_err();
        assert!(matches!(err, ModelError::MissingEnv(ref k) if k == "POSTGRES_DB"));
    }

    #[test]
    fn require_parsed_reports_key_and_value() {
        let env: Env = [("POSTGRES_PORT", "five")].into_iter().collect();

        let err = env.require_parsed::<u16>("POSTGRES_PORT").unwrap_err();
        match err {
            ModelError::InvalidEnv { key, value, .. } => {
                assert_eq!(key, "POSTGRES_PORT");
                assert_eq!(value, "five");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parsed_or_uses_default_only_when_unset() {
        let env: Env = [("DB_WAIT_ATTEMPTS", "5")].into_iter().collect();

        assert_eq!(env.parsed_or("DB_WAIT_ATTEMPTS", 30u32).unwrap(), 5);
        assert_eq!(env.parsed_or("DB_WAIT_INTERVAL_SECS", 1u64).unwrap(), 1);
    }

    #[test]
    fn flag_parses_common_spellings() {
        let env: Env = [("A", "yes"), ("B", "OFF"), ("C", "maybe")]
            .into_iter()
            .collect();

        assert!(env.flag("A", Flag::disabled()).unwrap().is_enabled());
        assert!(env.flag("B", Flag::enabled()).unwrap().is_disabled());
        assert!(env.flag("D", Flag::enabled()).unwrap().is_enabled());
        assert!(env.flag("C", Flag::enabled()).is_err());
    }

    #[test]
    fn list_splits_and_drops_blanks() {
        let env: Env = [("RUNTIME_DIRS", " static, ,media,logs ")]
            .into_iter()
            .collect();

        assert_eq!(
            env.list("RUNTIME_DIRS").unwrap(),
            vec!["static", "media", "logs"]
        );
        assert!(env.list("MISSING").is_none());
    }
}
