use std::fmt;

use crate::{
    ENV_POSTGRES_DB, ENV_POSTGRES_HOST, ENV_POSTGRES_PASSWORD, ENV_POSTGRES_PORT,
    ENV_POSTGRES_USER, Env, ModelResult,
};

/// Parameters used to open the readiness-probe connection.
///
/// All five fields are mandatory. `Debug` and `Display` never print the password.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    host: String,
    port: u16,
    database: String,
    user: String,
    password: String,
}

impl ConnectionParams {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            user: user.into(),
            password: password.into(),
        }
    }

    /// Read `POSTGRES_{HOST,PORT,DB,USER,PASSWORD}`.
    ///
    /// Fails on the first missing variable, in declaration order, so the
    /// reported name is deterministic.
    pub fn from_env(env: &Env) -> ModelResult<Self> {
        let host = env.require(ENV_POSTGRES_HOST)?;
        let port = env.require_parsed::<u16>(ENV_POSTGRES_PORT)?;
        let database = env.require(ENV_POSTGRES_DB)?;
        let user = env.require(ENV_POSTGRES_USER)?;
        let password = env.require(ENV_POSTGRES_PASSWORD)?;
        Ok(Self::new(host, port, database, user, password))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

impl fmt::Display for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}
