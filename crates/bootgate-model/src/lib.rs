mod domain;
pub use domain::{Env, Flag, KeyValue};
pub use domain::{
    ENV_APP_DIR, ENV_APP_GROUP, ENV_APP_NO_NEW_PRIVS, ENV_APP_ROLE, ENV_APP_USER,
    ENV_CELERY_BEAT_PIDFILE, ENV_DB_WAIT, ENV_DB_WAIT_ATTEMPTS, ENV_DB_WAIT_INTERVAL_SECS,
    ENV_DB_WAIT_TIMEOUT_SECS, ENV_DJANGO_COLLECTSTATIC, ENV_DJANGO_CREATE_SUPERUSER,
    ENV_DJANGO_MIGRATE, ENV_LOG_COLOR, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_LOG_TZ,
    ENV_POSTGRES_DB, ENV_POSTGRES_HOST, ENV_POSTGRES_PASSWORD, ENV_POSTGRES_PORT,
    ENV_POSTGRES_USER, ENV_PYTHON_BIN, ENV_RUNTIME_DIRS, ENV_WEB_BIND, ENV_WEB_WORKERS,
};

mod error;
pub use error::{ModelError, ModelResult};

mod account;
pub use account::{Account, Owner, OwnershipRule};

mod connection;
pub use connection::ConnectionParams;

mod launch;
pub use launch::LaunchSpec;

mod readiness;
pub use readiness::ReadinessState;

mod role;
pub use role::Role;
