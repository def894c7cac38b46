//! Environment variable names read by the gate.
//!
//! Keeping them here avoids scattering magic strings across crates and makes
//! the full configuration surface greppable in one place.

// Database connection.
pub const ENV_POSTGRES_HOST: &str = "POSTGRES_HOST";
pub const ENV_POSTGRES_PORT: &str = "POSTGRES_PORT";
pub const ENV_POSTGRES_DB: &str = "POSTGRES_DB";
pub const ENV_POSTGRES_USER: &str = "POSTGRES_USER";
pub const ENV_POSTGRES_PASSWORD: &str = "POSTGRES_PASSWORD";

// Readiness probe.
pub const ENV_DB_WAIT: &str = "DB_WAIT";
pub const ENV_DB_WAIT_ATTEMPTS: &str = "DB_WAIT_ATTEMPTS";
pub const ENV_DB_WAIT_TIMEOUT_SECS: &str = "DB_WAIT_TIMEOUT_SECS";
pub const ENV_DB_WAIT_INTERVAL_SECS: &str = "DB_WAIT_INTERVAL_SECS";

// Runtime account and directories.
pub const ENV_APP_DIR: &str = "APP_DIR";
pub const ENV_APP_USER: &str = "APP_USER";
pub const ENV_APP_GROUP: &str = "APP_GROUP";
pub const ENV_APP_ROLE: &str = "APP_ROLE";
pub const ENV_APP_NO_NEW_PRIVS: &str = "APP_NO_NEW_PRIVS";
pub const ENV_RUNTIME_DIRS: &str = "RUNTIME_DIRS";

// Management steps.
pub const ENV_PYTHON_BIN: &str = "PYTHON_BIN";
pub const ENV_DJANGO_MIGRATE: &str = "DJANGO_MIGRATE";
pub const ENV_DJANGO_COLLECTSTATIC: &str = "DJANGO_COLLECTSTATIC";
pub const ENV_DJANGO_CREATE_SUPERUSER: &str = "DJANGO_CREATE_SUPERUSER";

// Dispatch targets.
pub const ENV_WEB_BIND: &str = "WEB_BIND";
pub const ENV_WEB_WORKERS: &str = "WEB_WORKERS";
pub const ENV_CELERY_BEAT_PIDFILE: &str = "CELERY_BEAT_PIDFILE";

// Logging.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_LOG_TZ: &str = "LOG_TZ";
pub const ENV_LOG_COLOR: &str = "LOG_COLOR";
