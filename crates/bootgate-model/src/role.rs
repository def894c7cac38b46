use std::{fmt, str::FromStr};

use crate::ModelError;

/// Process role the gate dispatches to.
/// - `WebServer`   — fixed gunicorn invocation; the caller's argv is only a trigger.
/// - `QueueWorker` — celery worker, argv executed as given.
/// - `Scheduler`   — celery beat, stale pid file removed first.
/// - `Passthrough` — anything else, argv executed unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    WebServer,
    QueueWorker,
    Scheduler,
    Passthrough,
}

impl Role {
    /// Whether the role talks to the database and must wait for it.
    pub fn needs_database(self) -> bool {
        !matches!(self, Self::Passthrough)
    }

    /// Canonical short name, as accepted by `--role`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WebServer => "web",
            Self::QueueWorker => "worker",
            Self::Scheduler => "beat",
            Self::Passthrough => "exec",
        }
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" | "webserver" | "gunicorn" => Ok(Self::WebServer),
            "worker" | "queue-worker" => Ok(Self::QueueWorker),
            "beat" | "scheduler" => Ok(Self::Scheduler),
            "exec" | "passthrough" => Ok(Self::Passthrough),
            _ => Err(ModelError::UnknownRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
