use std::{fmt, path::PathBuf};

use bootgate_model::{
    ENV_APP_DIR, ENV_CELERY_BEAT_PIDFILE, Env, LaunchSpec, ModelResult, Role,
};

use crate::dispatch::WebServerCommand;

pub const DEFAULT_APP_DIR: &str = "/app";
pub const DEFAULT_BEAT_PIDFILE: &str = "celerybeat.pid";

/// Settings that shape the dispatch target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Application root; working directory of the web server.
    pub app_dir: PathBuf,
    pub web: WebServerCommand,
    /// Pid file celery beat refuses to start over.
    pub beat_pidfile: PathBuf,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        let app_dir = PathBuf::from(DEFAULT_APP_DIR);
        Self {
            beat_pidfile: app_dir.join(DEFAULT_BEAT_PIDFILE),
            app_dir,
            web: WebServerCommand::default(),
        }
    }
}

impl DispatchConfig {
    /// | Env Var               | Default                    |
    /// |-----------------------|----------------------------|
    /// | `APP_DIR`             | `/app`                     |
    /// | `CELERY_BEAT_PIDFILE` | `<APP_DIR>/celerybeat.pid` |
    pub fn from_env(env: &Env) -> ModelResult<Self> {
        let app_dir = PathBuf::from(env.get_non_empty(ENV_APP_DIR).unwrap_or(DEFAULT_APP_DIR));
        let beat_pidfile = env
            .get_non_empty(ENV_CELERY_BEAT_PIDFILE)
            .map(PathBuf::from)
            .unwrap_or_else(|| app_dir.join(DEFAULT_BEAT_PIDFILE));

        Ok(Self {
            app_dir,
            web: WebServerCommand::from_env(env)?,
            beat_pidfile,
        })
    }
}

/// Fully resolved dispatch: what to exec and what to clean up first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub role: Role,
    pub target: LaunchSpec,
    /// Removed (if present) right before the exec.
    pub stale_pidfile: Option<PathBuf>,
}

impl fmt::Display for LaunchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.role, self.target)
    }
}

/// Resolve the exec target for `role`.
///
/// - `WebServer`: the fixed [`WebServerCommand`], run from `app_dir`; `argv` is ignored.
/// - `QueueWorker`, `Passthrough`: `argv` as given.
/// - `Scheduler`: `argv` as given, with the beat pid file scheduled for removal.
pub fn plan_launch(role: Role, argv: &[String], cfg: &DispatchConfig) -> ModelResult<LaunchPlan> {
    let plan = match role {
        Role::WebServer => LaunchPlan {
            role,
            target: cfg.web.to_launch_spec().with_cwd(&cfg.app_dir),
            stale_pidfile: None,
        },
        Role::QueueWorker | Role::Passthrough => LaunchPlan {
            role,
            target: LaunchSpec::from_argv(argv)?,
            stale_pidfile: None,
        },
        Role::Scheduler => LaunchPlan {
            role,
            target: LaunchSpec::from_argv(argv)?,
            stale_pidfile: Some(cfg.beat_pidfile.clone()),
        },
    };
    Ok(plan)
}
