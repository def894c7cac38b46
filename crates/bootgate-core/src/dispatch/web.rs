use bootgate_model::{ENV_WEB_BIND, ENV_WEB_WORKERS, Env, LaunchSpec, ModelError, ModelResult};

pub const DEFAULT_WEB_APP: &str = "config.asgi:application";
pub const DEFAULT_WEB_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_WEB_WORKERS: u16 = 4;
pub const DEFAULT_WEB_WORKER_CLASS: &str = "uvicorn.workers.UvicornWorker";

/// The fixed gunicorn invocation used for [`bootgate_model::Role::WebServer`].
///
/// The caller's argv only selects this role; it is never executed. Bind
/// address and worker count can be overridden through the environment, the
/// application module and the async worker class cannot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebServerCommand {
    pub app: String,
    pub bind: String,
    pub workers: u16,
    pub worker_class: String,
}

impl Default for WebServerCommand {
    fn default() -> Self {
        Self {
            app: DEFAULT_WEB_APP.to_string(),
            bind: DEFAULT_WEB_BIND.to_string(),
            workers: DEFAULT_WEB_WORKERS,
            worker_class: DEFAULT_WEB_WORKER_CLASS.to_string(),
        }
    }
}

impl WebServerCommand {
    /// | Env Var       | Default        |
    /// |---------------|----------------|
    /// | `WEB_BIND`    | `0.0.0.0:8000` |
    /// | `WEB_WORKERS` | `4`            |
    pub fn from_env(env: &Env) -> ModelResult<Self> {
        let defaults = Self::default();
        let workers = env.parsed_or(ENV_WEB_WORKERS, defaults.workers)?;
        if workers == 0 {
            return Err(ModelError::InvalidEnv {
                key: ENV_WEB_WORKERS.to_string(),
                value: "0".into(),
                reason: "at least one worker is required".into(),
            });
        }
        Ok(Self {
            bind: env
                .get_non_empty(ENV_WEB_BIND)
                .map(str::to_string)
                .unwrap_or(defaults.bind),
            workers,
            ..defaults
        })
    }

    pub fn to_launch_spec(&self) -> LaunchSpec {
        LaunchSpec::new(
            "gunicorn",
            [
                self.app.clone(),
                "--bind".into(),
                self.bind.clone(),
                "--workers".into(),
                self.workers.to_string(),
                "--worker-class".into(),
                self.worker_class.clone(),
            ],
        )
    }
}
