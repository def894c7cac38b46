//! Django management steps run before the web server is dispatched.
use std::path::PathBuf;

use bootgate_model::{
    ENV_APP_DIR, ENV_DJANGO_COLLECTSTATIC, ENV_DJANGO_CREATE_SUPERUSER, ENV_DJANGO_MIGRATE,
    ENV_PYTHON_BIN, Env, Flag, LaunchSpec, ModelResult, Role,
};

use crate::dispatch::DEFAULT_APP_DIR;

pub const DEFAULT_PYTHON_BIN: &str = "python";

/// Which `manage.py` commands to run, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementSteps {
    pub python: String,
    /// Directory holding `manage.py`; also the steps' working directory.
    pub app_dir: PathBuf,
    pub migrate: Flag,
    pub collectstatic: Flag,
    pub create_superuser: Flag,
}

impl Default for ManagementSteps {
    fn default() -> Self {
        Self {
            python: DEFAULT_PYTHON_BIN.to_string(),
            app_dir: PathBuf::from(DEFAULT_APP_DIR),
            migrate: Flag::disabled(),
            collectstatic: Flag::disabled(),
            create_superuser: Flag::disabled(),
        }
    }
}

impl ManagementSteps {
    /// | Env Var                   | Default  |
    /// |---------------------------|----------|
    /// | `PYTHON_BIN`              | `python` |
    /// | `APP_DIR`                 | `/app`   |
    /// | `DJANGO_MIGRATE`          | off      |
    /// | `DJANGO_COLLECTSTATIC`    | off      |
    /// | `DJANGO_CREATE_SUPERUSER` | off      |
    pub fn from_env(env: &Env) -> ModelResult<Self> {
        Ok(Self {
            python: env
                .get_non_empty(ENV_PYTHON_BIN)
                .unwrap_or(DEFAULT_PYTHON_BIN)
                .to_string(),
            app_dir: PathBuf::from(env.get_non_empty(ENV_APP_DIR).unwrap_or(DEFAULT_APP_DIR)),
            migrate: env.flag(ENV_DJANGO_MIGRATE, Flag::disabled())?,
            collectstatic: env.flag(ENV_DJANGO_COLLECTSTATIC, Flag::disabled())?,
            create_superuser: env.flag(ENV_DJANGO_CREATE_SUPERUSER, Flag::disabled())?,
        })
    }

    fn manage(&self, args: &[&str]) -> LaunchSpec {
        let mut full = vec!["manage.py"];
        full.extend_from_slice(args);
        LaunchSpec::new(self.python.clone(), full).with_cwd(&self.app_dir)
    }
}

/// Steps to run for `role`, in order: migrate, collectstatic, init_superuser.
///
/// Only the web server runs them; workers and the scheduler start against
/// whatever schema the web container left behind.
pub fn management_steps(role: Role, cfg: &ManagementSteps) -> Vec<LaunchSpec> {
    if role != Role::WebServer {
        return Vec::new();
    }

    let mut steps = Vec::new();
    if cfg.migrate.is_enabled() {
        steps.push(cfg.manage(&["migrate", "--noinput"]));
    }
    if cfg.collectstatic.is_enabled() {
        steps.push(cfg.manage(&["collectstatic", "--noinput"]));
    }
    if cfg.create_superuser.is_enabled() {
        steps.push(cfg.manage(&["init_superuser"]));
    }
    steps
}
