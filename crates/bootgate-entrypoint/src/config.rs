use std::path::PathBuf;

use bootgate_core::{DispatchConfig, ManagementSteps, ProbeConfig};
use bootgate_model::{
    ENV_APP_GROUP, ENV_APP_NO_NEW_PRIVS, ENV_APP_ROLE, ENV_APP_USER, ENV_DB_WAIT,
    ENV_RUNTIME_DIRS, Env, Flag, ModelResult, Owner, OwnershipRule, Role,
};

pub const DEFAULT_APP_USER: &str = "app";
pub const DEFAULT_APP_GROUP: &str = "app";
pub const DEFAULT_RUNTIME_DIRS: [&str; 3] = ["static", "media", "logs"];

/// Everything the gate needs, parsed up front so a bad value fails before
/// any side effect. Database parameters are the exception: they are read
/// only when the wait actually runs.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Role from `APP_ROLE`; the CLI flag wins over it.
    pub role: Option<Role>,
    pub db_wait: Flag,
    pub probe: ProbeConfig,
    pub dispatch: DispatchConfig,
    pub steps: ManagementSteps,
    /// Account the application runs as and owner of the runtime directories.
    pub owner: Owner,
    /// Absolute paths, relative entries resolved against the app directory.
    pub runtime_dirs: Vec<PathBuf>,
    pub no_new_privs: Flag,
}

impl GateConfig {
    /// | Env Var            | Default              |
    /// |--------------------|----------------------|
    /// | `APP_ROLE`         | guessed from argv    |
    /// | `APP_USER`         | `app`                |
    /// | `APP_GROUP`        | `app`                |
    /// | `RUNTIME_DIRS`     | `static,media,logs`  |
    /// | `APP_NO_NEW_PRIVS` | on                   |
    /// | `DB_WAIT`          | on                   |
    ///
    /// Plus the probe, dispatch and management-step variables.
    pub fn from_env(env: &Env) -> ModelResult<Self> {
        let dispatch = DispatchConfig::from_env(env)?;

        let runtime_dirs = match env.list(ENV_RUNTIME_DIRS) {
            Some(dirs) => dirs.iter().map(|d| dispatch.app_dir.join(d)).collect(),
            None => DEFAULT_RUNTIME_DIRS
                .iter()
                .map(|d| dispatch.app_dir.join(d))
                .collect(),
        };

        let owner = Owner::new(
            env.get_non_empty(ENV_APP_USER).unwrap_or(DEFAULT_APP_USER),
            env.get_non_empty(ENV_APP_GROUP).unwrap_or(DEFAULT_APP_GROUP),
        );

        Ok(Self {
            role: env
                .get_non_empty(ENV_APP_ROLE)
                .map(str::parse::<Role>)
                .transpose()?,
            db_wait: env.flag(ENV_DB_WAIT, Flag::enabled())?,
            probe: ProbeConfig::from_env(env)?,
            steps: ManagementSteps::from_env(env)?,
            dispatch,
            owner,
            runtime_dirs,
            no_new_privs: env.flag(ENV_APP_NO_NEW_PRIVS, Flag::enabled())?,
        })
    }

    pub fn ownership_rules(&self) -> Vec<OwnershipRule> {
        self.runtime_dirs
            .iter()
            .map(|dir| OwnershipRule::new(dir, self.owner.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bootgate_model::ModelError;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Env {
        pairs.iter().copied().collect()
    }

    #[test]
    fn defaults() {
        let cfg = GateConfig::from_env(&Env::new()).unwrap();

        assert!(cfg.role.is_none());
        assert!(cfg.db_wait.is_enabled());
        assert!(cfg.no_new_privs.is_enabled());
        assert_eq!(cfg.owner, Owner::new("app", "app"));
        assert_eq!(
            cfg.runtime_dirs,
            vec![
                PathBuf::from("/app/static"),
                PathBuf::from("/app/media"),
                PathBuf::from("/app/logs"),
            ]
        );
        assert_eq!(cfg.probe.max_attempts, 30);
        assert_eq!(cfg.probe.poll_interval, Duration::from_secs(1));
        assert_eq!(cfg.dispatch.beat_pidfile, PathBuf::from("/app/celerybeat.pid"));
    }

    #[test]
    fn runtime_dirs_resolve_against_app_dir() {
        let cfg = GateConfig::from_env(&env(&[
            ("APP_DIR", "/srv/kronon"),
            ("RUNTIME_DIRS", "media, /var/log/kronon"),
            ("APP_USER", "web"),
            ("APP_GROUP", "www-data"),
        ]))
        .unwrap();

        let rules = cfg.ownership_rules();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].path, PathBuf::from("/srv/kronon/media"));
        assert_eq!(rules[1].path, PathBuf::from("/var/log/kronon"));
        assert!(rules.iter().all(|r| r.owner == Owner::new("web", "www-data")));
    }

    #[test]
    fn role_comes_from_env() {
        let cfg = GateConfig::from_env(&env(&[("APP_ROLE", "worker")])).unwrap();
        assert_eq!(cfg.role, Some(Role::QueueWorker));

        let err = GateConfig::from_env(&env(&[("APP_ROLE", "cron")])).unwrap_err();
        assert!(matches!(err, ModelError::UnknownRole(_)));
    }

    #[test]
    fn invalid_values_are_rejected_up_front() {
        for (key, value) in [
            ("DB_WAIT", "sometimes"),
            ("DB_WAIT_ATTEMPTS", "0"),
            ("DB_WAIT_ATTEMPTS", "many"),
            ("APP_NO_NEW_PRIVS", "2"),
            ("DJANGO_MIGRATE", "please"),
            ("WEB_WORKERS", "0"),
        ] {
            assert!(
                GateConfig::from_env(&env(&[(key, value)])).is_err(),
                "{key}={value}"
            );
        }
    }

    #[test]
    fn database_parameters_are_not_required_to_load() {
        let cfg = GateConfig::from_env(&env(&[("DB_WAIT", "off")])).unwrap();
        assert!(cfg.db_wait.is_disabled());
    }
}
