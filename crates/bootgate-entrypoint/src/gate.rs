//! The startup sequence, up to (not including) the final exec.
//!
//! ```text
//! decide role -> wait for database? -> fix ownership -> management steps -> plan
//! ```
//!
//! Every stage is fatal on error; there is no loop-back.
use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use bootgate_core::{
    Connector, GateError, LaunchPlan, await_database, classify_command, management_steps,
    needs_database, plan_launch,
};
use bootgate_exec::{PrivilegeConfig, ensure_ownership, lookup_account, lookup_group, run_step};
use bootgate_model::{Account, ConnectionParams, Env, ReadinessState, Role};

use crate::config::GateConfig;

/// What the process turns into once the gate is done.
#[derive(Debug)]
pub struct Handoff {
    pub plan: LaunchPlan,
    pub privilege: PrivilegeConfig,
}

pub struct Gate<C> {
    env: Env,
    config: GateConfig,
    connector: C,
}

impl<C: Connector> Gate<C> {
    pub fn new(env: Env, config: GateConfig, connector: C) -> Self {
        Self {
            env,
            config,
            connector,
        }
    }

    /// Explicit role first, then `APP_ROLE`, then argv sniffing.
    pub fn decide_role(&self, explicit: Option<Role>, argv: &[String]) -> Role {
        match explicit.or(self.config.role) {
            Some(role) => {
                info!(%role, "role selected explicitly");
                role
            }
            None => {
                let role = classify_command(argv);
                info!(%role, "role derived from command line");
                role
            }
        }
    }

    /// Run every stage before dispatch.
    pub async fn prepare(
        &self,
        explicit: Option<Role>,
        argv: &[String],
        cancel: &CancellationToken,
    ) -> anyhow::Result<Handoff> {
        let role = self.decide_role(explicit, argv);

        if needs_database(role, argv) {
            self.wait_for_database(cancel).await?;
        }

        let account = self.resolve_account()?;
        let report = ensure_ownership(&self.config.ownership_rules())
            .context("failed to prepare runtime directories")?;
        info!(
            visited = report.visited,
            changed = report.changed,
            "runtime directories ready"
        );

        let privilege = PrivilegeConfig::new(account)
            .with_no_new_privs(self.config.no_new_privs.is_enabled());

        for step in management_steps(role, &self.config.steps) {
            run_step(&step, &privilege, cancel)
                .await
                .with_context(|| format!("management step '{step}' failed"))?;
        }

        let plan = plan_launch(role, argv, &self.config.dispatch).map_err(GateError::from)?;
        Ok(Handoff { plan, privilege })
    }

    async fn wait_for_database(&self, cancel: &CancellationToken) -> Result<(), GateError> {
        if self.config.db_wait.is_disabled() {
            warn!("database wait disabled; dispatching without probing");
            return Ok(());
        }

        // Read here, not at startup: roles that never touch the database
        // must not need the variables.
        let params = ConnectionParams::from_env(&self.env)?;
        let probe = &self.config.probe;

        match await_database(&self.connector, &params, probe, cancel).await? {
            ReadinessState::Ready => Ok(()),
            _ => Err(GateError::DatabaseUnavailable {
                target: params.to_string(),
                attempts: probe.max_attempts,
            }),
        }
    }

    /// The application account, with `APP_GROUP` as its primary group.
    fn resolve_account(&self) -> anyhow::Result<Account> {
        let owner = &self.config.owner;
        let account = lookup_account(&owner.user)
            .with_context(|| format!("cannot resolve application user '{}'", owner.user))?;
        let gid = lookup_group(&owner.group)
            .with_context(|| format!("cannot resolve application group '{}'", owner.group))?;

        Ok(account.with_primary_group(gid))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::{
        path::Path,
        sync::{
            Arc,
            atomic::{AtomicU32, Ordering},
        },
    };

    use async_trait::async_trait;
    use bootgate_core::ConnectError;
    use bootgate_model::ModelError;

    use super::*;

    /// Fails `failures` times, then succeeds.
    #[derive(Clone)]
    struct Flaky {
        failures: u32,
        calls: Arc<AtomicU32>,
    }

    impl Flaky {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: Arc::new(AtomicU32::new(0)),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Connector for Flaky {
        async fn connect(&self, _: &ConnectionParams) -> Result<(), ConnectError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.failures {
                Err(ConnectError::Connectivity("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    fn argv(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    /// Env that passes every stage on a dev machine: current uid/gid,
    /// runtime dirs inside `root`.
    fn base_env(root: &Path) -> Env {
        let (uid, gid) = unsafe { (libc::geteuid(), libc::getegid()) };
        [
            ("APP_DIR", root.to_string_lossy().into_owned()),
            ("APP_USER", uid.to_string()),
            ("APP_GROUP", gid.to_string()),
            ("DB_WAIT_ATTEMPTS", "3".to_string()),
            ("POSTGRES_HOST", "db".to_string()),
            ("POSTGRES_PORT", "5432".to_string()),
            ("POSTGRES_DB", "kronon".to_string()),
            ("POSTGRES_USER", "kronon".to_string()),
            ("POSTGRES_PASSWORD", "secret".to_string()),
        ]
        .into_iter()
        .collect()
    }

    fn gate(env: Env, connector: &Flaky) -> Gate<Flaky> {
        let config = GateConfig::from_env(&env).unwrap();
        Gate::new(env, config, connector.clone())
    }

    #[test]
    fn explicit_role_overrides_argv() {
        let dir = tempfile::tempdir().unwrap();
        let flaky = Flaky::new(0);
        let mut env = base_env(dir.path());
        env.push("APP_ROLE", "beat");
        let gate = gate(env, &flaky);

        let line = argv("gunicorn config.wsgi");
        assert_eq!(gate.decide_role(None, &line), Role::Scheduler);
        assert_eq!(gate.decide_role(Some(Role::Passthrough), &line), Role::Passthrough);
    }

    #[test]
    fn group_override_replaces_primary_group() {
        let dir = tempfile::tempdir().unwrap();
        let flaky = Flaky::new(0);
        let mut env = base_env(dir.path());
        env.push("APP_USER", "4242424");
        env.push("APP_GROUP", "4343434");
        let gate = gate(env, &flaky);

        let account = gate.resolve_account().unwrap();
        assert_eq!(account.uid, 4242424);
        assert_eq!(account.gid, 4343434);
        assert_eq!(account.groups, vec![4343434]);
    }

    #[test]
    fn named_user_keeps_no_stale_primary_group() {
        let dir = tempfile::tempdir().unwrap();
        let flaky = Flaky::new(0);
        let mut env = base_env(dir.path());
        env.push("APP_USER", "root");
        env.push("APP_GROUP", "4343434");
        let gate = gate(env, &flaky);

        let account = gate.resolve_account().unwrap();
        assert_eq!(account.uid, 0);
        assert_eq!(account.groups.first(), Some(&4343434));
        assert!(!account.groups.contains(&0));
    }

    #[test]
    fn argv_is_sniffed_without_explicit_role() {
        let dir = tempfile::tempdir().unwrap();
        let flaky = Flaky::new(0);
        let gate = gate(base_env(dir.path()), &flaky);

        assert_eq!(
            gate.decide_role(None, &argv("celery -A config worker")),
            Role::QueueWorker
        );
    }

    #[tokio::test(start_paused = true)]
    async fn worker_waits_for_database_then_plans_literal_argv() {
        let dir = tempfile::tempdir().unwrap();
        let flaky = Flaky::new(2);
        let gate = gate(base_env(dir.path()), &flaky);
        let cancel = CancellationToken::new();

        let line = argv("celery -A config worker -l info");
        let handoff = gate.prepare(None, &line, &cancel).await.unwrap();

        assert_eq!(flaky.calls(), 3);
        assert_eq!(handoff.plan.role, Role::QueueWorker);
        assert_eq!(handoff.plan.target.to_string(), "celery -A config worker -l info");
        assert!(handoff.privilege.no_new_privs);
        for dir_name in ["static", "media", "logs"] {
            assert!(dir.path().join(dir_name).is_dir(), "{dir_name}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_database_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let flaky = Flaky::new(u32::MAX);
        let gate = gate(base_env(dir.path()), &flaky);
        let cancel = CancellationToken::new();

        let err = gate
            .prepare(None, &argv("celery -A config beat"), &cancel)
            .await
            .unwrap_err();

        assert_eq!(flaky.calls(), 3);
        assert!(matches!(
            err.downcast_ref::<GateError>(),
            Some(GateError::DatabaseUnavailable { attempts: 3, .. })
        ));
        // Nothing after the wait may run.
        assert!(!dir.path().join("static").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn missing_database_variable_fails_before_any_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let flaky = Flaky::new(0);
        let mut env = base_env(dir.path());
        env.push("POSTGRES_PASSWORD", "");
        let gate = gate(env, &flaky);
        let cancel = CancellationToken::new();

        let err = gate
            .prepare(None, &argv("gunicorn"), &cancel)
            .await
            .unwrap_err();

        assert_eq!(flaky.calls(), 0);
        assert!(matches!(
            err.downcast_ref::<GateError>(),
            Some(GateError::Config(ModelError::MissingEnv(key))) if key == "POSTGRES_PASSWORD"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn passthrough_skips_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let flaky = Flaky::new(u32::MAX);
        let gate = gate(base_env(dir.path()), &flaky);
        let cancel = CancellationToken::new();

        let handoff = gate
            .prepare(None, &argv("bash -c true"), &cancel)
            .await
            .unwrap();

        assert_eq!(flaky.calls(), 0);
        assert_eq!(handoff.plan.role, Role::Passthrough);
    }

    #[tokio::test(start_paused = true)]
    async fn manage_py_passthrough_waits_for_database() {
        let dir = tempfile::tempdir().unwrap();
        let flaky = Flaky::new(0);
        let gate = gate(base_env(dir.path()), &flaky);
        let cancel = CancellationToken::new();

        gate.prepare(None, &argv("python manage.py shell"), &cancel)
            .await
            .unwrap();
        assert_eq!(flaky.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn db_wait_off_skips_probe() {
        let dir = tempfile::tempdir().unwrap();
        let flaky = Flaky::new(u32::MAX);
        let mut env = base_env(dir.path());
        env.push("DB_WAIT", "off");
        let gate = gate(env, &flaky);
        let cancel = CancellationToken::new();

        let handoff = gate
            .prepare(None, &argv("gunicorn"), &cancel)
            .await
            .unwrap();

        assert_eq!(flaky.calls(), 0);
        assert_eq!(handoff.plan.role, Role::WebServer);
        assert_eq!(handoff.plan.target.program, "gunicorn");
        assert_eq!(handoff.plan.target.cwd.as_deref(), Some(dir.path()));
    }

    #[tokio::test]
    async fn failing_management_step_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let flaky = Flaky::new(0);
        let mut env = base_env(dir.path());
        env.push("DB_WAIT", "off");
        env.push("DJANGO_MIGRATE", "on");
        env.push("PYTHON_BIN", "false");
        let gate = gate(env, &flaky);
        let cancel = CancellationToken::new();

        let err = gate
            .prepare(None, &argv("gunicorn"), &cancel)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("false manage.py migrate --noinput"), "{err:#}");
    }

    #[tokio::test]
    async fn unknown_account_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let flaky = Flaky::new(0);
        let mut env = base_env(dir.path());
        env.push("DB_WAIT", "off");
        env.push("APP_USER", "bootgate-no-such-user");
        let gate = gate(env, &flaky);
        let cancel = CancellationToken::new();

        let err = gate
            .prepare(None, &argv("bash"), &cancel)
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("bootgate-no-such-user"));
    }
}
