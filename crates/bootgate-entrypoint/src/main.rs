use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use bootgate_core::{Connector, PgConnector};
use bootgate_exec::replace_process;
use bootgate_model::Env;
use bootgate_observe::{LoggerConfig, init_local_offset, init_logger};

mod cli;
mod config;
mod gate;
mod signal;

use cli::Cli;
use config::GateConfig;
use gate::{Gate, Handoff};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // 1) environment: .env first, real variables win
    let dotenv = dotenvy::dotenv();
    let env = Env::from_process();

    // 2) logger; the local offset must be read before any thread exists
    init_local_offset();
    let log_cfg = match LoggerConfig::from_env(&env) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("bootgate: invalid logging configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logger(&log_cfg) {
        eprintln!("bootgate: failed to initialize logger: {e}");
        return ExitCode::FAILURE;
    }
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("ignoring unreadable .env: {e}"),
    }

    // 3) everything up to the exec
    let handoff = match startup(env, cli, PgConnector) {
        Ok(handoff) => handoff,
        Err(code) => return code,
    };

    // 4) exec; only returns on failure
    info!(plan = %handoff.plan, "dispatching");
    match replace_process(&handoff.plan, &handoff.privilege) {
        Ok(never) => match never {},
        Err(e) => {
            error!("dispatch failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Run the gate; any error is logged once and becomes exit code 1.
fn startup<C: Connector>(env: Env, cli: Cli, connector: C) -> Result<Handoff, ExitCode> {
    run(env, cli, connector).map_err(|e| {
        error!("startup failed: {e:#}");
        ExitCode::FAILURE
    })
}

fn run<C: Connector>(env: Env, cli: Cli, connector: C) -> anyhow::Result<Handoff> {
    let config = GateConfig::from_env(&env)?;
    let gate = Gate::new(env, config, connector);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let cancel = CancellationToken::new();
        signal::spawn_signal_listener(cancel.clone());

        let handoff = gate.prepare(cli.role, &cli.argv, &cancel).await;
        cancel.cancel();
        handoff
    })
}
