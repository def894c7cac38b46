//! As PID 1 the gate gets no default signal handling from the kernel, so
//! SIGTERM/SIGINT are caught explicitly and turned into cancellation.
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancel `token` on the first SIGTERM or SIGINT.
pub fn spawn_signal_listener(token: CancellationToken) {
    tokio::spawn(async move {
        let mut term = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                warn!("failed to install SIGTERM handler: {e}");
                return;
            }
        };
        let mut int = match signal(SignalKind::interrupt()) {
            Ok(s) => s,
            Err(e) => {
                warn!("failed to install SIGINT handler: {e}");
                return;
            }
        };

        tokio::select! {
            _ = term.recv() => info!("received SIGTERM; aborting startup"),
            _ = int.recv() => info!("received SIGINT; aborting startup"),
            _ = token.cancelled() => return,
        }
        token.cancel();
    });
}
