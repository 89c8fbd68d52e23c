//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGTERM (container stop) or Ctrl+C
//! - Translate either into the single shutdown trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A handler that cannot be installed is logged and simply never fires

use std::future::pending;
use tokio::signal;

/// Resolves when the process is asked to terminate.
pub async fn termination_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C received, closing http server gracefully"),
        _ = terminate => tracing::info!("SIGTERM signal received, closing http server gracefully"),
    }
}
