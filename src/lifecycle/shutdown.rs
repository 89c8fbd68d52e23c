//! Shutdown coordination for the gateway.
//!
//! # Sequence
//! ```text
//! termination signal
//!     → accept loop stops, listener dropped
//!     → close notification to every live connection      (t = 0)
//!     → forced destroy of connections still open          (t = force_destroy_ms)
//!     → exit 0 as soon as the registry is empty
//!     → exit 1 if it is still not empty                   (t = grace_period_ms)
//! ```

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;

use crate::config::schema::ShutdownConfig;
use crate::net::connection::ConnectionRegistry;

/// Trigger that tells the server to stop.
///
/// Backed by a watch channel so a waiter that subscribes after the
/// trigger still observes it.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    /// Create a new shutdown trigger.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Fire the trigger. Further calls are no-ops.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Future resolving once `trigger` has been called.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            let _ = rx.wait_for(|triggered| *triggered).await;
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// How the drain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every connection closed before the grace period ran out.
    Drained,
    /// Connections were still registered when the grace period ran out.
    TimedOut,
}

impl ShutdownOutcome {
    /// Process exit code for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            ShutdownOutcome::Drained => 0,
            ShutdownOutcome::TimedOut => 1,
        }
    }
}

/// Two-tier connection drain: polite close, then forced destroy, bounded by a grace period.
#[derive(Debug, Clone, Copy)]
pub struct GracefulShutdown {
    grace_period: Duration,
    force_destroy_after: Duration,
}

impl GracefulShutdown {
    pub fn new(config: &ShutdownConfig) -> Self {
        Self {
            grace_period: Duration::from_millis(config.grace_period_ms),
            force_destroy_after: Duration::from_millis(config.force_destroy_ms),
        }
    }

    /// Drain `registry`. The caller must already have stopped accepting connections.
    pub async fn drain(&self, registry: &ConnectionRegistry) -> ShutdownOutcome {
        let notified = registry.broadcast_close();
        tracing::info!(
            connections = notified,
            grace_period_ms = self.grace_period.as_millis() as u64,
            "Http server is closing out remaining connections"
        );

        let grace = tokio::time::sleep(self.grace_period);
        let force = tokio::time::sleep(self.force_destroy_after);
        let drained = registry.wait_drained();
        tokio::pin!(grace, force, drained);

        let mut destroyed = false;
        loop {
            tokio::select! {
                biased;

                _ = &mut drained => {
                    tracing::info!("All connections closed");
                    return ShutdownOutcome::Drained;
                }
                _ = &mut force, if !destroyed => {
                    destroyed = true;
                    let remaining = registry.force_destroy_all();
                    if remaining > 0 {
                        tracing::warn!(connections = remaining, "Forcefully destroying remaining connections");
                    }
                }
                _ = &mut grace => {
                    tracing::error!(
                        connections = registry.len(),
                        "Http server couldn't close remaining connections in time, forcefully shutting down"
                    );
                    return ShutdownOutcome::TimedOut;
                }
            }
        }
    }
}
