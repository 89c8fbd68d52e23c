//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap backend calls with an optional deadline
//! - Cancel the wrapped call cleanly on expiry
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from transport errors

use std::future::Future;
use std::time::Duration;

/// The deadline elapsed before the call completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("deadline of {0:?} elapsed")]
pub struct DeadlineExceeded(pub Duration);

/// Convert a seconds setting into a deadline; `0` disables it.
pub fn deadline_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Run `future`, giving up after `deadline` when one is set.
pub async fn with_deadline<F>(deadline: Option<Duration>, future: F) -> Result<F::Output, DeadlineExceeded>
where
    F: Future,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, future)
            .await
            .map_err(|_| DeadlineExceeded(limit)),
        None => Ok(future.await),
    }
}
