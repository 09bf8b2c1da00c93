//! # Run Polling
//!
//! Waits for a run to reach `completed`, checking its status on a fixed
//! interval. The wait is bounded by [`PollPolicy::max_attempts`] and can be
//! interrupted through a [`CancellationToken`].

use crate::api::AssistantApi;
use crate::types::Run;
use lib_core::{AppError, Config, Result};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How often and how many times a run's status is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two status checks
    pub interval: Duration,
    /// Maximum number of status checks
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 300,
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.poll_interval(), config.poll_max_attempts)
    }
}

/// Drive `future` unless `cancel` fires first.
pub(crate) async fn cancellable<T>(
    cancel: &CancellationToken,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Cancelled("request cancelled by caller".to_string())),
        result = future => result,
    }
}

/// Poll a run until it completes.
///
/// The first check happens immediately; later checks are spaced by
/// `policy.interval`. A run that ends in a dead-end state fails right away
/// with [`AppError::Backend`]; exhausting the attempts fails with
/// [`AppError::Timeout`].
pub async fn wait_for_completion(
    api: &dyn AssistantApi,
    thread_id: &str,
    run_id: &str,
    policy: PollPolicy,
    cancel: &CancellationToken,
) -> Result<Run> {
    for attempt in 1..=policy.max_attempts {
        let run = cancellable(cancel, api.retrieve_run(thread_id, run_id)).await?;
        debug!(run_id, attempt, status = %run.status, "[ASSISTANT] Run status");

        if run.status == crate::RunStatus::Completed {
            return Ok(run);
        }

        if run.status.is_dead_end() {
            let reason = run
                .last_error
                .as_ref()
                .and_then(|e| e.message.clone())
                .unwrap_or_else(|| "no error detail".to_string());
            warn!(run_id, status = %run.status, reason = %reason, "[ASSISTANT] Run will not complete");
            return Err(AppError::Backend(format!(
                "run {} ended with status {}: {}",
                run_id, run.status, reason
            )));
        }

        if attempt < policy.max_attempts {
            cancellable(cancel, async {
                tokio::time::sleep(policy.interval).await;
                Ok(())
            })
            .await?;
        }
    }

    Err(AppError::Timeout(format!(
        "run {} not completed after {} status checks",
        run_id, policy.max_attempts
    )))
}
