//! Polling helpers for conditions that settle after startup.
//!
//! Replicas accept connections before their link to the primary is up, and
//! writes reach them asynchronously. These helpers poll until the condition
//! holds or the timeout expires.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::client::{ReplicationInfo, ValkeyClient, ValkeyError};

/// Delay between probes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Error type for wait operations.
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("Timeout waiting for {what} after {duration:?} (last error: {last_error:?})")]
    Timeout {
        what: String,
        duration: Duration,
        last_error: Option<String>,
    },
}

/// Poll `probe` until it yields `Some`.
///
/// Probe errors are logged and retried; the last one is reported if the
/// timeout expires.
pub async fn wait_for_condition<T, F, Fut>(
    what: &str,
    mut probe: F,
    interval: Duration,
    timeout_duration: Duration,
) -> Result<T, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, ValkeyError>>,
{
    let mut last_error: Option<String> = None;

    let poll = async {
        loop {
            match probe().await {
                Ok(Some(value)) => return value,
                Ok(None) => {}
                Err(e) => {
                    debug!(what, error = %e, "Probe failed");
                    last_error = Some(e.to_string());
                }
            }
            sleep(interval).await;
        }
    };

    let outcome = timeout(timeout_duration, poll).await;
    match outcome {
        Ok(value) => Ok(value),
        Err(_) => Err(WaitError::Timeout {
            what: what.to_string(),
            duration: timeout_duration,
            last_error,
        }),
    }
}

/// Wait until a replica reports `master_link_status:up`.
pub async fn wait_for_replication_link(
    replica: &ValkeyClient,
    timeout_duration: Duration,
) -> Result<ReplicationInfo, WaitError> {
    wait_for_condition(
        "replication link",
        move || async move {
            let info = replica.replication_info().await?;
            Ok::<_, ValkeyError>(info.is_link_up().then_some(info))
        },
        DEFAULT_POLL_INTERVAL,
        timeout_duration,
    )
    .await
}

/// Wait until `key` is readable through `client` and return its value.
pub async fn wait_for_key(
    client: &ValkeyClient,
    key: &str,
    timeout_duration: Duration,
) -> Result<String, WaitError> {
    wait_for_condition(
        "key",
        move || client.get(key),
        DEFAULT_POLL_INTERVAL,
        timeout_duration,
    )
    .await
}
