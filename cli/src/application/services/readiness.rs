//! Readiness Poller: waits for a container to report "healthy".
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use crate::application::ports::HealthProbe;
use crate::domain::{ReadinessError, ReadinessPolicy, is_healthy};

/// Poll `container` until it reports healthy or the attempt budget runs out.
///
/// There is no sleep after the last attempt, and a failing status query ends
/// the wait immediately.
///
/// # Errors
///
/// Returns [`ReadinessError::Timeout`] after `policy.max_attempts`
/// observations without success, or [`ReadinessError::StatusCheck`] if
/// querying the status fails.
pub async fn wait_until_healthy(
    probe: &impl HealthProbe,
    container: &str,
    policy: ReadinessPolicy,
) -> Result<(), ReadinessError> {
    for attempt in 1..=policy.max_attempts {
        let label = probe
            .health_status(container)
            .await
            .map_err(|e| ReadinessError::StatusCheck {
                container: container.to_string(),
                reason: format!("{e:#}"),
            })?;
        tracing::debug!(container, attempt, status = label.trim(), "health check");

        if is_healthy(&label) {
            return Ok(());
        }
        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Err(ReadinessError::Timeout {
        container: container.to_string(),
        attempts: policy.max_attempts,
    })
}
