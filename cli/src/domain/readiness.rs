//! Readiness policy for containers started in the background.

use std::time::Duration;

/// Health label reported by the container engine once a container is ready.
pub const HEALTHY: &str = "healthy";

/// Bounded polling policy: at most `max_attempts` status checks,
/// `interval` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_secs(3),
        }
    }
}

/// Whether a raw health label means "healthy". Case-sensitive; surrounding
/// whitespace (the trailing newline of `inspect` output) is ignored.
#[must_use]
pub fn is_healthy(label: &str) -> bool {
    label.trim() == HEALTHY
}
