//! Ports for simulated network latency.

use std::time::Duration;

use async_trait::async_trait;

/// Async sleep abstraction so tests can skip or record delays.
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use flutterpage::domain::ports::Sleeper;
/// use std::time::Duration;
///
/// struct Skip;
///
/// #[async_trait]
/// impl Sleeper for Skip {
///     async fn sleep(&self, _duration: Duration) {}
/// }
/// ```
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend execution for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Picks the simulated round-trip time of each gateway request.
#[cfg_attr(test, mockall::automock)]
pub trait LatencyJitter: Send + Sync {
    /// Delay to apply before the next response.
    fn next_delay(&self) -> Duration;
}

/// Jitter that always answers with the same delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedLatency(pub Duration);

impl LatencyJitter for FixedLatency {
    fn next_delay(&self) -> Duration {
        self.0
    }
}
