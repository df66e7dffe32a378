//! Production latency adapters for the mock transport.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::domain::ports::{LatencyJitter, Sleeper};

/// Shortest simulated round trip by default.
pub const DEFAULT_LATENCY_MIN: Duration = Duration::from_millis(500);
/// Longest simulated round trip by default.
pub const DEFAULT_LATENCY_MAX: Duration = Duration::from_millis(1500);

/// Tokio-based sleeper implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Delay drawn uniformly from an inclusive range.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use flutterpage::domain::ports::LatencyJitter;
/// use flutterpage::outbound::mock_gateway::UniformLatency;
///
/// let jitter = UniformLatency::new(Duration::from_millis(10), Duration::from_millis(20));
/// let delay = jitter.next_delay();
/// assert!(delay >= Duration::from_millis(10) && delay <= Duration::from_millis(20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLatency {
    min: Duration,
    max: Duration,
}

impl UniformLatency {
    /// Range between `min` and `max`; the bounds are swapped if reversed.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Lower bound.
    pub const fn min(&self) -> Duration {
        self.min
    }

    /// Upper bound.
    pub const fn max(&self) -> Duration {
        self.max
    }
}

impl Default for UniformLatency {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY_MIN, DEFAULT_LATENCY_MAX)
    }
}

impl LatencyJitter for UniformLatency {
    fn next_delay(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}
