//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Ports describe how the domain expects to reach driven adapters: browser
//! storage, the page location, the notification area, and the latency
//! helpers used by the mock gateway.

mod macros;
pub(crate) use macros::define_port_error;

mod key_value_store;
mod latency;
mod navigator;
mod notifier;
mod session_store;

#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{KeyValueStore, KeyValueStoreError};
#[cfg(test)]
pub use latency::MockLatencyJitter;
pub use latency::{FixedLatency, LatencyJitter, Sleeper};
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::Navigator;
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{NotificationKind, Notifier};
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::SessionStore;
