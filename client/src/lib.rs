//! FlutterPage client core: persisted sessions, role gates, page routing, and
//! an in-process mock of the platform API.

pub mod api;
pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod runtime;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::AppSettings;
pub use runtime::{ClientRuntime, RuntimeError};
