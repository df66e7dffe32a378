//! Outbound adapters: storage, the mock gateway, and browser stand-ins.

pub mod mock_gateway;
pub mod navigation;
pub mod storage;

pub use navigation::{HistoryNavigator, TracingNotifier};
