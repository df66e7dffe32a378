//! Port for the browser-style string key-value store.
//!
//! The store is synchronous, like the local storage it stands in for.
//! Adapters report failures through [`KeyValueStoreError`]; callers in the
//! storage layer decide whether to propagate or degrade.

use super::define_port_error;

define_port_error! {
    /// Errors raised by key-value store adapters.
    pub enum KeyValueStoreError {
        /// Reading a key failed.
        Read {
            /// Key being read.
            key: String,
            /// Adapter failure.
            message: String,
        } => "failed to read {key}: {message}",
        /// Writing or removing a key failed.
        Write {
            /// Key being written.
            key: String,
            /// Adapter failure.
            message: String,
        } => "failed to write {key}: {message}",
        /// The write would exceed the adapter's capacity.
        QuotaExceeded {
            /// Key being written.
            key: String,
            /// Capacity in bytes.
            limit: usize,
        } => "storage quota of {limit} bytes exceeded writing {key}",
    }
}

/// String key-value storage.
///
/// Missing keys are `Ok(None)`; removing a missing key is not an error.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    /// Delete `key`.
    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;
}
