//! Port for a settings group that can be read as a snapshot and updated in
//! place.
//!
//! An update applies a mutator to the current value and persists the result
//! before returning, so subsequent reads in the same process observe it.
//! Concurrent updates are last-write-wins.

use std::sync::RwLock;

use super::define_port_error;

define_port_error! {
    /// Errors raised by settings stores.
    pub enum SettingsStoreError {
        /// The stored document could not be read or parsed.
        Read { message: String } => "settings could not be read: {message}",
        /// The updated document could not be written.
        Write { message: String } => "settings could not be written: {message}",
    }
}

/// Read/update access to one settings group.
pub trait WritableOptions<T>: Send + Sync {
    /// Snapshot of the current value.
    fn value(&self) -> Result<T, SettingsStoreError>;

    /// Apply `apply` to the current value and persist the result.
    fn update(&self, apply: &mut dyn FnMut(&mut T)) -> Result<(), SettingsStoreError>;
}

/// Process-local settings group, for tests and for running without a
/// settings document.
#[derive(Debug, Default)]
pub struct InMemoryOptions<T> {
    value: RwLock<T>,
}

impl<T> InMemoryOptions<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }
}

impl<T: Clone + Send + Sync> WritableOptions<T> for InMemoryOptions<T> {
    fn value(&self) -> Result<T, SettingsStoreError> {
        self.value
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| SettingsStoreError::read("settings lock poisoned"))
    }

    fn update(&self, apply: &mut dyn FnMut(&mut T)) -> Result<(), SettingsStoreError> {
        let mut guard = self
            .value
            .write()
            .map_err(|_| SettingsStoreError::write("settings lock poisoned"))?;
        apply(&mut guard);
        Ok(())
    }
}
