//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and behind the `test-support` feature.

use std::sync::Mutex;

use camino::Utf8PathBuf;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use tempfile::TempDir;

/// Clock frozen at a chosen instant that tests can move forward.
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock frozen at the given Unix timestamp (seconds).
    pub fn at_unix(seconds: i64) -> Self {
        match DateTime::from_timestamp(seconds, 0) {
            Some(now) => Self::new(now),
            None => panic!("timestamp {seconds} out of range"),
        }
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Temporary directory holding a not-yet-created settings document.
///
/// Keep the returned [`TempDir`] alive for as long as the path is used.
pub fn temp_settings_path() -> (TempDir, Utf8PathBuf) {
    let dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(error) => panic!("create temp dir: {error}"),
    };
    let path = match Utf8PathBuf::from_path_buf(dir.path().join("appsettings.json")) {
        Ok(path) => path,
        Err(path) => panic!("temp path is not UTF-8: {}", path.display()),
    };
    (dir, path)
}
