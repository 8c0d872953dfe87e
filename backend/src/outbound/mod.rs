//! Outbound adapters implementing the driven domain ports.
//!
//! - **settings**: JSON settings document with atomic writes
//! - **localization**: resource table localizer
//! - **identity**: identity store with an optional JSON snapshot, plus the
//!   primary store bootstrap
//! - **sdk**: in-memory core, core provider and SDK administration
//! - **email**: trace-log e-mail sender
//!
//! Adapters translate between domain types and their storage. They contain
//! no business logic.

pub(crate) mod atomic_io;
pub mod email;
pub mod identity;
pub mod localization;
pub mod sdk;
pub mod settings;

/// Check that a connection string names a data source and a catalogue.
///
/// Keys are matched ignoring ASCII case; `Server` and `Database` are
/// accepted as aliases.
pub(crate) fn validate_connection_string(connection_string: &str) -> Result<(), String> {
    let has = |names: &[&str]| {
        connection_string.split(';').any(|pair| {
            pair.split_once('=').is_some_and(|(key, value)| {
                names
                    .iter()
                    .any(|name| key.trim().eq_ignore_ascii_case(name))
                    && !value.trim().is_empty()
            })
        })
    };
    if !has(&["Data Source", "Server"]) {
        return Err("connection string has no data source".to_owned());
    }
    if !has(&["Initial Catalog", "Database"]) {
        return Err("connection string has no catalogue".to_owned());
    }
    Ok(())
}
