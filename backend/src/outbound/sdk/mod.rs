//! In-process domain SDK adapters.

mod admin;
mod in_memory_core;
mod provider;

pub use admin::InMemorySdkAdminConnector;
pub use in_memory_core::{InMemoryCore, NewCase};
pub use provider::ConfiguredCoreProvider;
