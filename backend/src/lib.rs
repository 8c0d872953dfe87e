//! eForm base plugin backend.
//!
//! Hexagonal layout: [`domain`] holds the services, models and ports;
//! [`outbound`] implements the driven ports; [`inbound::http`] exposes the
//! driving ports over Actix; [`plugin`] packages everything for a host.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod plugin;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
