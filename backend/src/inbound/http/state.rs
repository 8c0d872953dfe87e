//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountApi, AdminApi, AuthApi, CasesApi, SettingsApi, SimpleSitesApi};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub account: Arc<dyn AccountApi>,
    pub admin: Arc<dyn AdminApi>,
    pub auth: Arc<dyn AuthApi>,
    pub cases: Arc<dyn CasesApi>,
    pub settings: Arc<dyn SettingsApi>,
    pub simple_sites: Arc<dyn SimpleSitesApi>,
}
