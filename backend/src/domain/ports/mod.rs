//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Api`) are implemented by the services in
//! [`crate::domain`] and called by inbound adapters. Driven ports describe
//! the collaborators the services call: identity store, core SDK, SDK
//! administration, primary store bootstrap, settings stores, localisation
//! and e-mail.

mod macros;
pub(crate) use macros::define_port_error;

mod account_api;
mod admin_api;
mod auth_api;
mod cases_api;
mod core_sdk;
mod email_sender;
mod identity_manager;
mod localizer;
mod primary_store;
mod sdk_admin;
mod settings_api;
mod simple_sites_api;
mod writable_options;

pub use account_api::AccountApi;
#[cfg(test)]
pub use account_api::MockAccountApi;
pub use admin_api::AdminApi;
#[cfg(test)]
pub use admin_api::MockAdminApi;
pub use auth_api::AuthApi;
#[cfg(test)]
pub use auth_api::MockAuthApi;
pub use cases_api::CasesApi;
#[cfg(test)]
pub use cases_api::MockCasesApi;
pub use core_sdk::{Core, CoreError, CoreProvider, PAYMENT_REQUIRED_TEXT, StaticCoreProvider};
#[cfg(test)]
pub use core_sdk::{MockCore, MockCoreProvider};
pub use email_sender::{EmailError, EmailMessage, EmailSender};
#[cfg(test)]
pub use email_sender::MockEmailSender;
pub use identity_manager::{IdentityError, IdentityManager};
#[cfg(test)]
pub use identity_manager::MockIdentityManager;
pub use localizer::{FixtureLocalizer, Localizer, format_positional};
pub use primary_store::{PrimaryStoreBootstrap, PrimaryStoreError};
#[cfg(test)]
pub use primary_store::MockPrimaryStoreBootstrap;
pub use sdk_admin::{SdkAdmin, SdkAdminConnector, SdkAdminError};
#[cfg(test)]
pub use sdk_admin::{MockSdkAdmin, MockSdkAdminConnector};
pub use settings_api::SettingsApi;
#[cfg(test)]
pub use settings_api::MockSettingsApi;
pub use simple_sites_api::SimpleSitesApi;
#[cfg(test)]
pub use simple_sites_api::MockSimpleSitesApi;
pub use writable_options::{InMemoryOptions, SettingsStoreError, WritableOptions};
