//! Ports used by initial setup to validate and prepare the SDK database.

use std::sync::Arc;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by SDK admin adapters.
    pub enum SdkAdminError {
        /// The connection string was rejected or the database is unreachable.
        Connection { message: String } =>
            "sdk connection failed: {message}",
        /// Database setup with the customer token failed.
        Setup { message: String } =>
            "sdk setup failed: {message}",
    }
}

/// Administrative handle bound to one SDK database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SdkAdmin: Send + Sync {
    /// Create or upgrade the SDK schema and register the customer token.
    async fn db_setup(&self, token: &str) -> Result<(), SdkAdminError>;
}

/// Opens [`SdkAdmin`] handles; opening doubles as connection-string validation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SdkAdminConnector: Send + Sync {
    async fn connect(&self, connection_string: &str) -> Result<Arc<dyn SdkAdmin>, SdkAdminError>;
}
