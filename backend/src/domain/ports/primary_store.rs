//! Port for bringing the primary (identity) store up to date during setup.

use std::sync::Arc;

use async_trait::async_trait;

use super::define_port_error;
use super::IdentityManager;

define_port_error! {
    /// Errors raised while migrating the primary store.
    pub enum PrimaryStoreError {
        /// The connection string was rejected or the store is unreachable.
        Connection { message: String } =>
            "primary store connection failed: {message}",
        /// Schema migration failed.
        Migration { message: String } =>
            "primary store migration failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrimaryStoreBootstrap: Send + Sync {
    /// Apply pending migrations and return an identity manager bound to the
    /// migrated store.
    async fn migrate(
        &self,
        connection_string: &str,
    ) -> Result<Arc<dyn IdentityManager>, PrimaryStoreError>;
}
