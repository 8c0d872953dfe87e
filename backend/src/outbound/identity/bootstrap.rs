//! Primary store bootstrap that hands out the shared in-memory identity
//! store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{IdentityManager, PrimaryStoreBootstrap, PrimaryStoreError};

/// [`PrimaryStoreBootstrap`] with nothing to migrate.
///
/// The connection string is only checked for a data source and catalogue.
#[derive(Clone)]
pub struct InMemoryPrimaryStore {
    identity: Arc<dyn IdentityManager>,
}

impl InMemoryPrimaryStore {
    pub fn new(identity: Arc<dyn IdentityManager>) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl PrimaryStoreBootstrap for InMemoryPrimaryStore {
    async fn migrate(
        &self,
        connection_string: &str,
    ) -> Result<Arc<dyn IdentityManager>, PrimaryStoreError> {
        crate::outbound::validate_connection_string(connection_string)
            .map_err(PrimaryStoreError::connection)?;
        info!("primary store ready");
        Ok(Arc::clone(&self.identity))
    }
}
