//! SDK administration without a database behind it.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{SdkAdmin, SdkAdminConnector, SdkAdminError};

/// [`SdkAdminConnector`] that validates connection strings and records
/// which databases completed setup.
#[derive(Debug, Clone, Default)]
pub struct InMemorySdkAdminConnector {
    completed: Arc<Mutex<Vec<String>>>,
}

impl InMemorySdkAdminConnector {
    /// Connection strings whose setup succeeded, oldest first.
    pub fn completed_setups(&self) -> Vec<String> {
        self.completed
            .lock()
            .map(|completed| completed.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SdkAdminConnector for InMemorySdkAdminConnector {
    async fn connect(&self, connection_string: &str) -> Result<Arc<dyn SdkAdmin>, SdkAdminError> {
        crate::outbound::validate_connection_string(connection_string)
            .map_err(SdkAdminError::connection)?;
        Ok(Arc::new(InMemorySdkAdmin {
            connection_string: connection_string.to_owned(),
            completed: Arc::clone(&self.completed),
        }))
    }
}

struct InMemorySdkAdmin {
    connection_string: String,
    completed: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl SdkAdmin for InMemorySdkAdmin {
    async fn db_setup(&self, token: &str) -> Result<(), SdkAdminError> {
        if token.trim().is_empty() {
            return Err(SdkAdminError::setup("customer token is required"));
        }
        self.completed
            .lock()
            .map_err(|_| SdkAdminError::setup("setup registry lock poisoned"))?
            .push(self.connection_string.clone());
        info!("sdk database setup completed");
        Ok(())
    }
}
