//! Core provider gated on the stored SDK connection string.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ConnectionStrings;
use crate::domain::ports::{Core, CoreError, CoreProvider, WritableOptions};

/// Hands out `core` once initial setup has stored an SDK connection
/// string, and [`CoreError::NotConfigured`] before that.
#[derive(Clone)]
pub struct ConfiguredCoreProvider {
    connection_strings: Arc<dyn WritableOptions<ConnectionStrings>>,
    core: Arc<dyn Core>,
}

impl ConfiguredCoreProvider {
    pub fn new(
        connection_strings: Arc<dyn WritableOptions<ConnectionStrings>>,
        core: Arc<dyn Core>,
    ) -> Self {
        Self {
            connection_strings,
            core,
        }
    }
}

#[async_trait]
impl CoreProvider for ConfiguredCoreProvider {
    async fn core(&self) -> Result<Arc<dyn Core>, CoreError> {
        let strings = self
            .connection_strings
            .value()
            .map_err(|err| CoreError::unavailable(err.to_string()))?;
        if strings.is_configured() {
            Ok(Arc::clone(&self.core))
        } else {
            Err(CoreError::not_configured())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{InMemoryOptions, MockCore};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn unconfigured_store_yields_not_configured() {
        let provider = ConfiguredCoreProvider::new(
            Arc::new(InMemoryOptions::new(ConnectionStrings::default())),
            Arc::new(MockCore::new()),
        );

        let result = provider.core().await;

        assert!(matches!(result, Err(CoreError::NotConfigured)));
    }

    #[rstest]
    #[tokio::test]
    async fn configured_store_hands_out_the_core() {
        let strings = Arc::new(InMemoryOptions::new(ConnectionStrings::default()));
        let core: Arc<dyn Core> = Arc::new(MockCore::new());
        let provider = ConfiguredCoreProvider::new(strings.clone(), Arc::clone(&core));

        strings
            .update(&mut |value| value.sdk_connection = "Data Source=db".to_owned())
            .expect("update");
        let handed = provider.core().await.expect("core");

        assert!(Arc::ptr_eq(&handed, &core));
    }
}
