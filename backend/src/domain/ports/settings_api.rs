//! Driving port for application settings and the one-off initial setup.

use async_trait::async_trait;

use crate::domain::{
    AdminSettingsModel, InitialSettingsModel, OperationDataResult, OperationResult,
    PageSettingsModel,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsApi: Send + Sync {
    /// Succeeds once initial setup has stored an SDK connection string.
    async fn connection_string_exist(&self) -> OperationResult;

    /// Application default locale; always succeeds, falling back to `en-US`.
    async fn default_locale(&self) -> OperationDataResult<String>;

    /// Run initial setup. Fails when setup has already completed.
    async fn update_connection_string(&self, model: &InitialSettingsModel) -> OperationResult;

    async fn login_page_settings(&self) -> OperationDataResult<PageSettingsModel>;

    async fn page_header_settings(&self) -> OperationDataResult<PageSettingsModel>;

    async fn admin_settings(&self) -> OperationDataResult<AdminSettingsModel>;

    async fn update_admin_settings(&self, model: &AdminSettingsModel) -> OperationResult;

    async fn reset_login_page_settings(&self) -> OperationResult;

    async fn reset_page_header_settings(&self) -> OperationResult;
}
