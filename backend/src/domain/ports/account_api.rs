//! Driving port for account self-service.
//!
//! Inbound adapters resolve the current user from their session and pass
//! the id explicitly; the port never reads ambient request state.

use async_trait::async_trait;

use crate::domain::{
    ChangePasswordModel, ForgotPasswordModel, OperationDataResult, OperationResult,
    ResetPasswordModel, UserId, UserInfo, UserSettingsModel,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Profile summary with the first assigned role.
    async fn user_info(&self, user_id: &UserId) -> OperationDataResult<UserInfo>;

    /// Effective locale: the user's, else the application default, else `en-US`.
    async fn user_settings(&self, user_id: &UserId) -> OperationDataResult<UserSettingsModel>;

    async fn update_user_settings(
        &self,
        user_id: &UserId,
        model: &UserSettingsModel,
    ) -> OperationResult;

    async fn change_password(&self, user_id: &UserId, model: &ChangePasswordModel)
    -> OperationResult;

    /// E-mail a password restore link; unknown addresses fail silently.
    async fn forgot_password(&self, model: &ForgotPasswordModel) -> OperationResult;

    /// Reset the administrator password to the configured default when
    /// `code` matches the configured security code.
    async fn reset_admin_password(&self, code: &str) -> OperationResult;

    async fn reset_password(&self, model: &ResetPasswordModel) -> OperationResult;
}
