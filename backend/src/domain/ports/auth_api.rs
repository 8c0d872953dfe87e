//! Driving port for login and Google Authenticator management.
//!
//! Session handling stays in the inbound adapter: a successful
//! [`AuthApi::authenticate_user`] returns the identity to remember and
//! [`AuthApi::log_out`] only validates the user.

use async_trait::async_trait;

use crate::domain::{
    AuthorizeResult, GoogleAuthInfoModel, GoogleAuthenticatorModel, LoginModel,
    OperationDataResult, OperationResult, Role, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn authenticate_user(&self, model: &LoginModel) -> OperationDataResult<AuthorizeResult>;

    async fn log_out(&self, user_id: &UserId) -> OperationResult;

    /// Verify credentials and provision an authenticator key when none exists.
    async fn get_google_authenticator(
        &self,
        model: &LoginModel,
    ) -> OperationDataResult<GoogleAuthenticatorModel>;

    async fn get_google_authenticator_info(
        &self,
        user_id: &UserId,
    ) -> OperationDataResult<GoogleAuthInfoModel>;

    async fn update_google_authenticator_info(
        &self,
        user_id: &UserId,
        model: &GoogleAuthInfoModel,
    ) -> OperationResult;

    async fn delete_google_authenticator_info(&self, user_id: &UserId) -> OperationResult;

    /// Whether two-factor authentication is forced for every user.
    async fn two_factor_auth_force_info(&self) -> OperationDataResult<bool>;

    /// Role the account holds right now; `None` once the account is gone or
    /// the identity store cannot answer.
    async fn current_role(&self, user_id: &UserId) -> Option<Role>;
}
