//! Driving port for user administration.

use async_trait::async_trait;

use crate::domain::{
    OperationDataResult, OperationResult, Pagination, UserId, UserInfoList, UserRegisterModel,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Create an account and assign its role (`user` when none is given).
    async fn create_user(&self, model: &UserRegisterModel) -> OperationResult;

    /// Delete `user_id` on behalf of `actor`; an actor cannot delete itself.
    async fn delete_user(&self, actor: &UserId, user_id: &UserId) -> OperationResult;

    async fn get_all_users(&self, pagination: &Pagination) -> OperationDataResult<UserInfoList>;

    /// Account details without the password.
    async fn get_user(&self, user_id: &UserId) -> OperationDataResult<UserRegisterModel>;

    async fn update_user(&self, model: &UserRegisterModel) -> OperationResult;

    async fn enable_two_factor_auth_force(&self) -> OperationResult;

    async fn disable_two_factor_auth_force(&self) -> OperationResult;
}
