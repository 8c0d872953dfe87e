//! Port for the identity/membership collaborator.
//!
//! The identity store owns user accounts, password hashes, roles and reset
//! tokens. Rejections (password policy, duplicate names, bad tokens) are
//! reported as [`IdentityError::Rejected`] with one message per violation so
//! services can join them into a single user-facing message.

use async_trait::async_trait;

use crate::domain::{Role, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity store adapters.
    pub enum IdentityError {
        /// The store refused the operation.
        Rejected { errors: Vec<String> } =>
            "identity store rejected the request: {errors:?}",
        /// The store could not be reached or failed internally.
        Unavailable { message: String } =>
            "identity store unavailable: {message}",
    }
}

impl IdentityError {
    /// Convenience constructor for a single rejection message.
    pub fn rejected_with(message: impl Into<String>) -> Self {
        Self::Rejected {
            errors: vec![message.into()],
        }
    }

    /// Messages describing the failure, one per violation.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Rejected { errors } => errors.clone(),
            Self::Unavailable { message } => vec![message.clone()],
        }
    }
}

/// Port for account, role and credential management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityManager: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, IdentityError>;

    /// Lookup by user name, ignoring ASCII case.
    async fn find_by_name(&self, user_name: &str) -> Result<Option<UserAccount>, IdentityError>;

    /// Lookup by e-mail address, ignoring ASCII case.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, IdentityError>;

    /// Every account, in creation order.
    async fn list(&self) -> Result<Vec<UserAccount>, IdentityError>;

    /// Persist a new account with the given password and return it as stored.
    async fn create(
        &self,
        account: &UserAccount,
        password: &str,
    ) -> Result<UserAccount, IdentityError>;

    /// Overwrite the stored account with the same id.
    async fn update(&self, account: &UserAccount) -> Result<(), IdentityError>;

    async fn delete(&self, id: &UserId) -> Result<(), IdentityError>;

    async fn role_exists(&self, role: Role) -> Result<bool, IdentityError>;

    async fn create_role(&self, role: Role) -> Result<(), IdentityError>;

    /// Role names assigned to the user, in assignment order.
    async fn roles_of(&self, id: &UserId) -> Result<Vec<String>, IdentityError>;

    async fn add_to_role(&self, id: &UserId, role: Role) -> Result<(), IdentityError>;

    async fn remove_from_role(&self, id: &UserId, role: Role) -> Result<(), IdentityError>;

    async fn users_in_role(&self, role: Role) -> Result<Vec<UserAccount>, IdentityError>;

    /// Whether `password` matches the stored hash. Accounts without a
    /// password never match.
    async fn check_password(&self, id: &UserId, password: &str) -> Result<bool, IdentityError>;

    async fn change_password(
        &self,
        id: &UserId,
        current: &str,
        new_password: &str,
    ) -> Result<(), IdentityError>;

    async fn remove_password(&self, id: &UserId) -> Result<(), IdentityError>;

    /// Set a password on an account that currently has none.
    async fn add_password(&self, id: &UserId, password: &str) -> Result<(), IdentityError>;

    /// Issue a single-use token for [`IdentityManager::reset_password`].
    async fn generate_password_reset_token(&self, id: &UserId) -> Result<String, IdentityError>;

    async fn reset_password(
        &self,
        id: &UserId,
        token: &str,
        new_password: &str,
    ) -> Result<(), IdentityError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rejected_keeps_every_message() {
        let error = IdentityError::rejected(vec!["too short".to_owned(), "needs digit".to_owned()]);
        assert_eq!(error.messages(), ["too short", "needs digit"]);
    }

    #[rstest]
    fn unavailable_reports_its_message() {
        let error = IdentityError::unavailable("store offline");
        assert_eq!(error.messages(), ["store offline"]);
        assert_eq!(error.to_string(), "identity store unavailable: store offline");
    }
}
