//! Login and Google Authenticator management.
//!
//! Credentials are resolved by user name first and e-mail second. A second
//! factor is demanded when two-factor authentication is forced globally or
//! enabled for the account, and the account has an authenticator enabled.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};

use crate::domain::failure::settle;
use crate::domain::ports::{AuthApi, IdentityError, IdentityManager, Localizer, WritableOptions};
use crate::domain::two_factor::{TotpSecret, TotpVerifier, provisioning_uri};
use crate::domain::{
    ApplicationSettings, AuthorizeResult, GoogleAuthInfoModel, GoogleAuthenticatorModel,
    LoginModel, OperationDataResult, OperationResult, Role, ServiceFailure, UserAccount, UserId,
    join_errors, messages,
};

/// Authentication service implementing [`AuthApi`].
#[derive(Clone)]
pub struct AuthService {
    identity: Arc<dyn IdentityManager>,
    app_settings: Arc<dyn WritableOptions<ApplicationSettings>>,
    localizer: Arc<dyn Localizer>,
    verifier: TotpVerifier,
    issuer: String,
}

impl AuthService {
    /// `issuer` labels provisioned keys inside authenticator apps.
    pub fn new(
        identity: Arc<dyn IdentityManager>,
        app_settings: Arc<dyn WritableOptions<ApplicationSettings>>,
        localizer: Arc<dyn Localizer>,
        verifier: TotpVerifier,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            app_settings,
            localizer,
            verifier,
            issuer: issuer.into(),
        }
    }

    fn identity_unavailable(&self, operation: &'static str, err: IdentityError) -> ServiceFailure {
        error!(operation, error = %err, "identity store call failed");
        ServiceFailure::external(self.localizer.text(messages::UNKNOWN_ERROR))
    }

    fn bad_credentials(&self) -> ServiceFailure {
        ServiceFailure::validation(self.localizer.text(messages::INCORRECT_PASSWORD_OR_USER_NAME))
    }

    fn two_factor_forced(&self, operation: &'static str) -> Result<bool, ServiceFailure> {
        self.app_settings
            .value()
            .map(|settings| settings.is_two_factor_forced)
            .map_err(|err| {
                error!(operation, error = %err, "application settings unavailable");
                ServiceFailure::external(self.localizer.text(messages::CANT_OBTAIN_SETTINGS))
            })
    }

    async fn current_user(
        &self,
        operation: &'static str,
        user_id: &UserId,
    ) -> Result<UserAccount, ServiceFailure> {
        self.identity
            .find_by_id(user_id)
            .await
            .map_err(|err| self.identity_unavailable(operation, err))?
            .ok_or_else(|| ServiceFailure::not_found(self.localizer.text(messages::USER_NOT_FOUND)))
    }

    /// Resolve the login name and check the password.
    async fn verified_user(
        &self,
        operation: &'static str,
        model: &LoginModel,
    ) -> Result<UserAccount, ServiceFailure> {
        let credentials = model.credentials().map_err(|_| self.bad_credentials())?;
        let login = credentials.username();

        let by_name = self
            .identity
            .find_by_name(login)
            .await
            .map_err(|err| self.identity_unavailable(operation, err))?;
        let user = match by_name {
            Some(user) => user,
            None => self
                .identity
                .find_by_email(login)
                .await
                .map_err(|err| self.identity_unavailable(operation, err))?
                .ok_or_else(|| self.bad_credentials())?,
        };

        let valid = self
            .identity
            .check_password(&user.id, credentials.password())
            .await
            .map_err(|err| self.identity_unavailable(operation, err))?;
        if valid {
            Ok(user)
        } else {
            Err(self.bad_credentials())
        }
    }

    fn check_second_factor(&self, user: &UserAccount, code: Option<&str>) -> Result<(), ServiceFailure> {
        let Some(stored) = user
            .google_authenticator_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
        else {
            return Err(ServiceFailure::validation(
                self.localizer.text(messages::PSK_NOT_CONFIGURED),
            ));
        };
        let secret = TotpSecret::from_base32(stored).map_err(|err| {
            warn!(user_id = %user.id, error = %err, "stored authenticator key is unusable");
            ServiceFailure::validation(self.localizer.text(messages::PSK_NOT_CONFIGURED))
        })?;

        match code {
            Some(code) if self.verifier.verify(&secret, code) => Ok(()),
            _ => Err(ServiceFailure::validation(
                self.localizer.text(messages::INVALID_CODE),
            )),
        }
    }

    async fn authenticate(&self, model: &LoginModel) -> Result<AuthorizeResult, ServiceFailure> {
        let user = self.verified_user("authenticate_user", model).await?;

        let two_factor = self.two_factor_forced("authenticate_user")? || user.two_factor_enabled;
        if two_factor && user.google_authenticator_enabled {
            self.check_second_factor(&user, model.code())?;
        }

        let roles = self
            .identity
            .roles_of(&user.id)
            .await
            .map_err(|err| self.identity_unavailable("authenticate_user", err))?;
        let locale = user.locale().map(str::to_owned);
        Ok(AuthorizeResult {
            id: user.id,
            user_name: user.user_name,
            first_name: user.first_name,
            last_name: user.last_name,
            role: roles.into_iter().next(),
            locale,
        })
    }

    /// `admin` when held, otherwise the first known role.
    async fn held_role(&self, user_id: &UserId) -> Result<Option<Role>, IdentityError> {
        if self.identity.find_by_id(user_id).await?.is_none() {
            return Ok(None);
        }
        let roles: Vec<Role> = self
            .identity
            .roles_of(user_id)
            .await?
            .iter()
            .filter_map(|name| Role::parse(name))
            .collect();
        Ok(roles
            .contains(&Role::Admin)
            .then_some(Role::Admin)
            .or_else(|| roles.first().copied()))
    }

    async fn provision_authenticator(
        &self,
        model: &LoginModel,
    ) -> Result<GoogleAuthenticatorModel, ServiceFailure> {
        let mut user = self.verified_user("get_google_authenticator", model).await?;
        if user
            .google_authenticator_secret
            .as_deref()
            .is_some_and(|secret| !secret.trim().is_empty())
        {
            return Ok(GoogleAuthenticatorModel::default());
        }

        let secret = TotpSecret::generate();
        user.google_authenticator_secret = Some(secret.as_str().to_owned());
        self.store("get_google_authenticator", &user).await?;

        Ok(GoogleAuthenticatorModel {
            barcode: Some(provisioning_uri(&self.issuer, &user.email, secret.as_str())),
            psk: Some(secret.as_str().to_owned()),
        })
    }

    async fn store(&self, operation: &'static str, user: &UserAccount) -> Result<(), ServiceFailure> {
        self.identity.update(user).await.map_err(|err| match err {
            IdentityError::Rejected { errors } => {
                ServiceFailure::validation(join_errors(&errors, " "))
            }
            other => self.identity_unavailable(operation, other),
        })
    }

    async fn authenticator_info(&self, user_id: &UserId) -> Result<GoogleAuthInfoModel, ServiceFailure> {
        let user = self
            .current_user("get_google_authenticator_info", user_id)
            .await?;
        Ok(GoogleAuthInfoModel {
            psk: user.google_authenticator_secret,
            is_two_factor_enabled: user.two_factor_enabled,
        })
    }

    async fn set_authenticator_enabled(
        &self,
        user_id: &UserId,
        model: &GoogleAuthInfoModel,
    ) -> Result<String, ServiceFailure> {
        const OPERATION: &str = "update_google_authenticator_info";
        let mut user = self.current_user(OPERATION, user_id).await?;
        user.two_factor_enabled = model.is_two_factor_enabled;
        user.google_authenticator_enabled = model.is_two_factor_enabled;
        self.store(OPERATION, &user).await?;
        Ok(self.localizer.text(messages::GOOGLE_AUTHENTICATOR_UPDATED))
    }

    async fn clear_authenticator(&self, user_id: &UserId) -> Result<String, ServiceFailure> {
        const OPERATION: &str = "delete_google_authenticator_info";
        let mut user = self.current_user(OPERATION, user_id).await?;
        user.google_authenticator_secret = None;
        user.google_authenticator_enabled = false;
        self.store(OPERATION, &user).await?;
        Ok(self.localizer.text(messages::GOOGLE_AUTHENTICATOR_REMOVED))
    }
}

#[async_trait]
impl AuthApi for AuthService {
    async fn current_role(&self, user_id: &UserId) -> Option<Role> {
        match self.held_role(user_id).await {
            Ok(role) => role,
            Err(err) => {
                error!(operation = "current_role", error = %err, "identity store call failed");
                None
            }
        }
    }

    async fn authenticate_user(&self, model: &LoginModel) -> OperationDataResult<AuthorizeResult> {
        settle("authenticate_user", self.authenticate(model).await).into()
    }

    async fn log_out(&self, user_id: &UserId) -> OperationResult {
        let result = self.current_user("log_out", user_id).await.map(|_| ());
        settle("log_out", result).into()
    }

    async fn get_google_authenticator(
        &self,
        model: &LoginModel,
    ) -> OperationDataResult<GoogleAuthenticatorModel> {
        settle(
            "get_google_authenticator",
            self.provision_authenticator(model).await,
        )
        .into()
    }

    async fn get_google_authenticator_info(
        &self,
        user_id: &UserId,
    ) -> OperationDataResult<GoogleAuthInfoModel> {
        settle(
            "get_google_authenticator_info",
            self.authenticator_info(user_id).await,
        )
        .into()
    }

    async fn update_google_authenticator_info(
        &self,
        user_id: &UserId,
        model: &GoogleAuthInfoModel,
    ) -> OperationResult {
        OperationResult::from_message(settle(
            "update_google_authenticator_info",
            self.set_authenticator_enabled(user_id, model).await,
        ))
    }

    async fn delete_google_authenticator_info(&self, user_id: &UserId) -> OperationResult {
        OperationResult::from_message(settle(
            "delete_google_authenticator_info",
            self.clear_authenticator(user_id).await,
        ))
    }

    async fn two_factor_auth_force_info(&self) -> OperationDataResult<bool> {
        settle(
            "two_factor_auth_force_info",
            self.two_factor_forced("two_factor_auth_force_info"),
        )
        .into()
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
