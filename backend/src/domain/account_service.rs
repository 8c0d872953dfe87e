//! Account self-service: profile, locale, passwords.
//!
//! Implements [`AccountApi`] on top of the identity store, the application
//! settings group, the localizer and the e-mail sender.

use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{error, warn};

use crate::domain::failure::settle;
use crate::domain::ports::{
    AccountApi, EmailMessage, EmailSender, IdentityError, IdentityManager, Localizer,
    WritableOptions,
};
use crate::domain::{
    ApplicationSettings, ChangePasswordModel, FALLBACK_LOCALE, FailureKind, ForgotPasswordModel,
    OperationDataResult, OperationResult, ResetPasswordModel, Role, ServiceFailure, UserAccount,
    UserId, UserInfo, UserSettingsModel, join_errors, messages,
};

/// Account service implementing [`AccountApi`].
#[derive(Clone)]
pub struct AccountService {
    identity: Arc<dyn IdentityManager>,
    app_settings: Arc<dyn WritableOptions<ApplicationSettings>>,
    localizer: Arc<dyn Localizer>,
    email: Arc<dyn EmailSender>,
}

impl AccountService {
    pub fn new(
        identity: Arc<dyn IdentityManager>,
        app_settings: Arc<dyn WritableOptions<ApplicationSettings>>,
        localizer: Arc<dyn Localizer>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            identity,
            app_settings,
            localizer,
            email,
        }
    }

    fn identity_unavailable(&self, operation: &'static str, err: IdentityError) -> ServiceFailure {
        error!(operation, error = %err, "identity store call failed");
        ServiceFailure::external(self.localizer.text(messages::UNKNOWN_ERROR))
    }

    /// Map a rejection to its joined messages and anything else to a
    /// generic failure.
    fn identity_rejection(
        &self,
        operation: &'static str,
        err: IdentityError,
        separator: &str,
    ) -> ServiceFailure {
        match err {
            IdentityError::Rejected { errors } => {
                ServiceFailure::validation(join_errors(&errors, separator))
            }
            other => self.identity_unavailable(operation, other),
        }
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

    fn application_settings(&self, operation: &'static str) -> Result<ApplicationSettings, ServiceFailure> {
        self.app_settings.value().map_err(|err| {
            error!(operation, error = %err, "application settings unavailable");
            ServiceFailure::external(self.localizer.text(messages::CANT_OBTAIN_SETTINGS))
        })
    }

    async fn load_user_info(&self, user_id: &UserId) -> Result<UserInfo, ServiceFailure> {
        let user = self.current_user("user_info", user_id).await?;
        let roles = self
            .identity
            .roles_of(&user.id)
            .await
            .map_err(|err| self.identity_unavailable("user_info", err))?;
        Ok(UserInfo {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: roles.into_iter().next(),
        })
    }

    async fn load_user_settings(
        &self,
        user_id: &UserId,
    ) -> Result<UserSettingsModel, ServiceFailure> {
        let user = self.current_user("user_settings", user_id).await?;
        if let Some(locale) = user.locale() {
            return Ok(UserSettingsModel {
                locale: locale.to_owned(),
            });
        }

        let locale = match self.app_settings.value() {
            Ok(settings) => settings.default_locale_or_fallback().to_owned(),
            Err(err) => {
                warn!(error = %err, "application settings unavailable, using fallback locale");
                FALLBACK_LOCALE.to_owned()
            }
        };
        Ok(UserSettingsModel { locale })
    }

    async fn apply_user_settings(
        &self,
        user_id: &UserId,
        model: &UserSettingsModel,
    ) -> Result<(), ServiceFailure> {
        let mut user = self.current_user("update_user_settings", user_id).await?;
        user.locale = Some(model.locale.clone());
        self.identity.update(&user).await.map_err(|err| match err {
            IdentityError::Rejected { errors } => ServiceFailure::validation(self.localizer.localize(
                messages::ERROR_WHILE_UPDATING_USER_SETTINGS,
                &[join_errors(&errors, ", ")],
            )),
            other => self.identity_unavailable("update_user_settings", other),
        })
    }

    async fn apply_password_change(
        &self,
        user_id: &UserId,
        model: &ChangePasswordModel,
    ) -> Result<(), ServiceFailure> {
        let user = self.current_user("change_password", user_id).await?;
        self.identity
            .change_password(&user.id, &model.old_password, &model.new_password)
            .await
            .map_err(|err| self.identity_rejection("change_password", err, " "))
    }

    async fn send_restore_link(&self, model: &ForgotPasswordModel) -> Result<(), ServiceFailure> {
        let Some(user) = self
            .identity
            .find_by_email(model.email.trim())
            .await
            .map_err(|err| self.identity_unavailable("forgot_password", err))?
        else {
            return Err(ServiceFailure::silent(FailureKind::NotFound));
        };

        let token = self
            .identity
            .generate_password_reset_token(&user.id)
            .await
            .map_err(|err| self.identity_unavailable("forgot_password", err))?;
        let site_link = self.application_settings("forgot_password")?.site_link;
        let link = restore_link(&site_link, &user.id, &token);

        let message = EmailMessage {
            to: user.email.clone(),
            subject: self.localizer.text(messages::PASSWORD_RESET_EMAIL_SUBJECT),
            html_body: self
                .localizer
                .localize(messages::PASSWORD_RESET_EMAIL_BODY, &[link]),
        };
        self.email.send(&message).await.map_err(|err| {
            error!(error = %err, user_id = %user.id, "password reset e-mail failed");
            ServiceFailure::external(self.localizer.text(messages::UNKNOWN_ERROR))
        })
    }

    async fn restore_admin_password(&self, code: &str) -> Result<String, ServiceFailure> {
        let settings = self.application_settings("reset_admin_password")?;
        if settings.security_code.is_empty() {
            return Err(ServiceFailure::validation(
                self.localizer.text(messages::PLEASE_SETUP_SECURITY_CODE),
            ));
        }
        if !security_codes_match(code, &settings.security_code) {
            return Err(ServiceFailure::validation(
                self.localizer.text(messages::INVALID_SECURITY_CODE),
            ));
        }

        let admin = self
            .identity
            .users_in_role(Role::Admin)
            .await
            .map_err(|err| self.identity_unavailable("reset_admin_password", err))?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ServiceFailure::not_found(self.localizer.text(messages::ADMIN_USER_NOT_FOUND))
            })?;

        self.identity
            .remove_password(&admin.id)
            .await
            .map_err(|err| self.password_step_failure(messages::ERROR_WHILE_REMOVING_OLD_PASSWORD, err))?;
        self.identity
            .add_password(&admin.id, &settings.default_password)
            .await
            .map_err(|err| self.password_step_failure(messages::ERROR_WHILE_ADD_NEW_PASSWORD, err))?;

        Ok(self
            .localizer
            .localize(messages::PASSWORD_HAS_BEEN_RESET, &[admin.email]))
    }

    fn password_step_failure(&self, key: &str, err: IdentityError) -> ServiceFailure {
        match err {
            IdentityError::Rejected { errors } => ServiceFailure::external(format!(
                "{}. \n{}",
                self.localizer.text(key),
                join_errors(&errors, " ")
            )),
            unavailable @ IdentityError::Unavailable { .. } => {
                self.identity_unavailable("reset_admin_password", unavailable)
            }
        }
    }

    async fn apply_password_reset(&self, model: &ResetPasswordModel) -> Result<(), ServiceFailure> {
        let Ok(user_id) = UserId::new(model.user_id.trim()) else {
            return Err(ServiceFailure::silent(FailureKind::NotFound));
        };
        let Some(user) = self
            .identity
            .find_by_id(&user_id)
            .await
            .map_err(|err| self.identity_unavailable("reset_password", err))?
        else {
            return Err(ServiceFailure::silent(FailureKind::NotFound));
        };

        self.identity
            .reset_password(&user.id, &model.code, &model.password)
            .await
            .map_err(|err| self.identity_rejection("reset_password", err, " "))
    }
}

fn restore_link(site_link: &str, user_id: &UserId, token: &str) -> String {
    format!(
        "{}/login/restore-password?userId={user_id}&code={}",
        site_link.trim_end_matches('/'),
        urlencoding::encode(token)
    )
}

/// Compare SHA-256 digests in constant time so the comparison does not leak
/// how much of the code matched.
fn security_codes_match(candidate: &str, expected: &str) -> bool {
    let candidate = Sha256::digest(candidate.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    candidate
        .iter()
        .zip(expected.iter())
        .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[async_trait]
impl AccountApi for AccountService {
    async fn user_info(&self, user_id: &UserId) -> OperationDataResult<UserInfo> {
        settle("user_info", self.load_user_info(user_id).await).into()
    }

    async fn user_settings(&self, user_id: &UserId) -> OperationDataResult<UserSettingsModel> {
        settle("user_settings", self.load_user_settings(user_id).await).into()
    }

    async fn update_user_settings(
        &self,
        user_id: &UserId,
        model: &UserSettingsModel,
    ) -> OperationResult {
        settle(
            "update_user_settings",
            self.apply_user_settings(user_id, model).await,
        )
        .into()
    }

    async fn change_password(
        &self,
        user_id: &UserId,
        model: &ChangePasswordModel,
    ) -> OperationResult {
        settle(
            "change_password",
            self.apply_password_change(user_id, model).await,
        )
        .into()
    }

    async fn forgot_password(&self, model: &ForgotPasswordModel) -> OperationResult {
        settle("forgot_password", self.send_restore_link(model).await).into()
    }

    async fn reset_admin_password(&self, code: &str) -> OperationResult {
        OperationResult::from_message(settle(
            "reset_admin_password",
            self.restore_admin_password(code).await,
        ))
    }

    async fn reset_password(&self, model: &ResetPasswordModel) -> OperationResult {
        settle("reset_password", self.apply_password_reset(model).await).into()
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
