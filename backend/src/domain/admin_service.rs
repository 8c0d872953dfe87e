//! User administration for the `admin` role.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::domain::failure::settle;
use crate::domain::ports::{AdminApi, IdentityError, IdentityManager, Localizer, WritableOptions};
use crate::domain::{
    ApplicationSettings, OperationDataResult, OperationResult, Pagination, Role, ServiceFailure,
    UserAccount, UserId, UserInfo, UserInfoList, UserRegisterModel, join_errors, messages,
};

/// Administration service implementing [`AdminApi`].
#[derive(Clone)]
pub struct AdminService {
    identity: Arc<dyn IdentityManager>,
    app_settings: Arc<dyn WritableOptions<ApplicationSettings>>,
    localizer: Arc<dyn Localizer>,
}

impl AdminService {
    pub fn new(
        identity: Arc<dyn IdentityManager>,
        app_settings: Arc<dyn WritableOptions<ApplicationSettings>>,
        localizer: Arc<dyn Localizer>,
    ) -> Self {
        Self {
            identity,
            app_settings,
            localizer,
        }
    }

    /// Rejections become `key` formatted with the joined messages; store
    /// outages are logged and reported as an unknown error.
    fn identity_failure(
        &self,
        operation: &'static str,
        key: &str,
        err: IdentityError,
    ) -> ServiceFailure {
        match err {
            IdentityError::Rejected { errors } => ServiceFailure::validation(
                self.localizer.localize(key, &[join_errors(&errors, " ")]),
            ),
            IdentityError::Unavailable { message } => {
                error!(operation, error = %message, "identity store call failed");
                ServiceFailure::external(self.localizer.text(messages::UNKNOWN_ERROR))
            }
        }
    }

    fn unknown_role(&self, key: &str, role: &str) -> ServiceFailure {
        ServiceFailure::validation(
            self.localizer
                .localize(key, &[format!("unknown role '{role}'")]),
        )
    }

    async fn require_user(
        &self,
        operation: &'static str,
        user_id: &UserId,
        failure_key: &str,
    ) -> Result<UserAccount, ServiceFailure> {
        self.identity
            .find_by_id(user_id)
            .await
            .map_err(|err| self.identity_failure(operation, failure_key, err))?
            .ok_or_else(|| ServiceFailure::not_found(self.localizer.text(messages::USER_NOT_FOUND)))
    }

    async fn first_role(
        &self,
        operation: &'static str,
        user_id: &UserId,
        failure_key: &str,
    ) -> Result<Option<String>, ServiceFailure> {
        let roles = self
            .identity
            .roles_of(user_id)
            .await
            .map_err(|err| self.identity_failure(operation, failure_key, err))?;
        Ok(roles.into_iter().next())
    }

    /// Whether another account already uses the name or e-mail.
    async fn name_or_email_taken(
        &self,
        operation: &'static str,
        model: &UserRegisterModel,
        failure_key: &str,
    ) -> Result<bool, ServiceFailure> {
        let by_name = self
            .identity
            .find_by_name(model.user_name.trim())
            .await
            .map_err(|err| self.identity_failure(operation, failure_key, err))?;
        let by_email = self
            .identity
            .find_by_email(model.email.trim())
            .await
            .map_err(|err| self.identity_failure(operation, failure_key, err))?;
        Ok(by_name
            .into_iter()
            .chain(by_email)
            .any(|existing| Some(&existing.id) != model.id.as_ref()))
    }

    async fn register(&self, model: &UserRegisterModel) -> Result<String, ServiceFailure> {
        const KEY: &str = messages::ERROR_WHILE_CREATING_USER;
        let role = match model.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            None => Role::User,
            Some(raw) => Role::parse(raw).ok_or_else(|| self.unknown_role(KEY, raw))?,
        };
        if self.name_or_email_taken("create_user", model, KEY).await? {
            return Err(ServiceFailure::conflict(
                self.localizer.text(messages::USER_NAME_ALREADY_EXIST),
            ));
        }

        let mut account = UserAccount::new(
            model.user_name.trim(),
            model.email.trim(),
            model.first_name.trim(),
            model.last_name.trim(),
        );
        account.email_confirmed = true;
        let password = model.password.as_deref().unwrap_or_default();
        let created = self
            .identity
            .create(&account, password)
            .await
            .map_err(|err| self.identity_failure("create_user", KEY, err))?;
        self.identity
            .add_to_role(&created.id, role)
            .await
            .map_err(|err| self.identity_failure("create_user", KEY, err))?;

        Ok(self
            .localizer
            .localize(messages::USER_CREATED, &[created.user_name]))
    }

    async fn remove(&self, actor: &UserId, user_id: &UserId) -> Result<String, ServiceFailure> {
        const KEY: &str = messages::ERROR_WHILE_DELETING_USER;
        let user = self.require_user("delete_user", user_id, KEY).await?;
        if actor == user_id {
            return Err(ServiceFailure::conflict(
                self.localizer.text(messages::CANT_DELETE_YOURSELF),
            ));
        }
        self.identity.delete(&user.id).await.map_err(|err| {
            error!(operation = "delete_user", error = %err, "identity store call failed");
            ServiceFailure::external(self.localizer.text(KEY))
        })?;
        Ok(self
            .localizer
            .localize(messages::USER_DELETED, &[user.user_name]))
    }

    fn obtain_failed(&self, err: IdentityError) -> ServiceFailure {
        error!(operation = "get_all_users", error = %err, "identity store call failed");
        ServiceFailure::external(self.localizer.text(messages::ERROR_WHILE_OBTAIN_USERS))
    }

    async fn list(&self, pagination: &Pagination) -> Result<UserInfoList, ServiceFailure> {
        let mut users = self
            .identity
            .list()
            .await
            .map_err(|err| self.obtain_failed(err))?;

        if let Some(filter) = pagination
            .name_filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
        {
            let needle = filter.to_lowercase();
            users.retain(|user| matches_filter(user, &needle));
        }
        sort_users(&mut users, pagination.sort.as_deref(), pagination.is_sort_dsc);

        let total = users.len();
        let mut page = Vec::new();
        for user in users
            .into_iter()
            .skip(pagination.offset)
            .take(pagination.page_size)
        {
            let roles = self
                .identity
                .roles_of(&user.id)
                .await
                .map_err(|err| self.obtain_failed(err))?;
            page.push(UserInfo {
                id: user.id,
                email: user.email,
                first_name: user.first_name,
                last_name: user.last_name,
                role: roles.into_iter().next(),
            });
        }

        Ok(UserInfoList { total, users: page })
    }

    async fn load(&self, user_id: &UserId) -> Result<UserRegisterModel, ServiceFailure> {
        const KEY: &str = messages::UNKNOWN_ERROR;
        let user = self.require_user("get_user", user_id, KEY).await?;
        let role = self.first_role("get_user", &user.id, KEY).await?;
        Ok(UserRegisterModel {
            id: Some(user.id),
            user_name: user.user_name,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role,
            password: None,
        })
    }

    async fn modify(&self, model: &UserRegisterModel) -> Result<String, ServiceFailure> {
        const KEY: &str = messages::ERROR_WHILE_UPDATING_USER;
        let Some(user_id) = model.id.as_ref() else {
            return Err(ServiceFailure::not_found(
                self.localizer.text(messages::USER_NOT_FOUND),
            ));
        };
        let mut user = self.require_user("update_user", user_id, KEY).await?;
        let role = match model.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            None => None,
            Some(raw) => Some(Role::parse(raw).ok_or_else(|| self.unknown_role(KEY, raw))?),
        };
        if self.name_or_email_taken("update_user", model, KEY).await? {
            return Err(ServiceFailure::conflict(
                self.localizer.text(messages::USER_NAME_ALREADY_EXIST),
            ));
        }

        user.user_name = model.user_name.trim().to_owned();
        user.email = model.email.trim().to_owned();
        user.first_name = model.first_name.trim().to_owned();
        user.last_name = model.last_name.trim().to_owned();
        self.identity
            .update(&user)
            .await
            .map_err(|err| self.identity_failure("update_user", KEY, err))?;

        if let Some(role) = role {
            self.replace_roles(&user.id, role, KEY).await?;
        }

        if let Some(password) = model.password.as_deref().filter(|p| !p.is_empty()) {
            self.identity
                .remove_password(&user.id)
                .await
                .map_err(|err| self.identity_failure("update_user", KEY, err))?;
            self.identity
                .add_password(&user.id, password)
                .await
                .map_err(|err| self.identity_failure("update_user", KEY, err))?;
        }

        Ok(self
            .localizer
            .localize(messages::USER_UPDATED, &[user.user_name]))
    }

    async fn replace_roles(
        &self,
        user_id: &UserId,
        role: Role,
        key: &str,
    ) -> Result<(), ServiceFailure> {
        let current = self
            .identity
            .roles_of(user_id)
            .await
            .map_err(|err| self.identity_failure("update_user", key, err))?;
        for existing in current.iter().filter_map(|name| Role::parse(name)) {
            if existing != role {
                self.identity
                    .remove_from_role(user_id, existing)
                    .await
                    .map_err(|err| self.identity_failure("update_user", key, err))?;
            }
        }
        if !current.iter().any(|name| Role::parse(name) == Some(role)) {
            self.identity
                .add_to_role(user_id, role)
                .await
                .map_err(|err| self.identity_failure("update_user", key, err))?;
        }
        Ok(())
    }

    fn set_two_factor_force(&self, forced: bool) -> Result<String, ServiceFailure> {
        self.app_settings
            .update(&mut |settings| settings.is_two_factor_forced = forced)
            .map_err(|err| {
                error!(operation = "two_factor_auth_force", error = %err, "settings update failed");
                ServiceFailure::external(self.localizer.text(messages::CANT_UPDATE_SETTINGS))
            })?;
        let key = if forced {
            messages::TWO_FACTOR_FORCE_ENABLED
        } else {
            messages::TWO_FACTOR_FORCE_DISABLED
        };
        Ok(self.localizer.text(key))
    }
}

fn matches_filter(user: &UserAccount, needle: &str) -> bool {
    [
        user.user_name.as_str(),
        user.email.as_str(),
        &user.full_name(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Stable sort by a known column; unknown columns keep the stored order.
fn sort_users(users: &mut [UserAccount], column: Option<&str>, descending: bool) {
    let key: Option<fn(&UserAccount) -> String> = match column.map(str::trim) {
        Some("userName") => Some(|user| user.user_name.to_lowercase()),
        Some("email") => Some(|user| user.email.to_lowercase()),
        Some("firstName") => Some(|user| user.first_name.to_lowercase()),
        Some("lastName") => Some(|user| user.last_name.to_lowercase()),
        _ => None,
    };
    if let Some(key) = key {
        users.sort_by_cached_key(key);
    }
    if descending {
        users.reverse();
    }
}

#[async_trait]
impl AdminApi for AdminService {
    async fn create_user(&self, model: &UserRegisterModel) -> OperationResult {
        OperationResult::from_message(settle("create_user", self.register(model).await))
    }

    async fn delete_user(&self, actor: &UserId, user_id: &UserId) -> OperationResult {
        OperationResult::from_message(settle("delete_user", self.remove(actor, user_id).await))
    }

    async fn get_all_users(&self, pagination: &Pagination) -> OperationDataResult<UserInfoList> {
        settle("get_all_users", self.list(pagination).await).into()
    }

    async fn get_user(&self, user_id: &UserId) -> OperationDataResult<UserRegisterModel> {
        settle("get_user", self.load(user_id).await).into()
    }

    async fn update_user(&self, model: &UserRegisterModel) -> OperationResult {
        OperationResult::from_message(settle("update_user", self.modify(model).await))
    }

    async fn enable_two_factor_auth_force(&self) -> OperationResult {
        OperationResult::from_message(settle(
            "enable_two_factor_auth_force",
            self.set_two_factor_force(true),
        ))
    }

    async fn disable_two_factor_auth_force(&self) -> OperationResult {
        OperationResult::from_message(settle(
            "disable_two_factor_auth_force",
            self.set_two_factor_force(false),
        ))
    }
}

#[cfg(test)]
#[path = "admin_service_tests.rs"]
mod tests;
