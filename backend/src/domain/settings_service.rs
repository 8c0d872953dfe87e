//! Application settings and the one-off initial setup.
//!
//! Settings groups are reached through explicit [`WritableOptions`] handles
//! bundled in [`SettingsStores`]. Initial setup validates the SDK connection,
//! migrates the primary store, seeds roles and the first administrator,
//! prepares the SDK database and finally persists the connection strings.
//! Stages are not rolled back: a failure late in the flow leaves the effects
//! of earlier stages in place, and because the connection strings are written
//! last the flow can be retried.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::failure::settle;
use crate::domain::ports::{
    CoreError, CoreProvider, IdentityError, IdentityManager, Localizer, PrimaryStoreBootstrap,
    SdkAdminConnector, SettingsApi, SettingsStoreError, WritableOptions,
};
use crate::domain::{
    AdminSettingsModel, AdminSetupModel, ApplicationSettings, ConnectionStrings, EmailSettings,
    FALLBACK_LOCALE, HeaderSettings, InitialSettingsModel, LoginPageSettings, OperationDataResult,
    OperationResult, PageSettings, PageSettingsModel, Role, ServiceFailure, SmtpSettingsModel,
    UserAccount, messages,
};

/// Handles to every persisted settings group.
#[derive(Clone)]
pub struct SettingsStores {
    pub connection_strings: Arc<dyn WritableOptions<ConnectionStrings>>,
    pub application: Arc<dyn WritableOptions<ApplicationSettings>>,
    pub login_page: Arc<dyn WritableOptions<LoginPageSettings>>,
    pub header: Arc<dyn WritableOptions<HeaderSettings>>,
    pub email: Arc<dyn WritableOptions<EmailSettings>>,
}

/// Collaborators only needed by initial setup.
#[derive(Clone)]
pub struct SetupCollaborators {
    pub sdk_admin: Arc<dyn SdkAdminConnector>,
    pub primary_store: Arc<dyn PrimaryStoreBootstrap>,
}

/// Settings service implementing [`SettingsApi`].
#[derive(Clone)]
pub struct SettingsService {
    stores: SettingsStores,
    setup: SetupCollaborators,
    core: Arc<dyn CoreProvider>,
    localizer: Arc<dyn Localizer>,
}

impl SettingsService {
    pub fn new(
        stores: SettingsStores,
        setup: SetupCollaborators,
        core: Arc<dyn CoreProvider>,
        localizer: Arc<dyn Localizer>,
    ) -> Self {
        Self {
            stores,
            setup,
            core,
            localizer,
        }
    }

    fn read_failed(&self, operation: &'static str, err: SettingsStoreError) -> ServiceFailure {
        error!(operation, error = %err, "settings could not be read");
        ServiceFailure::external(self.localizer.text(messages::CANT_OBTAIN_SETTINGS))
    }

    fn write_failed(&self, operation: &'static str, err: impl fmt::Display) -> ServiceFailure {
        error!(operation, error = %err, "settings could not be updated");
        ServiceFailure::external(self.localizer.text(messages::CANT_UPDATE_SETTINGS))
    }

    fn stage_failed(&self, stage: &'static str, key: &str, err: impl fmt::Display) -> ServiceFailure {
        error!(stage, error = %err, "initial setup stage failed");
        ServiceFailure::external(self.localizer.text(key))
    }

    fn connection_configured(&self) -> Result<(), ServiceFailure> {
        let strings = self
            .stores
            .connection_strings
            .value()
            .map_err(|err| self.read_failed("connection_string_exist", err))?;
        if strings.is_configured() {
            Ok(())
        } else {
            Err(ServiceFailure::not_found(
                self.localizer.text(messages::CONNECTION_STRING_DOES_NOT_EXIST),
            ))
        }
    }

    fn resolve_default_locale(&self) -> String {
        match self.stores.application.value() {
            Ok(settings) => settings.default_locale_or_fallback().to_owned(),
            Err(err) => {
                error!(error = %err, "application settings unreadable, using fallback locale");
                FALLBACK_LOCALE.to_owned()
            }
        }
    }

    async fn run_initial_setup(&self, model: &InitialSettingsModel) -> Result<(), ServiceFailure> {
        let existing = self
            .stores
            .connection_strings
            .value()
            .map_err(|err| self.read_failed("update_connection_string", err))?;
        if existing.is_configured() {
            return Err(ServiceFailure::conflict(
                self.localizer.text(messages::CONNECTION_STRING_ALREADY_EXIST),
            ));
        }

        let sdk_connection = model.connection_string_sdk.connection_string();
        let main_connection = model.connection_string_main.connection_string();

        let sdk_admin = self
            .setup
            .sdk_admin
            .connect(&sdk_connection)
            .await
            .map_err(|err| {
                self.stage_failed("sdk_connect", messages::SDK_CONNECTION_STRING_IS_INVALID, err)
            })?;

        let identity = self
            .setup
            .primary_store
            .migrate(&main_connection)
            .await
            .map_err(|err| {
                self.stage_failed("migrate", messages::MAIN_CONNECTION_STRING_IS_INVALID, err)
            })?;
        self.ensure_roles(identity.as_ref()).await?;
        self.ensure_admin(identity.as_ref(), &model.admin_setup_model)
            .await?;

        sdk_admin
            .db_setup(&model.connection_string_sdk.token)
            .await
            .map_err(|err| self.stage_failed("sdk_setup", messages::SDK_SETUP_FAILED, err))?;

        self.stores
            .connection_strings
            .update(&mut |strings| {
                strings.sdk_connection.clone_from(&sdk_connection);
                strings.default_connection.clone_from(&main_connection);
            })
            .map_err(|err| {
                self.stage_failed("persist", messages::COULD_NOT_WRITE_CONNECTION_STRING, err)
            })?;
        let locale = model.general_app_setup.default_locale.trim().to_owned();
        self.stores
            .application
            .update(&mut |settings| settings.default_locale.clone_from(&locale))
            .map_err(|err| {
                self.stage_failed("persist", messages::COULD_NOT_WRITE_CONNECTION_STRING, err)
            })?;

        info!(admin = %model.admin_setup_model.user_name, "initial setup completed");
        Ok(())
    }

    async fn ensure_roles(&self, identity: &dyn IdentityManager) -> Result<(), ServiceFailure> {
        let failed =
            |err: IdentityError| self.stage_failed("roles", messages::MAIN_CONNECTION_STRING_IS_INVALID, err);
        for role in Role::ALL {
            if !identity.role_exists(role).await.map_err(failed)? {
                identity.create_role(role).await.map_err(failed)?;
            }
        }
        Ok(())
    }

    async fn ensure_admin(
        &self,
        identity: &dyn IdentityManager,
        admin: &AdminSetupModel,
    ) -> Result<(), ServiceFailure> {
        let failed = |err: IdentityError| {
            self.stage_failed("admin", messages::MAIN_CONNECTION_STRING_IS_INVALID, err)
        };

        let existing = identity
            .find_by_email(admin.email.trim())
            .await
            .map_err(failed)?;
        let account = match existing {
            Some(account) => account,
            None => {
                let mut account = UserAccount::new(
                    admin.user_name.trim(),
                    admin.email.trim(),
                    admin.first_name.trim(),
                    admin.last_name.trim(),
                );
                account.email_confirmed = true;
                identity
                    .create(&account, &admin.password)
                    .await
                    .map_err(|err| match err {
                        IdentityError::Rejected { .. } => {
                            self.stage_failed("admin", messages::COULD_NOT_CREATE_USER, err)
                        }
                        other => failed(other),
                    })?
            }
        };

        let roles = identity.roles_of(&account.id).await.map_err(failed)?;
        if !roles.iter().any(|name| Role::parse(name) == Some(Role::Admin)) {
            identity
                .add_to_role(&account.id, Role::Admin)
                .await
                .map_err(failed)?;
        }
        Ok(())
    }

    fn login_page(&self) -> Result<PageSettingsModel, ServiceFailure> {
        self.stores
            .login_page
            .value()
            .map(|settings| PageSettingsModel::from(&settings.0))
            .map_err(|err| self.read_failed("login_page_settings", err))
    }

    fn page_header(&self) -> Result<PageSettingsModel, ServiceFailure> {
        self.stores
            .header
            .value()
            .map(|settings| PageSettingsModel::from(&settings.0))
            .map_err(|err| self.read_failed("page_header_settings", err))
    }

    async fn load_admin_settings(&self) -> Result<AdminSettingsModel, ServiceFailure> {
        const OPERATION: &str = "admin_settings";
        let core_failed = |err: CoreError| {
            error!(operation = OPERATION, error = %err, "core call failed");
            ServiceFailure::external(self.localizer.text(messages::CANT_OBTAIN_SETTINGS))
        };

        let core = self.core.core().await.map_err(core_failed)?;
        let email = self
            .stores
            .email
            .value()
            .map_err(|err| self.read_failed(OPERATION, err))?;
        let header = self.page_header()?;
        let login_page = self.login_page()?;
        let site_link = core.http_server_address().await.map_err(core_failed)?;

        Ok(AdminSettingsModel {
            smtp_settings: SmtpSettingsModel::from(&email),
            header_settings: header,
            login_page_settings: login_page,
            site_link,
            assembly_version: env!("CARGO_PKG_VERSION").to_owned(),
        })
    }

    async fn apply_admin_settings(&self, model: &AdminSettingsModel) -> Result<String, ServiceFailure> {
        const OPERATION: &str = "update_admin_settings";
        let core = self
            .core
            .core()
            .await
            .map_err(|err| self.write_failed(OPERATION, err))?;
        let port = model
            .smtp_settings
            .port
            .trim()
            .parse::<u16>()
            .map_err(|err| self.write_failed(OPERATION, err))?;

        let smtp = &model.smtp_settings;
        self.stores
            .email
            .update(&mut |email| {
                email.smtp_host.clone_from(&smtp.host);
                email.smtp_port = port;
                email.login.clone_from(&smtp.login);
                email.password.clone_from(&smtp.password);
            })
            .map_err(|err| self.write_failed(OPERATION, err))?;
        self.stores
            .header
            .update(&mut |header| header.0.apply(&model.header_settings))
            .map_err(|err| self.write_failed(OPERATION, err))?;
        self.stores
            .login_page
            .update(&mut |login_page| login_page.0.apply(&model.login_page_settings))
            .map_err(|err| self.write_failed(OPERATION, err))?;
        core.set_http_server_address(&model.site_link)
            .await
            .map_err(|err| self.write_failed(OPERATION, err))?;

        Ok(self.localizer.text(messages::SETTINGS_UPDATED_SUCCESSFULLY))
    }

    fn reset_login_page(&self) -> Result<String, ServiceFailure> {
        self.stores
            .login_page
            .update(&mut |settings| settings.0 = PageSettings::default())
            .map_err(|err| self.write_failed("reset_login_page_settings", err))?;
        Ok(self.localizer.text(messages::LOGIN_PAGE_SETTINGS_RESET))
    }

    fn reset_page_header(&self) -> Result<String, ServiceFailure> {
        self.stores
            .header
            .update(&mut |settings| settings.0 = PageSettings::default())
            .map_err(|err| self.write_failed("reset_page_header_settings", err))?;
        Ok(self.localizer.text(messages::HEADER_SETTINGS_RESET))
    }
}

#[async_trait]
impl SettingsApi for SettingsService {
    async fn connection_string_exist(&self) -> OperationResult {
        settle("connection_string_exist", self.connection_configured()).into()
    }

    async fn default_locale(&self) -> OperationDataResult<String> {
        OperationDataResult::success(self.resolve_default_locale())
    }

    async fn update_connection_string(&self, model: &InitialSettingsModel) -> OperationResult {
        settle(
            "update_connection_string",
            self.run_initial_setup(model).await,
        )
        .into()
    }

    async fn login_page_settings(&self) -> OperationDataResult<PageSettingsModel> {
        settle("login_page_settings", self.login_page()).into()
    }

    async fn page_header_settings(&self) -> OperationDataResult<PageSettingsModel> {
        settle("page_header_settings", self.page_header()).into()
    }

    async fn admin_settings(&self) -> OperationDataResult<AdminSettingsModel> {
        settle("admin_settings", self.load_admin_settings().await).into()
    }

    async fn update_admin_settings(&self, model: &AdminSettingsModel) -> OperationResult {
        OperationResult::from_message(settle(
            "update_admin_settings",
            self.apply_admin_settings(model).await,
        ))
    }

    async fn reset_login_page_settings(&self) -> OperationResult {
        OperationResult::from_message(settle(
            "reset_login_page_settings",
            self.reset_login_page(),
        ))
    }

    async fn reset_page_header_settings(&self) -> OperationResult {
        OperationResult::from_message(settle(
            "reset_page_header_settings",
            self.reset_page_header(),
        ))
    }
}

#[cfg(test)]
#[path = "settings_service_tests.rs"]
mod tests;
