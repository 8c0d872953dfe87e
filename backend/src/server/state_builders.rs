//! Assemble the base plugin from the process-local adapters.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use eform_base::config::EformSettings;
use eform_base::domain::ports::{
    Core, CoreProvider, EmailSender, IdentityError, IdentityManager, Localizer,
    PrimaryStoreBootstrap, SdkAdminConnector, SettingsStoreError,
};
use eform_base::domain::{
    AccountService, AdminService, AuthService, CasesService, SettingsService, SettingsStores,
    SetupCollaborators, SimpleSitesService, two_factor::TotpVerifier,
};
use eform_base::inbound::http::state::HttpState;
use eform_base::outbound::email::TracingEmailSender;
use eform_base::outbound::identity::{
    InMemoryIdentityManager, InMemoryPrimaryStore, PasswordPolicy,
};
use eform_base::outbound::localization::{ResourceLocalizer, ResourceTableError};
use eform_base::outbound::sdk::{ConfiguredCoreProvider, InMemoryCore, InMemorySdkAdminConnector};
use eform_base::outbound::settings::JsonSettingsFile;
use eform_base::plugin::BasePlugin;
use mockable::DefaultClock;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("settings document unavailable: {0}")]
    Settings(#[from] SettingsStoreError),
    #[error("localisation table unavailable: {0}")]
    Localization(#[from] ResourceTableError),
    #[error("identity snapshot unavailable: {0}")]
    Identity(#[from] IdentityError),
}

/// Wire services to adapters and wrap them in the base plugin.
pub(crate) fn build_plugin(
    settings: &EformSettings,
    public_address: &str,
) -> Result<BasePlugin, StartupError> {
    let file = JsonSettingsFile::open(&settings.settings_file())?;
    let stores = SettingsStores {
        connection_strings: file.section(),
        application: file.section(),
        login_page: file.section(),
        header: file.section(),
        email: file.section(),
    };
    let locale = stores.application.value()?.default_locale_or_fallback().to_owned();
    let localizer: Arc<dyn Localizer> = Arc::new(ResourceLocalizer::bundled(&locale)?);
    info!(path = %file.path(), locale = %locale, "settings loaded");

    let identity: Arc<dyn IdentityManager> = Arc::new(InMemoryIdentityManager::persistent(
        PasswordPolicy::default(),
        &settings.identity_file(),
    )?);
    let primary_store: Arc<dyn PrimaryStoreBootstrap> =
        Arc::new(InMemoryPrimaryStore::new(Arc::clone(&identity)));
    let sdk_admin: Arc<dyn SdkAdminConnector> = Arc::new(InMemorySdkAdminConnector::default());
    let core: Arc<dyn Core> = Arc::new(InMemoryCore::new(public_address));
    let core_provider: Arc<dyn CoreProvider> = Arc::new(ConfiguredCoreProvider::new(
        Arc::clone(&stores.connection_strings),
        core,
    ));
    let email: Arc<dyn EmailSender> = Arc::new(TracingEmailSender::new(Arc::clone(&stores.email)));
    let verifier = TotpVerifier::new(Arc::new(DefaultClock));

    let state = HttpState {
        account: Arc::new(AccountService::new(
            Arc::clone(&identity),
            Arc::clone(&stores.application),
            Arc::clone(&localizer),
            email,
        )),
        admin: Arc::new(AdminService::new(
            Arc::clone(&identity),
            Arc::clone(&stores.application),
            Arc::clone(&localizer),
        )),
        auth: Arc::new(AuthService::new(
            Arc::clone(&identity),
            Arc::clone(&stores.application),
            Arc::clone(&localizer),
            verifier,
            settings.totp_issuer(),
        )),
        cases: Arc::new(CasesService::new(
            Arc::clone(&core_provider),
            Arc::clone(&localizer),
        )),
        simple_sites: Arc::new(SimpleSitesService::new(
            Arc::clone(&core_provider),
            Arc::clone(&localizer),
        )),
        settings: Arc::new(SettingsService::new(
            stores,
            SetupCollaborators {
                sdk_admin,
                primary_store: Arc::clone(&primary_store),
            },
            core_provider,
            localizer,
        )),
    };

    Ok(BasePlugin::new(state, primary_store))
}
