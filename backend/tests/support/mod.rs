//! Full-stack wiring over the in-process adapters for integration tests.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use camino::Utf8PathBuf;
use eform_base::domain::ports::{
    Core, CoreProvider, EmailSender, IdentityManager, Localizer, PrimaryStoreBootstrap,
    SdkAdminConnector,
};
use eform_base::domain::two_factor::TotpVerifier;
use eform_base::domain::{
    AccountService, AdminService, AuthService, CasesService, SettingsService, SettingsStores,
    SetupCollaborators, SimpleSitesService,
};
use eform_base::inbound::http::state::HttpState;
use eform_base::outbound::email::TracingEmailSender;
use eform_base::outbound::identity::{InMemoryIdentityManager, InMemoryPrimaryStore};
use eform_base::outbound::localization::ResourceLocalizer;
use eform_base::outbound::sdk::{ConfiguredCoreProvider, InMemoryCore, InMemorySdkAdminConnector};
use eform_base::outbound::settings::JsonSettingsFile;
use eform_base::plugin::BasePlugin;
use eform_base::test_support::{FixedClock, temp_settings_path};
use serde_json::{Value, json};
use tempfile::TempDir;

pub const ADMIN_USER_NAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "Secret#123";
pub const SITE_ADDRESS: &str = "https://eform.example.test";

/// Services and adapters backed by a temporary settings document.
pub struct Stack {
    pub plugin: BasePlugin,
    pub state: HttpState,
    pub settings_path: Utf8PathBuf,
    _dir: TempDir,
}

/// Build a stack whose core allows at most `license_limit` device users.
pub fn stack_with_license_limit(license_limit: Option<usize>) -> Stack {
    let (dir, settings_path) = temp_settings_path();
    let file = JsonSettingsFile::open(&settings_path).expect("settings document opens");
    let stores = SettingsStores {
        connection_strings: file.section(),
        application: file.section(),
        login_page: file.section(),
        header: file.section(),
        email: file.section(),
    };
    let localizer: Arc<dyn Localizer> =
        Arc::new(ResourceLocalizer::bundled("en-US").expect("bundled resources parse"));

    let identity: Arc<dyn IdentityManager> = Arc::new(InMemoryIdentityManager::default());
    let primary_store: Arc<dyn PrimaryStoreBootstrap> =
        Arc::new(InMemoryPrimaryStore::new(Arc::clone(&identity)));
    let sdk_admin: Arc<dyn SdkAdminConnector> = Arc::new(InMemorySdkAdminConnector::default());
    let core = InMemoryCore::new(SITE_ADDRESS);
    let core: Arc<dyn Core> = Arc::new(match license_limit {
        Some(limit) => core.with_license_limit(limit),
        None => core,
    });
    let core_provider: Arc<dyn CoreProvider> = Arc::new(ConfiguredCoreProvider::new(
        Arc::clone(&stores.connection_strings),
        core,
    ));
    let email: Arc<dyn EmailSender> = Arc::new(TracingEmailSender::new(Arc::clone(&stores.email)));
    let verifier = TotpVerifier::new(Arc::new(FixedClock::at_unix(1_700_000_000)));

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
            "eForm".to_owned(),
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

    Stack {
        plugin: BasePlugin::new(state.clone(), primary_store),
        state,
        settings_path,
        _dir: dir,
    }
}

pub fn stack() -> Stack {
    stack_with_license_limit(None)
}

/// Cookie session middleware matching the production cookie name.
pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build()
}

/// Initial setup payload as the setup wizard posts it.
pub fn setup_payload() -> Value {
    json!({
        "connectionStringSdk": {
            "source": "Data Source=sql.local",
            "catalogue": "eform_sdk",
            "auth": "User ID=sa;Password=pw",
            "token": "customer-token"
        },
        "connectionStringMain": {
            "source": "Data Source=sql.local",
            "catalogue": "eform_main",
            "auth": "User ID=sa;Password=pw"
        },
        "adminSetupModel": {
            "userName": ADMIN_USER_NAME,
            "email": "admin@example.test",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "password": ADMIN_PASSWORD
        },
        "generalAppSetupSettingsModel": { "defaultLocale": "en-US" }
    })
}

pub fn login_payload(password: &str) -> Value {
    login_payload_for(ADMIN_USER_NAME, password)
}

pub fn login_payload_for(user_name: &str, password: &str) -> Value {
    json!({ "username": user_name, "password": password })
}
