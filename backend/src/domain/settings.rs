//! Application settings groups and the models used to read and edit them.
//!
//! Each group is persisted under its own section of the settings document
//! with PascalCase keys; HTTP models use camelCase.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Locale used when neither the user nor the application configures one.
pub const FALLBACK_LOCALE: &str = "en-US";

pub const DEFAULT_MAIN_TEXT: &str = "Microting eForm";
pub const DEFAULT_SECONDARY_TEXT: &str = "No more paper-forms and back-office data entry";

/// A settings group stored under a named section of the settings document.
pub trait SettingsSection:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
    /// Section name in the settings document.
    const SECTION: &'static str;
}

/// Storage connection strings. Empty strings mean "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConnectionStrings {
    pub sdk_connection: String,
    pub default_connection: String,
}

impl ConnectionStrings {
    /// Whether initial setup has completed.
    pub fn is_configured(&self) -> bool {
        !self.sdk_connection.trim().is_empty()
    }
}

impl SettingsSection for ConnectionStrings {
    const SECTION: &'static str = "ConnectionStrings";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ApplicationSettings {
    pub default_locale: String,
    pub site_link: String,
    pub security_code: String,
    pub default_password: String,
    pub is_two_factor_forced: bool,
}

impl ApplicationSettings {
    /// Configured default locale or [`FALLBACK_LOCALE`].
    pub fn default_locale_or_fallback(&self) -> &str {
        match self.default_locale.trim() {
            "" => FALLBACK_LOCALE,
            locale => locale,
        }
    }
}

impl SettingsSection for ApplicationSettings {
    const SECTION: &'static str = "ApplicationSettings";
}

/// Branding block shared by the login page and the page header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PageSettings {
    pub main_text: String,
    pub main_text_visible: bool,
    pub secondary_text: String,
    pub secondary_text_visible: bool,
    pub image_link: String,
    pub image_link_visible: bool,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            main_text: DEFAULT_MAIN_TEXT.to_owned(),
            main_text_visible: true,
            secondary_text: DEFAULT_SECONDARY_TEXT.to_owned(),
            secondary_text_visible: true,
            image_link: String::new(),
            image_link_visible: true,
        }
    }
}

impl From<&PageSettings> for PageSettingsModel {
    fn from(value: &PageSettings) -> Self {
        Self {
            main_text: value.main_text.clone(),
            main_text_visible: value.main_text_visible,
            secondary_text: value.secondary_text.clone(),
            secondary_text_visible: value.secondary_text_visible,
            image_link: value.image_link.clone(),
            image_link_visible: value.image_link_visible,
        }
    }
}

impl PageSettings {
    /// Overwrite every field from an edit model.
    pub fn apply(&mut self, model: &PageSettingsModel) {
        self.main_text.clone_from(&model.main_text);
        self.main_text_visible = model.main_text_visible;
        self.secondary_text.clone_from(&model.secondary_text);
        self.secondary_text_visible = model.secondary_text_visible;
        self.image_link.clone_from(&model.image_link);
        self.image_link_visible = model.image_link_visible;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoginPageSettings(pub PageSettings);

impl SettingsSection for LoginPageSettings {
    const SECTION: &'static str = "LoginPageSettings";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderSettings(pub PageSettings);

impl SettingsSection for HeaderSettings {
    const SECTION: &'static str = "HeaderSettings";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub login: String,
    pub password: String,
}

impl SettingsSection for EmailSettings {
    const SECTION: &'static str = "EmailSettings";
}

/// Login page or header branding as exchanged over HTTP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSettingsModel {
    pub main_text: String,
    pub main_text_visible: bool,
    pub secondary_text: String,
    pub secondary_text_visible: bool,
    pub image_link: String,
    pub image_link_visible: bool,
}

/// SMTP settings; the port travels as text and is parsed on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SmtpSettingsModel {
    pub host: String,
    #[schema(example = "25")]
    pub port: String,
    pub login: String,
    pub password: String,
}

impl From<&EmailSettings> for SmtpSettingsModel {
    fn from(value: &EmailSettings) -> Self {
        Self {
            host: value.smtp_host.clone(),
            port: value.smtp_port.to_string(),
            login: value.login.clone(),
            password: value.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminSettingsModel {
    #[serde(rename = "smtpSettingsModel")]
    pub smtp_settings: SmtpSettingsModel,
    #[serde(rename = "headerSettingsModel")]
    pub header_settings: PageSettingsModel,
    #[serde(rename = "loginPageSettingsModel")]
    pub login_page_settings: PageSettingsModel,
    #[serde(default)]
    pub site_link: String,
    /// Crate version; ignored on update.
    #[serde(default)]
    pub assembly_version: String,
}

/// Data-source triple used to build a connection string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MainConnectionModel {
    #[schema(example = "Data Source=localhost")]
    pub source: String,
    #[schema(example = "eform-angular")]
    pub catalogue: String,
    #[schema(example = "Integrated Security=True")]
    pub auth: String,
}

impl MainConnectionModel {
    /// `"{source};Initial Catalog={catalogue};{auth}"`.
    pub fn connection_string(&self) -> String {
        build_connection_string(&self.source, &self.catalogue, &self.auth)
    }
}

/// SDK data source plus the customer token used for SDK setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SdkConnectionModel {
    pub source: String,
    pub catalogue: String,
    pub auth: String,
    pub token: String,
}

impl SdkConnectionModel {
    pub fn connection_string(&self) -> String {
        build_connection_string(&self.source, &self.catalogue, &self.auth)
    }
}

fn build_connection_string(source: &str, catalogue: &str, auth: &str) -> String {
    format!("{source};Initial Catalog={catalogue};{auth}")
}

/// First administrator created by the setup flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminSetupModel {
    pub user_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralAppSetupModel {
    #[schema(example = "en-US")]
    pub default_locale: String,
}

/// Payload for the one-off initial setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitialSettingsModel {
    pub connection_string_sdk: SdkConnectionModel,
    pub connection_string_main: MainConnectionModel,
    pub admin_setup_model: AdminSetupModel,
    #[serde(rename = "generalAppSetupSettingsModel", default)]
    pub general_app_setup: GeneralAppSetupModel,
}
