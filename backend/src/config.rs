//! Process configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `EFORM_*` environment variables and an
//! optional configuration file, in that order of precedence. Application
//! settings edited at runtime (connection strings, branding, SMTP) live in
//! the JSON settings document named by [`EformSettings::settings_file`];
//! accounts live in the identity snapshot named by
//! [`EformSettings::identity_file`].

use std::net::SocketAddr;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";
const DEFAULT_IDENTITY_FILE_NAME: &str = "identity.json";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_TOTP_ISSUER: &str = "eForm";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddress { value: String, message: String },
}

/// Startup configuration for the HTTP host.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EFORM")]
pub struct EformSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Path of the JSON settings document.
    pub settings_file: Option<String>,
    /// Path of the identity snapshot (accounts, roles, password hashes).
    pub identity_file: Option<String>,
    /// File holding the session cookie key material.
    pub session_key_file: Option<String>,
    /// Fall back to a generated session key when the key file is unreadable.
    pub allow_ephemeral_session_key: Option<bool>,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: Option<bool>,
    /// Issuer label shown by authenticator apps.
    pub totp_issuer: Option<String>,
}

impl EformSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| ConfigError::BindAddress {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn settings_file(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(
            self.settings_file
                .as_deref()
                .unwrap_or(DEFAULT_SETTINGS_FILE),
        )
    }

    /// Defaults to `identity.json` beside the settings document.
    pub fn identity_file(&self) -> Utf8PathBuf {
        if let Some(path) = self.identity_file.as_deref() {
            return Utf8PathBuf::from(path);
        }
        let settings_file = self.settings_file();
        match settings_file.parent() {
            Some(parent) => parent.join(DEFAULT_IDENTITY_FILE_NAME),
            None => Utf8PathBuf::from(DEFAULT_IDENTITY_FILE_NAME),
        }
    }

    pub fn session_key_file(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(
            self.session_key_file
                .as_deref()
                .unwrap_or(DEFAULT_SESSION_KEY_FILE),
        )
    }

    /// Defaults to `false`.
    pub fn allow_ephemeral_session_key(&self) -> bool {
        self.allow_ephemeral_session_key.unwrap_or(false)
    }

    /// Defaults to `true`.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn totp_issuer(&self) -> &str {
        self.totp_issuer.as_deref().unwrap_or(DEFAULT_TOTP_ISSUER)
    }
}
