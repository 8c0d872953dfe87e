//! Host entry-point: loads configuration, wires the base plugin and serves
//! its REST endpoints.

mod server;

use std::io;

use actix_web::cookie::{Key, SameSite};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use eform_base::config::EformSettings;
use eform_base::plugin::EformPlugin;
use ortho_config::OrthoConfig;
use server::{ServerConfig, build_plugin, create_server};

fn load_session_key(settings: &EformSettings) -> io::Result<Key> {
    let key_path = settings.session_key_file();
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            if cfg!(debug_assertions) || settings.allow_ephemeral_session_key() {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = EformSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("configuration load failed: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let key = load_session_key(&settings)?;

    let plugin = build_plugin(&settings, &format!("http://{bind_addr}")).map_err(io::Error::other)?;
    info!(
        plugin = plugin.name(),
        plugin_id = plugin.plugin_id(),
        %bind_addr,
        "starting server"
    );

    let config = ServerConfig::new(key, settings.cookie_secure(), SameSite::Lax, bind_addr);
    create_server(plugin, config)?.await
}
