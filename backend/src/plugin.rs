//! Plugin hosting surface.
//!
//! A host application mounts plugins through [`EformPlugin`]: each plugin
//! contributes routes, a header menu and a database seeding step. The base
//! plugin shipped here owns accounts, administration, authentication, cases,
//! device users and settings.

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::Role;
use crate::domain::ports::{IdentityError, PrimaryStoreBootstrap, PrimaryStoreError};
use crate::inbound::http::{self, state::HttpState};

/// Entry of a header menu; `guards` lists the roles allowed to see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub name: String,
    pub e2e_id: String,
    pub link: String,
    pub position: u32,
    pub guards: Vec<String>,
    #[schema(value_type = Vec<Object>)]
    pub menu_items: Vec<MenuItem>,
}

impl MenuItem {
    fn link(name: &str, e2e_id: &str, link: &str, position: u32) -> Self {
        Self {
            name: name.to_owned(),
            e2e_id: e2e_id.to_owned(),
            link: link.to_owned(),
            position,
            guards: Vec::new(),
            menu_items: Vec::new(),
        }
    }

    fn guarded(mut self, role: Role) -> Self {
        self.guards.push(role.as_str().to_owned());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuModel {
    pub left_menu: Vec<MenuItem>,
    pub right_menu: Vec<MenuItem>,
}

#[derive(Debug, Error)]
pub enum PluginError {
    #[error(transparent)]
    Store(#[from] PrimaryStoreError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

#[async_trait]
pub trait EformPlugin: Send + Sync {
    fn name(&self) -> &str;

    fn plugin_id(&self) -> &str;

    /// URL prefix the plugin's routes are mounted under.
    fn plugin_path(&self) -> &str;

    /// Register routes and shared state.
    fn configure(&self, cfg: &mut web::ServiceConfig);

    fn header_menu(&self) -> MenuModel;

    /// Bring the plugin's store up to date; safe to run repeatedly.
    async fn seed_database(&self, connection_string: &str) -> Result<(), PluginError>;
}

/// The base plugin.
#[derive(Clone)]
pub struct BasePlugin {
    state: HttpState,
    primary_store: Arc<dyn PrimaryStoreBootstrap>,
}

impl BasePlugin {
    pub fn new(state: HttpState, primary_store: Arc<dyn PrimaryStoreBootstrap>) -> Self {
        Self {
            state,
            primary_store,
        }
    }
}

#[async_trait]
impl EformPlugin for BasePlugin {
    fn name(&self) -> &str {
        "eForm Base"
    }

    fn plugin_id(&self) -> &str {
        "eform-base"
    }

    fn plugin_path(&self) -> &str {
        "/api"
    }

    fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.state.clone()));
        http::configure(cfg);
    }

    fn header_menu(&self) -> MenuModel {
        MenuModel {
            left_menu: vec![
                MenuItem::link("My eForms", "my-eforms", "/", 0),
                MenuItem::link("Device Users", "device-users", "/simplesites", 1),
            ],
            right_menu: vec![MenuItem {
                menu_items: vec![
                    MenuItem::link("User Management", "user-management-menu", "/account-management/users", 0)
                        .guarded(Role::Admin),
                    MenuItem::link("Settings", "settings", "/application-settings", 1)
                        .guarded(Role::Admin),
                    MenuItem::link("Change password", "change-password", "/account-management/change-password", 2),
                    MenuItem::link("Logout", "sign-out-dropdown", "/auth/sign-out", 3),
                ],
                ..MenuItem::link("user", "sign-out-dropdown-menu", "", 0)
            }],
        }
    }

    async fn seed_database(&self, connection_string: &str) -> Result<(), PluginError> {
        let identity = self.primary_store.migrate(connection_string).await?;
        for role in Role::ALL {
            if !identity.role_exists(role).await? {
                identity.create_role(role).await?;
                info!(role = role.as_str(), "seeded role");
            }
        }
        Ok(())
    }
}
