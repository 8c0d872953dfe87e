//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the base plugin together with
//! the session cookie security scheme. The document is served by the host in
//! debug builds and printed by the `openapi-dump` binary for tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::OperationResult;
use crate::plugin::{MenuItem, MenuModel};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/token.",
            ))),
        );
    }
}

/// OpenAPI document for the base plugin REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "eForm base plugin API",
        description = "Accounts, administration, authentication, cases, device users and settings. \
            Every operation answers with a success/message/model envelope."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::account::user_info,
        crate::inbound::http::account::user_settings,
        crate::inbound::http::account::update_user_settings,
        crate::inbound::http::account::change_password,
        crate::inbound::http::account::forgot_password,
        crate::inbound::http::account::reset_admin_password,
        crate::inbound::http::account::reset_password,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::google_auth_key,
        crate::inbound::http::auth::google_auth_info,
        crate::inbound::http::auth::update_google_auth_info,
        crate::inbound::http::auth::delete_google_auth_info,
        crate::inbound::http::auth::two_factor_info,
        crate::inbound::http::admin::create_user,
        crate::inbound::http::admin::update_user,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::get_user,
        crate::inbound::http::admin::delete_user,
        crate::inbound::http::admin::enable_two_factor,
        crate::inbound::http::admin::disable_two_factor,
        crate::inbound::http::cases::index,
        crate::inbound::http::cases::edit,
        crate::inbound::http::cases::remove,
        crate::inbound::http::cases::update,
        crate::inbound::http::simple_sites::index,
        crate::inbound::http::simple_sites::create,
        crate::inbound::http::simple_sites::edit,
        crate::inbound::http::simple_sites::update,
        crate::inbound::http::simple_sites::remove,
        crate::inbound::http::settings::connection_string_exist,
        crate::inbound::http::settings::default_locale,
        crate::inbound::http::settings::update_connection_string,
        crate::inbound::http::settings::login_page,
        crate::inbound::http::settings::page_header,
        crate::inbound::http::settings::admin_settings,
        crate::inbound::http::settings::update_admin_settings,
        crate::inbound::http::settings::reset_login_page,
        crate::inbound::http::settings::reset_page_header,
    ),
    components(schemas(OperationResult, MenuModel, MenuItem)),
    tags(
        (name = "account", description = "Self-service for the signed-in user"),
        (name = "admin", description = "User administration"),
        (name = "auth", description = "Sign-in and authenticator management"),
        (name = "cases", description = "Case listing and reply editing"),
        (name = "simple-sites", description = "Device users"),
        (name = "settings", description = "Initial setup and application settings")
    )
)]
pub struct ApiDoc;
