//! HTTP inbound adapter exposing the base plugin REST endpoints.
//!
//! Every route answers `200` with the operation envelope; only missing or
//! insufficient sessions short-circuit with `401`/`403`.

pub mod account;
pub mod admin;
pub mod auth;
pub mod cases;
pub mod error;
pub mod session;
pub mod settings;
pub mod simple_sites;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::{ApiError, ApiResult};

/// Mount every base route under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(account::user_info)
            .service(account::user_settings)
            .service(account::update_user_settings)
            .service(account::change_password)
            .service(account::forgot_password)
            .service(account::reset_admin_password)
            .service(account::reset_password)
            .service(auth::login)
            .service(auth::logout)
            .service(auth::google_auth_key)
            .service(auth::google_auth_info)
            .service(auth::update_google_auth_info)
            .service(auth::delete_google_auth_info)
            .service(auth::two_factor_info)
            .service(admin::create_user)
            .service(admin::update_user)
            .service(admin::list_users)
            .service(admin::get_user)
            .service(admin::delete_user)
            .service(admin::enable_two_factor)
            .service(admin::disable_two_factor)
            .service(cases::index)
            .service(cases::edit)
            .service(cases::remove)
            .service(cases::update)
            .service(simple_sites::index)
            .service(simple_sites::create)
            .service(simple_sites::edit)
            .service(simple_sites::update)
            .service(simple_sites::remove)
            .service(settings::connection_string_exist)
            .service(settings::default_locale)
            .service(settings::update_connection_string)
            .service(settings::login_page)
            .service(settings::page_header)
            .service(settings::admin_settings)
            .service(settings::update_admin_settings)
            .service(settings::reset_login_page)
            .service(settings::reset_page_header),
    );
}
