//! Settings handlers.
//!
//! The setup and branding reads are anonymous so the login page can render
//! before anyone signs in; administrative reads and writes need the `admin`
//! role.

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{
    AdminSettingsModel, InitialSettingsModel, OperationDataResult, OperationResult,
    PageSettingsModel,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[utoipa::path(
    get,
    path = "/api/settings/connection-string-exist",
    responses((status = 200, description = "Success when the primary store is configured", body = OperationResult)),
    tags = ["settings"],
    operation_id = "connectionStringExist",
    security([])
)]
#[get("/settings/connection-string-exist")]
pub async fn connection_string_exist(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok().json(state.settings.connection_string_exist().await)
}

#[utoipa::path(
    get,
    path = "/api/settings/default-locale",
    responses((status = 200, description = "Default locale", body = OperationDataResult<String>)),
    tags = ["settings"],
    operation_id = "defaultLocale",
    security([])
)]
#[get("/settings/default-locale")]
pub async fn default_locale(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok().json(state.settings.default_locale().await)
}

/// Run the one-off initial setup.
#[utoipa::path(
    post,
    path = "/api/settings/connection-string",
    request_body = InitialSettingsModel,
    responses((status = 200, description = "Outcome envelope", body = OperationResult)),
    tags = ["settings"],
    operation_id = "updateConnectionString",
    security([])
)]
#[post("/settings/connection-string")]
pub async fn update_connection_string(
    state: web::Data<HttpState>,
    payload: web::Json<InitialSettingsModel>,
) -> HttpResponse {
    HttpResponse::Ok().json(state.settings.update_connection_string(&payload).await)
}

#[utoipa::path(
    get,
    path = "/api/settings/login-page",
    responses((status = 200, description = "Login page branding", body = OperationDataResult<PageSettingsModel>)),
    tags = ["settings"],
    operation_id = "loginPageSettings",
    security([])
)]
#[get("/settings/login-page")]
pub async fn login_page(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok().json(state.settings.login_page_settings().await)
}

#[utoipa::path(
    get,
    path = "/api/settings/page-header",
    responses(
        (status = 200, description = "Header branding", body = OperationDataResult<PageSettingsModel>),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["settings"],
    operation_id = "pageHeaderSettings"
)]
#[get("/settings/page-header")]
pub async fn page_header(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    Ok(HttpResponse::Ok().json(state.settings.page_header_settings().await))
}

#[utoipa::path(
    get,
    path = "/api/settings/admin",
    responses(
        (status = 200, description = "Administrative settings", body = OperationDataResult<AdminSettingsModel>),
        (status = 401, description = "Login required", body = OperationResult),
        (status = 403, description = "Administrator role required", body = OperationResult)
    ),
    tags = ["settings"],
    operation_id = "adminSettings"
)]
#[get("/settings/admin")]
pub async fn admin_settings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_current_admin(state.auth.as_ref()).await?;
    Ok(HttpResponse::Ok().json(state.settings.admin_settings().await))
}

#[utoipa::path(
    post,
    path = "/api/settings/admin",
    request_body = AdminSettingsModel,
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 401, description = "Login required", body = OperationResult),
        (status = 403, description = "Administrator role required", body = OperationResult)
    ),
    tags = ["settings"],
    operation_id = "updateAdminSettings"
)]
#[post("/settings/admin")]
pub async fn update_admin_settings(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AdminSettingsModel>,
) -> ApiResult<HttpResponse> {
    session.require_current_admin(state.auth.as_ref()).await?;
    Ok(HttpResponse::Ok().json(state.settings.update_admin_settings(&payload).await))
}

#[utoipa::path(
    post,
    path = "/api/settings/reset-login-page",
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 403, description = "Administrator role required", body = OperationResult)
    ),
    tags = ["settings"],
    operation_id = "resetLoginPageSettings"
)]
#[post("/settings/reset-login-page")]
pub async fn reset_login_page(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_current_admin(state.auth.as_ref()).await?;
    Ok(HttpResponse::Ok().json(state.settings.reset_login_page_settings().await))
}

#[utoipa::path(
    post,
    path = "/api/settings/reset-page-header",
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 403, description = "Administrator role required", body = OperationResult)
    ),
    tags = ["settings"],
    operation_id = "resetPageHeaderSettings"
)]
#[post("/settings/reset-page-header")]
pub async fn reset_page_header(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_current_admin(state.auth.as_ref()).await?;
    Ok(HttpResponse::Ok().json(state.settings.reset_page_header_settings().await))
}
