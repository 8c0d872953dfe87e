//! Account self-service handlers.
//!
//! ```text
//! GET  /api/account/user-info
//! POST /api/account/change-password {"oldPassword":"...","newPassword":"..."}
//! POST /api/account/forgot-password {"email":"ada@example.com"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{
    ChangePasswordModel, ForgotPasswordModel, OperationDataResult, OperationResult,
    ResetPasswordModel, UserInfo, UserSettingsModel,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query for the admin password reset link.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SecurityCodeQuery {
    pub code: String,
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/api/account/user-info",
    responses(
        (status = 200, description = "Envelope with the user profile", body = OperationDataResult<UserInfo>),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["account"],
    operation_id = "getUserInfo"
)]
#[get("/account/user-info")]
pub async fn user_info(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    Ok(HttpResponse::Ok().json(state.account.user_info(&user_id).await))
}

#[utoipa::path(
    get,
    path = "/api/account/user-settings",
    responses(
        (status = 200, description = "Envelope with the effective locale", body = OperationDataResult<UserSettingsModel>),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["account"],
    operation_id = "getUserSettings"
)]
#[get("/account/user-settings")]
pub async fn user_settings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    Ok(HttpResponse::Ok().json(state.account.user_settings(&user_id).await))
}

#[utoipa::path(
    post,
    path = "/api/account/user-settings",
    request_body = UserSettingsModel,
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["account"],
    operation_id = "updateUserSettings"
)]
#[post("/account/user-settings")]
pub async fn update_user_settings(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UserSettingsModel>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let outcome = state
        .account
        .update_user_settings(&user_id, &payload)
        .await;
    Ok(HttpResponse::Ok().json(outcome))
}

#[utoipa::path(
    post,
    path = "/api/account/change-password",
    request_body = ChangePasswordModel,
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["account"],
    operation_id = "changePassword"
)]
#[post("/account/change-password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ChangePasswordModel>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let outcome = state.account.change_password(&user_id, &payload).await;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Start the forgot-password flow. Open to anonymous callers.
#[utoipa::path(
    post,
    path = "/api/account/forgot-password",
    request_body = ForgotPasswordModel,
    responses((status = 200, description = "Outcome envelope", body = OperationResult)),
    tags = ["account"],
    operation_id = "forgotPassword",
    security([])
)]
#[post("/account/forgot-password")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: web::Json<ForgotPasswordModel>,
) -> HttpResponse {
    HttpResponse::Ok().json(state.account.forgot_password(&payload).await)
}

/// Reset the administrator password with the installation security code.
#[utoipa::path(
    get,
    path = "/api/account/reset-admin-password",
    params(SecurityCodeQuery),
    responses((status = 200, description = "Outcome envelope", body = OperationResult)),
    tags = ["account"],
    operation_id = "resetAdminPassword",
    security([])
)]
#[get("/account/reset-admin-password")]
pub async fn reset_admin_password(
    state: web::Data<HttpState>,
    query: web::Query<SecurityCodeQuery>,
) -> HttpResponse {
    HttpResponse::Ok().json(state.account.reset_admin_password(&query.code).await)
}

#[utoipa::path(
    post,
    path = "/api/account/reset-password",
    request_body = ResetPasswordModel,
    responses((status = 200, description = "Outcome envelope", body = OperationResult)),
    tags = ["account"],
    operation_id = "resetPassword",
    security([])
)]
#[post("/account/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: web::Json<ResetPasswordModel>,
) -> HttpResponse {
    HttpResponse::Ok().json(state.account.reset_password(&payload).await)
}
