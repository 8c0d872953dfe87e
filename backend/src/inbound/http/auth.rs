//! Sign-in, sign-out and authenticator handlers.
//!
//! ```text
//! POST /api/auth/token {"username":"admin","password":"password","code":"123456"}
//! GET  /api/auth/logout
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{
    AuthorizeResult, GoogleAuthInfoModel, GoogleAuthenticatorModel, LoginModel,
    OperationDataResult, OperationResult,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Authenticate and establish a session.
///
/// The envelope is returned unchanged; the session cookie is only issued
/// when it reports success.
#[utoipa::path(
    post,
    path = "/api/auth/token",
    request_body = LoginModel,
    responses(
        (status = 200, description = "Login envelope", body = OperationDataResult<AuthorizeResult>,
            headers(("Set-Cookie" = String, description = "Session cookie on success")))
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/token")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginModel>,
) -> ApiResult<HttpResponse> {
    let outcome = state.auth.authenticate_user(&payload).await;
    if let Some(identity) = outcome.model().filter(|_| outcome.is_success()) {
        session.persist_user(&identity.id, identity.role.as_deref())?;
    }
    Ok(HttpResponse::Ok().json(outcome))
}

#[utoipa::path(
    get,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[get("/auth/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let outcome = state.auth.log_out(&user_id).await;
    session.purge();
    Ok(HttpResponse::Ok().json(outcome))
}

/// Provision an authenticator key after checking the password.
#[utoipa::path(
    post,
    path = "/api/auth/google-auth-key",
    request_body = LoginModel,
    responses((status = 200, description = "Provisioning envelope", body = OperationDataResult<GoogleAuthenticatorModel>)),
    tags = ["auth"],
    operation_id = "getGoogleAuthenticator",
    security([])
)]
#[post("/auth/google-auth-key")]
pub async fn google_auth_key(
    state: web::Data<HttpState>,
    payload: web::Json<LoginModel>,
) -> HttpResponse {
    HttpResponse::Ok().json(state.auth.get_google_authenticator(&payload).await)
}

#[utoipa::path(
    get,
    path = "/api/auth/google-auth-info",
    responses(
        (status = 200, description = "Authenticator flags", body = OperationDataResult<GoogleAuthInfoModel>),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["auth"],
    operation_id = "getGoogleAuthenticatorInfo"
)]
#[get("/auth/google-auth-info")]
pub async fn google_auth_info(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    Ok(HttpResponse::Ok().json(state.auth.get_google_authenticator_info(&user_id).await))
}

#[utoipa::path(
    put,
    path = "/api/auth/google-auth-info",
    request_body = GoogleAuthInfoModel,
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["auth"],
    operation_id = "updateGoogleAuthenticatorInfo"
)]
#[put("/auth/google-auth-info")]
pub async fn update_google_auth_info(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<GoogleAuthInfoModel>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let outcome = state
        .auth
        .update_google_authenticator_info(&user_id, &payload)
        .await;
    Ok(HttpResponse::Ok().json(outcome))
}

#[utoipa::path(
    delete,
    path = "/api/auth/google-auth-info",
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["auth"],
    operation_id = "deleteGoogleAuthenticatorInfo"
)]
#[delete("/auth/google-auth-info")]
pub async fn delete_google_auth_info(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    Ok(HttpResponse::Ok().json(state.auth.delete_google_authenticator_info(&user_id).await))
}

/// Whether two-factor sign-in is forced for everyone.
#[utoipa::path(
    get,
    path = "/api/auth/two-factor-info",
    responses((status = 200, description = "Force flag", body = OperationDataResult<bool>)),
    tags = ["auth"],
    operation_id = "twoFactorAuthForceInfo",
    security([])
)]
#[get("/auth/two-factor-info")]
pub async fn two_factor_info(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok().json(state.auth.two_factor_auth_force_info().await)
}
