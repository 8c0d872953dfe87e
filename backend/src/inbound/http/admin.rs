//! User administration handlers. Every route requires the `admin` role.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{
    OperationDataResult, OperationResult, Pagination, UserId, UserInfoList, UserRegisterModel,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = UserRegisterModel,
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 401, description = "Login required", body = OperationResult),
        (status = 403, description = "Administrator role required", body = OperationResult)
    ),
    tags = ["admin"],
    operation_id = "createUser"
)]
#[post("/admin/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UserRegisterModel>,
) -> ApiResult<HttpResponse> {
    session.require_current_admin(state.auth.as_ref()).await?;
    Ok(HttpResponse::Ok().json(state.admin.create_user(&payload).await))
}

#[utoipa::path(
    put,
    path = "/api/admin/users",
    request_body = UserRegisterModel,
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 401, description = "Login required", body = OperationResult),
        (status = 403, description = "Administrator role required", body = OperationResult)
    ),
    tags = ["admin"],
    operation_id = "updateUser"
)]
#[put("/admin/users")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UserRegisterModel>,
) -> ApiResult<HttpResponse> {
    session.require_current_admin(state.auth.as_ref()).await?;
    Ok(HttpResponse::Ok().json(state.admin.update_user(&payload).await))
}

/// Page through users with an optional name filter.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(Pagination),
    responses(
        (status = 200, description = "Page of users", body = OperationDataResult<UserInfoList>),
        (status = 401, description = "Login required", body = OperationResult),
        (status = 403, description = "Administrator role required", body = OperationResult)
    ),
    tags = ["admin"],
    operation_id = "listUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<Pagination>,
) -> ApiResult<HttpResponse> {
    session.require_current_admin(state.auth.as_ref()).await?;
    Ok(HttpResponse::Ok().json(state.admin.get_all_users(&query).await))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User record without password", body = OperationDataResult<UserRegisterModel>),
        (status = 401, description = "Login required", body = OperationResult),
        (status = 403, description = "Administrator role required", body = OperationResult)
    ),
    tags = ["admin"],
    operation_id = "getUser"
)]
#[get("/admin/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    session.require_current_admin(state.auth.as_ref()).await?;
    Ok(HttpResponse::Ok().json(state.admin.get_user(&path).await))
}

/// Delete a user. The signed-in administrator cannot delete themselves.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 401, description = "Login required", body = OperationResult),
        (status = 403, description = "Administrator role required", body = OperationResult)
    ),
    tags = ["admin"],
    operation_id = "deleteUser"
)]
#[delete("/admin/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_current_admin(state.auth.as_ref()).await?;
    Ok(HttpResponse::Ok().json(state.admin.delete_user(&actor, &path).await))
}

#[utoipa::path(
    post,
    path = "/api/admin/two-factor/enable",
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 403, description = "Administrator role required", body = OperationResult)
    ),
    tags = ["admin"],
    operation_id = "enableTwoFactorAuthForce"
)]
#[post("/admin/two-factor/enable")]
pub async fn enable_two_factor(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_current_admin(state.auth.as_ref()).await?;
    Ok(HttpResponse::Ok().json(state.admin.enable_two_factor_auth_force().await))
}

#[utoipa::path(
    post,
    path = "/api/admin/two-factor/disable",
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 403, description = "Administrator role required", body = OperationResult)
    ),
    tags = ["admin"],
    operation_id = "disableTwoFactorAuthForce"
)]
#[post("/admin/two-factor/disable")]
pub async fn disable_two_factor(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_current_admin(state.auth.as_ref()).await?;
    Ok(HttpResponse::Ok().json(state.admin.disable_two_factor_auth_force().await))
}
