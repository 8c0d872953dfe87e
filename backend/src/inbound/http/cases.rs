//! Case listing and reply editing handlers. Require a signed-in user.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{
    CaseListModel, CaseRequestModel, OperationDataResult, OperationResult, ReplyElement,
    ReplyRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[utoipa::path(
    post,
    path = "/api/cases/index",
    request_body = CaseRequestModel,
    responses(
        (status = 200, description = "Cases of the template", body = OperationDataResult<CaseListModel>),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["cases"],
    operation_id = "listCases"
)]
#[post("/cases/index")]
pub async fn index(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CaseRequestModel>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    Ok(HttpResponse::Ok().json(state.cases.index(&payload).await))
}

#[utoipa::path(
    get,
    path = "/api/cases/{id}",
    params(("id" = i32, Path, description = "Case id")),
    responses(
        (status = 200, description = "Case reply tree", body = OperationDataResult<ReplyElement>),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["cases"],
    operation_id = "getCase"
)]
#[get("/cases/{id}")]
pub async fn edit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    Ok(HttpResponse::Ok().json(state.cases.edit(path.into_inner()).await))
}

#[utoipa::path(
    delete,
    path = "/api/cases/{id}",
    params(("id" = i32, Path, description = "Case id")),
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["cases"],
    operation_id = "deleteCase"
)]
#[delete("/cases/{id}")]
pub async fn remove(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    Ok(HttpResponse::Ok().json(state.cases.delete(path.into_inner()).await))
}

/// Submit an edited reply tree.
#[utoipa::path(
    put,
    path = "/api/cases",
    request_body = ReplyRequest,
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["cases"],
    operation_id = "updateCase"
)]
#[put("/cases")]
pub async fn update(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ReplyRequest>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    Ok(HttpResponse::Ok().json(state.cases.update(&payload).await))
}
