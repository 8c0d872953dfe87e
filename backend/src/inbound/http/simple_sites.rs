//! Device user ("simple site") handlers. Require a signed-in user.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{OperationDataResult, OperationResult, SimpleSiteModel, SiteDto};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[utoipa::path(
    get,
    path = "/api/simple-sites",
    responses(
        (status = 200, description = "Active sites", body = OperationDataResult<Vec<SiteDto>>),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["simple-sites"],
    operation_id = "listSimpleSites"
)]
#[get("/simple-sites")]
pub async fn index(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    Ok(HttpResponse::Ok().json(state.simple_sites.index().await))
}

#[utoipa::path(
    post,
    path = "/api/simple-sites",
    request_body = SimpleSiteModel,
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["simple-sites"],
    operation_id = "createSimpleSite"
)]
#[post("/simple-sites")]
pub async fn create(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SimpleSiteModel>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    Ok(HttpResponse::Ok().json(state.simple_sites.create(&payload).await))
}

#[utoipa::path(
    get,
    path = "/api/simple-sites/{id}",
    params(("id" = i32, Path, description = "Site id")),
    responses(
        (status = 200, description = "Site record", body = OperationDataResult<SiteDto>),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["simple-sites"],
    operation_id = "getSimpleSite"
)]
#[get("/simple-sites/{id}")]
pub async fn edit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    Ok(HttpResponse::Ok().json(state.simple_sites.edit(path.into_inner()).await))
}

#[utoipa::path(
    put,
    path = "/api/simple-sites",
    request_body = SimpleSiteModel,
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["simple-sites"],
    operation_id = "updateSimpleSite"
)]
#[put("/simple-sites")]
pub async fn update(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SimpleSiteModel>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    Ok(HttpResponse::Ok().json(state.simple_sites.update(&payload).await))
}

#[utoipa::path(
    delete,
    path = "/api/simple-sites/{id}",
    params(("id" = i32, Path, description = "Site id")),
    responses(
        (status = 200, description = "Outcome envelope", body = OperationResult),
        (status = 401, description = "Login required", body = OperationResult)
    ),
    tags = ["simple-sites"],
    operation_id = "deleteSimpleSite"
)]
#[delete("/simple-sites/{id}")]
pub async fn remove(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    Ok(HttpResponse::Ok().json(state.simple_sites.delete(path.into_inner()).await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::domain::messages;
    use crate::inbound::http::test_utils::{MockPorts, call_as};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn index_serialises_sites_in_camel_case() {
        let mut ports = MockPorts::default();
        ports.simple_sites.expect_index().return_once(|| {
            OperationDataResult::success(vec![SiteDto {
                site_id: 1,
                site_name: "Ada Lovelace".into(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                customer_no: None,
                otp_code: Some(123_456),
                unit_id: None,
                worker_uid: Some(10),
            }])
        });

        let res = call_as(
            ports.into_state(),
            Some(Role::User),
            test::TestRequest::get().uri("/api/simple-sites"),
        )
        .await;

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["model"][0]["siteName"], json!("Ada Lovelace"));
        assert_eq!(body["model"][0]["workerUid"], json!(10));
    }

    #[actix_web::test]
    async fn create_forwards_the_names() {
        let mut ports = MockPorts::default();
        ports
            .simple_sites
            .expect_create()
            .withf(|model| model.user_first_name == "Grace" && model.user_last_name == "Hopper")
            .return_once(|_| OperationResult::failure(messages::YOU_NEED_TO_BUY_MORE_LICENSES));

        let res = call_as(
            ports.into_state(),
            Some(Role::Admin),
            test::TestRequest::post()
                .uri("/api/simple-sites")
                .set_json(json!({"userFirstName": "Grace", "userLastName": "Hopper"})),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], json!(messages::YOU_NEED_TO_BUY_MORE_LICENSES));
    }

    #[rstest]
    #[case(test::TestRequest::get().uri("/api/simple-sites"))]
    #[case(test::TestRequest::get().uri("/api/simple-sites/1"))]
    #[case(test::TestRequest::delete().uri("/api/simple-sites/1"))]
    #[actix_web::test]
    async fn anonymous_calls_are_unauthorised(#[case] req: test::TestRequest) {
        let res = call_as(MockPorts::default().into_state(), None, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn delete_passes_the_path_id() {
        let mut ports = MockPorts::default();
        ports
            .simple_sites
            .expect_delete()
            .with(eq(8))
            .return_once(|_| OperationResult::success_with("DeviceUserParamDeletedSuccessfully(Ada Lovelace)"));

        let res = call_as(
            ports.into_state(),
            Some(Role::User),
            test::TestRequest::delete().uri("/api/simple-sites/8"),
        )
        .await;

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], json!(true));
    }
}
