//! End-to-end HTTP flows over the in-process adapters.
//!
//! Each test drives the plugin routes through Actix with a cookie session,
//! starting from an empty settings document.

mod support;

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test};
use eform_base::plugin::EformPlugin;
use rstest::rstest;
use serde_json::{Value, json};
use support::{
    ADMIN_PASSWORD, SITE_ADDRESS, Stack, login_payload, login_payload_for, setup_payload,
};

fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

async fn json_of(response: ServiceResponse) -> Value {
    assert!(response.status().is_success(), "status {}", response.status());
    test::read_body_json(response).await
}

macro_rules! plugin_app {
    ($stack:expr) => {
        test::init_service(
            App::new()
                .wrap(support::session_middleware())
                .configure(|cfg| $stack.plugin.configure(cfg)),
        )
        .await
    };
}

async fn run_setup<S>(app: &S) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/settings/connection-string")
        .set_json(setup_payload())
        .to_request();
    json_of(test::call_service(app, request).await).await
}

async fn sign_in_as<S>(app: &S, payload: Value) -> (Cookie<'static>, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/auth/token")
        .set_json(payload)
        .to_request();
    let response = test::call_service(app, request).await;
    let cookie = session_cookie(&response);
    let body = json_of(response).await;
    assert_eq!(body["success"], true);
    (cookie, body["model"].clone())
}

async fn sign_in<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    sign_in_as(app, login_payload(ADMIN_PASSWORD)).await.0
}

#[actix_web::test]
async fn setup_runs_once_and_reports_existing_connection_strings() {
    let stack = support::stack();
    let app = plugin_app!(stack);

    let probe = test::TestRequest::get()
        .uri("/api/settings/connection-string-exist")
        .to_request();
    let before = json_of(test::call_service(&app, probe).await).await;
    assert_eq!(before["success"], false);
    assert_eq!(before["message"], "Connection string does not exist");

    let first = run_setup(&app).await;
    assert_eq!(first["success"], true);

    let second = run_setup(&app).await;
    assert_eq!(second["success"], false);
    assert_eq!(second["message"], "Connection string already exists");

    let probe = test::TestRequest::get()
        .uri("/api/settings/connection-string-exist")
        .to_request();
    let after = json_of(test::call_service(&app, probe).await).await;
    assert_eq!(after["success"], true);

    let document = std::fs::read_to_string(stack.settings_path.as_std_path())
        .expect("settings document written");
    let document: Value = serde_json::from_str(&document).expect("settings document is JSON");
    assert_eq!(
        document["ConnectionStrings"]["SdkConnection"],
        "Data Source=sql.local;Initial Catalog=eform_sdk;User ID=sa;Password=pw"
    );
}

#[rstest]
#[case("wrong-password")]
#[case("")]
#[actix_web::test]
async fn login_with_bad_credentials_sets_no_session(#[case] password: &str) {
    let stack = support::stack();
    let app = plugin_app!(stack);
    run_setup(&app).await;

    let request = test::TestRequest::post()
        .uri("/api/auth/token")
        .set_json(login_payload(password))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert!(
        response
            .response()
            .cookies()
            .all(|cookie| cookie.name() != "session")
    );
    let body = json_of(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Incorrect password or user name");
}

#[actix_web::test]
async fn admin_login_exposes_identity_and_admin_routes() {
    let stack = support::stack();
    let app = plugin_app!(stack);
    run_setup(&app).await;

    let request = test::TestRequest::post()
        .uri("/api/auth/token")
        .set_json(login_payload(ADMIN_PASSWORD))
        .to_request();
    let response = test::call_service(&app, request).await;
    let cookie = session_cookie(&response);
    let body = json_of(response).await;
    assert_eq!(body["model"]["userName"], "admin");
    assert_eq!(body["model"]["role"], "admin");

    let request = test::TestRequest::get()
        .uri("/api/admin/users?pageSize=10")
        .cookie(cookie.clone())
        .to_request();
    let users = json_of(test::call_service(&app, request).await).await;
    assert_eq!(users["success"], true);

    let request = test::TestRequest::get()
        .uri("/api/auth/logout")
        .cookie(cookie)
        .to_request();
    let logout = json_of(test::call_service(&app, request).await).await;
    assert_eq!(logout["success"], true);
}

#[actix_web::test]
async fn protected_routes_require_a_session() {
    let stack = support::stack();
    let app = plugin_app!(stack);
    run_setup(&app).await;

    for uri in [
        "/api/simple-sites",
        "/api/settings/admin",
        "/api/account/user-info",
    ] {
        let request = test::TestRequest::get().uri(uri).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED, "{uri}");
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["success"], false);
    }
}

#[actix_web::test]
async fn admin_settings_round_trip_through_the_settings_document() {
    let stack = support::stack();
    let app = plugin_app!(stack);
    run_setup(&app).await;
    let cookie = sign_in(&app).await;

    let request = test::TestRequest::get()
        .uri("/api/settings/admin")
        .cookie(cookie.clone())
        .to_request();
    let mut settings = json_of(test::call_service(&app, request).await).await["model"].clone();
    assert_eq!(settings["siteLink"], SITE_ADDRESS);
    assert_eq!(settings["assemblyVersion"], env!("CARGO_PKG_VERSION"));

    settings["smtpSettingsModel"] = json!({
        "host": "smtp.example.test",
        "port": "2525",
        "login": "mailer",
        "password": "mail-secret"
    });
    settings["loginPageSettingsModel"]["mainText"] = json!("Welcome");
    settings["siteLink"] = json!("https://forms.example.test");
    let request = test::TestRequest::post()
        .uri("/api/settings/admin")
        .cookie(cookie.clone())
        .set_json(&settings)
        .to_request();
    let update = json_of(test::call_service(&app, request).await).await;
    assert_eq!(update["message"], "Settings have been updated successfully");

    let request = test::TestRequest::get()
        .uri("/api/settings/login-page")
        .to_request();
    let login_page = json_of(test::call_service(&app, request).await).await;
    assert_eq!(login_page["model"]["mainText"], "Welcome");

    let request = test::TestRequest::get()
        .uri("/api/settings/admin")
        .cookie(cookie)
        .to_request();
    let reread = json_of(test::call_service(&app, request).await).await;
    assert_eq!(reread["model"]["smtpSettingsModel"]["port"], "2525");
    assert_eq!(reread["model"]["siteLink"], "https://forms.example.test");
}

#[actix_web::test]
async fn device_users_are_created_listed_and_limited_by_licenses() {
    let stack: Stack = support::stack_with_license_limit(Some(1));
    let app = plugin_app!(stack);
    run_setup(&app).await;
    let cookie = sign_in(&app).await;

    let create = |first: &str| {
        test::TestRequest::post()
            .uri("/api/simple-sites")
            .cookie(cookie.clone())
            .set_json(json!({ "userFirstName": first, "userLastName": "Hopper" }))
            .to_request()
    };

    let created = json_of(test::call_service(&app, create("Grace")).await).await;
    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "Device user Grace Hopper created successfully");

    let refused = json_of(test::call_service(&app, create("Walter")).await).await;
    assert_eq!(refused["success"], false);
    assert_eq!(refused["message"], "You need to buy more licenses");

    let request = test::TestRequest::get()
        .uri("/api/simple-sites")
        .cookie(cookie)
        .to_request();
    let listed = json_of(test::call_service(&app, request).await).await;
    let sites = listed["model"].as_array().expect("site list");
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0]["siteName"], "Grace Hopper");
}

#[actix_web::test]
async fn admin_sessions_lose_access_once_the_account_changes() {
    let stack = support::stack();
    let app = plugin_app!(stack);
    run_setup(&app).await;
    let admin = sign_in(&app).await;

    let request = test::TestRequest::post()
        .uri("/api/admin/users")
        .cookie(admin.clone())
        .set_json(json!({
            "userName": "bob",
            "email": "bob@example.test",
            "firstName": "Bob",
            "lastName": "Builder",
            "role": "admin",
            "password": "Builder#42"
        }))
        .to_request();
    let created = json_of(test::call_service(&app, request).await).await;
    assert_eq!(created["success"], true);

    let (bob, identity) = sign_in_as(&app, login_payload_for("bob", "Builder#42")).await;
    let bob_id = identity["id"].as_str().expect("bob id").to_owned();
    let enable = |cookie: &Cookie<'static>| {
        test::TestRequest::post()
            .uri("/api/admin/two-factor/enable")
            .cookie(cookie.clone())
            .to_request()
    };
    let allowed = json_of(test::call_service(&app, enable(&bob)).await).await;
    assert_eq!(allowed["success"], true);

    let request = test::TestRequest::put()
        .uri("/api/admin/users")
        .cookie(admin.clone())
        .set_json(json!({
            "id": bob_id,
            "userName": "bob",
            "email": "bob@example.test",
            "firstName": "Bob",
            "lastName": "Builder",
            "role": "user"
        }))
        .to_request();
    let demoted = json_of(test::call_service(&app, request).await).await;
    assert_eq!(demoted["success"], true);
    let response = test::call_service(&app, enable(&bob)).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::FORBIDDEN);

    let request = test::TestRequest::delete()
        .uri(&format!("/api/admin/users/{bob_id}"))
        .cookie(admin)
        .to_request();
    let deleted = json_of(test::call_service(&app, request).await).await;
    assert_eq!(deleted["success"], true);
    let response = test::call_service(&app, enable(&bob)).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}
