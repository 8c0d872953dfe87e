//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::ports::{
    MockAccountApi, MockAdminApi, MockAuthApi, MockCasesApi, MockSettingsApi, MockSimpleSitesApi,
};
use crate::domain::{Role, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub const TEST_USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Session cookie set by a response.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

pub fn test_user_id() -> UserId {
    UserId::new(TEST_USER_ID).expect("fixture id")
}

/// One mock per driving port; set expectations before calling
/// [`MockPorts::into_state`], which lets any signed-in test user keep the
/// `admin` role unless a test expects `current_role` itself.
#[derive(Default)]
pub struct MockPorts {
    pub account: MockAccountApi,
    pub admin: MockAdminApi,
    pub auth: MockAuthApi,
    pub cases: MockCasesApi,
    pub settings: MockSettingsApi,
    pub simple_sites: MockSimpleSitesApi,
}

impl MockPorts {
    pub fn into_state(mut self) -> HttpState {
        self.auth
            .expect_current_role()
            .returning(|_| Some(Role::Admin));
        HttpState {
            account: Arc::new(self.account),
            admin: Arc::new(self.admin),
            auth: Arc::new(self.auth),
            cases: Arc::new(self.cases),
            settings: Arc::new(self.settings),
            simple_sites: Arc::new(self.simple_sites),
        }
    }
}

async fn sign_in(session: SessionContext, role: web::Path<Role>) -> ApiResult<HttpResponse> {
    session.persist_user(&test_user_id(), Some(role.as_str()))?;
    Ok(HttpResponse::Ok().finish())
}

/// Application with every API route plus `GET /test/sign-in/{role}`, which
/// stores [`TEST_USER_ID`] in the session with the given role.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .route("/test/sign-in/{role}", web::get().to(sign_in))
        .configure(crate::inbound::http::configure)
}

/// Build the test app, optionally sign in with `role`, then send `req`
/// carrying the session cookie.
pub async fn call_as(state: HttpState, role: Option<Role>, req: test::TestRequest) -> ServiceResponse {
    let app = test::init_service(test_app(state)).await;
    let req = match role {
        Some(role) => {
            let signed_in = test::call_service(
                &app,
                test::TestRequest::get()
                    .uri(&format!("/test/sign-in/{role}"))
                    .to_request(),
            )
            .await;
            req.cookie(session_cookie(&signed_in))
        }
        None => req,
    };
    test::call_service(&app, req.to_request()).await
}
