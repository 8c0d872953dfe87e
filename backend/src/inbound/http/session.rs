//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session so handlers only deal with domain-friendly
//! operations: persisting the signed-in user with their role, reading it
//! back, and requiring an administrator.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::AuthApi;
use crate::domain::{Role, UserId};
use crate::inbound::http::error::ApiError;

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USER_ROLE_KEY: &str = "user_role";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the signed-in user and their role, rotating the session id.
    pub fn persist_user(&self, user_id: &UserId, role: Option<&str>) -> Result<(), ApiError> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|err| ApiError::session(format!("failed to persist session: {err}")))?;
        match role.and_then(Role::parse) {
            Some(role) => self
                .0
                .insert(USER_ROLE_KEY, role.as_str())
                .map_err(|err| ApiError::session(format!("failed to persist role: {err}"))),
            None => {
                self.0.remove(USER_ROLE_KEY);
                Ok(())
            }
        }
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, ApiError> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|err| ApiError::session(format!("failed to read session: {err}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(err) => {
                    warn!("invalid user id in session cookie: {err}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Role stored at sign-in, if any.
    pub fn role(&self) -> Result<Option<Role>, ApiError> {
        let role = self
            .0
            .get::<String>(USER_ROLE_KEY)
            .map_err(|err| ApiError::session(format!("failed to read session: {err}")))?;
        Ok(role.as_deref().and_then(Role::parse))
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, ApiError> {
        self.user_id()?.ok_or(ApiError::Unauthorized)
    }

    /// Require an authenticated administrator; other users get `403`.
    pub fn require_admin(&self) -> Result<UserId, ApiError> {
        let user_id = self.require_user_id()?;
        match self.role()? {
            Some(Role::Admin) => Ok(user_id),
            _ => Err(ApiError::Forbidden),
        }
    }

    /// Like [`Self::require_admin`], but also confirm with the identity store
    /// that the account still exists and still holds the `admin` role.
    /// Sessions of deleted accounts are purged and answer `401`.
    pub async fn require_current_admin(&self, auth: &dyn AuthApi) -> Result<UserId, ApiError> {
        let user_id = self.require_admin()?;
        match auth.current_role(&user_id).await {
            Some(Role::Admin) => Ok(user_id),
            Some(_) => {
                warn!(user_id = %user_id, "session role no longer held");
                Err(ApiError::Forbidden)
            }
            None => {
                warn!(user_id = %user_id, "session refers to a missing account");
                self.purge();
                Err(ApiError::Unauthorized)
            }
        }
    }

    /// Drop everything stored for this client.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
