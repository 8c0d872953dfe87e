//! HTTP adapter errors.
//!
//! Services never fail at the transport level: their outcome always travels
//! in the envelope. The errors here cover what happens before a service is
//! reached (missing session, wrong role, unreadable session cookie) and are
//! rendered with the same envelope shape so clients parse one body format.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;
use tracing::error;

use crate::domain::OperationResult;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("login required")]
    Unauthorized,
    #[error("administrator role required")]
    Forbidden,
    #[error("session store failure: {0}")]
    Session(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Message safe to return to clients.
    fn public_message(&self) -> String {
        match self {
            Self::Session(_) => "Internal server error".to_owned(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::Session(detail) = self {
            error!(detail = %detail, "session failure");
        }
        HttpResponse::build(self.status_code())
            .json(OperationResult::failure(self.public_message()))
    }
}
