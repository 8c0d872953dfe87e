//! Ports for the domain SDK ("core") that owns cases, sites and workers.
//!
//! Services obtain a [`Core`] handle per call through a [`CoreProvider`]
//! because the handle only exists once initial setup has stored a valid SDK
//! connection string.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    CaseHandle, CaseQuery, CaseSummary, ReplyElement, SiteDto, SiteNameDto, WorkerDto,
};

/// Nested error text the SDK reports when the licence quota is exhausted.
pub const PAYMENT_REQUIRED_TEXT: &str =
    "The remote server returned an error: (402) Payment Required.";

const PAYMENT_REQUIRED_STATUS: u16 = 402;

/// Errors raised by core adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// No SDK connection is configured yet.
    #[error("core is not configured")]
    NotConfigured,
    /// The SDK could not be reached.
    #[error("core unavailable: {message}")]
    Unavailable { message: String },
    /// The SDK answered with an error, optionally carrying the remote status
    /// code and the nested error text.
    #[error("core request failed: {message}")]
    Remote {
        message: String,
        status: Option<u16>,
        inner: Option<String>,
    },
}

impl CoreError {
    pub fn not_configured() -> Self {
        Self::NotConfigured
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn remote(message: impl Into<String>, status: Option<u16>, inner: Option<String>) -> Self {
        Self::Remote {
            message: message.into(),
            status,
            inner,
        }
    }

    /// Whether the SDK refused the request because more licences are needed.
    ///
    /// Prefers the typed status; falls back to the nested error text for
    /// collaborators that only report a message.
    ///
    /// # Examples
    /// ```
    /// use eform_base::domain::ports::{CoreError, PAYMENT_REQUIRED_TEXT};
    ///
    /// assert!(CoreError::remote("site create failed", Some(402), None).is_payment_required());
    /// assert!(
    ///     CoreError::remote("site create failed", None, Some(PAYMENT_REQUIRED_TEXT.to_owned()))
    ///         .is_payment_required()
    /// );
    /// assert!(!CoreError::unavailable("down").is_payment_required());
    /// ```
    pub fn is_payment_required(&self) -> bool {
        match self {
            Self::Remote { status, inner, .. } => {
                *status == Some(PAYMENT_REQUIRED_STATUS)
                    || inner.as_deref().map(str::trim) == Some(PAYMENT_REQUIRED_TEXT)
            }
            Self::NotConfigured | Self::Unavailable { .. } => false,
        }
    }
}

/// Operations of a connected SDK handle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Core: Send + Sync {
    /// Public address devices use to reach the server.
    async fn http_server_address(&self) -> Result<String, CoreError>;

    async fn set_http_server_address(&self, address: &str) -> Result<(), CoreError>;

    /// Non-removed cases matching the query.
    async fn case_read_all(&self, query: &CaseQuery) -> Result<Vec<CaseSummary>, CoreError>;

    async fn case_read_by_case_id(&self, id: i32) -> Result<Option<CaseHandle>, CoreError>;

    async fn case_read(&self, handle: &CaseHandle) -> Result<Option<ReplyElement>, CoreError>;

    async fn case_delete(&self, id: i32) -> Result<bool, CoreError>;

    async fn case_update(
        &self,
        id: i32,
        field_values: &[String],
        check_list_values: &[String],
    ) -> Result<bool, CoreError>;

    /// Recompute the denormalised field values after an update.
    async fn case_update_field_values(&self, id: i32) -> Result<bool, CoreError>;

    async fn site_read_all(&self, include_removed: bool) -> Result<Vec<SiteDto>, CoreError>;

    /// Create a site with a worker; `None` when the SDK declines silently.
    async fn site_create(
        &self,
        name: &str,
        first_name: &str,
        last_name: &str,
        email: Option<String>,
    ) -> Result<Option<SiteDto>, CoreError>;

    async fn site_read(&self, id: i32) -> Result<Option<SiteDto>, CoreError>;

    async fn site_update(
        &self,
        id: i32,
        name: &str,
        first_name: &str,
        last_name: &str,
        email: Option<String>,
    ) -> Result<bool, CoreError>;

    async fn worker_read(&self, worker_uid: i32) -> Result<Option<WorkerDto>, CoreError>;

    async fn site_item_read(&self, id: i32) -> Result<Option<SiteNameDto>, CoreError>;

    async fn site_delete(&self, site_uid: i32) -> Result<bool, CoreError>;
}

/// Hands out the current [`Core`] handle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CoreProvider: Send + Sync {
    async fn core(&self) -> Result<Arc<dyn Core>, CoreError>;
}

/// Provider that always returns the same handle.
#[derive(Clone)]
pub struct StaticCoreProvider {
    core: Arc<dyn Core>,
}

impl StaticCoreProvider {
    pub fn new(core: Arc<dyn Core>) -> Self {
        Self { core }
    }
}

#[async_trait]
impl CoreProvider for StaticCoreProvider {
    async fn core(&self) -> Result<Arc<dyn Core>, CoreError> {
        Ok(Arc::clone(&self.core))
    }
}
