//! Typed failures raised inside services before they reach the envelope.
//!
//! Services compute `Result<T, ServiceFailure>` and convert to
//! [`crate::domain::OperationResult`] at their public boundary, so failure
//! kinds stay explicit until the very last step.

use std::fmt;

use tracing::{info, warn};

/// Failure category; never serialised to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A referenced user, site or case is absent.
    NotFound,
    /// A collaborator rejected the input (for example password policy).
    Validation,
    /// A precondition does not hold (for example setup already completed).
    Conflict,
    /// A collaborator failed (network, SDK or store error).
    External,
    /// The SDK reported that more licences are required.
    LicenseLimit,
    /// Anything else.
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::External => "external",
            Self::LicenseLimit => "license_limit",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Failure with a category and an optional user-facing message.
///
/// # Examples
/// ```
/// use eform_base::domain::{FailureKind, ServiceFailure};
///
/// let failure = ServiceFailure::not_found("User not found");
/// assert_eq!(failure.kind(), FailureKind::NotFound);
/// assert_eq!(failure.message(), Some("User not found"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {}", .message.as_deref().unwrap_or("<no message>"))]
pub struct ServiceFailure {
    kind: FailureKind,
    message: Option<String>,
}

impl ServiceFailure {
    /// Build a failure from its parts.
    pub fn new(kind: FailureKind, message: Option<String>) -> Self {
        Self { kind, message }
    }

    /// Convenience constructor for [`FailureKind::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NotFound, Some(message.into()))
    }

    /// Convenience constructor for [`FailureKind::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Validation, Some(message.into()))
    }

    /// Convenience constructor for [`FailureKind::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Conflict, Some(message.into()))
    }

    /// Convenience constructor for [`FailureKind::External`].
    pub fn external(message: impl Into<String>) -> Self {
        Self::new(FailureKind::External, Some(message.into()))
    }

    /// Convenience constructor for [`FailureKind::LicenseLimit`].
    pub fn license_limit(message: impl Into<String>) -> Self {
        Self::new(FailureKind::LicenseLimit, Some(message.into()))
    }

    /// Convenience constructor for [`FailureKind::Unknown`].
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unknown, Some(message.into()))
    }

    /// A failure of the given kind that deliberately carries no message.
    pub fn silent(kind: FailureKind) -> Self {
        Self::new(kind, None)
    }

    /// Failure category.
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// User-facing message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Consume the failure and keep only its message.
    pub fn into_message(self) -> Option<String> {
        self.message
    }
}

/// Join collaborator error messages with a separator.
///
/// # Examples
/// ```
/// use eform_base::domain::join_errors;
///
/// let errors = vec!["too short".to_owned(), "needs a digit".to_owned()];
/// assert_eq!(join_errors(&errors, ", "), "too short, needs a digit");
/// ```
pub fn join_errors(errors: &[String], separator: &str) -> String {
    errors.join(separator)
}

/// Log a failed outcome before a service folds it into an envelope.
///
/// Collaborator failures are logged at `warn`; expected outcomes such as
/// "not found" or a rejected input at `info`.
pub(crate) fn settle<T>(
    operation: &'static str,
    result: Result<T, ServiceFailure>,
) -> Result<T, ServiceFailure> {
    if let Err(failure) = &result {
        let detail = failure.message().unwrap_or_default();
        match failure.kind() {
            FailureKind::External | FailureKind::Unknown | FailureKind::LicenseLimit => {
                warn!(operation, kind = %failure.kind(), detail, "operation failed");
            }
            FailureKind::NotFound | FailureKind::Validation | FailureKind::Conflict => {
                info!(operation, kind = %failure.kind(), detail, "operation rejected");
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ServiceFailure::not_found("x"), FailureKind::NotFound)]
    #[case(ServiceFailure::validation("x"), FailureKind::Validation)]
    #[case(ServiceFailure::conflict("x"), FailureKind::Conflict)]
    #[case(ServiceFailure::external("x"), FailureKind::External)]
    #[case(ServiceFailure::license_limit("x"), FailureKind::LicenseLimit)]
    #[case(ServiceFailure::unknown("x"), FailureKind::Unknown)]
    fn constructors_set_kind(#[case] failure: ServiceFailure, #[case] kind: FailureKind) {
        assert_eq!(failure.kind(), kind);
        assert_eq!(failure.message(), Some("x"));
    }

    #[rstest]
    fn display_includes_kind_and_message() {
        let failure = ServiceFailure::conflict("already there");
        assert_eq!(failure.to_string(), "conflict: already there");
    }

    #[rstest]
    fn silent_failure_displays_placeholder() {
        let failure = ServiceFailure::silent(FailureKind::NotFound);
        assert_eq!(failure.to_string(), "not_found: <no message>");
        assert!(failure.into_message().is_none());
    }

    #[rstest]
    fn settle_passes_results_through() {
        let ok: Result<u8, ServiceFailure> = Ok(3);
        assert_eq!(settle("op", ok), Ok(3));
        let failed: Result<u8, ServiceFailure> = Err(ServiceFailure::external("down"));
        assert_eq!(settle("op", failed), Err(ServiceFailure::external("down")));
    }

    #[rstest]
    #[case(&[], "")]
    #[case(&["one"], "one")]
    #[case(&["one", "two"], "one two")]
    fn join_errors_uses_separator(#[case] parts: &[&str], #[case] expected: &str) {
        let errors: Vec<String> = parts.iter().map(|part| (*part).to_owned()).collect();
        assert_eq!(join_errors(&errors, " "), expected);
    }
}
