//! Uniform outcome envelope returned by every service operation.
//!
//! Adapters never see collaborator errors directly: each service converts its
//! internal [`ServiceFailure`] into one of these envelopes before returning.
//! The wire shape is `{"success": bool, "message": string?, "model": T?}`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::failure::ServiceFailure;

/// Outcome of an operation without a payload.
///
/// ## Invariants
/// - Immutable once constructed.
/// - `message` is optional for both outcomes; failures should carry one.
///
/// # Examples
/// ```
/// use eform_base::domain::OperationResult;
///
/// let ok = OperationResult::success();
/// assert!(ok.is_success());
/// assert!(ok.message().is_none());
///
/// let failed = OperationResult::failure("User not found");
/// assert!(!failed.is_success());
/// assert_eq!(failed.message(), Some("User not found"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl OperationResult {
    /// Raw constructor mirroring `(success, message?)`.
    pub fn new(success: bool, message: Option<String>) -> Self {
        Self { success, message }
    }

    /// Silent success.
    pub fn success() -> Self {
        Self::new(true, None)
    }

    /// Success carrying a user-facing message.
    pub fn success_with(message: impl Into<String>) -> Self {
        Self::new(true, Some(message.into()))
    }

    /// Failure carrying a user-facing message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(false, Some(message.into()))
    }

    /// Failure without a message.
    pub fn failure_silent() -> Self {
        Self::new(false, None)
    }

    /// Success carrying the computed message, or the failure.
    pub fn from_message(result: Result<String, ServiceFailure>) -> Self {
        match result {
            Ok(message) => Self::success_with(message),
            Err(failure) => failure.into(),
        }
    }

    /// Whether the operation succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Message attached to the outcome, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl From<ServiceFailure> for OperationResult {
    fn from(value: ServiceFailure) -> Self {
        Self::new(false, value.into_message())
    }
}

impl From<Result<(), ServiceFailure>> for OperationResult {
    fn from(value: Result<(), ServiceFailure>) -> Self {
        match value {
            Ok(()) => Self::success(),
            Err(failure) => failure.into(),
        }
    }
}

/// Outcome of an operation that may carry a payload.
///
/// ## Invariants
/// - A payload is expected only on success. The raw [`OperationDataResult::new`]
///   constructor does not enforce this; the named constructors do.
///
/// # Examples
/// ```
/// use eform_base::domain::OperationDataResult;
///
/// let ok = OperationDataResult::success("en-US".to_owned());
/// assert_eq!(ok.model().map(String::as_str), Some("en-US"));
///
/// let failed: OperationDataResult<String> = OperationDataResult::failure("nope");
/// assert!(failed.model().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationDataResult<T> {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    model: Option<T>,
}

impl<T> OperationDataResult<T> {
    /// Raw constructor mirroring `(success, payload?, message?)`.
    pub fn new(success: bool, model: Option<T>, message: Option<String>) -> Self {
        Self {
            success,
            message,
            model,
        }
    }

    /// Success carrying a payload.
    pub fn success(model: T) -> Self {
        Self::new(true, Some(model), None)
    }

    /// Success carrying both a payload and a message.
    pub fn success_with(model: T, message: impl Into<String>) -> Self {
        Self::new(true, Some(model), Some(message.into()))
    }

    /// Failure carrying a user-facing message and no payload.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(false, None, Some(message.into()))
    }

    /// Failure without message or payload.
    pub fn failure_silent() -> Self {
        Self::new(false, None, None)
    }

    /// Whether the operation succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Message attached to the outcome, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Borrow the payload, if any.
    pub fn model(&self) -> Option<&T> {
        self.model.as_ref()
    }

    /// Consume the envelope and return the payload, if any.
    pub fn into_model(self) -> Option<T> {
        self.model
    }

    /// Drop the payload and keep the outcome.
    pub fn without_model(self) -> OperationResult {
        OperationResult::new(self.success, self.message)
    }
}

impl<T> From<ServiceFailure> for OperationDataResult<T> {
    fn from(value: ServiceFailure) -> Self {
        Self::new(false, None, value.into_message())
    }
}

impl<T> From<Result<T, ServiceFailure>> for OperationDataResult<T> {
    fn from(value: Result<T, ServiceFailure>) -> Self {
        match value {
            Ok(model) => Self::success(model),
            Err(failure) => failure.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Envelope construction and wire-shape coverage.
    use super::*;
    use crate::domain::failure::FailureKind;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(OperationResult::failure("boom"))]
    #[case(OperationResult::failure_silent())]
    #[case(OperationResult::from(ServiceFailure::not_found("missing")))]
    #[case(OperationResult::from(ServiceFailure::new(FailureKind::Unknown, None)))]
    fn failure_envelopes_are_never_successful(#[case] envelope: OperationResult) {
        assert!(!envelope.is_success());
    }

    #[rstest]
    #[case(OperationDataResult::<u32>::failure("boom"))]
    #[case(OperationDataResult::<u32>::failure_silent())]
    #[case(OperationDataResult::<u32>::from(ServiceFailure::external("sdk down")))]
    fn failure_data_envelopes_carry_no_payload(#[case] envelope: OperationDataResult<u32>) {
        assert!(!envelope.is_success());
        assert!(envelope.model().is_none());
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec!["a".to_owned(), "b".to_owned()])]
    fn success_data_envelope_echoes_payload(#[case] payload: Vec<String>) {
        let envelope = OperationDataResult::success(payload.clone());
        assert!(envelope.is_success());
        assert_eq!(envelope.into_model(), Some(payload));
    }

    #[rstest]
    fn silent_success_serialises_without_message() {
        let value = serde_json::to_value(OperationResult::success()).expect("serialise");
        assert_eq!(value, json!({ "success": true }));
    }

    #[rstest]
    fn data_envelope_uses_model_field_on_the_wire() {
        let envelope = OperationDataResult::success_with(7_u32, "done");
        let value = serde_json::to_value(&envelope).expect("serialise");
        assert_eq!(value, json!({ "success": true, "message": "done", "model": 7 }));
    }

    #[rstest]
    fn failed_data_envelope_serialises_null_model() {
        let envelope: OperationDataResult<u32> = OperationDataResult::failure("nope");
        let value = serde_json::to_value(&envelope).expect("serialise");
        assert_eq!(value, json!({ "success": false, "message": "nope", "model": null }));
    }

    #[rstest]
    fn result_conversion_keeps_failure_message() {
        let outcome: Result<(), ServiceFailure> = Err(ServiceFailure::conflict("exists"));
        let envelope = OperationResult::from(outcome);
        assert_eq!(envelope.message(), Some("exists"));
    }

    #[rstest]
    fn without_model_keeps_outcome() {
        let envelope = OperationDataResult::success_with(1_u8, "kept").without_model();
        assert_eq!(envelope, OperationResult::success_with("kept"));
    }
}
