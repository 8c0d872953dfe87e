//! Driving port for case records.

use async_trait::async_trait;

use crate::domain::{
    CaseListModel, CaseRequestModel, OperationDataResult, OperationResult, ReplyElement,
    ReplyRequest,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CasesApi: Send + Sync {
    async fn index(&self, request: &CaseRequestModel) -> OperationDataResult<CaseListModel>;

    async fn edit(&self, id: i32) -> OperationDataResult<ReplyElement>;

    async fn delete(&self, id: i32) -> OperationResult;

    async fn update(&self, request: &ReplyRequest) -> OperationResult;
}
