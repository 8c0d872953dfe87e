//! Driving port for device users ("simple sites").

use async_trait::async_trait;

use crate::domain::{OperationDataResult, OperationResult, SimpleSiteModel, SiteDto};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SimpleSitesApi: Send + Sync {
    /// Every non-removed site.
    async fn index(&self) -> OperationDataResult<Vec<SiteDto>>;

    async fn create(&self, model: &SimpleSiteModel) -> OperationResult;

    async fn edit(&self, id: i32) -> OperationDataResult<SiteDto>;

    async fn update(&self, model: &SimpleSiteModel) -> OperationResult;

    async fn delete(&self, id: i32) -> OperationResult;
}
