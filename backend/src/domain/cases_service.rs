//! Case listing, reply loading, deletion and reply updates.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};

use crate::domain::failure::settle;
use crate::domain::ports::{CasesApi, Core, CoreError, CoreProvider, Localizer};
use crate::domain::{
    CaseListModel, CaseQuery, CaseRequestModel, CaseUpdate, OperationDataResult, OperationResult,
    ReplyElement, ReplyRequest, ServiceFailure, messages,
};

/// Cases service implementing [`CasesApi`].
#[derive(Clone)]
pub struct CasesService {
    core: Arc<dyn CoreProvider>,
    localizer: Arc<dyn Localizer>,
}

impl CasesService {
    pub fn new(core: Arc<dyn CoreProvider>, localizer: Arc<dyn Localizer>) -> Self {
        Self { core, localizer }
    }

    fn core_failure(&self, operation: &'static str, key: &str, err: CoreError) -> ServiceFailure {
        error!(operation, error = %err, "core call failed");
        ServiceFailure::external(self.localizer.text(key))
    }

    async fn connected(&self, operation: &'static str, key: &str) -> Result<Arc<dyn Core>, ServiceFailure> {
        self.core
            .core()
            .await
            .map_err(|err| self.core_failure(operation, key, err))
    }

    async fn list(&self, request: &CaseRequestModel) -> Result<CaseListModel, ServiceFailure> {
        const KEY: &str = messages::CASE_LOADING_FAILED;
        let core = self.connected("cases_index", KEY).await?;
        let cases = core
            .case_read_all(&CaseQuery::from(request))
            .await
            .map_err(|err| self.core_failure("cases_index", KEY, err))?;
        Ok(CaseListModel {
            num_of_elements: cases.len(),
            page_num: request.page_index,
            cases,
        })
    }

    async fn load(&self, id: i32) -> Result<ReplyElement, ServiceFailure> {
        const KEY: &str = messages::CASE_COULD_NOT_BE_LOADED;
        let not_found = || ServiceFailure::not_found(self.localizer.text(messages::CASE_NOT_FOUND));

        let core = self.connected("cases_edit", KEY).await?;
        let handle = core
            .case_read_by_case_id(id)
            .await
            .map_err(|err| self.core_failure("cases_edit", KEY, err))?
            .ok_or_else(not_found)?;
        let mut reply = core
            .case_read(&handle)
            .await
            .map_err(|err| self.core_failure("cases_edit", KEY, err))?
            .ok_or_else(not_found)?;
        reply.id = id;
        Ok(reply)
    }

    async fn remove(&self, id: i32) -> Result<String, ServiceFailure> {
        const KEY: &str = messages::CASE_COULD_NOT_BE_REMOVED;
        let core = self.connected("cases_delete", KEY).await?;
        let deleted = core
            .case_delete(id)
            .await
            .map_err(|err| self.core_failure("cases_delete", KEY, err))?;
        if deleted {
            Ok(self.localizer.localize(messages::CASE_DELETED, &[id.to_string()]))
        } else {
            Err(ServiceFailure::external(self.localizer.text(KEY)))
        }
    }

    async fn apply_reply(&self, request: &ReplyRequest) -> Result<String, ServiceFailure> {
        const KEY: &str = messages::CASE_COULD_NOT_BE_UPDATED;
        let update = CaseUpdate::from_elements(&request.elements);
        let core = self.connected("cases_update", KEY).await?;

        let updated = core
            .case_update(request.id, &update.field_values, &update.check_list_values)
            .await
            .map_err(|err| self.core_failure("cases_update", KEY, err))?;
        if !updated {
            return Err(ServiceFailure::external(self.localizer.text(KEY)));
        }

        let refreshed = core
            .case_update_field_values(request.id)
            .await
            .map_err(|err| self.core_failure("cases_update", KEY, err))?;
        if !refreshed {
            warn!(case_id = request.id, "field value refresh reported no change");
        }
        Ok(self.localizer.text(messages::CASE_HAS_BEEN_UPDATED))
    }
}

#[async_trait]
impl CasesApi for CasesService {
    async fn index(&self, request: &CaseRequestModel) -> OperationDataResult<CaseListModel> {
        settle("cases_index", self.list(request).await).into()
    }

    async fn edit(&self, id: i32) -> OperationDataResult<ReplyElement> {
        settle("cases_edit", self.load(id).await).into()
    }

    async fn delete(&self, id: i32) -> OperationResult {
        OperationResult::from_message(settle("cases_delete", self.remove(id).await))
    }

    async fn update(&self, request: &ReplyRequest) -> OperationResult {
        OperationResult::from_message(settle("cases_update", self.apply_reply(request).await))
    }
}
