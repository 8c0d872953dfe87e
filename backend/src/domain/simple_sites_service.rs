//! Device user ("simple site") management through the core SDK.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::domain::failure::settle;
use crate::domain::ports::{Core, CoreError, CoreProvider, Localizer, SimpleSitesApi};
use crate::domain::{
    OperationDataResult, OperationResult, ServiceFailure, SimpleSiteModel, SiteDto, messages,
};

/// Device user service implementing [`SimpleSitesApi`].
#[derive(Clone)]
pub struct SimpleSitesService {
    core: Arc<dyn CoreProvider>,
    localizer: Arc<dyn Localizer>,
}

impl SimpleSitesService {
    pub fn new(core: Arc<dyn CoreProvider>, localizer: Arc<dyn Localizer>) -> Self {
        Self { core, localizer }
    }

    fn core_failure(&self, operation: &'static str, message: String, err: CoreError) -> ServiceFailure {
        error!(operation, error = %err, "core call failed");
        ServiceFailure::external(message)
    }

    async fn connected(
        &self,
        operation: &'static str,
        message: impl FnOnce() -> String,
    ) -> Result<Arc<dyn Core>, ServiceFailure> {
        match self.core.core().await {
            Ok(core) => Ok(core),
            Err(err) => Err(self.core_failure(operation, message(), err)),
        }
    }

    async fn list(&self) -> Result<Vec<SiteDto>, ServiceFailure> {
        let failed = || self.localizer.text(messages::DEVICE_USERS_COULD_NOT_BE_OBTAINED);
        let core = self.connected("sites_index", failed).await?;
        core.site_read_all(false)
            .await
            .map_err(|err| self.core_failure("sites_index", failed(), err))
    }

    async fn register(&self, model: &SimpleSiteModel) -> Result<String, ServiceFailure> {
        let failed = || self.localizer.text(messages::DEVICE_USER_COULD_NOT_BE_CREATED);
        let core = self.connected("sites_create", failed).await?;
        let site_name = model.full_name();

        let created = core
            .site_create(&site_name, &model.user_first_name, &model.user_last_name, None)
            .await
            .map_err(|err| {
                if err.is_payment_required() {
                    ServiceFailure::license_limit(
                        self.localizer.text(messages::YOU_NEED_TO_BUY_MORE_LICENSES),
                    )
                } else {
                    self.core_failure("sites_create", failed(), err)
                }
            })?;

        match created {
            Some(site) => Ok(self
                .localizer
                .localize(messages::DEVICE_USER_CREATED, &[site.site_name])),
            None => Err(ServiceFailure::external(failed())),
        }
    }

    async fn load(&self, id: i32) -> Result<SiteDto, ServiceFailure> {
        let failed = || {
            self.localizer
                .localize(messages::DEVICE_USER_COULD_NOT_BE_EDITED, &[id.to_string()])
        };
        let core = self.connected("sites_edit", failed).await?;
        core.site_read(id)
            .await
            .map_err(|err| self.core_failure("sites_edit", failed(), err))?
            .ok_or_else(|| ServiceFailure::not_found(failed()))
    }

    async fn modify(&self, model: &SimpleSiteModel) -> Result<String, ServiceFailure> {
        let failed = || self.localizer.text(messages::DEVICE_USER_COULD_NOT_BE_UPDATED);
        let not_found = || ServiceFailure::not_found(self.localizer.text(messages::DEVICE_USER_NOT_FOUND));
        let core = self.connected("sites_update", failed).await?;

        let site = core
            .site_read(model.id)
            .await
            .map_err(|err| self.core_failure("sites_update", failed(), err))?
            .ok_or_else(not_found)?;
        let worker_uid = site.worker_uid.ok_or_else(not_found)?;
        let worker = core
            .worker_read(worker_uid)
            .await
            .map_err(|err| self.core_failure("sites_update", failed(), err))?
            .ok_or_else(|| {
                ServiceFailure::not_found(
                    self.localizer.text(messages::DEVICE_USER_COULD_NOT_BE_OBTAINED),
                )
            })?;

        let updated = core
            .site_update(
                model.id,
                &model.full_name(),
                &model.user_first_name,
                &model.user_last_name,
                worker.email,
            )
            .await
            .map_err(|err| self.core_failure("sites_update", failed(), err))?;
        if updated {
            Ok(self.localizer.text(messages::DEVICE_USER_UPDATED))
        } else {
            Err(ServiceFailure::external(self.localizer.localize(
                messages::DEVICE_USER_PARAM_COULD_NOT_BE_UPDATED,
                &[model.id.to_string()],
            )))
        }
    }

    async fn remove(&self, id: i32) -> Result<String, ServiceFailure> {
        let failed_for = |subject: String| {
            self.localizer
                .localize(messages::DEVICE_USER_COULD_NOT_BE_DELETED, &[subject])
        };
        let core = self
            .connected("sites_delete", || failed_for(id.to_string()))
            .await?;

        let site = core
            .site_item_read(id)
            .await
            .map_err(|err| self.core_failure("sites_delete", failed_for(id.to_string()), err))?
            .ok_or_else(|| ServiceFailure::not_found(failed_for(id.to_string())))?;
        let deleted = core
            .site_delete(site.site_uid)
            .await
            .map_err(|err| self.core_failure("sites_delete", failed_for(id.to_string()), err))?;
        if deleted {
            Ok(self
                .localizer
                .localize(messages::DEVICE_USER_DELETED, &[site.site_name]))
        } else {
            Err(ServiceFailure::external(failed_for(site.site_name)))
        }
    }
}

#[async_trait]
impl SimpleSitesApi for SimpleSitesService {
    async fn index(&self) -> OperationDataResult<Vec<SiteDto>> {
        settle("sites_index", self.list().await).into()
    }

    async fn create(&self, model: &SimpleSiteModel) -> OperationResult {
        OperationResult::from_message(settle("sites_create", self.register(model).await))
    }

    async fn edit(&self, id: i32) -> OperationDataResult<SiteDto> {
        settle("sites_edit", self.load(id).await).into()
    }

    async fn update(&self, model: &SimpleSiteModel) -> OperationResult {
        OperationResult::from_message(settle("sites_update", self.modify(model).await))
    }

    async fn delete(&self, id: i32) -> OperationResult {
        OperationResult::from_message(settle("sites_delete", self.remove(id).await))
    }
}

#[cfg(test)]
#[path = "simple_sites_service_tests.rs"]
mod tests;
