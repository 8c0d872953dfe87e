//! Process-local stand-in for the domain SDK.
//!
//! Holds sites, workers and cases behind one lock. Removal is a soft delete:
//! removed records stay in memory but are skipped by every read except
//! `site_read_all(true)`.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info};

use crate::domain::ports::{Core, CoreError, PAYMENT_REQUIRED_TEXT};
use crate::domain::{
    CaseElement, CaseHandle, CaseQuery, CaseSummary, ReplyElement, SiteDto, SiteNameDto,
    WorkerDto,
};

#[derive(Debug, Clone)]
struct SiteRecord {
    site: SiteDto,
    removed: bool,
}

#[derive(Debug, Clone)]
struct CaseRecord {
    summary: CaseSummary,
    label: String,
    elements: Vec<CaseElement>,
    removed: bool,
}

impl CaseRecord {
    fn reply(&self) -> ReplyElement {
        ReplyElement {
            id: self.summary.id,
            label: self.label.clone(),
            done_at: self.summary.done_at,
            elements: self.elements.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct CoreState {
    http_server_address: String,
    sites: Vec<SiteRecord>,
    workers: Vec<WorkerDto>,
    cases: Vec<CaseRecord>,
    next_id: i32,
}

impl CoreState {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn live_site(&self, id: i32) -> Option<&SiteRecord> {
        self.sites
            .iter()
            .find(|record| record.site.site_id == id && !record.removed)
    }

    fn live_case(&self, id: i32) -> Option<&CaseRecord> {
        self.cases
            .iter()
            .find(|record| record.summary.id == id && !record.removed)
    }

    fn live_case_mut(&mut self, id: i32) -> Option<&mut CaseRecord> {
        self.cases
            .iter_mut()
            .find(|record| record.summary.id == id && !record.removed)
    }
}

/// Case seeded into an [`InMemoryCore`].
#[derive(Debug, Clone)]
pub struct NewCase {
    pub template_id: i32,
    pub site_name: String,
    pub label: String,
    pub status: i32,
    pub done_at: Option<DateTime<Utc>>,
    pub elements: Vec<CaseElement>,
}

/// [`Core`] keeping every record in memory.
#[derive(Debug, Default)]
pub struct InMemoryCore {
    state: RwLock<CoreState>,
    license_limit: Option<usize>,
}

impl InMemoryCore {
    pub fn new(http_server_address: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(CoreState {
                http_server_address: http_server_address.into(),
                ..CoreState::default()
            }),
            license_limit: None,
        }
    }

    /// Refuse site creation with a payment-required error once `limit`
    /// live sites exist.
    #[must_use]
    pub fn with_license_limit(mut self, limit: usize) -> Self {
        self.license_limit = Some(limit);
        self
    }

    /// Add a case and return its id.
    ///
    /// # Errors
    /// Fails only when the state lock is poisoned.
    pub fn insert_case(&self, case: NewCase) -> Result<i32, CoreError> {
        let mut state = self.write()?;
        let id = state.allocate_id();
        state.cases.push(CaseRecord {
            summary: CaseSummary {
                id,
                template_id: case.template_id,
                microting_uid: format!("mu-{id}"),
                check_uid: format!("cu-{id}"),
                site_name: case.site_name,
                status: case.status,
                done_at: case.done_at,
            },
            label: case.label,
            elements: case.elements,
            removed: false,
        });
        Ok(id)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CoreState>, CoreError> {
        self.state
            .read()
            .map_err(|_| CoreError::unavailable("core state lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CoreState>, CoreError> {
        self.state
            .write()
            .map_err(|_| CoreError::unavailable("core state lock poisoned"))
    }
}

fn matches_filter(summary: &CaseSummary, filter: Option<&str>) -> bool {
    filter.is_none_or(|needle| {
        summary
            .site_name
            .to_lowercase()
            .contains(&needle.to_lowercase())
    })
}

fn sort_cases(cases: &mut [CaseSummary], column: Option<&str>, descending: bool) {
    match column.map(str::trim) {
        Some("siteName") => cases.sort_by_cached_key(|case| case.site_name.to_lowercase()),
        Some("status") => cases.sort_by_key(|case| case.status),
        Some("doneAt") => cases.sort_by_key(|case| case.done_at),
        _ => cases.sort_by_key(|case| case.id),
    }
    if descending {
        cases.reverse();
    }
}

/// Parse `"{id}|{value}"` update entries.
fn parse_entries(entries: &[String]) -> Result<Vec<(i32, &str)>, CoreError> {
    entries
        .iter()
        .map(|entry| {
            entry
                .split_once('|')
                .and_then(|(id, value)| Some((id.trim().parse().ok()?, value)))
                .ok_or_else(|| {
                    CoreError::remote(format!("malformed update entry '{entry}'"), Some(400), None)
                })
        })
        .collect()
}

fn apply_updates(elements: &mut [CaseElement], fields: &[(i32, &str)], statuses: &[(i32, &str)]) {
    for element in elements {
        match element {
            CaseElement::CheckList {
                id,
                status,
                fields: values,
                ..
            } => {
                if let Some((_, next)) = statuses.iter().find(|(target, _)| *target == *id) {
                    (*next).clone_into(status);
                }
                for value in values {
                    if let Some((_, next)) =
                        fields.iter().find(|(target, _)| *target == value.field_id)
                    {
                        (*next).clone_into(&mut value.value);
                    }
                }
            }
            CaseElement::Group { elements, .. } => apply_updates(elements, fields, statuses),
        }
    }
}

#[async_trait]
impl Core for InMemoryCore {
    async fn http_server_address(&self) -> Result<String, CoreError> {
        Ok(self.read()?.http_server_address.clone())
    }

    async fn set_http_server_address(&self, address: &str) -> Result<(), CoreError> {
        address.clone_into(&mut self.write()?.http_server_address);
        Ok(())
    }

    async fn case_read_all(&self, query: &CaseQuery) -> Result<Vec<CaseSummary>, CoreError> {
        let mut cases: Vec<CaseSummary> = self
            .read()?
            .cases
            .iter()
            .filter(|record| !record.removed && record.summary.template_id == query.template_id)
            .filter(|record| matches_filter(&record.summary, query.name_filter.as_deref()))
            .map(|record| record.summary.clone())
            .collect();
        sort_cases(&mut cases, query.sort.as_deref(), query.descending);
        Ok(cases)
    }

    async fn case_read_by_case_id(&self, id: i32) -> Result<Option<CaseHandle>, CoreError> {
        Ok(self.read()?.live_case(id).map(|record| CaseHandle {
            microting_uid: record.summary.microting_uid.clone(),
            check_uid: record.summary.check_uid.clone(),
        }))
    }

    async fn case_read(&self, handle: &CaseHandle) -> Result<Option<ReplyElement>, CoreError> {
        Ok(self
            .read()?
            .cases
            .iter()
            .find(|record| {
                !record.removed
                    && record.summary.microting_uid == handle.microting_uid
                    && record.summary.check_uid == handle.check_uid
            })
            .map(CaseRecord::reply))
    }

    async fn case_delete(&self, id: i32) -> Result<bool, CoreError> {
        let mut state = self.write()?;
        let Some(record) = state.live_case_mut(id) else {
            return Ok(false);
        };
        record.removed = true;
        info!(case_id = id, "case removed");
        Ok(true)
    }

    async fn case_update(
        &self,
        id: i32,
        field_values: &[String],
        check_list_values: &[String],
    ) -> Result<bool, CoreError> {
        let fields = parse_entries(field_values)?;
        let statuses = parse_entries(check_list_values)?;
        let mut state = self.write()?;
        let Some(record) = state.live_case_mut(id) else {
            return Ok(false);
        };
        apply_updates(&mut record.elements, &fields, &statuses);
        Ok(true)
    }

    async fn case_update_field_values(&self, id: i32) -> Result<bool, CoreError> {
        Ok(self.read()?.live_case(id).is_some())
    }

    async fn site_read_all(&self, include_removed: bool) -> Result<Vec<SiteDto>, CoreError> {
        Ok(self
            .read()?
            .sites
            .iter()
            .filter(|record| include_removed || !record.removed)
            .map(|record| record.site.clone())
            .collect())
    }

    async fn site_create(
        &self,
        name: &str,
        first_name: &str,
        last_name: &str,
        email: Option<String>,
    ) -> Result<Option<SiteDto>, CoreError> {
        let mut state = self.write()?;
        let live = state.sites.iter().filter(|record| !record.removed).count();
        if self.license_limit.is_some_and(|limit| live >= limit) {
            return Err(CoreError::remote(
                "site creation refused",
                Some(402),
                Some(PAYMENT_REQUIRED_TEXT.to_owned()),
            ));
        }

        let worker_uid = state.allocate_id();
        state.workers.push(WorkerDto {
            worker_uid,
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email,
        });
        let site_id = state.allocate_id();
        let unit_id = state.allocate_id();
        let site = SiteDto {
            site_id,
            site_name: name.to_owned(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            customer_no: None,
            otp_code: Some(rand::thread_rng().gen_range(100_000..1_000_000)),
            unit_id: Some(unit_id),
            worker_uid: Some(worker_uid),
        };
        state.sites.push(SiteRecord {
            site: site.clone(),
            removed: false,
        });
        info!(site_id, "site created");
        Ok(Some(site))
    }

    async fn site_read(&self, id: i32) -> Result<Option<SiteDto>, CoreError> {
        Ok(self.read()?.live_site(id).map(|record| record.site.clone()))
    }

    async fn site_update(
        &self,
        id: i32,
        name: &str,
        first_name: &str,
        last_name: &str,
        email: Option<String>,
    ) -> Result<bool, CoreError> {
        let mut state = self.write()?;
        let Some(record) = state
            .sites
            .iter_mut()
            .find(|record| record.site.site_id == id && !record.removed)
        else {
            return Ok(false);
        };
        name.clone_into(&mut record.site.site_name);
        first_name.clone_into(&mut record.site.first_name);
        last_name.clone_into(&mut record.site.last_name);
        let worker_uid = record.site.worker_uid;

        if let Some(worker) = state
            .workers
            .iter_mut()
            .find(|worker| Some(worker.worker_uid) == worker_uid)
        {
            first_name.clone_into(&mut worker.first_name);
            last_name.clone_into(&mut worker.last_name);
            worker.email = email;
        }
        debug!(site_id = id, "site updated");
        Ok(true)
    }

    async fn worker_read(&self, worker_uid: i32) -> Result<Option<WorkerDto>, CoreError> {
        Ok(self
            .read()?
            .workers
            .iter()
            .find(|worker| worker.worker_uid == worker_uid)
            .cloned())
    }

    async fn site_item_read(&self, id: i32) -> Result<Option<SiteNameDto>, CoreError> {
        Ok(self.read()?.live_site(id).map(|record| SiteNameDto {
            site_uid: record.site.site_id,
            site_name: record.site.site_name.clone(),
        }))
    }

    async fn site_delete(&self, site_uid: i32) -> Result<bool, CoreError> {
        let mut state = self.write()?;
        let Some(record) = state
            .sites
            .iter_mut()
            .find(|record| record.site.site_id == site_uid && !record.removed)
        else {
            return Ok(false);
        };
        record.removed = true;
        info!(site_id = site_uid, "site removed");
        Ok(true)
    }
}

#[cfg(test)]
#[path = "in_memory_core_tests.rs"]
mod tests;
