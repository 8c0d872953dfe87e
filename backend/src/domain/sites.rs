//! Device user ("simple site") records as exchanged with the core SDK.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Site as reported by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteDto {
    pub site_id: i32,
    pub site_name: String,
    pub first_name: String,
    pub last_name: String,
    pub customer_no: Option<i32>,
    pub otp_code: Option<i32>,
    pub unit_id: Option<i32>,
    /// Worker bound to the site; absent for sites without a device user.
    pub worker_uid: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerDto {
    pub worker_uid: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

/// Minimal site record used for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteNameDto {
    pub site_uid: i32,
    pub site_name: String,
}

/// Create/update payload for a device user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimpleSiteModel {
    #[serde(default)]
    pub id: i32,
    pub user_first_name: String,
    pub user_last_name: String,
}

impl SimpleSiteModel {
    /// `"{first} {last}"` as used for the site name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.user_first_name, self.user_last_name)
    }
}
