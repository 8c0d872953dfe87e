//! Request and response models for account self-service and user
//! administration.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::UserId;

/// Profile summary of the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>,
}

/// Per-user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSettingsModel {
    #[schema(example = "en-US")]
    pub locale: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordModel {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordModel {
    pub email: String,
}

/// Completes the forgot-password flow with the token from the e-mailed link.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordModel {
    pub user_id: String,
    pub code: String,
    pub password: String,
}

/// Create/update payload for user administration. `password` is never
/// returned by reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRegisterModel {
    #[serde(default)]
    pub id: Option<UserId>,
    pub user_name: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Listing query for user administration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    /// Case-insensitive substring matched against user name, e-mail and
    /// full name.
    pub name_filter: Option<String>,
    /// One of `userName`, `email`, `firstName`, `lastName`; defaults to id order.
    pub sort: Option<String>,
    pub is_sort_dsc: bool,
    pub offset: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            name_filter: None,
            sort: None,
            is_sort_dsc: false,
            offset: 0,
            page_size: 10,
        }
    }
}

/// Page of users plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoList {
    pub total: usize,
    pub users: Vec<UserInfo>,
}
