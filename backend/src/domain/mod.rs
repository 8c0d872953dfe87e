//! Domain primitives, services and ports.
//!
//! Purpose: hold the business rules of the base plugin. Every service
//! operation returns an [`OperationResult`] or [`OperationDataResult`];
//! collaborator failures are mapped to localised messages here and never
//! reach inbound adapters as errors.
//!
//! Public surface:
//! - Envelope types and [`ServiceFailure`].
//! - Entities and request/response models (users, auth, settings, cases,
//!   sites).
//! - Services implementing the driving ports in [`ports`].

pub mod account;
pub mod auth;
pub mod cases;
pub mod failure;
pub mod messages;
pub mod operation_result;
pub mod ports;
pub mod settings;
pub mod sites;
pub mod two_factor;
pub mod user;

mod account_service;
mod admin_service;
mod auth_service;
mod cases_service;
mod settings_service;
mod simple_sites_service;

pub use self::account::{
    ChangePasswordModel, ForgotPasswordModel, Pagination, ResetPasswordModel, UserInfo,
    UserInfoList, UserRegisterModel, UserSettingsModel,
};
pub use self::account_service::AccountService;
pub use self::admin_service::AdminService;
pub use self::auth::{
    AuthorizeResult, GoogleAuthInfoModel, GoogleAuthenticatorModel, LoginCredentials, LoginModel,
    LoginValidationError,
};
pub use self::auth_service::AuthService;
pub use self::cases::{
    CaseElement, CaseHandle, CaseListModel, CaseQuery, CaseRequestModel, CaseSummary,
    CaseUpdate, FieldValue, ReplyElement, ReplyRequest,
};
pub use self::cases_service::CasesService;
pub use self::failure::{FailureKind, ServiceFailure, join_errors};
pub use self::operation_result::{OperationDataResult, OperationResult};
pub use self::settings::{
    AdminSettingsModel, AdminSetupModel, ApplicationSettings, ConnectionStrings, EmailSettings,
    FALLBACK_LOCALE, GeneralAppSetupModel, HeaderSettings, InitialSettingsModel,
    LoginPageSettings, MainConnectionModel, PageSettings, PageSettingsModel, SdkConnectionModel,
    SettingsSection, SmtpSettingsModel,
};
pub use self::settings_service::{SettingsService, SettingsStores, SetupCollaborators};
pub use self::simple_sites_service::SimpleSitesService;
pub use self::sites::{SimpleSiteModel, SiteDto, SiteNameDto, WorkerDto};
pub use self::user::{Role, UserAccount, UserId, UserValidationError};
