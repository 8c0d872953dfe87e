//! Localisation keys for user-facing service messages.
//!
//! Services resolve these through the [`crate::domain::ports::Localizer`]
//! port; the bundled resource table lives in `resources/shared_resource.json`.

pub const USER_NOT_FOUND: &str = "UserNotFound";
pub const ADMIN_USER_NOT_FOUND: &str = "AdminUserNotFound";

pub const CONNECTION_STRING_ALREADY_EXIST: &str = "ConnectionStringAlreadyExist";
pub const CONNECTION_STRING_DOES_NOT_EXIST: &str = "ConnectionStringDoesNotExist";
pub const SDK_CONNECTION_STRING_IS_INVALID: &str = "SDKConnectionStringIsInvalid";
pub const MAIN_CONNECTION_STRING_IS_INVALID: &str = "MainConnectionStringIsInvalid";
pub const COULD_NOT_CREATE_USER: &str = "CouldNotCreateUser";
pub const SDK_SETUP_FAILED: &str = "SdkSetupFailed";
pub const COULD_NOT_WRITE_CONNECTION_STRING: &str = "CouldNotWriteConnectionString";

pub const CANT_OBTAIN_SETTINGS: &str = "CantObtainSettingsFromWebConfig";
pub const CANT_UPDATE_SETTINGS: &str = "CantUpdateSettingsInWebConfig";
pub const SETTINGS_UPDATED_SUCCESSFULLY: &str = "SettingsUpdatedSuccessfully";
pub const LOGIN_PAGE_SETTINGS_RESET: &str = "LoginPageSettingsResetSuccessfully";
pub const HEADER_SETTINGS_RESET: &str = "HeaderSettingsResetSuccessfully";

pub const ERROR_WHILE_UPDATING_USER_SETTINGS: &str = "ErrorWhileUpdatingUserSettings";
pub const PLEASE_SETUP_SECURITY_CODE: &str = "PleaseSetupSecurityCode";
pub const INVALID_SECURITY_CODE: &str = "InvalidSecurityCode";
pub const ERROR_WHILE_REMOVING_OLD_PASSWORD: &str = "ErrorWhileRemovingOldPassword";
pub const ERROR_WHILE_ADD_NEW_PASSWORD: &str = "ErrorWhileAddNewPassword";
pub const PASSWORD_HAS_BEEN_RESET: &str = "YourEmailPasswordHasBeenReset";
pub const PASSWORD_RESET_EMAIL_SUBJECT: &str = "PasswordResetEmailSubject";
pub const PASSWORD_RESET_EMAIL_BODY: &str = "PasswordResetEmailBody";

pub const DEVICE_USERS_COULD_NOT_BE_OBTAINED: &str = "DeviceUsersCouldNotBeObtained";
pub const DEVICE_USER_CREATED: &str = "DeviceUserParamCreatedSuccessfully";
pub const DEVICE_USER_COULD_NOT_BE_CREATED: &str = "DeviceUserCouldNotBeCreated";
pub const YOU_NEED_TO_BUY_MORE_LICENSES: &str = "YouNeedToBuyMoreLicenses";
pub const DEVICE_USER_COULD_NOT_BE_EDITED: &str = "DeviceUserParamCouldNotBeEdited";
pub const DEVICE_USER_UPDATED: &str = "DeviceUserUpdatedSuccessfully";
pub const DEVICE_USER_PARAM_COULD_NOT_BE_UPDATED: &str = "DeviceUserParamCouldNotBeUpdated";
pub const DEVICE_USER_COULD_NOT_BE_OBTAINED: &str = "DeviceUserCouldNotBeObtained";
pub const DEVICE_USER_NOT_FOUND: &str = "DeviceUserNotFound";
pub const DEVICE_USER_COULD_NOT_BE_UPDATED: &str = "DeviceUserCouldNotBeUpdated";
pub const DEVICE_USER_DELETED: &str = "DeviceUserParamDeletedSuccessfully";
pub const DEVICE_USER_COULD_NOT_BE_DELETED: &str = "DeviceUserParamCouldNotBeDeleted";

pub const CASE_LOADING_FAILED: &str = "CaseLoadingFailed";
pub const CASE_NOT_FOUND: &str = "CaseNotFound";
pub const CASE_COULD_NOT_BE_LOADED: &str = "CaseCouldNotBeLoaded";
pub const CASE_DELETED: &str = "CaseParamDeletedSuccessfully";
pub const CASE_COULD_NOT_BE_REMOVED: &str = "CaseCouldNotBeRemoved";
pub const CASE_COULD_NOT_BE_UPDATED: &str = "CaseCouldNotBeUpdated";
pub const CASE_HAS_BEEN_UPDATED: &str = "CaseHasBeenUpdated";

pub const USER_NAME_ALREADY_EXIST: &str = "UserUserNameAlreadyExist";
pub const USER_CREATED: &str = "UserParamCreatedSuccessfully";
pub const ERROR_WHILE_CREATING_USER: &str = "ErrorWhileCreatingUser";
pub const USER_DELETED: &str = "UserParamDeletedSuccessfully";
pub const CANT_DELETE_YOURSELF: &str = "CantDeleteYourself";
pub const ERROR_WHILE_DELETING_USER: &str = "ErrorWhileDeletingUser";
pub const USER_UPDATED: &str = "UserParamUpdatedSuccessfully";
pub const ERROR_WHILE_UPDATING_USER: &str = "ErrorWhileUpdatingUser";
pub const ERROR_WHILE_OBTAIN_USERS: &str = "ErrorWhileObtainUsers";
pub const TWO_FACTOR_FORCE_ENABLED: &str = "TwoFactorAuthenticationEnabledForAllUsers";
pub const TWO_FACTOR_FORCE_DISABLED: &str = "TwoFactorAuthenticationDisabledForAllUsers";

pub const INCORRECT_PASSWORD_OR_USER_NAME: &str = "IncorrectPasswordOrUserName";
pub const INVALID_CODE: &str = "InvalidCode";
pub const PSK_NOT_CONFIGURED: &str = "PskNotConfigured";
pub const GOOGLE_AUTHENTICATOR_UPDATED: &str = "GoogleAuthenticatorInfoUpdated";
pub const GOOGLE_AUTHENTICATOR_REMOVED: &str = "GoogleAuthenticatorInfoRemoved";
pub const UNKNOWN_ERROR: &str = "UnknownError";
