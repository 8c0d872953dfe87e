//! Tests for login and authenticator management.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{FixtureLocalizer, InMemoryOptions, MockIdentityManager};
use crate::test_support::FixedClock;
use mockall::predicate::eq;
use rstest::rstest;

const SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";
const NOW: i64 = 59;
const CODE_AT_NOW: &str = "287082";

fn account() -> UserAccount {
    let mut account = UserAccount::new("ada", "ada@example.com", "Ada", "Lovelace");
    account.locale = Some("da-DK".into());
    account
}

fn with_authenticator(mut account: UserAccount) -> UserAccount {
    account.two_factor_enabled = true;
    account.google_authenticator_enabled = true;
    account.google_authenticator_secret = Some(SECRET.into());
    account
}

fn make_service_forced(identity: MockIdentityManager, forced: bool) -> AuthService {
    let settings = ApplicationSettings {
        is_two_factor_forced: forced,
        ..ApplicationSettings::default()
    };
    AuthService::new(
        Arc::new(identity),
        Arc::new(InMemoryOptions::new(settings)),
        Arc::new(FixtureLocalizer),
        TotpVerifier::new(Arc::new(FixedClock::at_unix(NOW))),
        "eForm",
    )
}

fn make_service(identity: MockIdentityManager) -> AuthService {
    make_service_forced(identity, false)
}

fn login(username: &str, password: &str, code: Option<&str>) -> LoginModel {
    LoginModel {
        username: username.into(),
        password: password.into(),
        code: code.map(str::to_owned),
    }
}

/// Identity that knows `user` by name and accepts `password`.
fn identity_for(user: UserAccount, password: &'static str) -> MockIdentityManager {
    let mut identity = MockIdentityManager::new();
    let found = user.clone();
    identity
        .expect_find_by_name()
        .returning(move |_| Ok(Some(found.clone())));
    identity
        .expect_check_password()
        .returning(move |_, candidate| Ok(candidate == password));
    identity
        .expect_roles_of()
        .returning(|_| Ok(vec!["admin".to_owned()]));
    identity
}

#[tokio::test]
async fn authenticate_user_returns_identity_and_first_role() {
    let user = account();
    let service = make_service(identity_for(user.clone(), "secret"));

    let result = service.authenticate_user(&login("ada", "secret", None)).await;

    let authorized = result.into_model().expect("authorized");
    assert_eq!(authorized.id, user.id);
    assert_eq!(authorized.role.as_deref(), Some("admin"));
    assert_eq!(authorized.locale.as_deref(), Some("da-DK"));
}

#[tokio::test]
async fn authenticate_user_falls_back_to_email_lookup() {
    let user = account();
    let mut identity = MockIdentityManager::new();
    identity.expect_find_by_name().return_once(|_| Ok(None));
    identity
        .expect_find_by_email()
        .with(eq("ada@example.com"))
        .return_once(move |_| Ok(Some(user)));
    identity.expect_check_password().return_once(|_, _| Ok(true));
    identity.expect_roles_of().return_once(|_| Ok(Vec::new()));
    let service = make_service(identity);

    let result = service
        .authenticate_user(&login("ada@example.com", "secret", None))
        .await;

    assert!(result.is_success());
}

#[rstest]
#[case("ada", "wrong")]
#[case("", "secret")]
#[case("ada", "")]
#[tokio::test]
async fn authenticate_user_rejects_bad_credentials(#[case] username: &str, #[case] password: &str) {
    let service = make_service(identity_for(account(), "secret"));

    let result = service
        .authenticate_user(&login(username, password, None))
        .await;

    assert!(!result.is_success());
    assert_eq!(
        result.message(),
        Some(messages::INCORRECT_PASSWORD_OR_USER_NAME)
    );
}

#[rstest]
#[case(None, messages::INVALID_CODE)]
#[case(Some("000000"), messages::INVALID_CODE)]
#[case(Some("12345"), messages::INVALID_CODE)]
#[tokio::test]
async fn authenticate_user_demands_a_valid_code(#[case] code: Option<&str>, #[case] expected: &str) {
    let service = make_service(identity_for(with_authenticator(account()), "secret"));

    let result = service.authenticate_user(&login("ada", "secret", code)).await;

    assert_eq!(result.message(), Some(expected));
}

#[tokio::test]
async fn authenticate_user_accepts_current_code() {
    let service = make_service(identity_for(with_authenticator(account()), "secret"));

    let result = service
        .authenticate_user(&login("ada", "secret", Some(CODE_AT_NOW)))
        .await;

    assert!(result.is_success());
}

#[tokio::test]
async fn forced_two_factor_without_key_reports_missing_key() {
    let mut user = account();
    user.google_authenticator_enabled = true;
    let service = make_service_forced(identity_for(user, "secret"), true);

    let result = service
        .authenticate_user(&login("ada", "secret", Some(CODE_AT_NOW)))
        .await;

    assert_eq!(result.message(), Some(messages::PSK_NOT_CONFIGURED));
}

#[tokio::test]
async fn authenticator_disabled_skips_the_code_check() {
    let mut user = with_authenticator(account());
    user.google_authenticator_enabled = false;
    let service = make_service_forced(identity_for(user, "secret"), true);

    let result = service.authenticate_user(&login("ada", "secret", None)).await;

    assert!(result.is_success());
}

#[tokio::test]
async fn get_google_authenticator_provisions_a_new_key() {
    let mut identity = identity_for(account(), "secret");
    identity
        .expect_update()
        .withf(|stored| {
            stored
                .google_authenticator_secret
                .as_deref()
                .is_some_and(|secret| TotpSecret::from_base32(secret).is_ok())
        })
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(identity);

    let model = service
        .get_google_authenticator(&login("ada", "secret", None))
        .await
        .into_model()
        .expect("provisioning model");

    let psk = model.psk.expect("psk");
    assert_eq!(psk.len(), 32);
    let barcode = model.barcode.expect("barcode");
    assert!(barcode.starts_with("otpauth://totp/eForm:ada%40example.com?secret="));
    assert!(barcode.contains(&psk));
}

#[tokio::test]
async fn get_google_authenticator_keeps_existing_key() {
    let mut identity = identity_for(with_authenticator(account()), "secret");
    identity.expect_update().never();
    let service = make_service(identity);

    let result = service
        .get_google_authenticator(&login("ada", "secret", None))
        .await;

    assert_eq!(
        result,
        OperationDataResult::success(GoogleAuthenticatorModel::default())
    );
}

fn identity_by_id(user: UserAccount) -> MockIdentityManager {
    let mut identity = MockIdentityManager::new();
    identity
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(user)));
    identity
}

#[tokio::test]
async fn google_authenticator_info_reports_key_and_flag() {
    let user = with_authenticator(account());
    let id = user.id.clone();
    let service = make_service(identity_by_id(user));

    let info = service
        .get_google_authenticator_info(&id)
        .await
        .into_model()
        .expect("info");

    assert_eq!(
        info,
        GoogleAuthInfoModel {
            psk: Some(SECRET.into()),
            is_two_factor_enabled: true,
        }
    );
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn update_google_authenticator_info_toggles_both_flags(#[case] enabled: bool) {
    let user = account();
    let id = user.id.clone();
    let mut identity = identity_by_id(user);
    identity
        .expect_update()
        .withf(move |stored| {
            stored.two_factor_enabled == enabled && stored.google_authenticator_enabled == enabled
        })
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(identity);

    let result = service
        .update_google_authenticator_info(
            &id,
            &GoogleAuthInfoModel {
                psk: None,
                is_two_factor_enabled: enabled,
            },
        )
        .await;

    assert_eq!(
        result,
        OperationResult::success_with(messages::GOOGLE_AUTHENTICATOR_UPDATED)
    );
}

#[tokio::test]
async fn delete_google_authenticator_info_clears_the_key() {
    let user = with_authenticator(account());
    let id = user.id.clone();
    let mut identity = identity_by_id(user);
    identity
        .expect_update()
        .withf(|stored| stored.google_authenticator_secret.is_none())
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(identity);

    let result = service.delete_google_authenticator_info(&id).await;

    assert_eq!(
        result,
        OperationResult::success_with(messages::GOOGLE_AUTHENTICATOR_REMOVED)
    );
}

#[tokio::test]
async fn log_out_requires_an_existing_user() {
    let mut identity = MockIdentityManager::new();
    identity.expect_find_by_id().return_once(|_| Ok(None));
    let service = make_service(identity);

    let result = service.log_out(&UserId::random()).await;

    assert_eq!(result, OperationResult::failure(messages::USER_NOT_FOUND));
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn two_factor_force_info_reflects_settings(#[case] forced: bool) {
    let service = make_service_forced(MockIdentityManager::new(), forced);

    let result = service.two_factor_auth_force_info().await;

    assert_eq!(result, OperationDataResult::success(forced));
}

#[rstest]
#[case(vec!["user".to_owned(), "admin".to_owned()], Some(Role::Admin))]
#[case(vec!["user".to_owned()], Some(Role::User))]
#[case(vec!["auditor".to_owned()], None)]
#[tokio::test]
async fn current_role_prefers_admin_among_held_roles(
    #[case] held: Vec<String>,
    #[case] expected: Option<Role>,
) {
    let user = account();
    let id = user.id.clone();
    let mut identity = MockIdentityManager::new();
    identity
        .expect_find_by_id()
        .with(eq(id.clone()))
        .return_once(move |_| Ok(Some(user)));
    identity.expect_roles_of().return_once(move |_| Ok(held));
    let service = make_service(identity);

    assert_eq!(service.current_role(&id).await, expected);
}

#[tokio::test]
async fn current_role_is_none_for_deleted_accounts() {
    let mut identity = MockIdentityManager::new();
    identity.expect_find_by_id().return_once(|_| Ok(None));
    identity.expect_roles_of().never();
    let service = make_service(identity);

    assert_eq!(service.current_role(&UserId::random()).await, None);
}

#[tokio::test]
async fn current_role_fails_closed_when_the_store_is_down() {
    let mut identity = MockIdentityManager::new();
    identity
        .expect_find_by_id()
        .return_once(|_| Err(IdentityError::unavailable("store offline")));
    let service = make_service(identity);

    assert_eq!(service.current_role(&UserId::random()).await, None);
}
