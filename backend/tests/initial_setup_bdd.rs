//! Behaviour tests for the one-off initial setup flow.
//!
//! Scenarios run against the real settings document, identity store and
//! SDK adapters, driving the services through their ports.

mod support;

use std::cell::RefCell;

use eform_base::domain::ports::{AuthApi, SettingsApi};
use eform_base::domain::{InitialSettingsModel, LoginModel, OperationResult};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use support::{ADMIN_PASSWORD, Stack, login_payload, setup_payload};
use tokio::runtime::Runtime;

struct SetupWorld {
    runtime: Runtime,
    stack: RefCell<Option<Stack>>,
    outcome: RefCell<Option<OperationResult>>,
}

impl SetupWorld {
    fn new() -> Self {
        Self {
            runtime: Runtime::new().expect("tokio runtime should initialise"),
            stack: RefCell::new(None),
            outcome: RefCell::new(None),
        }
    }

    fn with_stack<R>(&self, f: impl FnOnce(&Stack) -> R) -> R {
        let stack = self.stack.borrow();
        f(stack.as_ref().expect("installation prepared"))
    }

    fn submit(&self, payload: Value) -> OperationResult {
        let model: InitialSettingsModel =
            serde_json::from_value(payload).expect("setup payload deserialises");
        self.with_stack(|stack| {
            self.runtime
                .block_on(stack.state.settings.update_connection_string(&model))
        })
    }

    fn record(&self, payload: Value) {
        let outcome = self.submit(payload);
        *self.outcome.borrow_mut() = Some(outcome);
    }

    fn outcome(&self) -> OperationResult {
        self.outcome
            .borrow()
            .clone()
            .expect("setup should have been submitted")
    }

    fn connection_strings_exist(&self) -> bool {
        self.with_stack(|stack| {
            self.runtime
                .block_on(stack.state.settings.connection_string_exist())
                .is_success()
        })
    }
}

#[fixture]
fn world() -> SetupWorld {
    SetupWorld::new()
}

#[given("an unconfigured installation")]
fn an_unconfigured_installation(world: &SetupWorld) {
    *world.stack.borrow_mut() = Some(support::stack());
}

#[given("the initial setup has completed")]
fn the_initial_setup_has_completed(world: &SetupWorld) {
    assert!(world.submit(setup_payload()).is_success());
}

#[when("the initial setup is submitted")]
fn the_initial_setup_is_submitted(world: &SetupWorld) {
    world.record(setup_payload());
}

#[when("the initial setup is submitted with SDK data source {source}")]
fn the_initial_setup_is_submitted_with_sdk_source(world: &SetupWorld, source: String) {
    let mut payload = setup_payload();
    payload["connectionStringSdk"]["source"] = Value::String(source);
    world.record(payload);
}

#[when("the initial setup is submitted without a customer token")]
fn the_initial_setup_is_submitted_without_token(world: &SetupWorld) {
    let mut payload = setup_payload();
    payload["connectionStringSdk"]["token"] = Value::String(String::new());
    world.record(payload);
}

#[then("the setup succeeds")]
fn the_setup_succeeds(world: &SetupWorld) {
    let outcome = world.outcome();
    assert!(outcome.is_success(), "setup failed: {:?}", outcome.message());
}

#[then("the setup fails with message \"{message}\"")]
fn the_setup_fails_with_message(world: &SetupWorld, message: String) {
    let outcome = world.outcome();
    assert!(!outcome.is_success());
    assert_eq!(outcome.message(), Some(message.as_str()));
}

#[then("the connection strings are reported as existing")]
fn the_connection_strings_exist(world: &SetupWorld) {
    assert!(world.connection_strings_exist());
}

#[then("the connection strings are reported as missing")]
fn the_connection_strings_are_missing(world: &SetupWorld) {
    assert!(!world.connection_strings_exist());
}

#[then("the administrator can sign in")]
fn the_administrator_can_sign_in(world: &SetupWorld) {
    let login: LoginModel =
        serde_json::from_value(login_payload(ADMIN_PASSWORD)).expect("login payload");
    let result = world.with_stack(|stack| {
        world
            .runtime
            .block_on(stack.state.auth.authenticate_user(&login))
    });
    assert!(result.is_success());
    let identity = result.into_model().expect("authorised identity");
    assert_eq!(identity.role.as_deref(), Some("admin"));
}

#[scenario(
    path = "tests/features/initial_setup.feature",
    name = "First setup configures storage and the administrator"
)]
fn first_setup_configures_storage_and_the_administrator(world: SetupWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/initial_setup.feature",
    name = "Setup cannot run twice"
)]
fn setup_cannot_run_twice(world: SetupWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/initial_setup.feature",
    name = "An SDK data source without a server aborts setup"
)]
fn an_sdk_data_source_without_a_server_aborts_setup(world: SetupWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/initial_setup.feature",
    name = "A failed SDK setup can be retried"
)]
fn a_failed_sdk_setup_can_be_retried(world: SetupWorld) {
    drop(world);
}
