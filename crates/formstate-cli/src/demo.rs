// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Example actions served by the demo host.
//!
//! - `login`: form schema with email and password, redirects on success
//! - `counter`: state-only increment, state must stay non-negative
//! - `like`: state-only toggle

use formstate::validate::{validator_fn, ValidationErrors};
use formstate::{redirect, Action, ActionError, FieldRule, FormSchema};
use serde::{Deserialize, Serialize};

/// Email accepted by the login demo.
pub const DEMO_EMAIL: &str = "admin@example.com";
/// Password accepted by the login demo.
pub const DEMO_PASSWORD: &str = "password";
/// Message shown for wrong credentials.
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid email or password";
/// Where a successful login redirects.
pub const SUCCESS_PATH: &str = "/success";

/// The login page carries no application state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginState {}

/// Parsed login form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginInput {
    /// Submitted email, already checked for shape.
    pub email: String,
    /// Submitted password.
    pub password: String,
}

/// Counter state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterState {
    /// Current count; never negative once accepted.
    pub count: i64,
}

/// Like button state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    /// Id of the like, present while liked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_id: Option<String>,
}

/// The three demo actions, shared by every request.
#[derive(Clone)]
pub struct DemoActions {
    /// Login form action.
    pub login: Action<LoginState, LoginInput>,
    /// Counter increment action.
    pub counter: Action<CounterState>,
    /// Like toggle action.
    pub like: Action<LikeState>,
}

impl DemoActions {
    /// Builds the demo actions.
    pub fn new() -> Self {
        Self {
            login: login_action(),
            counter: counter_action(),
            like: like_action(),
        }
    }
}

impl Default for DemoActions {
    fn default() -> Self {
        Self::new()
    }
}

fn login_action() -> Action<LoginState, LoginInput> {
    Action::builder()
        .form_schema(
            FormSchema::new()
                .field("email", FieldRule::email())
                .field("password", FieldRule::text())
                .typed::<LoginInput>(),
        )
        .handler(|_: LoginState, input: LoginInput| async move {
            if input.email != DEMO_EMAIL || input.password != DEMO_PASSWORD {
                return Err(ActionError::new(INVALID_LOGIN_MESSAGE));
            }
            Err(redirect(SUCCESS_PATH))
        })
}

fn counter_action() -> Action<CounterState> {
    Action::builder()
        .state_schema(validator_fn(|state: &CounterState| {
            if state.count < 0 {
                return Err(ValidationErrors::single(
                    "count",
                    "Number must be greater than or equal to 0",
                ));
            }
            Ok(state.clone())
        }))
        .handler(|state: CounterState, ()| async move {
            Ok(CounterState {
                count: state.count + 1,
            })
        })
}

fn like_action() -> Action<LikeState> {
    Action::builder()
        .state_schema(validator_fn(|state: &LikeState| Ok(state.clone())))
        .handler(|state: LikeState, ()| async move {
            let like_id = match state.like_id {
                Some(_) => None,
                None => Some("new-like-id".to_string()),
            };
            Ok(LikeState { like_id })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use formstate::{ActionState, FormSubmission};

    #[tokio::test]
    async fn test_login_redirects_on_valid_credentials() {
        let actions = DemoActions::new();
        let submission = FormSubmission::new()
            .with("email", DEMO_EMAIL)
            .with("password", DEMO_PASSWORD);

        let err = actions
            .login
            .call(ActionState::new(LoginState::default()), &submission)
            .await
            .unwrap_err();
        assert_eq!(err.location(), Some(SUCCESS_PATH));
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let actions = DemoActions::new();
        let submission = FormSubmission::new()
            .with("email", DEMO_EMAIL)
            .with("password", "hunter2");

        let state = actions
            .login
            .call(ActionState::new(LoginState::default()), &submission)
            .await
            .unwrap();
        assert_eq!(state.errors().unwrap().action_errors, [INVALID_LOGIN_MESSAGE]);
        assert_eq!(state.previous_form_data().get("email"), Some(DEMO_EMAIL));
    }

    #[tokio::test]
    async fn test_counter_rejects_negative_state() {
        let actions = DemoActions::new();
        let state = actions
            .counter
            .call_state(ActionState::new(CounterState { count: -3 }))
            .await
            .unwrap();
        assert_eq!(state.state().count, -3);
        assert!(state.errors().unwrap().state_errors.contains("count"));
    }

    #[tokio::test]
    async fn test_like_toggles() {
        let actions = DemoActions::new();
        let liked = actions
            .like
            .call_state(ActionState::new(LikeState::default()))
            .await
            .unwrap();
        assert_eq!(liked.state().like_id.as_deref(), Some("new-like-id"));

        let unliked = actions.like.call_state(liked).await.unwrap();
        assert_eq!(unliked.state().like_id, None);
        assert!(!unliked.has_errors());
    }
}
