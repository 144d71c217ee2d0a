// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Validated server actions.
//!
//! An [`Action`] wraps an async handler `(state, input) -> state` with an
//! optional form schema, an optional state schema and an optional error
//! formatter. Every call returns an [`ActionState`] that carries:
//!
//! - the application state (new on success, previous on any rejection)
//! - a snapshot of the submitted form data, for redisplay
//! - the errors of that call, grouped as form, state or action errors
//!
//! A redirect raised by the handler is the only `Err` a call returns.
//!
//! # Example
//!
//! ```rust
//! use formstate::actions::{Action, ActionState};
//! use formstate::schema::{FieldRule, FormSchema};
//! use formstate::{ActionError, FormSubmission};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Login {
//!     email: String,
//!     password: String,
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let login = Action::builder()
//!     .form_schema(
//!         FormSchema::new()
//!             .field("email", FieldRule::email())
//!             .field("password", FieldRule::text())
//!             .typed::<Login>(),
//!     )
//!     .handler(|attempts: u32, input: Login| async move {
//!         if input.email != "admin@example.com" || input.password != "password" {
//!             return Err(ActionError::new("Invalid email or password"));
//!         }
//!         Ok(attempts + 1)
//!     });
//!
//! let submission = FormSubmission::new().with("email", "nope");
//! let state = login.call(ActionState::new(0), &submission).await.unwrap();
//! let errors = state.errors().unwrap();
//! assert_eq!(errors.form_errors.get("email"), ["Invalid email"]);
//! assert_eq!(errors.form_errors.get("password"), ["Required"]);
//! assert_eq!(state.previous_form_data().get("email"), Some("nope"));
//!
//! // A `u32` state is stored under "state" when serialized.
//! let json = serde_json::to_value(&state).unwrap();
//! assert_eq!(json["state"], 0);
//! # });
//! ```

mod executor;
mod state;

pub use executor::{Action, ActionBuilder, NoInput};
pub use state::{
    previous_form_data, previous_form_data_from_json, ActionErrors, ActionState, ERRORS_KEY,
    FORM_DATA_KEY, STATE_KEY,
};
