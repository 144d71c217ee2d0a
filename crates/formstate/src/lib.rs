// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! # formstate
//!
//! Validated server actions with round-trippable form data.
//!
//! formstate wraps an async state-transition handler so that every form post
//! is validated before the handler runs, the state it produces is validated
//! before it is accepted, and the submitted form data travels back with the
//! result so a page can redisplay what the user typed.
//!
//! ## Features
//!
//! - Form data snapshots that survive JSON serialization
//! - Declarative form schemas with typed output
//! - State validation that keeps the previous state on rejection
//! - Redirects passed through untouched, every other failure turned into a message
//! - `application/x-www-form-urlencoded` and `multipart/form-data` body parsing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use formstate::{Action, ActionState, FieldRule, FormSchema, parse_form_body};
//!
//! let like = Action::builder()
//!     .handler(|liked: bool, ()| async move { Ok(!liked) });
//!
//! let submission = parse_form_body(body, Some("application/x-www-form-urlencoded"))?;
//! let next = like.call(ActionState::new(false), &submission).await?;
//! assert!(*next.state());
//! ```

/// Validated server actions and the state they thread.
pub mod actions;
/// Form post body parsing.
pub mod body;
/// Error types for action handlers.
pub mod error;
/// Form submissions, snapshots and read-only form data.
pub mod form_data;
/// Declarative form schemas.
pub mod schema;
/// Validator trait and field error types.
pub mod validate;

pub use actions::{
    previous_form_data, previous_form_data_from_json, Action, ActionBuilder, ActionErrors,
    ActionState, ERRORS_KEY, FORM_DATA_KEY, STATE_KEY,
};
pub use body::{parse_form_body, BodyParseError};
pub use error::{redirect, ActionError, ActionResult, REDIRECT_SENTINEL, UNKNOWN_ERROR_MESSAGE};
pub use form_data::{FormFile, FormSnapshot, FormSubmission, FormValue, ReadonlyFormData};
pub use schema::{FieldRule, FormSchema, TypedFormSchema};
pub use validate::{validator_fn, FieldErrors, ValidationErrors, ValidationIssue, Validator};
