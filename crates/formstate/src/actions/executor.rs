// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Validated execution of action handlers.

use super::state::{ActionErrors, ActionState};
use crate::error::{ActionError, ActionResult, UNKNOWN_ERROR_MESSAGE};
use crate::form_data::{FormSnapshot, FormSubmission};
use crate::validate::{ValidationErrors, Validator};
use futures_util::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

type InputValidator<I> = Arc<dyn Validator<FormSubmission, Output = I>>;
type StateValidator<S> = Arc<dyn Validator<S, Output = S>>;
type Handler<S, I> = Arc<dyn Fn(S, I) -> BoxFuture<'static, ActionResult<S>> + Send + Sync>;
type ErrorFormatter = Arc<dyn Fn(ActionError) -> BoxFuture<'static, Option<String>> + Send + Sync>;

/// Input validator used when an action declares no form schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl Validator<FormSubmission> for NoInput {
    type Output = ();

    fn validate(&self, _: &FormSubmission) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// A handler wrapped with input and state validation.
///
/// Each call:
/// 1. snapshots the submission (every outcome carries it);
/// 2. validates the submission, returning `form_errors` without running the
///    handler if it is rejected;
/// 3. runs the handler on a copy of the application state and the parsed input;
/// 4. hands a redirect straight back as `Err`;
/// 5. turns any other handler failure into one `action_errors` message;
/// 6. validates the new state, keeping the previous one with `state_errors`
///    if it is rejected;
/// 7. otherwise returns the new state with empty errors.
///
/// # Example
///
/// ```rust
/// use formstate::actions::{Action, ActionState};
/// use formstate::validate::{validator_fn, ValidationErrors};
///
/// #[derive(Clone)]
/// struct Counter {
///     count: i64,
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let increment = Action::builder()
///     .state_schema(validator_fn(|s: &Counter| {
///         if s.count < 0 {
///             Err(ValidationErrors::single("count", "Number must be greater than or equal to 0"))
///         } else {
///             Ok(s.clone())
///         }
///     }))
///     .handler(|state: Counter, ()| async move { Ok(Counter { count: state.count + 1 }) });
///
/// let next = increment.call_state(ActionState::new(Counter { count: 0 })).await.unwrap();
/// assert_eq!(next.state().count, 1);
/// # });
/// ```
pub struct Action<S, I = ()> {
    input: InputValidator<I>,
    state_schema: Option<StateValidator<S>>,
    formatter: Option<ErrorFormatter>,
    handler: Handler<S, I>,
}

impl<S, I> Clone for Action<S, I> {
    fn clone(&self) -> Self {
        Self {
            input: Arc::clone(&self.input),
            state_schema: self.state_schema.clone(),
            formatter: self.formatter.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<S> Action<S, ()>
where
    S: Send + 'static,
{
    /// Starts building an action with no form schema.
    pub fn builder() -> ActionBuilder<S, ()> {
        ActionBuilder {
            input: Arc::new(NoInput),
            state_schema: None,
            formatter: None,
        }
    }
}

impl<S, I> Action<S, I>
where
    S: Clone + Send + 'static,
    I: Send + 'static,
{
    /// Runs the action for one submission.
    ///
    /// Returns `Err` only for a redirect; every other outcome is an
    /// [`ActionState`] carrying the snapshot of `submission`.
    pub async fn call(
        &self,
        previous: ActionState<S>,
        submission: &FormSubmission,
    ) -> ActionResult<ActionState<S>> {
        let snapshot = FormSnapshot::from_submission(submission);

        let input = match self.input.validate(submission) {
            Ok(input) => input,
            Err(issues) => {
                let form_errors = issues.into_field_errors();
                let fields: Vec<&str> = form_errors.paths().collect();
                tracing::warn!(?fields, "Form data rejected");
                return Ok(previous.rejected(snapshot, ActionErrors::form(form_errors)));
            }
        };

        let new_state = match (self.handler)(previous.state().clone(), input).await {
            Ok(state) => state,
            Err(err) if err.is_redirect() => {
                tracing::debug!(location = ?err.location(), "Action requested redirect");
                return Err(err);
            }
            Err(err) => {
                let message = self.error_message(err).await;
                tracing::warn!(%message, "Action handler failed");
                return Ok(previous.rejected(snapshot, ActionErrors::action(message)));
            }
        };

        let new_state = match &self.state_schema {
            Some(schema) => match schema.validate(&new_state) {
                Ok(valid) => valid,
                Err(issues) => {
                    let state_errors = issues.into_field_errors();
                    let fields: Vec<&str> = state_errors.paths().collect();
                    tracing::warn!(?fields, "Action produced invalid state, keeping previous");
                    return Ok(previous.rejected(snapshot, ActionErrors::state(state_errors)));
                }
            },
            None => new_state,
        };

        tracing::debug!("Action completed");
        Ok(ActionState::accepted(new_state, snapshot))
    }

    /// Runs the action without form data, for state-only actions.
    pub async fn call_state(&self, previous: ActionState<S>) -> ActionResult<ActionState<S>> {
        self.call(previous, &FormSubmission::new()).await
    }

    /// Formatter output, then the error's own message, then the fallback.
    async fn error_message(&self, err: ActionError) -> String {
        let own = err.message();
        if let Some(formatter) = &self.formatter {
            if let Some(message) = formatter(err).await.filter(|m| !m.is_empty()) {
                return message;
            }
        }
        own.unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string())
    }
}

/// Builder for [`Action`]. Start with [`Action::builder`].
pub struct ActionBuilder<S, I> {
    input: InputValidator<I>,
    state_schema: Option<StateValidator<S>>,
    formatter: Option<ErrorFormatter>,
}

impl<S, I> ActionBuilder<S, I>
where
    S: Send + 'static,
    I: Send + 'static,
{
    /// Validates submissions with `schema`; the handler receives its output.
    pub fn form_schema<V>(self, schema: V) -> ActionBuilder<S, V::Output>
    where
        V: Validator<FormSubmission> + 'static,
        V::Output: Send + 'static,
    {
        ActionBuilder {
            input: Arc::new(schema),
            state_schema: self.state_schema,
            formatter: self.formatter,
        }
    }

    /// Validates every state the handler returns.
    pub fn state_schema<V>(mut self, schema: V) -> Self
    where
        V: Validator<S, Output = S> + 'static,
    {
        self.state_schema = Some(Arc::new(schema));
        self
    }

    /// Turns handler failures into messages. Returning `None` or an empty
    /// string falls back to the error's own message.
    pub fn on_error<F, Fut>(mut self, formatter: F) -> Self
    where
        F: Fn(ActionError) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<String>> + Send + 'static,
    {
        self.formatter = Some(Arc::new(move |err| formatter(err).boxed()));
        self
    }

    /// Sets the handler and finishes the action.
    pub fn handler<H, Fut>(self, handler: H) -> Action<S, I>
    where
        H: Fn(S, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult<S>> + Send + 'static,
    {
        Action {
            input: self.input,
            state_schema: self.state_schema,
            formatter: self.formatter,
            handler: Arc::new(move |state, input| handler(state, input).boxed()),
        }
    }
}
