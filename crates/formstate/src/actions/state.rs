// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! State threaded between action invocations.

use crate::form_data::{FormSnapshot, ReadonlyFormData};
use crate::validate::FieldErrors;
use serde::de::{DeserializeOwned, Error as _};
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

/// Key under which the form snapshot is stored in serialized state.
///
/// Application state must not use this key, nor a top-level `errors` key.
pub const FORM_DATA_KEY: &str = "__formData";

/// Key under which the errors of the last invocation are stored.
pub const ERRORS_KEY: &str = "errors";

/// Key holding the application state when it does not serialize as a map.
pub const STATE_KEY: &str = "state";

/// Errors attached to a state after an invocation.
///
/// At most one of the three groups is non-empty after a single invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionErrors {
    /// Problems with the submitted form data, by field path.
    #[serde(default)]
    pub form_errors: FieldErrors,
    /// Problems with the state the handler produced, by field path.
    #[serde(default)]
    pub state_errors: FieldErrors,
    /// Messages not tied to a field, usually one from a failed handler.
    #[serde(default)]
    pub action_errors: Vec<String>,
}

impl ActionErrors {
    /// Errors from rejected form data.
    pub fn form(form_errors: FieldErrors) -> Self {
        Self {
            form_errors,
            ..Self::default()
        }
    }

    /// Errors from a rejected handler output.
    pub fn state(state_errors: FieldErrors) -> Self {
        Self {
            state_errors,
            ..Self::default()
        }
    }

    /// A single action-level message.
    pub fn action(message: impl Into<String>) -> Self {
        Self {
            action_errors: vec![message.into()],
            ..Self::default()
        }
    }

    /// Returns true if all three groups are empty.
    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.state_errors.is_empty() && self.action_errors.is_empty()
    }
}

/// Application state plus the latest form snapshot and errors.
///
/// The handler only ever sees `S`; the snapshot and errors ride alongside it.
/// Serialized, a state that is a struct or map has its fields at the top level
/// next to [`FORM_DATA_KEY`] and [`ERRORS_KEY`]:
///
/// ```json
/// {
///   "count": 1,
///   "__formData": { "step": ["1"] },
///   "errors": { "formErrors": {}, "stateErrors": {}, "actionErrors": [] }
/// }
/// ```
///
/// Any other state (a number, a bool, a sequence) is stored under
/// [`STATE_KEY`] instead: `{ "state": true, "__formData": {} }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionState<S> {
    state: S,
    form_data: FormSnapshot,
    errors: Option<ActionErrors>,
}

impl<S> ActionState<S> {
    /// Initial state: no snapshot, no errors.
    pub fn new(state: S) -> Self {
        Self {
            state,
            form_data: FormSnapshot::new(),
            errors: None,
        }
    }

    /// Outcome of an accepted transition: errors present but empty.
    pub(crate) fn accepted(state: S, form_data: FormSnapshot) -> Self {
        Self {
            state,
            form_data,
            errors: Some(ActionErrors::default()),
        }
    }

    /// Keeps the application state, replacing snapshot and errors.
    pub(crate) fn rejected(self, form_data: FormSnapshot, errors: ActionErrors) -> Self {
        Self {
            state: self.state,
            form_data,
            errors: Some(errors),
        }
    }

    /// The application state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mutable access to the application state.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Consumes the wrapper, returning the application state.
    pub fn into_state(self) -> S {
        self.state
    }

    /// Errors from the last invocation, if one has run.
    pub fn errors(&self) -> Option<&ActionErrors> {
        self.errors.as_ref()
    }

    /// Returns true if the last invocation left any error.
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// The raw snapshot of the last submission.
    pub fn snapshot(&self) -> &FormSnapshot {
        &self.form_data
    }

    /// The last submission as read-only form data, for redisplay.
    pub fn previous_form_data(&self) -> ReadonlyFormData {
        ReadonlyFormData::from_snapshot(self.form_data.clone())
    }
}

impl<S: Serialize> Serialize for ActionState<S> {
    /// Fails if a map-shaped state uses [`FORM_DATA_KEY`] or [`ERRORS_KEY`].
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let state = serde_json::to_value(&self.state).map_err(Ser::Error::custom)?;

        let mut map = serializer.serialize_map(None)?;
        match state {
            JsonValue::Object(fields) => {
                for (key, value) in &fields {
                    if key == FORM_DATA_KEY || key == ERRORS_KEY {
                        return Err(Ser::Error::custom(format!(
                            "state field `{}` collides with a reserved key",
                            key
                        )));
                    }
                    map.serialize_entry(key, value)?;
                }
            }
            other => map.serialize_entry(STATE_KEY, &other)?,
        }
        map.serialize_entry(FORM_DATA_KEY, &self.form_data)?;
        if let Some(errors) = &self.errors {
            map.serialize_entry(ERRORS_KEY, errors)?;
        }
        map.end()
    }
}

impl<'de, S: DeserializeOwned> Deserialize<'de> for ActionState<S> {
    /// Reads the map written by `Serialize`. A missing or malformed snapshot
    /// decodes as empty.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, JsonValue>::deserialize(deserializer)?;

        let form_data = fields
            .remove(FORM_DATA_KEY)
            .map(|value| FormSnapshot::from_json(&value))
            .unwrap_or_default();
        let errors = match fields.remove(ERRORS_KEY) {
            None | Some(JsonValue::Null) => None,
            Some(value) => Some(serde_json::from_value(value).map_err(D::Error::custom)?),
        };

        let state = match serde_json::from_value(JsonValue::Object(fields.clone())) {
            Ok(state) => state,
            Err(err) => match fields.remove(STATE_KEY) {
                Some(value) => serde_json::from_value(value).map_err(D::Error::custom)?,
                None => return Err(D::Error::custom(err)),
            },
        };

        Ok(Self {
            state,
            form_data,
            errors,
        })
    }
}

/// Rebuilds the last submission from a typed state.
pub fn previous_form_data<S>(state: &ActionState<S>) -> ReadonlyFormData {
    state.previous_form_data()
}

/// Rebuilds the last submission from state held as raw JSON.
///
/// A missing or malformed snapshot gives empty form data.
pub fn previous_form_data_from_json(state: &JsonValue) -> ReadonlyFormData {
    let snapshot = state
        .get(FORM_DATA_KEY)
        .map(FormSnapshot::from_json)
        .unwrap_or_default();
    ReadonlyFormData::from_snapshot(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form_data::FormSubmission;
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: i64,
    }

    #[test]
    fn test_snapshot_key_is_reserved_name() {
        let value = serde_json::to_value(ActionState::new(Counter::default())).unwrap();
        assert!(value.get(FORM_DATA_KEY).is_some());
    }

    #[test]
    fn test_new_state_serializes_flat() {
        let state = ActionState::new(Counter { count: 3 });
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value, json!({ "count": 3, "__formData": {} }));
    }

    #[test]
    fn test_accepted_state_shape() {
        let snapshot = FormSnapshot::from_submission(&FormSubmission::new().with("step", "1"));
        let state = ActionState::accepted(Counter { count: 1 }, snapshot);
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(
            value,
            json!({
                "count": 1,
                "__formData": { "step": ["1"] },
                "errors": { "formErrors": {}, "stateErrors": {}, "actionErrors": [] }
            })
        );
        assert!(!state.has_errors());
    }

    #[test]
    fn test_round_trip_through_json() {
        let submission = FormSubmission::new().with("b", "2").with("a", "1");
        let snapshot = FormSnapshot::from_submission(&submission);
        let state = ActionState::new(Counter { count: 0 })
            .rejected(snapshot, ActionErrors::action("Invalid username or password"));

        let text = serde_json::to_string(&state).unwrap();
        let back: ActionState<Counter> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, state);
        assert_eq!(back.snapshot().keys().collect::<Vec<_>>(), ["b", "a"]);
        assert!(back.has_errors());
    }

    #[test]
    fn test_missing_snapshot_defaults_to_empty() {
        let back: ActionState<Counter> = serde_json::from_str(r#"{"count":5}"#).unwrap();
        assert_eq!(back.state().count, 5);
        assert!(back.snapshot().is_empty());
        assert!(back.errors().is_none());
    }

    #[test]
    fn test_scalar_state_uses_state_key() {
        let snapshot = FormSnapshot::from_submission(&FormSubmission::new().with("like", "on"));
        let state = ActionState::accepted(true, snapshot);

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["state"], json!(true));
        assert_eq!(value["__formData"], json!({ "like": ["on"] }));

        let back: ActionState<bool> = serde_json::from_value(value).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_number_and_unit_states_round_trip() {
        let text = serde_json::to_string(&ActionState::new(7u32)).unwrap();
        assert_eq!(text, r#"{"state":7,"__formData":{}}"#);
        let back: ActionState<u32> = serde_json::from_str(&text).unwrap();
        assert_eq!(*back.state(), 7);

        let text = serde_json::to_string(&ActionState::new(())).unwrap();
        let back: ActionState<()> = serde_json::from_str(&text).unwrap();
        assert!(back.errors().is_none());
    }

    #[test]
    fn test_struct_with_state_field_stays_flat() {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        struct Wizard {
            state: String,
        }

        let state = ActionState::new(Wizard {
            state: "step-2".to_string(),
        });
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value, json!({ "state": "step-2", "__formData": {} }));
        let back: ActionState<Wizard> = serde_json::from_value(value).unwrap();
        assert_eq!(back.state().state, "step-2");
    }

    #[test]
    fn test_reserved_field_is_a_serialize_error() {
        #[derive(Debug, Clone, Serialize)]
        struct Clash {
            errors: u32,
        }

        let err = serde_json::to_string(&ActionState::new(Clash { errors: 1 })).unwrap_err();
        assert!(err.to_string().contains("errors"));
    }

    #[test]
    fn test_previous_form_data_from_json() {
        let raw = json!({ "count": 1, "__formData": { "email": ["a@b.io"], "bad": 7 } });
        let form = previous_form_data_from_json(&raw);
        assert_eq!(form.get("email"), Some("a@b.io"));
        assert!(!form.has("bad"));

        assert!(!previous_form_data_from_json(&json!({ "count": 1 })).has("email"));
        assert!(!previous_form_data_from_json(&json!({ "__formData": "oops" })).has("email"));
    }
}
