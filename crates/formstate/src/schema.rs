// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Declarative validation of form submissions.
//!
//! [`FormSchema`] lists the fields a form is expected to carry and checks a
//! [`FormSubmission`] against them, collecting every problem rather than
//! stopping at the first. The parsed values come back as a JSON object so they
//! can be deserialized into a typed struct with [`FormSchema::typed`].
//!
//! Text inputs follow browser semantics: an input left blank posts an empty
//! string, which counts as missing.
//!
//! # Example
//!
//! ```rust
//! use formstate::form_data::FormSubmission;
//! use formstate::schema::{FieldRule, FormSchema};
//! use formstate::validate::Validator;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Login {
//!     email: String,
//!     password: String,
//! }
//!
//! let schema = FormSchema::new()
//!     .field("email", FieldRule::email())
//!     .field("password", FieldRule::text().min_length(8))
//!     .typed::<Login>();
//!
//! let submission = FormSubmission::new()
//!     .with("email", "admin@example.com")
//!     .with("password", "password");
//!
//! let login = schema.validate(&submission).unwrap();
//! assert_eq!(login.email, "admin@example.com");
//! ```

use crate::form_data::{FormSubmission, FormValue};
use crate::validate::{ValidationErrors, ValidationIssue, Validator};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value as JsonValue};
use std::marker::PhantomData;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[A-Za-z0-9._%+'-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
            .expect("email pattern is valid");
}

/// Message for a required field that is missing or blank.
pub const REQUIRED_MESSAGE: &str = "Required";

/// Parsed form values, keyed by field name in schema order.
pub type FormValues = Map<String, JsonValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Email,
    Number,
    Checkbox,
    Repeatable,
}

/// How a single field is read and checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    kind: FieldKind,
    optional: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
}

impl FieldRule {
    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            optional: false,
            min_length: None,
            max_length: None,
        }
    }

    /// A required text input. Parsed as a JSON string.
    pub fn text() -> Self {
        Self::of(FieldKind::Text)
    }

    /// A required text input holding an email address.
    pub fn email() -> Self {
        Self::of(FieldKind::Email)
    }

    /// A required numeric input. Parsed as a JSON number.
    pub fn number() -> Self {
        Self::of(FieldKind::Number)
    }

    /// A checkbox: `true` when present with any value, `false` when absent.
    pub fn checkbox() -> Self {
        Self::of(FieldKind::Checkbox)
    }

    /// Every text value under the key, parsed as a JSON array of strings.
    pub fn repeatable() -> Self {
        Self::of(FieldKind::Repeatable)
    }

    /// Allows the field to be missing; it is then left out of the values.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Minimum character count (text) or item count (repeatable).
    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    /// Maximum character count (text) or item count (repeatable).
    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    fn check(
        &self,
        name: &str,
        submission: &FormSubmission,
        issues: &mut ValidationErrors,
    ) -> Option<JsonValue> {
        match self.kind {
            FieldKind::Checkbox => Some(JsonValue::Bool(submission.get_text(name).is_some())),
            FieldKind::Repeatable => {
                let items: Vec<&str> = submission
                    .get_all(name)
                    .into_iter()
                    .filter_map(FormValue::as_text)
                    .collect();
                if items.is_empty() && self.optional {
                    return None;
                }
                if items.is_empty() && self.min_length.is_none() {
                    issues.push(ValidationIssue::at(name, REQUIRED_MESSAGE));
                    return None;
                }
                self.check_length(name, items.len(), "Array", "element(s)", issues);
                Some(JsonValue::Array(
                    items.into_iter().map(|s| JsonValue::String(s.to_string())).collect(),
                ))
            }
            FieldKind::Text | FieldKind::Email | FieldKind::Number => {
                let raw = submission.get_text(name).filter(|s| !s.is_empty());
                let Some(raw) = raw else {
                    if !self.optional {
                        issues.push(ValidationIssue::at(name, REQUIRED_MESSAGE));
                    }
                    return None;
                };
                match self.kind {
                    FieldKind::Number => match parse_number(raw) {
                        Some(n) => Some(JsonValue::Number(n)),
                        None => {
                            issues.push(ValidationIssue::at(
                                name,
                                "Expected number, received nan",
                            ));
                            None
                        }
                    },
                    _ => {
                        let before = issues.issues().len();
                        if self.kind == FieldKind::Email && !EMAIL_RE.is_match(raw) {
                            issues.push(ValidationIssue::at(name, "Invalid email"));
                        }
                        let len = raw.chars().count();
                        self.check_length(name, len, "String", "character(s)", issues);
                        (issues.issues().len() == before)
                            .then(|| JsonValue::String(raw.to_string()))
                    }
                }
            }
        }
    }

    fn check_length(
        &self,
        name: &str,
        len: usize,
        noun: &str,
        unit: &str,
        issues: &mut ValidationErrors,
    ) {
        if let Some(min) = self.min_length {
            if len < min {
                issues.push(ValidationIssue::at(
                    name,
                    format!("{} must contain at least {} {}", noun, min, unit),
                ));
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                issues.push(ValidationIssue::at(
                    name,
                    format!("{} must contain at most {} {}", noun, max, unit),
                ));
            }
        }
    }
}

fn parse_number(raw: &str) -> Option<Number> {
    let raw = raw.trim();
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Number::from(i));
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}

/// An ordered set of field rules for one form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSchema {
    fields: Vec<(String, FieldRule)>,
}

impl FormSchema {
    /// Creates a schema with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field. Fields are checked and emitted in the order added.
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.push((name.into(), rule));
        self
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Turns the schema into a validator producing `T` instead of raw values.
    pub fn typed<T: DeserializeOwned>(self) -> TypedFormSchema<T> {
        TypedFormSchema {
            schema: self,
            _marker: PhantomData,
        }
    }
}

impl Validator<FormSubmission> for FormSchema {
    type Output = FormValues;

    fn validate(&self, submission: &FormSubmission) -> Result<FormValues, ValidationErrors> {
        let mut issues = ValidationErrors::new();
        let mut values = FormValues::new();

        for (name, rule) in &self.fields {
            if let Some(value) = rule.check(name, submission, &mut issues) {
                values.insert(name.clone(), value);
            }
        }

        if issues.is_empty() {
            Ok(values)
        } else {
            Err(issues)
        }
    }
}

/// A [`FormSchema`] whose output is deserialized into `T`.
#[derive(Debug, Clone)]
pub struct TypedFormSchema<T> {
    schema: FormSchema,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Validator<FormSubmission> for TypedFormSchema<T> {
    type Output = T;

    fn validate(&self, submission: &FormSubmission) -> Result<T, ValidationErrors> {
        let values = self.schema.validate(submission)?;
        serde_json::from_value(JsonValue::Object(values))
            .map_err(|e| ValidationIssue::root(e.to_string()).into())
    }
}
