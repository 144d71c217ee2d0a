// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Validation interface used by actions.
//!
//! Actions never talk to a validation library directly. Anything that can
//! turn a borrowed value into either a parsed output or a list of
//! [`ValidationIssue`]s implements [`Validator`], and the action maps the
//! issues onto [`FieldErrors`] keyed by dotted path.
//!
//! # Example
//!
//! ```rust
//! use formstate::validate::{validator_fn, ValidationErrors, Validator};
//!
//! let non_negative = validator_fn(|n: &i64| {
//!     if *n < 0 {
//!         Err(ValidationErrors::single("count", "Number must be greater than or equal to 0"))
//!     } else {
//!         Ok(*n)
//!     }
//! });
//!
//! let errors = non_negative.validate(&-1).unwrap_err().into_field_errors();
//! assert_eq!(errors.get("count"), ["Number must be greater than or equal to 0"]);
//! ```

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

/// Checks a value and produces its parsed form.
pub trait Validator<T: ?Sized>: Send + Sync {
    /// The parsed value handed on when validation succeeds.
    type Output;

    /// Validates `value`, returning every problem found on failure.
    fn validate(&self, value: &T) -> Result<Self::Output, ValidationErrors>;
}

/// One validation problem at a path inside the validated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Path segments from the root, e.g. `["address", "zip"]`. Empty for the root.
    pub path: Vec<String>,
    /// Human-readable message.
    pub message: String,
}

impl ValidationIssue {
    /// Creates an issue at a single top-level field.
    pub fn at(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: vec![field.into()],
            message: message.into(),
        }
    }

    /// Creates an issue at a nested path.
    pub fn at_path<I, S>(path: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    /// Creates an issue about the value as a whole.
    pub fn root(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }

    /// The path joined with `.`; empty for root issues.
    pub fn path_key(&self) -> String {
        self.path.join(".")
    }
}

/// A non-empty set of validation problems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed with {} issue(s)", .issues.len())]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    /// Creates an empty error set to push issues into.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single issue at a top-level field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![ValidationIssue::at(field, message)],
        }
    }

    /// Adds an issue.
    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Returns true if no issue has been recorded.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// The recorded issues in the order they were found.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Groups messages by dotted path, keeping first-seen path order.
    pub fn into_field_errors(self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for issue in self.issues {
            errors.push(&issue.path_key(), issue.message);
        }
        errors
    }
}

impl From<ValidationIssue> for ValidationErrors {
    fn from(issue: ValidationIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

impl FromIterator<ValidationIssue> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationIssue>>(iter: I) -> Self {
        Self {
            issues: iter.into_iter().collect(),
        }
    }
}

/// Messages keyed by dotted field path, in first-seen order.
///
/// Serializes as a JSON object of string arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(String, Vec<String>)>,
}

impl FieldErrors {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message under `path`.
    pub fn push(&mut self, path: &str, message: String) {
        match self.entries.iter_mut().find(|(p, _)| p == path) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((path.to_string(), vec![message])),
        }
    }

    /// Messages for `path`; empty when the path has no errors.
    pub fn get(&self, path: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, m)| m.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true if `path` has at least one message.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|(p, _)| p == path)
    }

    /// Paths with errors, in first-seen order.
    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    /// `(path, messages)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.entries.iter().map(|(p, m)| (p.as_str(), m.as_slice()))
    }

    /// Number of paths with errors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, messages) in &self.entries {
            map.serialize_entry(path, messages)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldErrors {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldErrorsVisitor;

        impl<'de> Visitor<'de> for FieldErrorsVisitor {
            type Value = FieldErrors;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field paths to error messages")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut errors = FieldErrors::new();
                while let Some((path, messages)) = access.next_entry::<String, Vec<String>>()? {
                    for message in messages {
                        errors.push(&path, message);
                    }
                }
                Ok(errors)
            }
        }

        deserializer.deserialize_map(FieldErrorsVisitor)
    }
}

/// A [`Validator`] backed by a closure. Build one with [`validator_fn`].
pub struct FnValidator<F, T: ?Sized, O> {
    f: F,
    _marker: PhantomData<fn(&T) -> O>,
}

/// Wraps a closure as a [`Validator`].
pub fn validator_fn<T, O, F>(f: F) -> FnValidator<F, T, O>
where
    T: ?Sized,
    F: Fn(&T) -> Result<O, ValidationErrors> + Send + Sync,
{
    FnValidator {
        f,
        _marker: PhantomData,
    }
}

impl<F, T, O> Validator<T> for FnValidator<F, T, O>
where
    T: ?Sized,
    F: Fn(&T) -> Result<O, ValidationErrors> + Send + Sync,
{
    type Output = O;

    fn validate(&self, value: &T) -> Result<O, ValidationErrors> {
        (self.f)(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_group_by_path() {
        let errors: ValidationErrors = vec![
            ValidationIssue::at("email", "Required"),
            ValidationIssue::at_path(["address", "zip"], "Too short"),
            ValidationIssue::at("email", "Invalid email"),
        ]
        .into_iter()
        .collect();

        let fields = errors.into_field_errors();
        assert_eq!(fields.paths().collect::<Vec<_>>(), ["email", "address.zip"]);
        assert_eq!(fields.get("email"), ["Required", "Invalid email"]);
        assert_eq!(fields.get("address.zip"), ["Too short"]);
        assert!(fields.get("password").is_empty());
    }

    #[test]
    fn test_root_issue_uses_empty_path() {
        let fields = ValidationErrors::from(ValidationIssue::root("Bad shape")).into_field_errors();
        assert!(fields.contains(""));
        assert_eq!(fields.get(""), ["Bad shape"]);
    }

    #[test]
    fn test_field_errors_json_shape() {
        let mut fields = FieldErrors::new();
        fields.push("username", "Required".to_string());
        fields.push("age", "Expected number, received nan".to_string());

        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(
            json,
            r#"{"username":["Required"],"age":["Expected number, received nan"]}"#
        );

        let back: FieldErrors = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fields);
    }

    #[test]
    fn test_validator_fn() {
        let v = validator_fn(|s: &str| {
            if s.is_empty() {
                Err(ValidationErrors::single("name", "Required"))
            } else {
                Ok(s.len())
            }
        });
        assert_eq!(v.validate("abc").unwrap(), 3);
        assert_eq!(v.validate("").unwrap_err().issues().len(), 1);
    }
}
