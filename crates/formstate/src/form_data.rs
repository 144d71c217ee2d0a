// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Form submissions and their serializable snapshots.
//!
//! A browser form posts an ordered list of `(key, value)` pairs in which a key
//! may repeat. This module models that list as [`FormSubmission`], projects it
//! onto a JSON-safe [`FormSnapshot`] that can travel inside action state, and
//! rebuilds a read-only [`ReadonlyFormData`] view from the snapshot so a page
//! can redisplay what the user typed after a failed submission.
//!
//! # Example
//!
//! ```rust
//! use formstate::form_data::{FormSnapshot, FormSubmission};
//!
//! let mut submission = FormSubmission::new();
//! submission.append("tag", "rust");
//! submission.append("tag", "web");
//! submission.append("title", "Hello");
//!
//! let snapshot = FormSnapshot::from_submission(&submission);
//! let json = serde_json::to_string(&snapshot).unwrap();
//! assert_eq!(json, r#"{"tag":["rust","web"],"title":["Hello"]}"#);
//!
//! let view = snapshot.into_form_data();
//! assert_eq!(view.get("tag"), Some("rust"));
//! assert_eq!(view.get_all("tag"), ["rust", "web"]);
//! ```

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::slice;

/// Keys starting with this prefix belong to the host and are never snapshotted.
pub const INTERNAL_KEY_PREFIX: char = '$';

/// Returns true if `key` is reserved for the host (starts with `$`).
pub fn is_internal_key(key: &str) -> bool {
    key.starts_with(INTERNAL_KEY_PREFIX)
}

/// An uploaded file inside a multipart submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFile {
    /// Client-side file name from the `filename` disposition parameter.
    pub filename: String,
    /// Declared content type of the part, if any.
    pub content_type: Option<String>,
    /// Raw file contents.
    pub data: Vec<u8>,
}

/// A single submitted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// A plain text field.
    Text(String),
    /// A file upload.
    File(FormFile),
}

impl FormValue {
    /// Returns the text content, or `None` for files.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Text(s) => Some(s),
            FormValue::File(_) => None,
        }
    }

    /// Returns true if this value is a file upload.
    pub fn is_file(&self) -> bool {
        matches!(self, FormValue::File(_))
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<FormFile> for FormValue {
    fn from(value: FormFile) -> Self {
        FormValue::File(value)
    }
}

/// An ordered, multi-valued form submission.
///
/// Mirrors the query surface of a browser `FormData`: values come back in the
/// order they were appended and a key may carry several values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSubmission {
    entries: Vec<(String, FormValue)>,
}

impl FormSubmission {
    /// Creates an empty submission.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under `key`, keeping any existing values.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<FormValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Builder-style variant of [`append`](Self::append).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FormValue>) -> Self {
        self.append(key, value);
        self
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// First text value for `key`, skipping files.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .filter(|(k, _)| k == key)
            .find_map(|(_, v)| v.as_text())
    }

    /// All values for `key`, in submission order.
    pub fn get_all(&self, key: &str) -> Vec<&FormValue> {
        self.entries
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v)
            .collect()
    }

    /// Returns true if at least one value was submitted under `key`.
    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// All `(key, value)` pairs in submission order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &FormValue)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// One key per submitted value, in submission order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Every submitted value, in submission order.
    pub fn values(&self) -> impl Iterator<Item = &FormValue> + '_ {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Number of submitted pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FormSubmission
where
    K: Into<String>,
    V: Into<FormValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut submission = FormSubmission::new();
        for (k, v) in iter {
            submission.append(k, v);
        }
        submission
    }
}

/// JSON-safe projection of a submission: key to ordered list of text values.
///
/// Key order is first-appearance order in the submission; value order within a
/// key is submission order. Serializes as a JSON object of string arrays.
/// Every stored key carries at least one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    fields: Vec<(String, Vec<String>)>,
}

impl FormSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects a submission onto a snapshot.
    ///
    /// Host-internal keys (see [`is_internal_key`]) are skipped and file
    /// values are dropped. A key whose only values were files does not appear.
    pub fn from_submission(submission: &FormSubmission) -> Self {
        let mut snapshot = FormSnapshot::new();
        let mut dropped_files = 0usize;

        for (key, value) in submission.entries() {
            if is_internal_key(key) {
                continue;
            }
            match value {
                FormValue::Text(text) => snapshot.push(key, text.clone()),
                FormValue::File(_) => dropped_files += 1,
            }
        }

        if dropped_files > 0 {
            tracing::debug!(dropped_files, "Dropped file values from form snapshot");
        }

        snapshot
    }

    /// Reads a snapshot out of an arbitrary JSON value.
    ///
    /// Non-object values give an empty snapshot. Keys whose value is not an
    /// array are skipped and non-string array items are dropped.
    pub fn from_json(value: &JsonValue) -> Self {
        let mut snapshot = FormSnapshot::new();
        if let JsonValue::Object(map) = value {
            for (key, value) in map {
                if let JsonValue::Array(items) = value {
                    for item in items {
                        if let JsonValue::String(s) = item {
                            snapshot.push(key, s.clone());
                        }
                    }
                }
            }
        }
        snapshot
    }

    /// Appends `value` to `key`, creating the key at the end if needed.
    pub fn push(&mut self, key: &str, value: String) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((key.to_string(), vec![value])),
        }
    }

    /// Values stored for `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Distinct keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// `(key, values)` pairs in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Rebuilds a read-only form-data view.
    pub fn into_form_data(self) -> ReadonlyFormData {
        ReadonlyFormData::from_snapshot(self)
    }
}

impl Serialize for FormSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, values) in &self.fields {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FormSnapshot {
    /// Lenient: anything that is not an object of string arrays decodes to
    /// whatever string values it does hold, possibly none.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Ok(FormSnapshot::from_json(&value))
    }
}

/// Read-only form data rebuilt from a [`FormSnapshot`].
///
/// Answers `get`, `get_all`, `has` and ordered iteration the same way the
/// original submission did, minus any file values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadonlyFormData {
    snapshot: FormSnapshot,
}

impl ReadonlyFormData {
    /// Wraps a snapshot.
    pub fn from_snapshot(snapshot: FormSnapshot) -> Self {
        Self { snapshot }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.snapshot
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values for `key`, or an empty slice.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.snapshot.get(key).unwrap_or(&[])
    }

    /// Returns true if `key` has at least one value.
    pub fn has(&self, key: &str) -> bool {
        self.snapshot.get(key).is_some_and(|values| !values.is_empty())
    }

    /// One `(key, value)` pair per value: keys in insertion order, then
    /// values in insertion order.
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            fields: self.snapshot.fields.iter(),
            current: None,
        }
    }

    /// Keys as yielded by [`entries`](Self::entries), repeated per value.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries().map(|(k, _)| k)
    }

    /// Values as yielded by [`entries`](Self::entries).
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries().map(|(_, v)| v)
    }

    /// Calls `f(value, key)` for every entry, in iteration order.
    pub fn for_each<F: FnMut(&str, &str)>(&self, mut f: F) {
        for (key, value) in self.entries() {
            f(value, key);
        }
    }

    /// The underlying snapshot.
    pub fn snapshot(&self) -> &FormSnapshot {
        &self.snapshot
    }
}

impl<'a> IntoIterator for &'a ReadonlyFormData {
    type Item = (&'a str, &'a str);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

/// Iterator over the flattened entries of a [`ReadonlyFormData`].
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    fields: slice::Iter<'a, (String, Vec<String>)>,
    current: Option<(&'a str, slice::Iter<'a, String>)>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key, values)) = &mut self.current {
                if let Some(value) = values.next() {
                    return Some((*key, value.as_str()));
                }
            }
            let (key, values) = self.fields.next()?;
            self.current = Some((key.as_str(), values.iter()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_submission() -> FormSubmission {
        let mut submission = FormSubmission::new();
        submission.append("a", "1");
        submission.append("a", "2");
        submission.append("b", "3");
        submission.append("c", "4");
        submission
    }

    fn round_trip(submission: &FormSubmission) -> ReadonlyFormData {
        let snapshot = FormSnapshot::from_submission(submission);
        let text = serde_json::to_string(&snapshot).unwrap();
        let parsed: FormSnapshot = serde_json::from_str(&text).unwrap();
        parsed.into_form_data()
    }

    fn text_entries(submission: &FormSubmission) -> Vec<(String, String)> {
        submission
            .entries()
            .filter_map(|(k, v)| v.as_text().map(|t| (k.to_string(), t.to_string())))
            .collect()
    }

    #[test]
    fn test_get_matches_submission() {
        let submission = sample_submission();
        let view = round_trip(&submission);
        for key in ["a", "b", "c"] {
            assert_eq!(view.get(key), submission.get_text(key));
        }
        assert_eq!(view.get("d"), None);
    }

    #[test]
    fn test_get_all_matches_submission() {
        let submission = sample_submission();
        let view = round_trip(&submission);
        for key in ["a", "b", "c", "missing"] {
            let expected: Vec<&str> = submission
                .get_all(key)
                .into_iter()
                .filter_map(FormValue::as_text)
                .collect();
            assert_eq!(view.get_all(key), expected.as_slice());
        }
    }

    #[test]
    fn test_has_matches_submission() {
        let submission = sample_submission();
        let view = round_trip(&submission);
        for key in ["a", "b", "c", "d", "e"] {
            assert_eq!(view.has(key), submission.has(key));
        }
    }

    #[test]
    fn test_entries_keys_values_match_submission() {
        let submission = sample_submission();
        let view = round_trip(&submission);

        let entries: Vec<(String, String)> = view
            .entries()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(entries, text_entries(&submission));

        let keys: Vec<&str> = view.keys().collect();
        assert_eq!(keys, submission.keys().collect::<Vec<_>>());

        let values: Vec<&str> = view.values().collect();
        let expected: Vec<&str> = submission.values().filter_map(FormValue::as_text).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let view = round_trip(&sample_submission());
        let first: Vec<_> = view.entries().collect();
        let second: Vec<_> = (&view).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_for_each_visits_value_then_key() {
        let view = round_trip(&sample_submission());
        let mut seen = Vec::new();
        view.for_each(|value, key| seen.push(format!("{key}={value}")));
        assert_eq!(seen, ["a=1", "a=2", "b=3", "c=4"]);
    }

    #[test]
    fn test_internal_keys_are_skipped() {
        let submission = FormSubmission::new()
            .with("$ACTION_ID_abc", "")
            .with("$state", "{}")
            .with("email", "a@b.c");
        let snapshot = FormSnapshot::from_submission(&submission);
        assert_eq!(snapshot.keys().collect::<Vec<_>>(), ["email"]);
    }

    #[test]
    fn test_files_are_dropped() {
        let file = FormFile {
            filename: "avatar.png".to_string(),
            content_type: Some("image/png".to_string()),
            data: vec![0x89, 0x50],
        };
        let submission = FormSubmission::new()
            .with("avatar", file.clone())
            .with("docs", file)
            .with("docs", "notes.txt");

        let view = FormSnapshot::from_submission(&submission).into_form_data();
        assert!(!view.has("avatar"));
        assert_eq!(view.get_all("docs"), ["notes.txt"]);
    }

    #[test]
    fn test_interleaved_keys_group_by_first_appearance() {
        let submission = FormSubmission::new()
            .with("x", "1")
            .with("y", "2")
            .with("x", "3");
        let view = round_trip(&submission);
        let entries: Vec<_> = view.entries().collect();
        assert_eq!(entries, [("x", "1"), ("x", "3"), ("y", "2")]);
    }

    #[test]
    fn test_lenient_decoding() {
        let parsed: FormSnapshot =
            serde_json::from_str(r#"{"a":["1",2,"3"],"b":"nope","c":[],"d":[null]}"#).unwrap();
        let view = parsed.into_form_data();
        assert_eq!(view.get_all("a"), ["1", "3"]);
        assert!(!view.has("b"));
        assert!(!view.has("c"));
        assert!(!view.has("d"));

        let parsed: FormSnapshot = serde_json::from_str(r#""oops""#).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_from_json_non_object_is_empty() {
        assert!(FormSnapshot::from_json(&serde_json::json!("text")).is_empty());
        assert!(FormSnapshot::from_json(&serde_json::json!(null)).is_empty());
    }

    #[test]
    fn test_from_json_keeps_order() {
        let value = serde_json::json!({ "zeta": ["1"], "alpha": ["2"] });
        let snapshot = FormSnapshot::from_json(&value);
        assert_eq!(snapshot.keys().collect::<Vec<_>>(), ["zeta", "alpha"]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn form_value() -> impl Strategy<Value = FormValue> {
            prop_oneof![
                3 => "[ -~]{0,12}".prop_map(FormValue::Text),
                1 => ("[a-z]{1,8}\\.txt", prop::collection::vec(any::<u8>(), 0..16)).prop_map(
                    |(filename, data)| {
                        FormValue::File(FormFile {
                            filename,
                            content_type: None,
                            data,
                        })
                    }
                ),
            ]
        }

        /// Submissions whose values for each key are contiguous.
        fn grouped_submission() -> impl Strategy<Value = FormSubmission> {
            let group = ("\\$?[a-z]{1,6}", prop::collection::vec(form_value(), 1..4));
            prop::collection::vec(group, 0..6).prop_map(|groups| {
                let mut submission = FormSubmission::new();
                let mut seen = Vec::new();
                for (key, values) in groups {
                    if seen.contains(&key) {
                        continue;
                    }
                    for value in values {
                        submission.append(key.clone(), value);
                    }
                    seen.push(key);
                }
                submission
            })
        }

        proptest! {
            #[test]
            fn prop_json_round_trip_matches_text_entries(submission in grouped_submission()) {
                let view = round_trip(&submission);
                let expected: Vec<(String, String)> = text_entries(&submission)
                    .into_iter()
                    .filter(|(k, _)| !is_internal_key(k))
                    .collect();

                let entries: Vec<(String, String)> = view
                    .entries()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                prop_assert_eq!(&entries, &expected);

                let keys: Vec<&str> = view.keys().collect();
                let expected_keys: Vec<&str> = expected.iter().map(|(k, _)| k.as_str()).collect();
                prop_assert_eq!(keys, expected_keys);

                let values: Vec<&str> = view.values().collect();
                let expected_values: Vec<&str> = expected.iter().map(|(_, v)| v.as_str()).collect();
                prop_assert_eq!(values, expected_values);

                for key in submission.keys() {
                    let texts: Vec<&str> = expected
                        .iter()
                        .filter(|(k, _)| k == key)
                        .map(|(_, v)| v.as_str())
                        .collect();
                    prop_assert_eq!(view.get(key), texts.first().copied());
                    prop_assert_eq!(view.get_all(key), texts.as_slice());
                    prop_assert_eq!(view.has(key), !texts.is_empty());
                    if is_internal_key(key) {
                        prop_assert!(!view.has(key));
                    }
                }
            }
        }
    }
}
