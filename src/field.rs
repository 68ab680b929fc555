//! Permissive extraction of typed values from JSON fields.
//!
//! JIRA payloads vary wildly between server versions and configurations, so
//! every getter here is total: an absent, null, or mistyped field yields the
//! type's zero value (`None`, `false`, `0`, `0.0`) instead of an error. A
//! resource built from a sparse payload is a valid resource with empty
//! fields.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::Value;

use crate::resources::Resource;
use crate::rest::RestClient;

/// Timestamp format used by JIRA, e.g. `2013-02-19T09:24:55.961-0600`.
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Calendar date format used by JIRA, e.g. `2013-02-19`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Extracts a string field.
///
/// Scalar values (numbers, booleans) are rendered as strings; structured
/// values and null yield `None`.
#[must_use]
pub fn get_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Extracts a boolean field, defaulting to `false`.
#[must_use]
pub fn get_boolean(value: Option<&Value>) -> bool {
    value.and_then(Value::as_bool).unwrap_or(false)
}

/// Extracts an integer field, defaulting to `0`.
#[must_use]
pub fn get_integer(value: Option<&Value>) -> i64 {
    value.and_then(Value::as_i64).unwrap_or(0)
}

/// Extracts a floating-point field, defaulting to `0.0`.
#[must_use]
pub fn get_double(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(0.0)
}

/// Extracts a timestamp field in JIRA's `%Y-%m-%dT%H:%M:%S%.3f%z` format.
///
/// Anything that is not a string in that exact format yields `None`.
#[must_use]
pub fn get_date_time(value: Option<&Value>) -> Option<DateTime<FixedOffset>> {
    let text = value?.as_str()?;
    DateTime::parse_from_str(text, DATE_TIME_FORMAT).ok()
}

/// Extracts a calendar-date field in `%Y-%m-%d` format.
#[must_use]
pub fn get_date(value: Option<&Value>) -> Option<NaiveDate> {
    let text = value?.as_str()?;
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// Extracts a homogeneous string-keyed map.
///
/// Entries whose values do not convert to `V` are skipped; a non-object
/// field yields `None`.
#[must_use]
pub fn get_map<V: FieldValue>(value: Option<&Value>) -> Option<HashMap<String, V>> {
    let object = value?.as_object()?;
    Some(
        object
            .iter()
            .filter_map(|(key, entry)| V::from_value(entry).map(|v| (key.clone(), v)))
            .collect(),
    )
}

/// Builds a nested resource from an object field.
///
/// This is the single construction path for nested resources: a non-object
/// field yields `None`, an object always yields a resource (possibly with
/// empty fields).
#[must_use]
pub fn get_resource<T: Resource>(client: &RestClient, value: Option<&Value>) -> Option<T> {
    let object = value?;
    if object.is_object() {
        Some(T::deserialize(client, object))
    } else {
        None
    }
}

/// Builds a vector of nested resources from an array field.
///
/// An empty array yields `Some(vec![])`, which is distinct from an absent or
/// non-array field (`None`). Non-object elements are skipped.
#[must_use]
pub fn get_resource_array<T: Resource>(
    client: &RestClient,
    value: Option<&Value>,
) -> Option<Vec<T>> {
    let array = value?.as_array()?;
    Some(
        array
            .iter()
            .filter(|element| element.is_object())
            .map(|element| T::deserialize(client, element))
            .collect(),
    )
}

/// A scalar type extractable from a JSON value, for use with [`get_map`].
pub trait FieldValue: Sized {
    /// Converts a JSON value into `Self`, or `None` if it does not fit.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FieldValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(ToString::to_string)
    }
}

impl FieldValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FieldValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FieldValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}
