// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Semantic-subset comparison of a synthesized object against a stored one.
//!
//! Fields left unset by the synthesizer (null, empty strings, empty maps) are
//! ignored so that defaults filled in by the store do not read as drift.
//! Lists compare element-wise by index; the stored list may be longer, so
//! elements appended by the store (injected sidecars) are not drift either.

use serde::Serialize;
use serde_json::Value;

/// Whether every field set in `desired` is present and equal in `actual`
pub fn is_derivative<T: Serialize>(desired: &T, actual: &T) -> bool {
    match (serde_json::to_value(desired), serde_json::to_value(actual)) {
        (Ok(desired), Ok(actual)) => value_is_derivative(&desired, &actual),
        _ => false,
    }
}

pub fn value_is_derivative(desired: &Value, actual: &Value) -> bool {
    match (desired, actual) {
        (Value::Null, _) => true,
        (Value::String(d), _) if d.is_empty() => true,
        (Value::Object(d), _) if d.is_empty() => true,
        (Value::Array(d), _) if d.is_empty() => true,
        (Value::Object(d), Value::Object(a)) => d.iter().all(|(key, d)| match a.get(key) {
            Some(a) => value_is_derivative(d, a),
            None => value_is_derivative(d, &Value::Null),
        }),
        (Value::Array(d), Value::Array(a)) => {
            d.len() <= a.len() && d.iter().zip(a).all(|(d, a)| value_is_derivative(d, a))
        }
        (d, a) => d == a,
    }
}
