// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opaque textual values

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// An opaque scalar value, kept as text.
///
/// Strings keep their raw contents. Every other value (numbers, booleans,
/// null, arrays, objects) is stored as its compact JSON text, so two decoded
/// documents compare equal exactly when their textual forms agree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Any(String);

impl Any {
    pub fn new(text: impl Into<String>) -> Self {
        Any(text.into())
    }

    /// Convert a decoded JSON value into its textual form
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => Any(s.clone()),
            other => Any(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Any {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Any {
    fn from(s: String) -> Self {
        Any(s)
    }
}

impl From<&str> for Any {
    fn from(s: &str) -> Self {
        Any(s.to_string())
    }
}

impl Serialize for Any {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Any {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Any::from_json(&value))
    }
}

#[cfg(test)]
#[path = "any_tests.rs"]
mod tests;
