// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object identity

use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing an object key
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("unexpected key format: {0:?}")]
    Format(String),
}

/// `namespace/name` identity of a declared object.
///
/// Cluster-scoped objects have an empty namespace and display as the bare name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

impl FromStr for ObjectKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [name] if !name.is_empty() => Ok(ObjectKey::new("", *name)),
            [namespace, name] if !name.is_empty() => Ok(ObjectKey::new(*namespace, *name)),
            _ => Err(KeyError::Format(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
