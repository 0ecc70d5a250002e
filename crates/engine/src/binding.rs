// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result binding: copy response fields into the variable store
//!
//! Paths select a value from the JSON-decoded response body:
//!
//! ```text
//! {.message}        field of the top-level object
//! .items[0].id      nested fields and array indices, braces optional
//! {.}               the whole document
//! ```

use crate::{BindError, VariableStore};
use karness_core::Any;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
}

fn parse_path(path: &str) -> Result<Vec<Segment>, BindError> {
    let invalid = || BindError::InvalidPath(path.to_string());

    let trimmed = path.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|p| p.strip_suffix('}'))
        .unwrap_or(trimmed)
        .trim();
    let rest = inner.strip_prefix('.').ok_or_else(invalid)?;

    let mut segments = Vec::new();
    if rest.is_empty() {
        return Ok(segments);
    }

    for part in rest.split('.') {
        let (name, mut indices) = match part.find('[') {
            Some(pos) => part.split_at(pos),
            None => (part, ""),
        };
        if name.is_empty() && indices.is_empty() {
            return Err(invalid());
        }
        if !name.is_empty() {
            segments.push(Segment::Field(name.to_string()));
        }
        while !indices.is_empty() {
            if !indices.starts_with('[') {
                return Err(invalid());
            }
            let close = indices.find(']').ok_or_else(invalid)?;
            let index = indices[1..close].parse::<usize>().map_err(|_| invalid())?;
            segments.push(Segment::Index(index));
            indices = &indices[close + 1..];
        }
    }
    Ok(segments)
}

fn lookup<'a>(document: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(document, |value, segment| match segment {
            Segment::Field(name) => value.get(name.as_str()),
            Segment::Index(index) => value.get(*index),
        })
}

/// Extract the value at `path` from a JSON response body.
///
/// Strings yield their raw contents; other values yield compact JSON text.
pub fn extract(body: &[u8], path: &str) -> Result<Any, BindError> {
    let segments = parse_path(path)?;
    let document: Value =
        serde_json::from_slice(body).map_err(|e| BindError::NotJson(e.to_string()))?;
    lookup(&document, &segments)
        .map(Any::from_json)
        .ok_or_else(|| BindError::NotFound {
            variable: String::new(),
            path: path.to_string(),
        })
}

/// Apply `bindings` (variable name -> path) against a response body.
///
/// The body is only decoded when there is something to bind. Either every
/// binding is applied or, on the first failure, none is.
pub fn bind_result(
    bindings: &BTreeMap<String, String>,
    body: &[u8],
    vars: &mut VariableStore,
) -> Result<(), BindError> {
    if bindings.is_empty() {
        return Ok(());
    }

    let document: Value =
        serde_json::from_slice(body).map_err(|e| BindError::NotJson(e.to_string()))?;

    let mut bound = Vec::with_capacity(bindings.len());
    for (variable, path) in bindings {
        let segments = parse_path(path)?;
        let value = lookup(&document, &segments).ok_or_else(|| BindError::NotFound {
            variable: variable.clone(),
            path: path.clone(),
        })?;
        bound.push((variable, path, Any::from_json(value)));
    }

    for (variable, path, value) in bound {
        tracing::debug!(variable = %variable, path = %path, value = %value, "bound result");
        vars.set(variable.clone(), value);
    }
    Ok(())
}

#[cfg(test)]
#[path = "binding_tests.rs"]
mod tests;
