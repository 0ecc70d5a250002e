// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion checking
//!
//! A declared response matches an observed `(status, body)` pair as follows:
//!
//! 1. A non-empty declared status must equal the observed status.
//! 2. A declared `json` body (even empty) must equal the raw body as text.
//! 3. Otherwise a non-empty declared `byte` body must match byte for byte.
//! 4. Otherwise a non-empty declared `kv` body must equal the observed body
//!    decoded as a string-keyed map, with identical keys and values.
//! 5. Anything else matches.

use karness_core::{ActionResult, Any, Completion, ConditionResponse};
use std::collections::BTreeMap;

/// Check one declared response against an observed result
pub fn matches(expected: &ConditionResponse, status: &str, body: &[u8]) -> bool {
    if !expected.status.is_empty() && expected.status != status {
        return false;
    }

    if let Some(json) = &expected.body.json {
        return json.as_bytes() == body;
    }

    if let Some(bytes) = expected.body.byte.as_ref().filter(|b| !b.is_empty()) {
        return bytes.as_slice() == body;
    }

    if let Some(kv) = expected.body.kv.as_ref().filter(|kv| !kv.is_empty()) {
        return match serde_json::from_slice::<BTreeMap<String, Any>>(body) {
            Ok(observed) => *kv == observed,
            Err(e) => {
                tracing::warn!(
                    body = %String::from_utf8_lossy(body),
                    error = %e,
                    "response body is not a key/value document"
                );
                false
            }
        };
    }

    true
}

/// True when every condition of `completion` accepts `result`.
///
/// Conditions without a response matcher are satisfied.
pub fn completion_satisfied(completion: &Completion, result: &ActionResult) -> bool {
    completion.conditions.iter().all(|condition| {
        condition
            .response
            .as_ref()
            .map_or(true, |expected| {
                matches(expected, &result.status, &result.body)
            })
    })
}

#[cfg(test)]
#[path = "checker_tests.rs"]
mod tests;
