// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request body interpolation

use crate::VariableStore;
use regex::Regex;
use std::sync::LazyLock;

// Regex pattern for {VARIABLE_NAME} - this is a constant valid pattern
#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// Interpolate `{NAME}` placeholders with values from the variable store
///
/// Unknown variables are left as-is, so JSON object braces pass through.
pub fn interpolate(template: &str, vars: &VariableStore) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let name = &caps[1];
            vars.get(name)
                .map(|value| value.as_str().to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
