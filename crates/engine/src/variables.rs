// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-scenario variable store

use karness_core::Any;
use std::collections::BTreeMap;

/// Named values visible to one scenario's actions.
///
/// Seeded from the scenario's declared variables; result bindings add to
/// or overwrite entries as events complete. The last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    values: BTreeMap<String, Any>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(initial: &BTreeMap<String, Any>) -> Self {
        Self {
            values: initial.clone(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Any> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Any) {
        self.values.insert(name.into(), value);
    }

    pub fn snapshot(&self) -> BTreeMap<String, Any> {
        self.values.clone()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
#[path = "variables_tests.rs"]
mod tests;
