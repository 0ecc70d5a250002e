// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory object store

use karness_core::{Object, ObjectKey, ScenarioStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors from store updates
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(ObjectKey),
    #[error("{key} is a {kind}, not a Scenario")]
    NotScenario { key: ObjectKey, kind: String },
}

/// Latest known snapshot of every declared object, keyed by identity.
///
/// Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct ObjectStore {
    objects: Arc<Mutex<HashMap<ObjectKey, Object>>>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ObjectKey, Object>> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert or replace an object, returning the previous snapshot
    pub fn apply(&self, object: Object) -> Option<Object> {
        let key = object.key();
        tracing::trace!(key = %key, kind = object.kind(), "apply");
        self.lock().insert(key, object)
    }

    pub fn remove(&self, key: &ObjectKey) -> Option<Object> {
        tracing::trace!(key = %key, "remove");
        self.lock().remove(key)
    }

    pub fn get(&self, key: &ObjectKey) -> Option<Object> {
        self.lock().get(key).cloned()
    }

    /// Replace the status of a stored scenario
    pub fn update_status(&self, key: &ObjectKey, status: &ScenarioStatus) -> Result<(), StoreError> {
        let mut objects = self.lock();
        match objects.get_mut(key) {
            Some(Object::Scenario(scenario)) => {
                scenario.status = status.clone();
                Ok(())
            }
            Some(other) => Err(StoreError::NotScenario {
                key: key.clone(),
                kind: other.kind().to_string(),
            }),
            None => Err(StoreError::NotFound(key.clone())),
        }
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Vec<ObjectKey> {
        let mut keys: Vec<ObjectKey> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
