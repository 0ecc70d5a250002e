// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake status writer for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{StatusError, StatusWriter};
use async_trait::async_trait;
use karness_core::{Scenario, ScenarioStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Records every written scenario snapshot
#[derive(Clone, Default)]
pub struct FakeStatusWriter {
    updates: Arc<Mutex<Vec<Scenario>>>,
    failing: Arc<AtomicBool>,
}

impl FakeStatusWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (they are still recorded)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get all written snapshots, oldest first
    pub fn updates(&self) -> Vec<Scenario> {
        self.updates.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Get the written statuses, oldest first
    pub fn statuses(&self) -> Vec<ScenarioStatus> {
        self.updates()
            .into_iter()
            .map(|scenario| scenario.status)
            .collect()
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl StatusWriter for FakeStatusWriter {
    async fn update(&self, scenario: &Scenario) -> Result<(), StatusError> {
        self.updates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(scenario.clone());

        if self.failing.load(Ordering::SeqCst) {
            return Err(StatusError::WriteFailed("injected failure".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
