// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status persistence

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStatusWriter;

use async_trait::async_trait;
use karness_core::Scenario;
use thiserror::Error;

/// Errors from status writes
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("status write failed: {0}")]
    WriteFailed(String),
}

/// Makes a scenario's status durable and visible to later reconciliations.
///
/// Implementations may re-enqueue the object as a side effect; the harness
/// is built to tolerate the re-entrant reconcile this causes.
#[async_trait]
pub trait StatusWriter: Clone + Send + Sync + 'static {
    async fn update(&self, scenario: &Scenario) -> Result<(), StatusError>;
}
