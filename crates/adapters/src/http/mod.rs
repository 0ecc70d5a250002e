// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain HTTP call adapters

mod client;

pub use client::UreqAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeHttpAdapter, HttpRequest};

use async_trait::async_trait;
use karness_core::{ActionResult, HttpCall};
use thiserror::Error;

/// Errors from HTTP calls
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
}

/// Adapter that performs one HTTP request.
///
/// Error statuses (4xx, 5xx) are results, not errors; the status is the
/// decimal code, e.g. `"404"`.
#[async_trait]
pub trait HttpAdapter: Clone + Send + Sync + 'static {
    async fn send(&self, call: &HttpCall, body: &[u8]) -> Result<ActionResult, HttpError>;
}
