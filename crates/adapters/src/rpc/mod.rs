// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote procedure call adapters

mod grpcurl;

pub use grpcurl::{status_name, GrpcurlAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRpcAdapter, RpcRequest};

use async_trait::async_trait;
use karness_core::{ActionResult, RpcMethod};
use thiserror::Error;

/// Errors from remote procedure calls
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("call failed: {0}")]
    CallFailed(String),
}

/// Adapter that performs one remote procedure call round trip.
///
/// A reachable server answering with an error status is not an `RpcError`:
/// the status is reported in the returned result. Errors are reserved for
/// transport and tooling failures.
#[async_trait]
pub trait RpcAdapter: Clone + Send + Sync + 'static {
    async fn invoke(
        &self,
        addr: &str,
        method: &RpcMethod,
        body: &[u8],
    ) -> Result<ActionResult, RpcError>;
}
