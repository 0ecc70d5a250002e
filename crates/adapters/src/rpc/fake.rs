// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake remote procedure call adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{RpcAdapter, RpcError};
use async_trait::async_trait;
use karness_core::{ActionResult, RpcMethod};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcRequest {
    pub addr: String,
    pub symbol: String,
    pub body: Vec<u8>,
}

/// Fake adapter answering with scripted results, in order
#[derive(Clone, Default)]
pub struct FakeRpcAdapter {
    responses: Arc<Mutex<VecDeque<Result<ActionResult, String>>>>,
    calls: Arc<Mutex<Vec<RpcRequest>>>,
    latency: Arc<Mutex<Option<Duration>>>,
}

impl FakeRpcAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    pub fn respond(&self, status: &str, body: &str) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(ActionResult::new(status, body.as_bytes().to_vec())));
    }

    /// Queue a transport failure
    pub fn fail(&self, message: &str) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(message.to_string()));
    }

    /// Delay every call by `latency` before answering
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap_or_else(|e| e.into_inner()) = Some(latency);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<RpcRequest> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl RpcAdapter for FakeRpcAdapter {
    async fn invoke(
        &self,
        addr: &str,
        method: &RpcMethod,
        body: &[u8],
    ) -> Result<ActionResult, RpcError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RpcRequest {
                addr: addr.to_string(),
                symbol: method.symbol(),
                body: body.to_vec(),
            });

        let latency = *self.latency.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let next = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match next {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(RpcError::CallFailed(message)),
            None => Err(RpcError::CallFailed("no scripted response".to_string())),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
