// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::http::{HttpAdapter, HttpError};
use crate::rpc::{RpcAdapter, RpcError};
use async_trait::async_trait;
use karness_core::{ActionResult, HttpCall, RpcMethod};
use tracing::Instrument;

/// Wrapper that adds tracing to any RpcAdapter
#[derive(Clone)]
pub struct TracedRpcAdapter<R> {
    inner: R,
}

impl<R> TracedRpcAdapter<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: RpcAdapter> RpcAdapter for TracedRpcAdapter<R> {
    async fn invoke(
        &self,
        addr: &str,
        method: &RpcMethod,
        body: &[u8],
    ) -> Result<ActionResult, RpcError> {
        let symbol = method.symbol();
        let span = tracing::info_span!("rpc.invoke", addr, symbol = %symbol);

        async {
            tracing::info!(body_len = body.len(), "calling");

            // Precondition: an address is required
            if addr.is_empty() {
                tracing::error!("empty target address");
                return Err(RpcError::CallFailed(format!(
                    "empty target address for {}",
                    symbol
                )));
            }

            let start = std::time::Instant::now();
            let result = self.inner.invoke(addr, method, body).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(res) => tracing::info!(
                    status = %res.status,
                    body_len = res.body.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "call completed"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "call failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any HttpAdapter
#[derive(Clone)]
pub struct TracedHttpAdapter<H> {
    inner: H,
}

impl<H> TracedHttpAdapter<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<H: HttpAdapter> HttpAdapter for TracedHttpAdapter<H> {
    async fn send(&self, call: &HttpCall, body: &[u8]) -> Result<ActionResult, HttpError> {
        let span = tracing::info_span!("http.send", method = %call.method, url = %call.url);

        async {
            tracing::info!(body_len = body.len(), "sending");

            // Precondition: only http(s) URLs are callable
            if !(call.url.starts_with("http://") || call.url.starts_with("https://")) {
                tracing::error!("url is not http(s)");
                return Err(HttpError::RequestFailed(format!(
                    "url is not http(s): {}",
                    call.url
                )));
            }

            let start = std::time::Instant::now();
            let result = self.inner.send(call, body).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(res) => tracing::info!(
                    status = %res.status,
                    body_len = res.body.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "request completed"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "request failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
