// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ureq-based HTTP adapter

use super::{HttpAdapter, HttpError};
use async_trait::async_trait;
use karness_core::{ActionResult, HttpCall};
use std::collections::BTreeMap;
use std::time::Duration;
use ureq::{Agent, RequestBuilder};

/// Blocking ureq agent driven from the tokio blocking pool
#[derive(Clone)]
pub struct UreqAdapter {
    agent: Agent,
}

impl UreqAdapter {
    pub fn new(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
        }
    }
}

fn with_headers<B>(
    mut request: RequestBuilder<B>,
    headers: &BTreeMap<String, String>,
) -> RequestBuilder<B> {
    for (name, value) in headers {
        request = request.header(name, value);
    }
    request
}

fn send_blocking(agent: &Agent, call: &HttpCall, body: &[u8]) -> Result<ActionResult, HttpError> {
    let url = call.url.as_str();
    let response = match call.method.to_ascii_uppercase().as_str() {
        "GET" => with_headers(agent.get(url), &call.headers).call(),
        "HEAD" => with_headers(agent.head(url), &call.headers).call(),
        "DELETE" => with_headers(agent.delete(url), &call.headers).call(),
        "POST" => with_headers(agent.post(url), &call.headers).send(body),
        "PUT" => with_headers(agent.put(url), &call.headers).send(body),
        "PATCH" => with_headers(agent.patch(url), &call.headers).send(body),
        other => return Err(HttpError::UnsupportedMethod(other.to_string())),
    };

    let mut response = response.map_err(|e| HttpError::RequestFailed(e.to_string()))?;
    let status = response.status().as_u16().to_string();
    let bytes = response
        .body_mut()
        .read_to_vec()
        .map_err(|e| HttpError::RequestFailed(format!("failed to read response: {}", e)))?;

    Ok(ActionResult::new(status, bytes))
}

#[async_trait]
impl HttpAdapter for UreqAdapter {
    async fn send(&self, call: &HttpCall, body: &[u8]) -> Result<ActionResult, HttpError> {
        let agent = self.agent.clone();
        let call = call.clone();
        let body = body.to_vec();

        tokio::task::spawn_blocking(move || send_blocking(&agent, &call, &body))
            .await
            .map_err(|e| HttpError::RequestFailed(e.to_string()))?
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
