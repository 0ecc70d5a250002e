// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake HTTP adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{HttpAdapter, HttpError};
use async_trait::async_trait;
use karness_core::{ActionResult, HttpCall};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Recorded HTTP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub body: Vec<u8>,
}

/// Fake adapter answering with scripted results, in order
#[derive(Clone, Default)]
pub struct FakeHttpAdapter {
    responses: Arc<Mutex<VecDeque<Result<ActionResult, String>>>>,
    calls: Arc<Mutex<Vec<HttpRequest>>>,
}

impl FakeHttpAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status code
    pub fn respond(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(ActionResult::new(
                status.to_string(),
                body.as_bytes().to_vec(),
            )));
    }

    /// Queue a transport failure
    pub fn fail(&self, message: &str) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(message.to_string()));
    }

    /// Get all recorded requests
    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl HttpAdapter for FakeHttpAdapter {
    async fn send(&self, call: &HttpCall, body: &[u8]) -> Result<ActionResult, HttpError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(HttpRequest {
                method: call.method.clone(),
                url: call.url.clone(),
                body: body.to_vec(),
            });

        let next = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match next {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(HttpError::RequestFailed(message)),
            None => Err(HttpError::RequestFailed("no scripted response".to_string())),
        }
    }
}
