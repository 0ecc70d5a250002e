// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! grpcurl-based remote procedure call adapter

use super::{RpcAdapter, RpcError};
use async_trait::async_trait;
use karness_core::{ActionResult, RpcMethod};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// grpcurl reports a non-OK status `c` by exiting with `64 + c`
const STATUS_EXIT_OFFSET: i32 = 64;

/// Canonical gRPC status code names, indexed by code
const STATUS_NAMES: [&str; 17] = [
    "OK",
    "CANCELLED",
    "UNKNOWN",
    "INVALID_ARGUMENT",
    "DEADLINE_EXCEEDED",
    "NOT_FOUND",
    "ALREADY_EXISTS",
    "PERMISSION_DENIED",
    "RESOURCE_EXHAUSTED",
    "FAILED_PRECONDITION",
    "ABORTED",
    "OUT_OF_RANGE",
    "UNIMPLEMENTED",
    "INTERNAL",
    "UNAVAILABLE",
    "DATA_LOSS",
    "UNAUTHENTICATED",
];

/// Canonical name of a gRPC status code
pub fn status_name(code: u32) -> String {
    STATUS_NAMES
        .get(code as usize)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("CODE_{}", code))
}

/// Invokes methods through the `grpcurl` command line tool.
///
/// Method descriptors are resolved by server reflection, so the target must
/// expose the reflection service.
#[derive(Debug, Clone)]
pub struct GrpcurlAdapter {
    program: PathBuf,
    plaintext: bool,
    connect_timeout: Duration,
}

impl Default for GrpcurlAdapter {
    fn default() -> Self {
        Self::new("grpcurl")
    }
}

impl GrpcurlAdapter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            plaintext: true,
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_plaintext(mut self, plaintext: bool) -> Self {
        self.plaintext = plaintext;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Command line arguments for one call
    pub(crate) fn args(&self, addr: &str, method: &RpcMethod, has_body: bool) -> Vec<String> {
        let mut args = vec!["-format-error".to_string()];
        if self.plaintext {
            args.push("-plaintext".to_string());
        }
        args.push("-connect-timeout".to_string());
        args.push(format!("{:.3}", self.connect_timeout.as_secs_f64()));
        if has_body {
            args.push("-d".to_string());
            args.push("@".to_string());
        }
        args.push(addr.to_string());
        args.push(method.symbol());
        args
    }
}

/// Map a grpcurl exit code to a status name, if it carries one
pub(crate) fn status_from_exit(code: Option<i32>) -> Option<String> {
    match code {
        Some(0) => Some(status_name(0)),
        Some(c) if c > STATUS_EXIT_OFFSET => Some(status_name((c - STATUS_EXIT_OFFSET) as u32)),
        _ => None,
    }
}

#[async_trait]
impl RpcAdapter for GrpcurlAdapter {
    async fn invoke(
        &self,
        addr: &str,
        method: &RpcMethod,
        body: &[u8],
    ) -> Result<ActionResult, RpcError> {
        let has_body = !body.is_empty();

        let mut child = Command::new(&self.program)
            .args(self.args(addr, method, has_body))
            .stdin(if has_body {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                RpcError::SpawnFailed(format!("{}: {}", self.program.display(), e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(body)
                .await
                .map_err(|e| RpcError::CallFailed(format!("writing request: {}", e)))?;
            // stdin is dropped here so grpcurl sees end of input
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| RpcError::CallFailed(e.to_string()))?;

        match status_from_exit(output.status.code()) {
            Some(status) => Ok(ActionResult::new(status, output.stdout)),
            None => Err(RpcError::CallFailed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
        }
    }
}

#[cfg(test)]
#[path = "grpcurl_tests.rs"]
mod tests;
