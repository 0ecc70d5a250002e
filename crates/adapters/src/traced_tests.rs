// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{FakeHttpAdapter, FakeRpcAdapter};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::new();
    let logs_clone = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs_clone)
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn greeter() -> RpcMethod {
    RpcMethod {
        package: "helloworld".to_string(),
        service: "Greeter".to_string(),
        rpc: "SayHello".to_string(),
    }
}

fn http_call(url: &str) -> HttpCall {
    HttpCall {
        url: url.to_string(),
        method: "GET".to_string(),
        headers: BTreeMap::new(),
    }
}

// =============================================================================
// Precondition validation tests
// =============================================================================

#[tokio::test]
async fn traced_rpc_rejects_empty_address() {
    let fake = FakeRpcAdapter::new();
    let traced = TracedRpcAdapter::new(fake.clone());

    let result = traced.invoke("", &greeter(), b"").await;

    let err = result.unwrap_err();
    assert!(
        err.to_string().contains("empty target address"),
        "Expected error about address, got: {}",
        err
    );
    assert!(fake.calls().is_empty(), "inner adapter must not be called");
}

#[tokio::test]
async fn traced_http_rejects_non_http_url() {
    let fake = FakeHttpAdapter::new();
    let traced = TracedHttpAdapter::new(fake.clone());

    let result = traced.send(&http_call("ftp://example.com"), b"").await;

    assert!(result.is_err());
    assert!(fake.calls().is_empty());
}

// =============================================================================
// Tracing output verification tests
// =============================================================================

#[test]
fn traced_rpc_logs_entry_and_completion() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeRpcAdapter::new();
        fake.respond("OK", r#"{"message":"hi"}"#);
        let traced = TracedRpcAdapter::new(fake);

        traced.invoke("localhost:50051", &greeter(), b"{}").await
    });

    assert!(result.is_ok(), "invoke should succeed: {:?}", result);
    assert!(
        logs.contains("rpc.invoke"),
        "Should log span name. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("helloworld.Greeter/SayHello"),
        "Should log symbol. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("call completed"),
        "Should log completion. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("elapsed_ms"),
        "Should log timing. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_rpc_logs_failure() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeRpcAdapter::new();
        fake.fail("connection refused");
        let traced = TracedRpcAdapter::new(fake);

        traced.invoke("localhost:50051", &greeter(), b"").await
    });

    assert!(result.is_err());
    assert!(
        logs.contains("call failed") && logs.contains("connection refused"),
        "Should log failure. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_http_logs_status() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeHttpAdapter::new();
        fake.respond(404, "missing");
        let traced = TracedHttpAdapter::new(fake);

        traced.send(&http_call("http://localhost/health"), b"").await
    });

    assert_eq!(result.unwrap().status, "404");
    assert!(
        logs.contains("http.send") && logs.contains("status=404"),
        "Should log span and status. Logs:\n{}",
        logs
    );
}
