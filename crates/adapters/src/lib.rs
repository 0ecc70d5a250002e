// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: remote calls and status persistence

pub mod http;
pub mod rpc;
pub mod status;
pub mod traced;

pub use http::{HttpAdapter, HttpError, UreqAdapter};
pub use rpc::{GrpcurlAdapter, RpcAdapter, RpcError};
pub use status::{StatusError, StatusWriter};
pub use traced::{TracedHttpAdapter, TracedRpcAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use http::{FakeHttpAdapter, HttpRequest};
#[cfg(any(test, feature = "test-support"))]
pub use rpc::{FakeRpcAdapter, RpcRequest};
#[cfg(any(test, feature = "test-support"))]
pub use status::FakeStatusWriter;
