// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use karness_adapters::{HttpError, RpcError, StatusError};
use karness_core::{AmbiguousCall, ObjectKey};
use thiserror::Error;

/// Errors returned by the harness
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("unsupported object kind {kind:?} for {key}")]
    UnsupportedObject { key: ObjectKey, kind: String },
    #[error("initial status write failed: {0}")]
    Status(#[from] StatusError),
}

/// Errors from dispatching one action
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    AmbiguousCall(#[from] AmbiguousCall),
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("remote call failed: {0}")]
    Rpc(#[from] RpcError),
    #[error("http call failed: {0}")]
    Http(#[from] HttpError),
    #[error("result binding failed: {0}")]
    Bind(#[from] BindError),
}

/// Errors from binding response fields into variables
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("response body is not JSON: {0}")]
    NotJson(String),
    #[error("invalid extraction path {0:?}")]
    InvalidPath(String),
    #[error("path {path:?} not found in response (binding {variable})")]
    NotFound { variable: String, path: String },
}
