// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actions and their results

use crate::Body;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// The remote call an action performs, as declared.
///
/// At most one call descriptor may be set. An action with none performs no
/// remote call and yields a synthetic `OK` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc: Option<GrpcCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpCall>,
    /// Request payload
    #[serde(default)]
    pub body: Body,
    /// Result binding: variable name -> extraction path (e.g. `{.message}`)
    #[serde(default, alias = "bindResult")]
    pub bind_result: BTreeMap<String, String>,
}

/// Fully qualified remote procedure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcMethod {
    #[serde(default)]
    pub package: String,
    pub service: String,
    pub rpc: String,
}

impl RpcMethod {
    /// `package.Service/Rpc`, or `Service/Rpc` without a package
    pub fn symbol(&self) -> String {
        if self.package.is_empty() {
            format!("{}/{}", self.service, self.rpc)
        } else {
            format!("{}.{}/{}", self.package, self.service, self.rpc)
        }
    }
}

/// Remote procedure call descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrpcCall {
    pub addr: String,
    #[serde(flatten)]
    pub method: RpcMethod,
}

/// Plain HTTP call descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpCall {
    pub url: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// An action declared more than one call descriptor
#[derive(Debug, Error, PartialEq, Eq)]
#[error("action {0:?} declares more than one call")]
pub struct AmbiguousCall(pub String);

/// Resolved call variant of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call<'a> {
    RemoteCall {
        addr: &'a str,
        method: &'a RpcMethod,
    },
    Http(&'a HttpCall),
    None,
}

impl Action {
    /// Resolve which call this action performs
    pub fn call(&self) -> Result<Call<'_>, AmbiguousCall> {
        match (&self.grpc, &self.http) {
            (Some(grpc), None) => Ok(Call::RemoteCall {
                addr: &grpc.addr,
                method: &grpc.method,
            }),
            (None, Some(http)) => Ok(Call::Http(http)),
            (None, None) => Ok(Call::None),
            (Some(_), Some(_)) => Err(AmbiguousCall(self.name.clone())),
        }
    }
}

/// Status and raw body produced by one action invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub status: String,
    pub body: Vec<u8>,
}

impl ActionResult {
    pub fn new(status: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: status.into(),
            body: body.into(),
        }
    }

    /// Result of an action that performs no remote call
    pub fn ok() -> Self {
        Self::new("OK", Vec::new())
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
