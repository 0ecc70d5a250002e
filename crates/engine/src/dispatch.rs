// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action dispatch

use crate::{bind_result, interpolate, DispatchError, VariableStore};
use karness_adapters::{HttpAdapter, RpcAdapter};
use karness_core::{Action, ActionResult, Body, Call, Encoding};
use std::collections::BTreeMap;

/// Performs actions through the configured adapters
pub struct Dispatcher<R, H> {
    rpc: R,
    http: H,
}

impl<R: RpcAdapter, H: HttpAdapter> Dispatcher<R, H> {
    pub fn new(rpc: R, http: H) -> Self {
        Self { rpc, http }
    }

    /// Perform `action` with its body rendered from `vars`.
    ///
    /// A server answering with an error status is a successful dispatch;
    /// only transport and encoding failures are errors.
    pub async fn dispatch(
        &self,
        action: &Action,
        vars: &VariableStore,
    ) -> Result<ActionResult, DispatchError> {
        let call = action.call()?;
        let body = render_body(&action.body, vars)?;

        let result = match call {
            Call::RemoteCall { addr, method } => {
                tracing::debug!(action = %action.name, addr, symbol = %method.symbol(), "dispatching remote call");
                self.rpc.invoke(addr, method, &body).await?
            }
            Call::Http(http) => {
                tracing::debug!(action = %action.name, method = %http.method, url = %http.url, "dispatching http call");
                self.http.send(http, &body).await?
            }
            Call::None => ActionResult::ok(),
        };
        Ok(result)
    }

    /// Apply the action's result bindings once its result has matched
    pub fn bind(
        &self,
        action: &Action,
        result: &ActionResult,
        vars: &mut VariableStore,
    ) -> Result<(), DispatchError> {
        bind_result(&action.bind_result, &result.body, vars)?;
        Ok(())
    }
}

/// Encode the body and substitute variables.
///
/// `kv` values are substituted before JSON encoding so they are escaped.
/// `json` and `byte` text is substituted as-is; non-UTF-8 bytes pass
/// unchanged.
fn render_body(body: &Body, vars: &VariableStore) -> Result<Vec<u8>, serde_json::Error> {
    if let (Encoding::Kv, Some(kv)) = (body.encoding(), &body.kv) {
        let rendered: BTreeMap<&str, String> = kv
            .iter()
            .map(|(key, value)| (key.as_str(), interpolate(value.as_str(), vars)))
            .collect();
        return serde_json::to_vec(&rendered);
    }

    let encoded = body.encode()?;
    Ok(match String::from_utf8(encoded) {
        Ok(text) => interpolate(&text, vars).into_bytes(),
        Err(raw) => raw.into_bytes(),
    })
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
