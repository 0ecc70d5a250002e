// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-scenario state machine
//!
//! `Ready -> InProgress -> {Complete, Failed}`. Terminal states are sinks.

use crate::checker::completion_satisfied;
use crate::{DispatchError, Dispatcher, VariableStore};
use karness_adapters::{HttpAdapter, RpcAdapter, StatusError, StatusWriter};
use karness_core::{progress, ActionResult, Any, Event, ObjectKey, Scenario, ScenarioStatus, State};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// What a step does when dispatching its action fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchErrorPolicy {
    /// Mark the scenario failed
    #[default]
    Fail,
    /// Stay in progress and retry the same event on the next tick
    Retry,
}

/// Processor tuning
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Interval between steps
    pub tick: Duration,
    pub on_dispatch_error: DispatchErrorPolicy,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            on_dispatch_error: DispatchErrorPolicy::Fail,
        }
    }
}

struct ProcessorState {
    scenario: Scenario,
    variables: VariableStore,
    current: usize,
}

impl ProcessorState {
    fn state(&self) -> Option<State> {
        self.scenario.status.state
    }

    fn is_terminal(&self) -> bool {
        self.state().is_some_and(|s| s.is_terminal())
    }
}

enum Outcome {
    Matched,
    Mismatched,
    DispatchFailed(DispatchError),
}

/// Drives one scenario through its events.
///
/// Steps are serialized by `stepping`. The `state` lock is only held
/// between awaits, so readers never wait on a call in flight.
pub struct ScenarioProcessor<R, H, W> {
    key: ObjectKey,
    dispatcher: Arc<Dispatcher<R, H>>,
    writer: W,
    config: ProcessorConfig,
    cancel: CancellationToken,
    stepping: Mutex<()>,
    state: Mutex<ProcessorState>,
}

impl<R, H, W> ScenarioProcessor<R, H, W>
where
    R: RpcAdapter,
    H: HttpAdapter,
    W: StatusWriter,
{
    /// Create a processor in `Ready` with progress "0 of n"
    pub fn new(
        mut scenario: Scenario,
        dispatcher: Arc<Dispatcher<R, H>>,
        writer: W,
        config: ProcessorConfig,
        cancel: CancellationToken,
    ) -> Self {
        scenario.status.state = Some(State::Ready);
        scenario.status.progress = progress(0, scenario.spec.events.len());
        let variables = VariableStore::seeded(&scenario.spec.variables);

        Self {
            key: scenario.key(),
            dispatcher,
            writer,
            config,
            cancel,
            stepping: Mutex::new(()),
            state: Mutex::new(ProcessorState {
                scenario,
                variables,
                current: 0,
            }),
        }
    }

    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Current scenario snapshot, status included
    pub async fn snapshot(&self) -> Scenario {
        self.state.lock().await.scenario.clone()
    }

    pub async fn current_index(&self) -> usize {
        self.state.lock().await.current
    }

    pub async fn variables(&self) -> BTreeMap<String, Any> {
        self.state.lock().await.variables.snapshot()
    }

    /// Write the current status through the status writer
    pub async fn persist(&self) -> Result<(), StatusError> {
        let _stepping = self.stepping.lock().await;
        let scenario = self.snapshot().await;
        self.writer.update(&scenario).await
    }

    /// Step on every tick until cancelled or terminal
    pub async fn start(&self) {
        tracing::info!(key = %self.key, tick_ms = self.config.tick.as_millis() as u64, "processor loop started");
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::info!(key = %self.key, "processor cancelled");
                    return;
                }
                _ = tokio::time::sleep(self.config.tick) => {}
            }

            if self.step().await {
                tracing::debug!(key = %self.key, "processor loop finished");
                return;
            }
        }
    }

    /// Attempt the current event once. Returns true when nothing is left to
    /// run: the scenario is terminal or the processor was cancelled.
    pub async fn step(&self) -> bool {
        let span = tracing::info_span!("scenario", key = %self.key);
        self.step_inner().instrument(span).await
    }

    async fn step_inner(&self) -> bool {
        let _stepping = self.stepping.lock().await;

        let pending = {
            let mut guard = self.state.lock().await;
            if self.cancel.is_cancelled() || guard.is_terminal() {
                return true;
            }
            let state = &mut *guard;
            transition(&mut state.scenario.status, State::InProgress);
            state
                .scenario
                .spec
                .events
                .get(state.current)
                .cloned()
                .map(|event| (event, state.variables.clone()))
        };

        let dispatched = match pending {
            None => None,
            Some((event, vars)) => {
                let result = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        tracing::info!(event = %event.name, "cancelled during dispatch");
                        return true;
                    }
                    result = self.dispatcher.dispatch(&event.action, &vars) => result,
                };
                Some((event, result))
            }
        };

        let scenario = {
            let mut guard = self.state.lock().await;
            if self.cancel.is_cancelled() {
                return true;
            }
            let state = &mut *guard;
            match dispatched {
                None => transition(&mut state.scenario.status, State::Complete),
                Some((event, result)) => self.apply(state, &event, result),
            }
            state.scenario.status.progress =
                progress(state.current, state.scenario.spec.events.len());
            state.scenario.clone()
        };

        if let Err(e) = self.writer.update(&scenario).await {
            tracing::error!(error = %e, "status update failed");
        }

        scenario.status.state.is_some_and(|s| s.is_terminal())
    }

    /// Fold one dispatch result into the state. Bindings only apply once
    /// the completion conditions hold.
    fn apply(
        &self,
        state: &mut ProcessorState,
        event: &Event,
        dispatched: Result<ActionResult, DispatchError>,
    ) {
        let outcome = match dispatched {
            Ok(result) => {
                tracing::debug!(event = %event.name, status = %result.status, body_len = result.body.len(), "action result");
                if !completion_satisfied(&event.completion, &result) {
                    tracing::info!(
                        event = %event.name,
                        status = %result.status,
                        body = %String::from_utf8_lossy(&result.body),
                        "completion conditions not met"
                    );
                    Outcome::Mismatched
                } else {
                    match self
                        .dispatcher
                        .bind(&event.action, &result, &mut state.variables)
                    {
                        Ok(()) => Outcome::Matched,
                        Err(e) => Outcome::DispatchFailed(e),
                    }
                }
            }
            Err(e) => Outcome::DispatchFailed(e),
        };

        match outcome {
            Outcome::Matched => {
                state.current += 1;
                if state.current == state.scenario.spec.events.len() {
                    transition(&mut state.scenario.status, State::Complete);
                }
            }
            Outcome::Mismatched => transition(&mut state.scenario.status, State::Failed),
            Outcome::DispatchFailed(e) => {
                tracing::error!(
                    index = state.current,
                    error = %e,
                    policy = ?self.config.on_dispatch_error,
                    "dispatch failed"
                );
                if self.config.on_dispatch_error == DispatchErrorPolicy::Fail {
                    transition(&mut state.scenario.status, State::Failed);
                }
            }
        }
    }
}

fn transition(status: &mut ScenarioStatus, to: State) {
    let from = status.state;
    if from == Some(to) {
        return;
    }
    tracing::info!(
        from = from.map(|s| s.as_str()).unwrap_or("None"),
        to = to.as_str(),
        "state transition"
    );
    status.state = Some(to);
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
