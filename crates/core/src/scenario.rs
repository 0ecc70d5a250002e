// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario resource
//!
//! A scenario is an ordered list of events. Each event pairs an action with
//! the completion conditions its result must satisfy. The spec is fixed at
//! creation; only the status changes while the scenario runs.

use crate::action::Action;
use crate::{Any, Body, ObjectKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// API version accepted for declared resources
pub const API_VERSION: &str = "karness.io/v1alpha1";

/// Resource kind of a scenario
pub const SCENARIO_KIND: &str = "Scenario";

/// Identity metadata of a declared object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub namespace: String,
    pub name: String,
}

/// Lifecycle state of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    Ready,
    InProgress,
    Complete,
    Failed,
}

impl State {
    /// Terminal states are sinks: nothing runs after them
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Complete | State::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            State::Ready => "Ready",
            State::InProgress => "InProgress",
            State::Complete => "Complete",
            State::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub metadata: ObjectMeta,
    pub spec: ScenarioSpec,
    #[serde(default)]
    pub status: ScenarioStatus,
}

impl Scenario {
    pub fn new(metadata: ObjectMeta, spec: ScenarioSpec) -> Self {
        Self {
            metadata,
            spec,
            status: ScenarioStatus::default(),
        }
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(&self.metadata.namespace, &self.metadata.name)
    }
}

/// Immutable part of a scenario
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub events: Vec<Event>,
    /// Initial contents of the variable store
    #[serde(default)]
    pub variables: BTreeMap<String, Any>,
}

/// Mutable part of a scenario, owned by its processor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioStatus {
    /// Human-readable "`i` of `n`"
    #[serde(default)]
    pub progress: String,
    /// Unset until the scenario is first picked up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<State>,
}

/// One step of a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub action: Action,
    #[serde(default, rename = "complete")]
    pub completion: Completion,
}

/// Conditions that must all hold for an event to be satisfied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "condition")]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ConditionResponse>,
}

/// Expected response of an action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionResponse {
    /// Expected status; empty means "any status"
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub body: Body,
}

/// Format progress as "`current` of `total`"
pub fn progress(current: usize, total: usize) -> String {
    format!("{} of {}", current, total)
}

#[cfg(test)]
#[path = "scenario_tests.rs"]
mod tests;
