// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Objects handed to the harness

use crate::{ObjectKey, ObjectMeta, Scenario, SCENARIO_KIND};

/// A declared object snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Scenario(Box<Scenario>),
    /// A resource of a kind the harness does not drive
    Unsupported { kind: String, metadata: ObjectMeta },
}

impl Object {
    pub fn key(&self) -> ObjectKey {
        match self {
            Object::Scenario(scenario) => scenario.key(),
            Object::Unsupported { metadata, .. } => {
                ObjectKey::new(&metadata.namespace, &metadata.name)
            }
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Object::Scenario(_) => SCENARIO_KIND,
            Object::Unsupported { kind, .. } => kind,
        }
    }

    pub fn as_scenario(&self) -> Option<&Scenario> {
        match self {
            Object::Scenario(scenario) => Some(scenario),
            Object::Unsupported { .. } => None,
        }
    }
}

impl From<Scenario> for Object {
    fn from(scenario: Scenario) -> Self {
        Object::Scenario(Box::new(scenario))
    }
}
