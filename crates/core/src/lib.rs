// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! karness-core: the Scenario resource model
//!
//! This crate provides:
//! - The declared Scenario resource (spec, status, events, actions, conditions)
//! - Opaque textual values (`Any`) and the three-way request/response `Body`
//! - Object identity (`ObjectKey`) and the `Object` envelope handed to the harness

mod action;
mod any;
mod body;
mod key;
mod object;
mod scenario;

pub use action::{Action, ActionResult, AmbiguousCall, Call, GrpcCall, HttpCall, RpcMethod};
pub use any::Any;
pub use body::{Body, Encoding};
pub use key::{KeyError, ObjectKey};
pub use object::Object;
pub use scenario::{
    progress, Completion, Condition, ConditionResponse, Event, ObjectMeta, Scenario, ScenarioSpec,
    ScenarioStatus, State, API_VERSION, SCENARIO_KIND,
};
