// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Karness scenario execution engine
//!
//! The [`Harness`] keeps one [`ScenarioProcessor`] per scenario key. Each
//! processor walks its scenario's events in order, dispatching actions
//! through the [`Dispatcher`] and checking their results against the
//! declared completion conditions.

mod binding;
pub mod checker;
mod dispatch;
mod error;
mod harness;
mod processor;
mod template;
mod variables;

pub use binding::{bind_result, extract};
pub use dispatch::Dispatcher;
pub use error::{BindError, DispatchError, HarnessError};
pub use harness::{Harness, Spawn};
pub use processor::{DispatchErrorPolicy, ProcessorConfig, ScenarioProcessor};
pub use template::interpolate;
pub use variables::VariableStore;
