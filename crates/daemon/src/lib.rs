// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Karness daemon: local reconciliation of scenario manifests
//!
//! Manifests on disk are watched and turned into notifications. The
//! controller keeps the object store in sync and hands each key to the
//! harness from a pool of reconcile workers.

pub mod config;
pub mod controller;
pub mod lifecycle;
pub mod queue;
pub mod watcher;

pub use config::{Args, Config, ConfigError, DispatchErrors};
pub use controller::{Controller, Notification, StoreWriter};
pub use lifecycle::{startup, Daemon, LifecycleError};
pub use queue::WorkQueue;
pub use watcher::ManifestWatcher;
