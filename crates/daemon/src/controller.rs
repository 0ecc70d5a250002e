// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconcile controller
//!
//! Notifications update the object store and enqueue keys. Workers take keys
//! from the queue and make the harness match the store: a stored scenario
//! gets a processor, a removed one loses it.

use crate::WorkQueue;
use async_trait::async_trait;
use karness_adapters::{HttpAdapter, RpcAdapter, StatusError, StatusWriter};
use karness_core::{Object, ObjectKey, Scenario};
use karness_engine::{Harness, HarnessError, Spawn};
use karness_storage::{ObjectStore, StoreError};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Change to the set of declared objects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Added(Object),
    Updated(Object),
    Deleted(ObjectKey),
}

/// Status writer backed by the object store.
///
/// Every successful write enqueues the key again, like a status update
/// observed by an informer.
#[derive(Clone)]
pub struct StoreWriter {
    store: ObjectStore,
    queue: WorkQueue,
}

impl StoreWriter {
    pub fn new(store: ObjectStore, queue: WorkQueue) -> Self {
        Self { store, queue }
    }
}

#[async_trait]
impl StatusWriter for StoreWriter {
    async fn update(&self, scenario: &Scenario) -> Result<(), StatusError> {
        let key = scenario.key();
        self.store
            .update_status(&key, &scenario.status)
            .map_err(|e| match e {
                StoreError::NotFound(key) => StatusError::NotFound(key.to_string()),
                other => StatusError::WriteFailed(other.to_string()),
            })?;
        tracing::debug!(
            key = %key,
            state = ?scenario.status.state,
            progress = %scenario.status.progress,
            "status written"
        );
        self.queue.add(key);
        Ok(())
    }
}

/// Keeps the harness in line with the object store
pub struct Controller<R, H> {
    store: ObjectStore,
    queue: WorkQueue,
    harness: Arc<Harness<R, H, StoreWriter>>,
    root: CancellationToken,
}

impl<R: RpcAdapter, H: HttpAdapter> Controller<R, H> {
    pub fn new(
        store: ObjectStore,
        queue: WorkQueue,
        harness: Arc<Harness<R, H, StoreWriter>>,
        root: CancellationToken,
    ) -> Self {
        Self {
            store,
            queue,
            harness,
            root,
        }
    }

    pub fn harness(&self) -> &Arc<Harness<R, H, StoreWriter>> {
        &self.harness
    }

    /// Apply a notification to the store and schedule reconciliation
    pub async fn notify(&self, notification: Notification) {
        match notification {
            Notification::Added(object) => {
                let key = object.key();
                tracing::info!(key = %key, kind = object.kind(), "object added");
                self.store.apply(object);
                self.queue.add(key);
            }
            Notification::Updated(object) => {
                let key = object.key();
                tracing::info!(key = %key, kind = object.kind(), "object updated");
                self.store.apply(object);
                self.harness.stop(&key).await;
                self.queue.add(key);
            }
            Notification::Deleted(key) => {
                tracing::info!(key = %key, "object deleted");
                self.store.remove(&key);
                self.harness.stop(&key).await;
                self.queue.forget(&key);
            }
        }
    }

    /// Reconcile one key
    pub async fn sync(&self, key: &ObjectKey) -> Result<(), HarnessError> {
        let Some(object) = self.store.get(key) else {
            if self.harness.stop(key).await {
                tracing::info!(key = %key, "stopped processor of removed object");
            }
            return Ok(());
        };

        let writer = StoreWriter::new(self.store.clone(), self.queue.clone());
        match self.harness.factory(&self.root, writer, key, &object).await? {
            Spawn::Started => tracing::info!(key = %key, "scenario started"),
            Spawn::AlreadyRunning => tracing::trace!(key = %key, "scenario already running"),
        }
        Ok(())
    }

    /// Take one key from the queue and reconcile it. Returns false once the
    /// queue has shut down.
    pub async fn process_next(&self) -> bool {
        let Some(key) = self.queue.get().await else {
            return false;
        };

        match self.sync(&key).await {
            Ok(()) => self.queue.forget(&key),
            Err(HarnessError::UnsupportedObject { .. }) => {
                // Configuration error: retrying cannot help
                self.queue.forget(&key);
            }
            Err(e) => {
                let delay = self.queue.add_rate_limited(key.clone());
                tracing::warn!(
                    key = %key,
                    error = %e,
                    retry_ms = delay.as_millis() as u64,
                    "reconcile failed, requeued"
                );
            }
        }
        self.queue.done(&key);
        true
    }

    /// Run `count` reconcile workers until the queue shuts down
    pub fn spawn_workers(self: &Arc<Self>, count: usize) -> Vec<JoinHandle<()>> {
        (0..count)
            .map(|worker| {
                let controller = Arc::clone(self);
                tokio::spawn(async move {
                    tracing::debug!(worker, "reconcile worker started");
                    while controller.process_next().await {}
                    tracing::debug!(worker, "reconcile worker stopped");
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
