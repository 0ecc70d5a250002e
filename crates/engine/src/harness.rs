// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Processor registry
//!
//! Keeps at most one live processor per object key. The registry is split
//! into shards so unrelated keys never contend, while create and stop for one
//! key serialize on that key's shard.

use crate::{Dispatcher, HarnessError, ProcessorConfig, ScenarioProcessor};
use karness_adapters::{HttpAdapter, RpcAdapter, StatusWriter};
use karness_core::{Object, ObjectKey};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const SHARDS: usize = 16;

/// Result of [`Harness::factory`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spawn {
    Started,
    AlreadyRunning,
}

struct Entry<R, H, W> {
    cancel: CancellationToken,
    processor: Arc<ScenarioProcessor<R, H, W>>,
    task: JoinHandle<()>,
}

type Shard<R, H, W> = Mutex<HashMap<ObjectKey, Entry<R, H, W>>>;

/// Creates, tracks and cancels scenario processors
pub struct Harness<R, H, W> {
    shards: Vec<Shard<R, H, W>>,
    dispatcher: Arc<Dispatcher<R, H>>,
    config: ProcessorConfig,
}

impl<R, H, W> Harness<R, H, W>
where
    R: RpcAdapter,
    H: HttpAdapter,
    W: StatusWriter,
{
    pub fn new(dispatcher: Dispatcher<R, H>, config: ProcessorConfig) -> Self {
        Self {
            shards: (0..SHARDS).map(|_| Mutex::new(HashMap::new())).collect(),
            dispatcher: Arc::new(dispatcher),
            config,
        }
    }

    fn shard(&self, key: &ObjectKey) -> &Shard<R, H, W> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % SHARDS]
    }

    /// Ensure a processor is running for `key`.
    ///
    /// A key whose processor has not been stopped is left alone, even when
    /// that processor already finished. Otherwise a new processor is created
    /// under a child of `root`, its initial status is written through
    /// `writer` after the shard lock is released, and its loop is spawned.
    pub async fn factory(
        &self,
        root: &CancellationToken,
        writer: W,
        key: &ObjectKey,
        object: &Object,
    ) -> Result<Spawn, HarnessError> {
        let scenario = match object {
            Object::Scenario(scenario) => scenario,
            Object::Unsupported { kind, .. } => {
                tracing::error!(key = %key, kind = %kind, "unsupported object kind");
                return Err(HarnessError::UnsupportedObject {
                    key: key.clone(),
                    kind: kind.clone(),
                });
            }
        };

        let mut shard = self.shard(key).lock().await;
        if let Some(entry) = shard.get(key) {
            if !entry.cancel.is_cancelled() {
                tracing::debug!(key = %key, "processor already running");
                return Ok(Spawn::AlreadyRunning);
            }
        }

        let cancel = root.child_token();
        let processor = Arc::new(ScenarioProcessor::new(
            (**scenario).clone(),
            Arc::clone(&self.dispatcher),
            writer,
            self.config.clone(),
            cancel.clone(),
        ));

        // The loop starts once the initial status is written
        let (written, ready) = oneshot::channel::<()>();
        let task = tokio::spawn({
            let processor = Arc::clone(&processor);
            async move {
                let _ = ready.await;
                processor.start().await
            }
        });
        if let Some(previous) = shard.insert(
            key.clone(),
            Entry {
                cancel,
                processor: Arc::clone(&processor),
                task,
            },
        ) {
            previous.task.abort();
        }
        drop(shard);

        let initial = processor.persist().await;
        let _ = written.send(());

        tracing::info!(key = %key, events = scenario.spec.events.len(), "processor started");

        if let Err(e) = initial {
            tracing::error!(key = %key, error = %e, "initial status write failed");
            return Err(HarnessError::Status(e));
        }
        Ok(Spawn::Started)
    }

    pub async fn get_processor(&self, key: &ObjectKey) -> Option<Arc<ScenarioProcessor<R, H, W>>> {
        self.shard(key)
            .lock()
            .await
            .get(key)
            .map(|entry| Arc::clone(&entry.processor))
    }

    /// Cancel and forget the processor for `key`. Returns false when none
    /// was registered.
    pub async fn stop(&self, key: &ObjectKey) -> bool {
        let entry = self.shard(key).lock().await.remove(key);
        match entry {
            Some(entry) => {
                entry.cancel.cancel();
                tracing::info!(key = %key, "processor stopped");
                true
            }
            None => false,
        }
    }

    /// Keys with a registered processor
    pub async fn keys(&self) -> Vec<ObjectKey> {
        let mut keys = Vec::new();
        for shard in &self.shards {
            keys.extend(shard.lock().await.keys().cloned());
        }
        keys.sort();
        keys
    }

    /// Cancel every processor and wait for their loops to exit
    pub async fn shutdown(&self) {
        let mut entries = Vec::new();
        for shard in &self.shards {
            entries.extend(shard.lock().await.drain().map(|(_, entry)| entry));
        }
        for entry in &entries {
            entry.cancel.cancel();
        }
        let count = entries.len();
        for entry in entries {
            if let Err(e) = entry.task.await {
                tracing::warn!(error = %e, "processor task ended abnormally");
            }
        }
        tracing::info!(count, "harness shut down");
    }
}

#[cfg(test)]
#[path = "harness_tests.rs"]
mod tests;
