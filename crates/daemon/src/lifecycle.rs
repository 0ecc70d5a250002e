// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, rescan loop, shutdown.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use karness_adapters::{GrpcurlAdapter, TracedHttpAdapter, TracedRpcAdapter, UreqAdapter};
use karness_engine::{Dispatcher, Harness};
use karness_storage::ObjectStore;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{Config, ConfigError, Controller, ManifestWatcher, StoreWriter, WorkQueue};

/// Remote procedure call adapter used by the daemon (wrapped with tracing)
pub type DaemonRpc = TracedRpcAdapter<GrpcurlAdapter>;

/// HTTP adapter used by the daemon (wrapped with tracing)
pub type DaemonHttp = TracedHttpAdapter<UreqAdapter>;

pub type DaemonController = Controller<DaemonRpc, DaemonHttp>;

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Manifest directory not found: {0}")]
    ManifestDirNotFound(PathBuf),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid log filter: {0}")]
    LogFilter(String),

    #[error("Invalid log file path: {0}")]
    LogFile(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Running daemon
pub struct Daemon {
    pub config: Config,
    pub store: ObjectStore,
    pub queue: WorkQueue,
    pub controller: Arc<DaemonController>,
    watcher: ManifestWatcher,
    root: CancellationToken,
    workers: Vec<JoinHandle<()>>,
}

/// Start the daemon: build adapters, harness and controller, then spawn the
/// reconcile workers. Must run inside a tokio runtime.
pub async fn startup(config: &Config) -> Result<Daemon, LifecycleError> {
    if !config.manifests.is_dir() {
        return Err(LifecycleError::ManifestDirNotFound(config.manifests.clone()));
    }

    let rpc = TracedRpcAdapter::new(
        GrpcurlAdapter::new(&config.grpcurl)
            .with_plaintext(config.plaintext)
            .with_connect_timeout(config.connect_timeout),
    );
    let http = TracedHttpAdapter::new(UreqAdapter::new(config.http_timeout));
    let harness: Arc<Harness<DaemonRpc, DaemonHttp, StoreWriter>> = Arc::new(Harness::new(
        Dispatcher::new(rpc, http),
        config.processor_config(),
    ));

    let store = ObjectStore::new();
    let queue = WorkQueue::new();
    let root = CancellationToken::new();
    let controller = Arc::new(Controller::new(
        store.clone(),
        queue.clone(),
        harness,
        root.clone(),
    ));
    let workers = controller.spawn_workers(config.workers);

    info!(
        manifests = %config.manifests.display(),
        workers = config.workers,
        tick_ms = config.tick.as_millis() as u64,
        "daemon started"
    );

    Ok(Daemon {
        config: config.clone(),
        store,
        queue,
        controller,
        watcher: ManifestWatcher::new(&config.manifests),
        root,
        workers,
    })
}

impl Daemon {
    /// Scan the manifest directory once and apply what changed
    pub async fn rescan(&mut self) -> usize {
        let notifications = self.watcher.scan();
        let count = notifications.len();
        for notification in notifications {
            self.controller.notify(notification).await;
        }
        if count > 0 {
            info!(count, "applied manifest changes");
        }
        count
    }

    /// Rescan periodically until `shutdown` resolves
    pub async fn run_until(&mut self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        let mut interval = tokio::time::interval(self.config.rescan);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    self.rescan().await;
                }
            }
        }
    }

    /// Cancel every processor, stop the workers and wait for them
    pub async fn shutdown(self) {
        info!("Shutting down daemon...");

        self.root.cancel();
        self.queue.shut_down();
        self.controller.harness().shutdown().await;

        for worker in self.workers {
            if let Err(e) = worker.await {
                warn!("Reconcile worker ended abnormally: {}", e);
            }
        }

        info!("Daemon shutdown complete");
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
