// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use karness_core::{ObjectKey, State};
use std::time::Duration;

const NOOP_SCENARIO: &str = r#"
apiVersion: karness.io/v1alpha1
kind: Scenario
metadata:
  name: noop
spec:
  events:
    - name: first
      action: {name: nothing}
    - name: second
      action: {name: nothing}
"#;

fn config(dir: &std::path::Path) -> Config {
    Config {
        manifests: dir.to_path_buf(),
        tick: Duration::from_millis(10),
        rescan: Duration::from_millis(20),
        ..Config::default()
    }
}

async fn wait_for_state(daemon: &Daemon, key: &ObjectKey, state: State) {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let current = daemon
                .store
                .get(key)
                .and_then(|o| o.as_scenario().and_then(|s| s.status.state));
            if current == Some(state) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn startup_requires_manifest_dir() {
    let result = startup(&config(std::path::Path::new("/nonexistent/karness"))).await;
    assert!(matches!(
        result,
        Err(LifecycleError::ManifestDirNotFound(_))
    ));
}

#[tokio::test]
async fn scenario_runs_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("noop.yaml"), NOOP_SCENARIO).unwrap();
    let mut daemon = startup(&config(dir.path())).await.unwrap();

    assert_eq!(daemon.rescan().await, 1);

    let key = ObjectKey::new("default", "noop");
    wait_for_state(&daemon, &key, State::Complete).await;
    let object = daemon.store.get(&key).unwrap();
    assert_eq!(object.as_scenario().unwrap().status.progress, "2 of 2");

    daemon.shutdown().await;
}

#[tokio::test]
async fn deleting_manifest_removes_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noop.yaml");
    std::fs::write(&path, NOOP_SCENARIO).unwrap();
    let mut daemon = startup(&config(dir.path())).await.unwrap();
    daemon.rescan().await;
    let key = ObjectKey::new("default", "noop");
    wait_for_state(&daemon, &key, State::Complete).await;

    std::fs::remove_file(&path).unwrap();
    assert_eq!(daemon.rescan().await, 1);

    assert!(daemon.store.get(&key).is_none());
    assert!(daemon
        .controller
        .harness()
        .get_processor(&key)
        .await
        .is_none());

    daemon.shutdown().await;
}

#[tokio::test]
async fn run_until_stops_on_signal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("noop.yaml"), NOOP_SCENARIO).unwrap();
    let mut daemon = startup(&config(dir.path())).await.unwrap();
    let stop = CancellationToken::new();

    let trigger = stop.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });
    daemon.run_until(stop.cancelled()).await;

    let key = ObjectKey::new("default", "noop");
    assert!(daemon.store.get(&key).is_some());
    daemon.shutdown().await;
}
