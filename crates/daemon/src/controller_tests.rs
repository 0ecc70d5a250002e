// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use karness_adapters::{FakeHttpAdapter, FakeRpcAdapter};
use karness_core::{Action, Event, ObjectMeta, ScenarioSpec, State};
use karness_engine::{Dispatcher, ProcessorConfig};
use std::time::Duration;

type TestController = Controller<FakeRpcAdapter, FakeHttpAdapter>;

struct Setup {
    controller: Arc<TestController>,
    store: ObjectStore,
    queue: WorkQueue,
}

fn setup() -> Setup {
    let store = ObjectStore::new();
    let queue = WorkQueue::new();
    let dispatcher = Dispatcher::new(FakeRpcAdapter::new(), FakeHttpAdapter::new());
    let harness = Arc::new(Harness::new(
        dispatcher,
        ProcessorConfig {
            tick: Duration::from_secs(3600),
            ..ProcessorConfig::default()
        },
    ));
    let controller = Arc::new(Controller::new(
        store.clone(),
        queue.clone(),
        harness,
        CancellationToken::new(),
    ));
    Setup {
        controller,
        store,
        queue,
    }
}

fn meta(name: &str) -> ObjectMeta {
    ObjectMeta {
        namespace: "default".to_string(),
        name: name.to_string(),
    }
}

fn scenario(name: &str, events: usize) -> Object {
    let spec = ScenarioSpec {
        events: (0..events)
            .map(|i| Event {
                name: format!("noop-{}", i),
                description: String::new(),
                action: Action::default(),
                completion: Default::default(),
            })
            .collect(),
        ..ScenarioSpec::default()
    };
    Object::from(Scenario::new(meta(name), spec))
}

fn stored_status(store: &ObjectStore, key: &ObjectKey) -> (Option<State>, String) {
    let object = store.get(key).unwrap();
    let status = &object.as_scenario().unwrap().status;
    (status.state, status.progress.clone())
}

#[tokio::test]
async fn added_scenario_gets_processor() {
    let s = setup();
    let key = ObjectKey::new("default", "a");

    s.controller.notify(Notification::Added(scenario("a", 1))).await;
    assert_eq!(s.queue.len(), 1);
    assert!(s.controller.process_next().await);

    assert!(s.controller.harness().get_processor(&key).await.is_some());
    assert_eq!(
        stored_status(&s.store, &key),
        (Some(State::Ready), "0 of 1".to_string())
    );
}

#[tokio::test]
async fn status_write_requeues_without_restart() {
    let s = setup();
    let key = ObjectKey::new("default", "a");
    s.controller.notify(Notification::Added(scenario("a", 1))).await;
    s.controller.process_next().await;
    let processor = s.controller.harness().get_processor(&key).await.unwrap();

    // The initial status write re-enqueued the key
    assert_eq!(s.queue.len(), 1);
    s.controller.process_next().await;

    assert!(processor.step().await);
    assert_eq!(
        stored_status(&s.store, &key),
        (Some(State::Complete), "1 of 1".to_string())
    );
    s.controller.process_next().await;

    let again = s.controller.harness().get_processor(&key).await.unwrap();
    assert!(Arc::ptr_eq(&processor, &again));
    assert_eq!(
        stored_status(&s.store, &key),
        (Some(State::Complete), "1 of 1".to_string())
    );
}

#[tokio::test]
async fn updated_object_restarts_processor() {
    let s = setup();
    let key = ObjectKey::new("default", "a");
    s.controller.notify(Notification::Added(scenario("a", 1))).await;
    s.controller.process_next().await;
    let first = s.controller.harness().get_processor(&key).await.unwrap();

    s.controller
        .notify(Notification::Updated(scenario("a", 2)))
        .await;
    assert!(first.is_cancelled());
    while !s.queue.is_empty() {
        s.controller.process_next().await;
    }

    let second = s.controller.harness().get_processor(&key).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(
        stored_status(&s.store, &key),
        (Some(State::Ready), "0 of 2".to_string())
    );
}

#[tokio::test]
async fn deleted_object_stops_processor() {
    let s = setup();
    let key = ObjectKey::new("default", "a");
    s.controller.notify(Notification::Added(scenario("a", 1))).await;
    s.controller.process_next().await;
    let processor = s.controller.harness().get_processor(&key).await.unwrap();

    s.controller.notify(Notification::Deleted(key.clone())).await;

    assert!(processor.is_cancelled());
    assert!(s.store.get(&key).is_none());
    assert!(s.controller.harness().get_processor(&key).await.is_none());
}

#[tokio::test]
async fn sync_of_missing_object_is_ok() {
    let s = setup();
    s.controller
        .sync(&ObjectKey::new("default", "ghost"))
        .await
        .unwrap();
}

#[tokio::test]
async fn unsupported_object_is_not_retried() {
    let s = setup();
    let key = ObjectKey::new("default", "alias");
    s.controller
        .notify(Notification::Added(Object::Unsupported {
            kind: "HostAlias".to_string(),
            metadata: meta("alias"),
        }))
        .await;

    assert!(matches!(
        s.controller.sync(&key).await,
        Err(HarnessError::UnsupportedObject { .. })
    ));
    assert!(s.controller.process_next().await);

    assert_eq!(s.queue.requeues(&key), 0);
    assert!(s.queue.is_empty());
}

#[tokio::test]
async fn store_writer_rejects_unknown_object() {
    let store = ObjectStore::new();
    let queue = WorkQueue::new();
    let writer = StoreWriter::new(store, queue.clone());
    let Object::Scenario(scenario) = scenario("ghost", 0) else {
        unreachable!()
    };

    let result = writer.update(&scenario).await;

    assert!(matches!(result, Err(StatusError::NotFound(_))));
    assert!(queue.is_empty());
}

#[tokio::test]
async fn workers_stop_on_shutdown() {
    let s = setup();
    let workers = s.controller.spawn_workers(2);

    s.controller.notify(Notification::Added(scenario("a", 0))).await;
    tokio::time::timeout(Duration::from_secs(5), async {
        while s
            .controller
            .harness()
            .get_processor(&ObjectKey::new("default", "a"))
            .await
            .is_none()
        {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    s.queue.shut_down();
    for worker in workers {
        worker.await.unwrap();
    }
}
