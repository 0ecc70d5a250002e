//! End-to-end scenario traces through the harness.
//!
//! Scenarios are parsed from manifests, started through the harness with a
//! long tick, and stepped explicitly so every status write is observable.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use karness_adapters::{FakeHttpAdapter, FakeRpcAdapter, FakeStatusWriter};
use karness_core::{Any, Object, State};
use karness_engine::{DispatchErrorPolicy, Dispatcher, Harness, ProcessorConfig, Spawn};
use karness_manifest::{parse_manifests, Format};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

type TestHarness = Harness<FakeRpcAdapter, FakeHttpAdapter, FakeStatusWriter>;

const GREETER: &str = r#"
apiVersion: karness.io/v1alpha1
kind: Scenario
metadata:
  name: greeter
spec:
  name: greeter
  variables:
    USER: alice
  events:
    - name: say-hello
      action:
        name: hello
        grpc:
          addr: localhost:50051
          package: helloworld
          service: Greeter
          rpc: SayHello
        body:
          kv:
            name: "{USER}"
        bind_result:
          MSG: "{.message}"
      complete:
        name: replied
        condition:
          - response:
              status: OK
"#;

const ECHO: &str = r#"
apiVersion: karness.io/v1alpha1
kind: Scenario
metadata:
  name: echo
spec:
  name: echo
  events:
    - name: ping
      action:
        name: ping
        grpc:
          addr: localhost:50051
          package: echo
          service: Echo
          rpc: Ping
      complete:
        name: answered
        condition:
          - response:
              status: OK
              body:
                kv:
                  message: OK
"#;

const EMPTY: &str = r#"
apiVersion: karness.io/v1alpha1
kind: Scenario
metadata:
  name: empty
spec: {}
"#;

struct World {
    harness: TestHarness,
    rpc: FakeRpcAdapter,
    writer: FakeStatusWriter,
    root: CancellationToken,
}

fn world() -> World {
    world_with(DispatchErrorPolicy::Fail)
}

fn world_with(policy: DispatchErrorPolicy) -> World {
    let rpc = FakeRpcAdapter::new();
    let dispatcher = Dispatcher::new(rpc.clone(), FakeHttpAdapter::new());
    let config = ProcessorConfig {
        tick: Duration::from_secs(3600),
        on_dispatch_error: policy,
    };
    World {
        harness: Harness::new(dispatcher, config),
        rpc,
        writer: FakeStatusWriter::new(),
        root: CancellationToken::new(),
    }
}

fn object(manifest: &str) -> Object {
    parse_manifests(manifest, Format::Yaml)
        .unwrap()
        .into_iter()
        .next()
        .unwrap()
}

impl World {
    async fn start(&self, object: &Object) -> Spawn {
        self.harness
            .factory(&self.root, self.writer.clone(), &object.key(), object)
            .await
            .unwrap()
    }

    fn trace(&self) -> Vec<(Option<State>, String)> {
        self.writer
            .statuses()
            .into_iter()
            .map(|status| (status.state, status.progress))
            .collect()
    }
}

#[tokio::test]
async fn ok_trace_completes() {
    let world = world();
    let object = object(GREETER);
    world.rpc.respond("OK", r#"{"message":"Hello alice"}"#);

    assert_eq!(world.start(&object).await, Spawn::Started);
    let processor = world.harness.get_processor(&object.key()).await.unwrap();
    assert!(processor.step().await);

    assert_eq!(
        world.trace(),
        vec![
            (Some(State::Ready), "0 of 1".to_string()),
            (Some(State::Complete), "1 of 1".to_string()),
        ]
    );
    assert_eq!(processor.current_index().await, 1);
    assert_eq!(
        processor.variables().await["MSG"],
        Any::from("Hello alice")
    );
    assert_eq!(
        world.rpc.calls()[0].body,
        br#"{"name":"alice"}"#.to_vec()
    );
}

#[tokio::test]
async fn not_found_trace_fails() {
    let world = world();
    let object = object(GREETER);
    world.rpc.respond("NOT_FOUND", "");

    world.start(&object).await;
    let processor = world.harness.get_processor(&object.key()).await.unwrap();
    assert!(processor.step().await);

    assert_eq!(
        world.trace(),
        vec![
            (Some(State::Ready), "0 of 1".to_string()),
            (Some(State::Failed), "0 of 1".to_string()),
        ]
    );
    assert_eq!(processor.current_index().await, 0);
}

#[tokio::test]
async fn kv_condition_ok_trace_completes() {
    let world = world();
    let object = object(ECHO);
    world.rpc.respond("OK", r#"{"message":"OK"}"#);

    world.start(&object).await;
    let processor = world.harness.get_processor(&object.key()).await.unwrap();
    assert!(processor.step().await);

    assert_eq!(
        world.trace(),
        vec![
            (Some(State::Ready), "0 of 1".to_string()),
            (Some(State::Complete), "1 of 1".to_string()),
        ]
    );
    assert_eq!(processor.current_index().await, 1);
}

#[tokio::test]
async fn kv_condition_not_found_trace_fails_under_any_policy() {
    for policy in [DispatchErrorPolicy::Fail, DispatchErrorPolicy::Retry] {
        let world = world_with(policy);
        let object = object(ECHO);
        world.rpc.respond("NOT_FOUND", "");

        world.start(&object).await;
        let processor = world.harness.get_processor(&object.key()).await.unwrap();
        assert!(processor.step().await, "{:?}", policy);

        assert_eq!(
            world.trace(),
            vec![
                (Some(State::Ready), "0 of 1".to_string()),
                (Some(State::Failed), "0 of 1".to_string()),
            ],
            "{:?}",
            policy
        );
        assert_eq!(processor.current_index().await, 0);
    }
}

#[tokio::test]
async fn kv_condition_wrong_message_fails() {
    let world = world();
    let object = object(ECHO);
    world.rpc.respond("OK", r#"{"message":"NOPE"}"#);

    world.start(&object).await;
    let processor = world.harness.get_processor(&object.key()).await.unwrap();
    assert!(processor.step().await);

    assert_eq!(
        world.trace().last(),
        Some(&(Some(State::Failed), "0 of 1".to_string()))
    );
}

#[tokio::test]
async fn zero_events_trace() {
    let world = world();
    let object = object(EMPTY);

    world.start(&object).await;
    let processor = world.harness.get_processor(&object.key()).await.unwrap();
    assert!(processor.step().await);

    assert_eq!(
        world.trace(),
        vec![
            (Some(State::Ready), "0 of 0".to_string()),
            (Some(State::Complete), "0 of 0".to_string()),
        ]
    );
}

#[tokio::test]
async fn reentrant_factory_does_not_restart() {
    let world = world();
    let object = object(GREETER);
    world.rpc.respond("OK", r#"{"message":"Hello alice"}"#);

    world.start(&object).await;
    let processor = world.harness.get_processor(&object.key()).await.unwrap();
    processor.step().await;

    // Each status write re-enqueues the key in a real deployment
    for _ in 0..3 {
        assert_eq!(world.start(&object).await, Spawn::AlreadyRunning);
    }

    assert_eq!(world.writer.update_count(), 2);
    assert_eq!(world.rpc.calls().len(), 1);
}

#[tokio::test]
async fn stop_silences_processor() {
    let world = world();
    let object = object(GREETER);
    world.rpc.respond("OK", r#"{"message":"Hello alice"}"#);

    world.start(&object).await;
    let processor = world.harness.get_processor(&object.key()).await.unwrap();
    assert!(world.harness.stop(&object.key()).await);

    for _ in 0..3 {
        assert!(processor.step().await);
    }

    assert_eq!(world.writer.update_count(), 1);
    assert!(world.rpc.calls().is_empty());
}

#[tokio::test]
async fn index_never_decreases() {
    let manifest = r#"
apiVersion: karness.io/v1alpha1
kind: Scenario
metadata:
  name: three
spec:
  events:
    - name: one
      action: {name: noop}
    - name: two
      action: {name: noop}
    - name: three
      action: {name: noop}
"#;
    let world = world();
    let object = object(manifest);

    world.start(&object).await;
    let processor = world.harness.get_processor(&object.key()).await.unwrap();

    let mut previous = 0;
    for _ in 0..5 {
        processor.step().await;
        let current = processor.current_index().await;
        assert!(current >= previous);
        assert!(current <= 3);
        previous = current;
    }

    assert_eq!(previous, 3);
    let trace = world.trace();
    assert_eq!(trace.last().unwrap().0, Some(State::Complete));
    assert_eq!(trace.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn spawned_loop_runs_on_tick() {
    let rpc = FakeRpcAdapter::new();
    rpc.respond("OK", r#"{"message":"Hello alice"}"#);
    let harness: TestHarness = Harness::new(
        Dispatcher::new(rpc.clone(), FakeHttpAdapter::new()),
        ProcessorConfig::default(),
    );
    let writer = FakeStatusWriter::new();
    let root = CancellationToken::new();
    let object = object(GREETER);

    harness
        .factory(&root, writer.clone(), &object.key(), &object)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(
        writer.statuses().last().unwrap().state,
        Some(State::Complete)
    );
    harness.shutdown().await;
}
