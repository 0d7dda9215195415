use super::*;
use crate::kernel::panes::PaneKind;
use crate::kernel::services::ports::{BoxFuture, PaneSource};
use serde_json::{json, Value};
use std::sync::atomic::AtomicUsize;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Records applied payloads in order; fails for one pane id.
#[derive(Default)]
struct Recorder {
    fail_for: Option<&'static str>,
    applied: Mutex<Vec<(String, Value)>>,
}

impl PaneSource for Recorder {
    fn initialize(&self, _pane: &PaneId) -> BoxFuture<std::result::Result<Value, String>> {
        Box::pin(async { Ok(Value::Null) })
    }

    fn apply(
        &self,
        pane: &PaneId,
        _current: &Value,
        payload: Value,
    ) -> BoxFuture<std::result::Result<Value, String>> {
        if self.fail_for == Some(pane.as_str()) {
            return Box::pin(async { Err("parse error".to_string()) });
        }
        self.applied
            .lock()
            .unwrap()
            .push((pane.to_string(), payload.clone()));
        Box::pin(async move { Ok(payload) })
    }
}

fn setup(
    rt: &tokio::runtime::Runtime,
    recorder: Arc<Recorder>,
    panes: &[&str],
    max_concurrent: usize,
) -> (Arc<PaneRegistry>, Arc<UpdateCoordinator>) {
    let registry = PaneRegistry::builder(rt.handle().clone())
        .default_sources()
        .source(PaneKind::Logs, recorder)
        .build();
    for pane in panes {
        registry.register(pane).unwrap();
    }
    rt.block_on(async {
        for pane in panes {
            registry.wait_ready(&PaneId::new(pane)).await.unwrap();
        }
    });
    let config = EngineConfig {
        max_concurrent_updates: max_concurrent,
        debounce: Duration::from_millis(10),
        ..EngineConfig::default()
    };
    let coordinator = Arc::new(UpdateCoordinator::new(Arc::clone(&registry), &config));
    (registry, coordinator)
}

fn ids(panes: &[&str]) -> Vec<PaneId> {
    panes.iter().map(|pane| PaneId::new(pane)).collect()
}

#[test]
fn one_failure_does_not_abort_the_batch() {
    let rt = runtime();
    let recorder = Arc::new(Recorder {
        fail_for: Some("logs:c"),
        ..Recorder::default()
    });
    let panes = ["logs:a", "logs:b", "logs:c", "logs:d", "logs:e"];
    let (registry, coordinator) = setup(&rt, Arc::clone(&recorder), &panes, 2);

    coordinator.on_change(ChangeKind::Modified, "notes.txt", Some(&ids(&panes)));
    let report = rt.block_on(coordinator.flush());

    assert_eq!(report.applied, 4);
    assert_eq!(report.failed, 1);
    let health = coordinator.health();
    assert_eq!(health.total_updates, 5);
    assert_eq!(health.failed_updates, 1);
    assert_eq!(health.queued_updates, 0);
    assert_eq!(health.active_updates, 0);

    let failed = registry.get(&PaneId::new("logs:c")).unwrap();
    assert!(failed.last_error.is_some());
    let ok = registry.get(&PaneId::new("logs:e")).unwrap();
    assert_eq!(ok.counters.updates_applied, 1);
}

#[test]
fn high_priority_tier_applies_first() {
    let rt = runtime();
    let recorder = Arc::new(Recorder::default());
    let (_registry, coordinator) = setup(&rt, Arc::clone(&recorder), &["logs:a", "logs:b"], 4);

    coordinator.on_change(ChangeKind::Modified, "notes.txt", Some(&ids(&["logs:a"])));
    coordinator.on_change(
        ChangeKind::Modified,
        "state/current_phase.json",
        Some(&ids(&["logs:b"])),
    );
    rt.block_on(coordinator.flush());

    let order: Vec<String> = recorder
        .applied
        .lock()
        .unwrap()
        .iter()
        .map(|(pane, _)| pane.clone())
        .collect();
    assert_eq!(order, vec!["logs:b", "logs:a"]);
}

#[test]
fn latest_event_per_pane_wins() {
    let rt = runtime();
    let recorder = Arc::new(Recorder::default());
    let (registry, coordinator) = setup(&rt, Arc::clone(&recorder), &["logs"], 4);

    coordinator.on_change(ChangeKind::Created, "var/app.log", None);
    let second = coordinator.on_change(ChangeKind::Modified, "var/app.log", None);
    let report = rt.block_on(coordinator.flush());

    assert_eq!(report.applied, 1);
    let applied = recorder.applied.lock().unwrap();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].1["event_id"], json!(second.id));
    assert_eq!(applied[0].1["kind"], json!("modified"));
    let state = registry.get(&PaneId::new("logs")).unwrap();
    assert_eq!(state.data["path"], json!("var/app.log"));
}

#[test]
fn watch_table_targets_registered_panes_of_kind() {
    let rt = runtime();
    let recorder = Arc::new(Recorder::default());
    let (_registry, coordinator) =
        setup(&rt, Arc::clone(&recorder), &["progress", "logs:build", "tasks"], 4);

    let event = coordinator.on_change(ChangeKind::Modified, "out/build.log", None);
    assert_eq!(event.targets, ids(&["logs:build"]));
    assert_eq!(event.priority, Priority::Low);

    let everyone = coordinator.on_change(ChangeKind::Modified, "README.md", None);
    assert_eq!(everyone.targets.len(), 3);
}

#[test]
fn on_change_broadcasts_notice() {
    let rt = runtime();
    let (_registry, coordinator) = setup(&rt, Arc::new(Recorder::default()), &["progress"], 4);
    let mut rx = coordinator.subscribe();

    let event = coordinator.on_change(ChangeKind::Removed, "docs/current-phase.md", None);
    let notice = rx.try_recv().unwrap();
    assert_eq!(notice.event_id, event.id);
    assert_eq!(notice.priority, Priority::High);
    assert_eq!(notice.targets, ids(&["progress"]));
    assert_eq!(coordinator.pending_len(), 1);
    assert_eq!(coordinator.metrics().events_received, 1);
}

#[test]
fn unregistered_pane_is_skipped() {
    let rt = runtime();
    let recorder = Arc::new(Recorder::default());
    let (registry, coordinator) = setup(&rt, Arc::clone(&recorder), &["logs:a", "logs:b"], 4);

    coordinator.on_change(ChangeKind::Modified, "x.log", None);
    registry.unregister(&PaneId::new("logs:a"));
    let report = rt.block_on(coordinator.flush());

    assert_eq!(report.applied, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);
}

struct CountingSubscription {
    stops: Arc<AtomicUsize>,
}

impl ChangeSubscription for CountingSubscription {
    fn name(&self) -> &str {
        "counting"
    }

    fn stop(&mut self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn cleanup_is_idempotent() {
    let rt = runtime();
    let (_registry, coordinator) = setup(&rt, Arc::new(Recorder::default()), &["logs"], 4);
    let stops = Arc::new(AtomicUsize::new(0));
    coordinator.attach_source(Box::new(CountingSubscription {
        stops: Arc::clone(&stops),
    }));
    assert_eq!(coordinator.health().active_watchers, 1);

    coordinator.on_change(ChangeKind::Modified, "a.log", None);
    coordinator.cleanup();
    coordinator.cleanup();

    assert_eq!(stops.load(Ordering::SeqCst), 1);
    assert_eq!(coordinator.health().active_watchers, 0);
    // pending events survive cleanup
    assert_eq!(coordinator.pending_len(), 1);
}

#[test]
fn flush_loop_applies_pending_events() {
    let rt = runtime();
    let recorder = Arc::new(Recorder::default());
    let (registry, coordinator) = setup(&rt, Arc::clone(&recorder), &["logs"], 4);
    coordinator.spawn_flush_loop(rt.handle());

    coordinator.on_change(ChangeKind::Modified, "a.log", None);
    rt.block_on(async { tokio::time::sleep(Duration::from_millis(100)).await });

    assert_eq!(coordinator.pending_len(), 0);
    let state = registry.get(&PaneId::new("logs")).unwrap();
    assert_eq!(state.counters.updates_applied, 1);
    assert!(coordinator.metrics().flush_count >= 1);

    coordinator.cleanup();
    coordinator.on_change(ChangeKind::Modified, "b.log", None);
    rt.block_on(async { tokio::time::sleep(Duration::from_millis(50)).await });
    assert_eq!(coordinator.pending_len(), 1);
}

#[test]
fn reset_metrics_clears_counters() {
    let rt = runtime();
    let (_registry, coordinator) = setup(&rt, Arc::new(Recorder::default()), &["logs"], 4);
    coordinator.on_change(ChangeKind::Modified, "a.log", None);
    rt.block_on(coordinator.flush());
    assert_eq!(coordinator.metrics().updates_total, 1);

    coordinator.reset_metrics();
    let metrics = coordinator.metrics();
    assert_eq!(metrics.updates_total, 0);
    assert_eq!(metrics.events_received, 0);
    assert_eq!(metrics.flush_count, 0);
}

/// Sleeps inside `apply` and remembers the most updates it saw in flight at once.
#[derive(Default)]
struct SlowSource {
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl PaneSource for SlowSource {
    fn initialize(&self, _pane: &PaneId) -> BoxFuture<std::result::Result<Value, String>> {
        Box::pin(async { Ok(Value::Null) })
    }

    fn apply(
        &self,
        _pane: &PaneId,
        _current: &Value,
        payload: Value,
    ) -> BoxFuture<std::result::Result<Value, String>> {
        let in_flight = Arc::clone(&self.in_flight);
        let peak = Arc::clone(&self.peak);
        Box::pin(async move {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(payload)
        })
    }
}

#[test]
fn flush_never_exceeds_max_concurrent_updates() {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap();
    let source = Arc::new(SlowSource::default());
    let peak = Arc::clone(&source.peak);
    let registry = PaneRegistry::builder(rt.handle().clone())
        .default_sources()
        .source(PaneKind::Logs, source)
        .build();
    let panes: Vec<String> = (0..10).map(|i| format!("logs:{i}")).collect();
    for pane in &panes {
        registry.register(pane).unwrap();
    }
    rt.block_on(async {
        for pane in &panes {
            registry.wait_ready(&PaneId::new(pane)).await.unwrap();
        }
    });
    let config = EngineConfig {
        max_concurrent_updates: 3,
        ..EngineConfig::default()
    };
    let coordinator = UpdateCoordinator::new(Arc::clone(&registry), &config);

    let targets: Vec<PaneId> = panes.iter().map(|pane| PaneId::new(pane)).collect();
    coordinator.on_change(ChangeKind::Modified, "out/build.log", Some(&targets));
    let report = rt.block_on(coordinator.flush());

    assert_eq!(report.applied, 10);
    let peak = peak.load(Ordering::SeqCst);
    assert!(peak >= 1);
    assert!(peak <= 3, "saw {peak} updates in flight with a limit of 3");
}
