//! Update coordinator: classifies change notifications and pushes them into the pane registry.
//!
//! `on_change` only records and broadcasts. `flush` does the work: pending events are grouped by
//! tier, then by target pane (the latest event per pane wins), and each tier is applied in batches
//! of at most `max_concurrent_updates` concurrent pane updates.

use super::event::{ChangeNotice, Priority, UpdateEvent, WatchTargets};
use super::priority::PriorityRules;
use super::watch_table::WatchTable;
use crate::core::DashboardError;
use crate::kernel::panes::{FlushReport, PaneId, PaneRegistry};
use crate::kernel::services::ports::{ChangeKind, ChangeSubscription, EngineConfig, SourceChange};
use crate::kernel::util::lock;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::task::{JoinHandle, JoinSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CoordinatorMetrics {
    pub events_received: u64,
    pub updates_total: u64,
    pub updates_failed: u64,
    pub flush_count: u64,
    pub mean_flush_ms: f64,
    pub active_watchers: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CoordinatorHealth {
    pub active_watchers: usize,
    pub total_updates: u64,
    pub failed_updates: u64,
    pub queued_updates: usize,
    pub active_updates: usize,
    pub metrics: CoordinatorMetrics,
}

#[derive(Debug, Default)]
struct CoordinatorStats {
    events_received: u64,
    updates_total: u64,
    updates_failed: u64,
    flush_count: u64,
    total_flush_time: Duration,
}

pub struct UpdateCoordinator {
    registry: Arc<PaneRegistry>,
    watch_table: WatchTable,
    priorities: PriorityRules,
    max_concurrent_updates: usize,
    debounce: Duration,
    next_event_id: AtomicU64,
    pending: Mutex<Vec<UpdateEvent>>,
    notices: broadcast::Sender<ChangeNotice>,
    watchers: Mutex<Vec<Box<dyn ChangeSubscription>>>,
    stats: Mutex<CoordinatorStats>,
    active_updates: Arc<AtomicUsize>,
    flush_gate: tokio::sync::Mutex<()>,
    flush_task: Mutex<Option<JoinHandle<()>>>,
    shutdown_tx: watch::Sender<bool>,
}

impl UpdateCoordinator {
    pub fn new(registry: Arc<PaneRegistry>, config: &EngineConfig) -> Self {
        Self::with_rules(
            registry,
            config,
            WatchTable::builtin(),
            PriorityRules::builtin(),
        )
    }

    pub fn with_rules(
        registry: Arc<PaneRegistry>,
        config: &EngineConfig,
        watch_table: WatchTable,
        priorities: PriorityRules,
    ) -> Self {
        let (notices, _) = broadcast::channel(config.broadcast_capacity.max(1));
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            registry,
            watch_table,
            priorities,
            max_concurrent_updates: config.max_concurrent_updates.max(1),
            debounce: config.debounce,
            next_event_id: AtomicU64::new(1),
            pending: Mutex::new(Vec::new()),
            notices,
            watchers: Mutex::new(Vec::new()),
            stats: Mutex::new(CoordinatorStats::default()),
            active_updates: Arc::new(AtomicUsize::new(0)),
            flush_gate: tokio::sync::Mutex::new(()),
            flush_task: Mutex::new(None),
            shutdown_tx,
        }
    }

    pub fn watch_table(&self) -> &WatchTable {
        &self.watch_table
    }

    pub fn classify_priority(&self, path: &std::path::Path) -> Priority {
        self.priorities.classify(path)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeNotice> {
        self.notices.subscribe()
    }

    /// Records a change and broadcasts its notice. Nothing is applied until the next flush.
    pub fn on_change(
        &self,
        kind: ChangeKind,
        path: impl Into<PathBuf>,
        explicit_targets: Option<&[PaneId]>,
    ) -> UpdateEvent {
        let path = path.into();
        let targets = match explicit_targets {
            Some(targets) if !targets.is_empty() => WatchTargets::Panes(targets.to_vec()),
            _ => self.watch_table.resolve(&path),
        };
        let targets: Vec<PaneId> = self
            .registry
            .ids()
            .into_iter()
            .filter(|pane| targets.matches(pane))
            .collect();

        let event = UpdateEvent {
            id: self.next_event_id.fetch_add(1, Ordering::Relaxed),
            priority: self.priorities.classify(&path),
            path,
            kind,
            targets,
            timestamp: SystemTime::now(),
        };
        tracing::debug!(
            event = event.id,
            path = %event.path.display(),
            kind = kind.as_str(),
            priority = event.priority.as_str(),
            targets = event.targets.len(),
            "change received"
        );

        lock(&self.pending).push(event.clone());
        lock(&self.stats).events_received += 1;
        // No subscribers is not an error.
        let _ = self.notices.send(event.notice());
        event
    }

    pub fn ingest(&self, change: SourceChange) -> UpdateEvent {
        self.on_change(change.kind, change.path, None)
    }

    pub fn pending_len(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Applies every pending event. Failed pane updates are counted and never stop the flush.
    pub async fn flush(&self) -> FlushReport {
        let _gate = self.flush_gate.lock().await;
        let events = std::mem::take(&mut *lock(&self.pending));
        if events.is_empty() {
            return FlushReport::default();
        }

        let started = Instant::now();
        let mut report = FlushReport::default();
        for tier in Priority::ALL {
            let (order, mut latest) = latest_per_pane(&events, tier);
            for batch in order.chunks(self.max_concurrent_updates) {
                let mut set = JoinSet::new();
                for pane in batch {
                    let Some(notice) = latest.remove(pane) else {
                        continue;
                    };
                    if !self.registry.contains(pane) {
                        report.skipped += 1;
                        continue;
                    }
                    let payload = match serde_json::to_value(&notice) {
                        Ok(payload) => payload,
                        Err(error) => {
                            tracing::warn!(pane = %pane, %error, "unserializable change notice");
                            report.failed += 1;
                            continue;
                        }
                    };
                    let registry = Arc::clone(&self.registry);
                    let active = Arc::clone(&self.active_updates);
                    let pane = pane.clone();
                    active.fetch_add(1, Ordering::AcqRel);
                    set.spawn(async move {
                        let result = registry.update(&pane, payload).await;
                        active.fetch_sub(1, Ordering::AcqRel);
                        (pane, result)
                    });
                }

                while let Some(joined) = set.join_next().await {
                    match joined {
                        Ok((_, Ok(()))) => report.applied += 1,
                        Ok((pane, Err(DashboardError::UnknownPane(_)))) => {
                            tracing::debug!(pane = %pane, "pane gone before update");
                            report.skipped += 1;
                        }
                        Ok((pane, Err(error))) => {
                            tracing::warn!(pane = %pane, %error, "pane update failed during flush");
                            report.failed += 1;
                        }
                        Err(error) => {
                            tracing::error!(%error, "pane update task panicked");
                            report.failed += 1;
                        }
                    }
                }
            }
        }

        let elapsed = started.elapsed();
        {
            let mut stats = lock(&self.stats);
            stats.updates_total += (report.applied + report.failed) as u64;
            stats.updates_failed += report.failed as u64;
            stats.flush_count += 1;
            stats.total_flush_time += elapsed;
        }
        tracing::debug!(
            events = events.len(),
            applied = report.applied,
            failed = report.failed,
            skipped = report.skipped,
            elapsed_ms = elapsed.as_millis() as u64,
            "updates flushed"
        );
        report
    }

    /// Flushes pending events at most once per debounce interval until [`cleanup`](Self::cleanup).
    pub fn spawn_flush_loop(self: &Arc<Self>, handle: &Handle) {
        let mut task = lock(&self.flush_task);
        if task.as_ref().is_some_and(|existing| !existing.is_finished()) {
            return;
        }
        self.shutdown_tx.send_replace(false);
        let coordinator = Arc::clone(self);
        let mut shutdown = self.shutdown_tx.subscribe();
        let interval = self.debounce.max(Duration::from_millis(1));
        *task = Some(handle.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.changed() => break,
                    _ = ticker.tick() => {
                        if coordinator.pending_len() > 0 {
                            coordinator.flush().await;
                        }
                    }
                }
            }
            tracing::debug!("flush loop stopped");
        }));
    }

    pub fn attach_source(&self, subscription: Box<dyn ChangeSubscription>) {
        tracing::info!(source = subscription.name(), "change source attached");
        lock(&self.watchers).push(subscription);
    }

    pub fn active_watchers(&self) -> usize {
        lock(&self.watchers).len()
    }

    /// Stops every change source and the flush loop. Pending events are kept.
    pub fn cleanup(&self) {
        let watchers = std::mem::take(&mut *lock(&self.watchers));
        for mut watcher in watchers {
            watcher.stop();
            tracing::info!(source = watcher.name(), "change source stopped");
        }
        self.shutdown_tx.send_replace(true);
        lock(&self.flush_task).take();
    }

    pub fn metrics(&self) -> CoordinatorMetrics {
        let stats = lock(&self.stats);
        let mean_flush_ms = if stats.flush_count == 0 {
            0.0
        } else {
            stats.total_flush_time.as_secs_f64() * 1000.0 / stats.flush_count as f64
        };
        CoordinatorMetrics {
            events_received: stats.events_received,
            updates_total: stats.updates_total,
            updates_failed: stats.updates_failed,
            flush_count: stats.flush_count,
            mean_flush_ms,
            active_watchers: self.active_watchers(),
        }
    }

    pub fn health(&self) -> CoordinatorHealth {
        let metrics = self.metrics();
        CoordinatorHealth {
            active_watchers: metrics.active_watchers,
            total_updates: metrics.updates_total,
            failed_updates: metrics.updates_failed,
            queued_updates: self.pending_len(),
            active_updates: self.active_updates.load(Ordering::Acquire),
            metrics,
        }
    }

    pub fn reset_metrics(&self) {
        *lock(&self.stats) = CoordinatorStats::default();
    }
}

/// Panes targeted in `tier`, in first-seen order, each with the notice of its latest event.
fn latest_per_pane(
    events: &[UpdateEvent],
    tier: Priority,
) -> (Vec<PaneId>, FxHashMap<PaneId, ChangeNotice>) {
    let mut order = Vec::new();
    let mut latest: FxHashMap<PaneId, ChangeNotice> = FxHashMap::default();
    for event in events.iter().filter(|event| event.priority == tier) {
        let notice = event.notice();
        for pane in &event.targets {
            if latest.insert(pane.clone(), notice.clone()).is_none() {
                order.push(pane.clone());
            }
        }
    }
    (order, latest)
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/updates/coordinator.rs"]
mod tests;
