//! Pane registry: owns every `PaneState`.
//!
//! Each pane has two locks. `apply_lock` is an async FIFO mutex held for the whole of an update
//! (including the source's `apply`), so updates to one pane serialize in arrival order while
//! different panes proceed independently. `state` is a plain mutex that is never held across an
//! await, so focus/collapse/snapshot reads stay synchronous.

use super::debounce::{DebounceQueue, QueueOutcome};
use super::kind::{PaneId, PaneKind};
use super::state::{PanePhase, PaneState};
use crate::core::{DashboardError, Result};
use crate::kernel::services::ports::{PaneSource, StaticSource};
use crate::kernel::util::lock;
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_MAX_QUEUED_UPDATES: usize = 256;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RegistryMetrics {
    pub updates_applied: u64,
    pub updates_failed: u64,
    pub registered_panes: usize,
    pub mean_update_latency_ms: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    pub applied: usize,
    pub failed: usize,
    /// Updates whose pane disappeared before they could be applied.
    pub skipped: usize,
}

impl FlushReport {
    pub fn merge(&mut self, other: FlushReport) {
        self.applied += other.applied;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }

    pub fn total(&self) -> usize {
        self.applied + self.failed + self.skipped
    }
}

#[derive(Debug, Default)]
struct LatencyStats {
    applied: u64,
    failed: u64,
    total_latency: Duration,
}

struct PaneSlot {
    id: PaneId,
    source: Arc<dyn PaneSource>,
    apply_lock: Arc<tokio::sync::Mutex<()>>,
    state: Mutex<PaneState>,
    phase_tx: watch::Sender<PanePhase>,
    removed: AtomicBool,
}

impl PaneSlot {
    fn snapshot(&self) -> PaneState {
        lock(&self.state).clone()
    }

    fn is_removed(&self) -> bool {
        self.removed.load(Ordering::Acquire)
    }

    fn finish_init(&self, result: std::result::Result<Value, String>) {
        if self.is_removed() {
            tracing::debug!(pane = %self.id, "pane unregistered before init finished");
            return;
        }
        let phase = {
            let mut state = lock(&self.state);
            match result {
                Ok(data) => {
                    state.data = data;
                    state.phase = PanePhase::Ready;
                    state.last_error = None;
                    tracing::debug!(pane = %self.id, "pane ready");
                }
                Err(reason) => {
                    let error = DashboardError::PaneInitializationFailure {
                        pane: self.id.to_string(),
                        reason,
                    };
                    tracing::warn!(pane = %self.id, error = %error, "pane init failed");
                    state.phase = PanePhase::Error;
                    state.last_error = Some(error.to_string());
                }
            }
            state.phase
        };
        self.phase_tx.send_replace(phase);
    }
}

#[derive(Default)]
struct RegistryInner {
    slots: FxHashMap<PaneId, Arc<PaneSlot>>,
    order: Vec<PaneId>,
}

pub struct PaneRegistryBuilder {
    handle: Handle,
    sources: FxHashMap<PaneKind, Arc<dyn PaneSource>>,
    max_queued_updates: usize,
}

impl PaneRegistryBuilder {
    pub fn source(mut self, kind: PaneKind, source: Arc<dyn PaneSource>) -> Self {
        self.sources.insert(kind, source);
        self
    }

    /// Installs a `StaticSource` (null initial data) for every kind that has no source yet.
    pub fn default_sources(mut self) -> Self {
        for kind in PaneKind::ALL {
            self.sources
                .entry(kind)
                .or_insert_with(|| Arc::new(StaticSource::default()));
        }
        self
    }

    pub fn max_queued_updates(mut self, max: usize) -> Self {
        self.max_queued_updates = max;
        self
    }

    pub fn build(self) -> Arc<PaneRegistry> {
        let (shutdown_tx, _) = watch::channel(false);
        Arc::new(PaneRegistry {
            handle: self.handle,
            sources: self.sources,
            inner: Mutex::new(RegistryInner::default()),
            queue: Mutex::new(DebounceQueue::new(self.max_queued_updates)),
            stats: Mutex::new(LatencyStats::default()),
            debounce_task: Mutex::new(None),
            shutdown_tx,
        })
    }
}

pub struct PaneRegistry {
    handle: Handle,
    sources: FxHashMap<PaneKind, Arc<dyn PaneSource>>,
    inner: Mutex<RegistryInner>,
    queue: Mutex<DebounceQueue>,
    stats: Mutex<LatencyStats>,
    debounce_task: Mutex<Option<JoinHandle<()>>>,
    shutdown_tx: watch::Sender<bool>,
}

impl PaneRegistry {
    pub fn builder(handle: Handle) -> PaneRegistryBuilder {
        PaneRegistryBuilder {
            handle,
            sources: FxHashMap::default(),
            max_queued_updates: DEFAULT_MAX_QUEUED_UPDATES,
        }
    }

    /// Registers `id` and schedules its initialization. The returned state is still
    /// `Initializing`; use [`PaneRegistry::wait_ready`] to await completion.
    pub fn register(&self, id: &str) -> Result<PaneState> {
        let id = PaneId::new(id);
        let mut inner = lock(&self.inner);
        if inner.slots.contains_key(&id) {
            return Err(DashboardError::DuplicatePane(id.to_string()));
        }
        let (kind, source) = id
            .kind()
            .and_then(|kind| self.sources.get(&kind).map(|source| (kind, Arc::clone(source))))
            .ok_or_else(|| DashboardError::UnknownPaneType(id.to_string()))?;

        let state = PaneState::new(id.clone(), kind);
        let (phase_tx, _) = watch::channel(PanePhase::Initializing);
        let slot = Arc::new(PaneSlot {
            id: id.clone(),
            source,
            apply_lock: Arc::new(tokio::sync::Mutex::new(())),
            state: Mutex::new(state.clone()),
            phase_tx,
            removed: AtomicBool::new(false),
        });
        inner.slots.insert(id.clone(), Arc::clone(&slot));
        inner.order.push(id.clone());
        drop(inner);

        // Updates queue behind initialization: the guard is taken before the task is spawned.
        let init_guard = Arc::clone(&slot.apply_lock).try_lock_owned().ok();
        let init = slot.source.initialize(&id);
        self.handle.spawn(async move {
            let _init_guard = init_guard;
            let result = init.await;
            slot.finish_init(result);
        });

        tracing::debug!(pane = %id, kind = kind.as_str(), "pane registered");
        Ok(state)
    }

    /// Awaits the end of initialization and returns the resulting phase.
    pub async fn wait_ready(&self, id: &PaneId) -> Result<PanePhase> {
        let slot = self
            .slot(id)
            .ok_or_else(|| DashboardError::UnknownPane(id.to_string()))?;
        let mut rx = slot.phase_tx.subscribe();
        let phase = match rx.wait_for(|phase| *phase != PanePhase::Initializing).await {
            Ok(phase) => *phase,
            Err(_) => slot.snapshot().phase,
        };
        Ok(phase)
    }

    pub fn unregister(&self, id: &PaneId) -> bool {
        let removed = {
            let mut inner = lock(&self.inner);
            let removed = inner.slots.remove(id);
            if removed.is_some() {
                inner.order.retain(|pane| pane != id);
            }
            removed
        };
        let Some(slot) = removed else {
            return false;
        };
        slot.removed.store(true, Ordering::Release);
        lock(&self.queue).remove(id);
        tracing::debug!(pane = %id, "pane unregistered");
        true
    }

    pub async fn update(&self, id: &PaneId, payload: Value) -> Result<()> {
        let slot = self
            .slot(id)
            .ok_or_else(|| DashboardError::UnknownPane(id.to_string()))?;
        let started = Instant::now();
        let _guard = slot.apply_lock.lock().await;
        if slot.is_removed() {
            return Err(DashboardError::UnknownPane(id.to_string()));
        }

        let current = lock(&slot.state).data.clone();
        let result = slot.source.apply(&slot.id, &current, payload).await;
        if slot.is_removed() {
            tracing::debug!(pane = %id, "discarding update for unregistered pane");
            return Err(DashboardError::UnknownPane(id.to_string()));
        }

        match result {
            Ok(data) => {
                lock(&slot.state).record_success(data);
                let mut stats = lock(&self.stats);
                stats.applied += 1;
                stats.total_latency += started.elapsed();
                Ok(())
            }
            Err(reason) => {
                let error = DashboardError::UpdateApplicationFailure {
                    pane: id.to_string(),
                    reason,
                };
                tracing::warn!(pane = %id, error = %error, "pane update failed");
                lock(&slot.state).record_failure(error.to_string());
                lock(&self.stats).failed += 1;
                Err(error)
            }
        }
    }

    pub fn queue_update(&self, id: &PaneId, payload: Value) -> Result<QueueOutcome> {
        if !self.contains(id) {
            return Err(DashboardError::UnknownPane(id.to_string()));
        }
        let outcome = lock(&self.queue).push(id.clone(), payload);
        if outcome == QueueOutcome::Full {
            tracing::warn!(pane = %id, "update queue full, payload rejected");
        }
        Ok(outcome)
    }

    pub fn queued_len(&self) -> usize {
        lock(&self.queue).len()
    }

    /// Applies every queued update now.
    pub async fn flush_queued(&self) -> FlushReport {
        let drained = lock(&self.queue).drain();
        let mut report = FlushReport::default();
        for (id, payload) in drained {
            match self.update(&id, payload).await {
                Ok(()) => report.applied += 1,
                Err(DashboardError::UnknownPane(_)) => report.skipped += 1,
                Err(_) => report.failed += 1,
            }
        }
        report
    }

    /// Starts the background flusher. At most one flush runs per `interval`.
    pub fn spawn_debounce_loop(self: &Arc<Self>, interval: Duration) {
        let mut task = lock(&self.debounce_task);
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        self.shutdown_tx.send_replace(false);
        let registry = Arc::clone(self);
        let mut shutdown = self.shutdown_tx.subscribe();
        *task = Some(self.handle.spawn(async move {
            let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.changed() => break,
                    _ = ticker.tick() => {
                        if registry.queued_len() > 0 {
                            let report = registry.flush_queued().await;
                            tracing::debug!(?report, "debounced updates flushed");
                        }
                    }
                }
            }
        }));
    }

    /// Stops the debounce loop. Queued updates stay queued.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
        lock(&self.debounce_task).take();
    }

    /// Focusing a pane unfocuses every other pane. Returns `false` for unknown panes.
    pub fn set_focus(&self, id: &PaneId, focused: bool) -> bool {
        let inner = lock(&self.inner);
        let Some(target) = inner.slots.get(id) else {
            return false;
        };
        if focused {
            for slot in inner.slots.values() {
                lock(&slot.state).focused = slot.id == *id;
            }
        } else {
            lock(&target.state).focused = false;
        }
        true
    }

    pub fn toggle_collapse(&self, id: &PaneId) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        let mut state = lock(&slot.state);
        state.collapsed = !state.collapsed;
        true
    }

    pub fn get(&self, id: &PaneId) -> Option<PaneState> {
        self.slot(id).map(|slot| slot.snapshot())
    }

    pub fn contains(&self, id: &PaneId) -> bool {
        lock(&self.inner).slots.contains_key(id)
    }

    /// Registered pane ids in registration order.
    pub fn ids(&self) -> Vec<PaneId> {
        lock(&self.inner).order.clone()
    }

    /// Snapshots of every pane in registration order.
    pub fn states(&self) -> Vec<PaneState> {
        let inner = lock(&self.inner);
        inner
            .order
            .iter()
            .filter_map(|id| inner.slots.get(id))
            .map(|slot| slot.snapshot())
            .collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn metrics(&self) -> RegistryMetrics {
        let stats = lock(&self.stats);
        let mean = if stats.applied == 0 {
            0.0
        } else {
            stats.total_latency.as_secs_f64() * 1000.0 / stats.applied as f64
        };
        RegistryMetrics {
            updates_applied: stats.applied,
            updates_failed: stats.failed,
            registered_panes: self.len(),
            mean_update_latency_ms: mean,
        }
    }

    pub fn reset_metrics(&self) {
        *lock(&self.stats) = LatencyStats::default();
    }

    fn slot(&self, id: &PaneId) -> Option<Arc<PaneSlot>> {
        lock(&self.inner).slots.get(id).cloned()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/panes/registry.rs"]
mod tests;
