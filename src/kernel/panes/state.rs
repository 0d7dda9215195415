use super::kind::{PaneId, PaneKind};
use serde::Serialize;
use serde_json::Value;
use std::time::SystemTime;

/// Lifecycle: `Initializing -> Ready`, `Initializing | Ready -> Error`, `Error -> Ready` on the
/// next successful update. An unregistered pane has no state at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanePhase {
    Initializing,
    Ready,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateCounters {
    pub updates_applied: u64,
    pub updates_failed: u64,
    pub last_updated_at: Option<SystemTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaneState {
    pub id: PaneId,
    pub kind: PaneKind,
    pub phase: PanePhase,
    pub collapsed: bool,
    pub focused: bool,
    pub last_error: Option<String>,
    pub data: Value,
    pub counters: UpdateCounters,
}

impl PaneState {
    pub fn new(id: PaneId, kind: PaneKind) -> Self {
        Self {
            id,
            kind,
            phase: PanePhase::Initializing,
            collapsed: false,
            focused: false,
            last_error: None,
            data: Value::Null,
            counters: UpdateCounters::default(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase == PanePhase::Ready
    }

    pub(crate) fn record_success(&mut self, data: Value) {
        self.data = data;
        self.phase = PanePhase::Ready;
        self.last_error = None;
        self.counters.updates_applied += 1;
        self.counters.last_updated_at = Some(SystemTime::now());
    }

    pub(crate) fn record_failure(&mut self, error: String) {
        self.phase = PanePhase::Error;
        self.last_error = Some(error);
        self.counters.updates_failed += 1;
    }
}
