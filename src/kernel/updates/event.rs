use crate::kernel::panes::PaneId;
use crate::kernel::services::ports::ChangeKind;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Update tier. Flushes apply every `High` update before any `Medium` one, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchTargets {
    /// Every registered pane.
    All,
    /// Listed panes. A bare kind (`logs`) also matches suffixed ids of that kind (`logs:build`).
    Panes(Vec<PaneId>),
}

impl WatchTargets {
    pub fn matches(&self, pane: &PaneId) -> bool {
        match self {
            WatchTargets::All => true,
            WatchTargets::Panes(targets) => targets.iter().any(|target| {
                target == pane
                    || (!target.as_str().contains(':')
                        && target.kind().is_some()
                        && target.kind() == pane.kind())
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEvent {
    pub id: u64,
    pub path: PathBuf,
    pub kind: ChangeKind,
    /// Panes resolved when the change arrived.
    pub targets: Vec<PaneId>,
    pub priority: Priority,
    pub timestamp: SystemTime,
}

impl UpdateEvent {
    pub fn notice(&self) -> ChangeNotice {
        ChangeNotice {
            event_id: self.id,
            path: path_key(&self.path),
            kind: self.kind,
            priority: self.priority,
            targets: self.targets.clone(),
            timestamp_ms: self
                .timestamp
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_millis() as u64)
                .unwrap_or_default(),
        }
    }
}

/// Broadcast to observers on every change, and delivered to panes as the update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeNotice {
    pub event_id: u64,
    pub path: String,
    pub kind: ChangeKind,
    pub priority: Priority,
    pub targets: Vec<PaneId>,
    pub timestamp_ms: u64,
}

/// Path text used for pattern matching, with `/` separators on every platform.
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
