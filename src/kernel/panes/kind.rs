use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pane identifier. The text before an optional `:` names the pane kind (`logs:build`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(CompactString);

impl PaneId {
    pub fn new(id: &str) -> Self {
        Self(CompactString::from(id.trim()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn kind(&self) -> Option<PaneKind> {
        let kind = self.0.split(':').next().unwrap_or_default();
        PaneKind::parse(kind)
    }
}

impl From<&str> for PaneId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<PaneKind> for PaneId {
    fn from(kind: PaneKind) -> Self {
        Self::new(kind.as_str())
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaneKind {
    Progress,
    Tasks,
    Capabilities,
    Metrics,
    Logs,
    Events,
}

impl PaneKind {
    pub const ALL: [PaneKind; 6] = [
        PaneKind::Progress,
        PaneKind::Tasks,
        PaneKind::Capabilities,
        PaneKind::Metrics,
        PaneKind::Logs,
        PaneKind::Events,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "progress" | "phase" => Some(Self::Progress),
            "tasks" | "tickets" => Some(Self::Tasks),
            "capabilities" | "gaps" => Some(Self::Capabilities),
            "metrics" => Some(Self::Metrics),
            "logs" | "log" => Some(Self::Logs),
            "events" => Some(Self::Events),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaneKind::Progress => "progress",
            PaneKind::Tasks => "tasks",
            PaneKind::Capabilities => "capabilities",
            PaneKind::Metrics => "metrics",
            PaneKind::Logs => "logs",
            PaneKind::Events => "events",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PaneKind::Progress => "Phase Progress",
            PaneKind::Tasks => "Tasks",
            PaneKind::Capabilities => "Capabilities",
            PaneKind::Metrics => "Metrics",
            PaneKind::Logs => "Logs",
            PaneKind::Events => "Events",
        }
    }
}
