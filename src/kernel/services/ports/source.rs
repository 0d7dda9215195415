//! Contracts for the collaborators the engine consumes: pane data sources and change feeds.

use super::runtime::BoxFuture;
use crate::kernel::panes::PaneId;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// Supplies and transforms a pane's buffered data. Business data stays caller-defined JSON.
pub trait PaneSource: Send + Sync {
    fn initialize(&self, pane: &PaneId) -> BoxFuture<Result<Value, String>>;

    /// Merges `payload` into the pane's current data. Replaces it by default.
    fn apply(
        &self,
        _pane: &PaneId,
        _current: &Value,
        payload: Value,
    ) -> BoxFuture<Result<Value, String>> {
        Box::pin(async move { Ok(payload) })
    }
}

/// Source with a fixed initial value whose updates replace the data.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    initial: Value,
}

impl StaticSource {
    pub fn new(initial: Value) -> Self {
        Self { initial }
    }
}

impl PaneSource for StaticSource {
    fn initialize(&self, _pane: &PaneId) -> BoxFuture<Result<Value, String>> {
        let initial = self.initial.clone();
        Box::pin(async move { Ok(initial) })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Modified => "modified",
            ChangeKind::Removed => "removed",
        }
    }
}

/// One normalized change from an external watch mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChange {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

/// A live subscription to an external change source. Dropping it stops delivery.
pub trait ChangeSubscription: Send {
    fn name(&self) -> &str;

    fn stop(&mut self) {}
}
