//! Engine error taxonomy.
//!
//! Configuration errors (`InvalidPreset`, `DuplicatePane`, `UnknownPaneType`) are returned to the
//! caller that issued the operation. Runtime data errors (`PaneInitializationFailure`,
//! `UpdateApplicationFailure`) are also recorded on the affected pane and never abort siblings.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("invalid preset: {0}")]
    InvalidPreset(String),
    #[error("pane already registered: {0}")]
    DuplicatePane(String),
    #[error("no initializer for pane type: {0}")]
    UnknownPaneType(String),
    #[error("pane not registered: {0}")]
    UnknownPane(String),
    #[error("pane {pane} failed to initialize: {reason}")]
    PaneInitializationFailure { pane: String, reason: String },
    #[error("update to pane {pane} failed: {reason}")]
    UpdateApplicationFailure { pane: String, reason: String },
}

impl DashboardError {
    /// Configuration errors indicate a programmer or settings mistake and are never retried.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DashboardError::InvalidPreset(_)
                | DashboardError::DuplicatePane(_)
                | DashboardError::UnknownPaneType(_)
        )
    }
}
