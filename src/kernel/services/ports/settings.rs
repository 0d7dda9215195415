use crate::kernel::layout::{LayoutShape, Preset};
use crate::kernel::panes::PaneId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User settings file (`settings.json`). Every field is optional; missing fields keep defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_updates: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_queued_updates: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_history_capacity: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_root: Option<PathBuf>,
    #[serde(default)]
    pub keybindings: Vec<KeybindingRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presets: Vec<PresetSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeybindingRule {
    pub key: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetSettings {
    pub id: String,
    pub shape: LayoutShape,
    pub panes: Vec<String>,
    pub min_width: u16,
    pub min_height: u16,
}

impl From<&PresetSettings> for Preset {
    fn from(settings: &PresetSettings) -> Self {
        Preset {
            id: settings.id.clone(),
            shape: settings.shape,
            panes: settings.panes.iter().map(|p| PaneId::new(p)).collect(),
            min_width: settings.min_width,
            min_height: settings.min_height,
        }
    }
}
