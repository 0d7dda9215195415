use super::settings::Settings;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub preset: String,
    pub debounce: Duration,
    pub max_concurrent_updates: usize,
    pub max_queued_updates: usize,
    pub key_history_capacity: usize,
    pub broadcast_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preset: "development".to_string(),
            debounce: Duration::from_millis(250),
            max_concurrent_updates: 4,
            max_queued_updates: 256,
            key_history_capacity: 64,
            broadcast_capacity: 128,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with whatever `settings` specifies. Zero sizes are clamped to one.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut config = Self::default();
        if let Some(preset) = &settings.preset {
            config.preset = preset.clone();
        }
        if let Some(ms) = settings.debounce_ms {
            config.debounce = Duration::from_millis(ms);
        }
        if let Some(n) = settings.max_concurrent_updates {
            config.max_concurrent_updates = n.max(1);
        }
        if let Some(n) = settings.max_queued_updates {
            config.max_queued_updates = n.max(1);
        }
        if let Some(n) = settings.key_history_capacity {
            config.key_history_capacity = n.max(1);
        }
        config
    }
}
