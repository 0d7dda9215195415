//! Dashboard facade: the one owner hosts talk to.
//!
//! Responsibilities:
//! - forward resize, preset, key and change events to the engine components
//! - keep layout focus and registry focus in sync
//! - register the panes of the active preset
//! - build the render snapshot

use crate::core::{Action, KeyInput, Result};
use crate::kernel::keyboard::{BindingScope, HelpDocument, KeyboardDispatcher, KeyboardMetrics};
use crate::kernel::layout::{
    Layout, LayoutEngine, PresetCatalog, PresetChange, PresetSummary, TerminalDimensions,
};
use crate::kernel::panes::{PaneId, PaneKind, PaneRegistry, PaneState, RegistryMetrics};
use crate::kernel::services::ports::{ChangeKind, EngineConfig, Settings};
use crate::kernel::updates::{CoordinatorMetrics, UpdateCoordinator, UpdateEvent};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;

/// What the facade did with a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Quit,
    /// Global action executed by the facade.
    Handled(Action),
    /// Pane-scoped action for the host to apply to `pane`.
    Forwarded { action: Action, pane: PaneId },
    Ignored,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub registry: RegistryMetrics,
    pub keyboard: KeyboardMetrics,
    pub coordinator: CoordinatorMetrics,
}

/// Read-only view of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub layout: Layout,
    /// States of the panes in the active preset, in layout order.
    pub panes: Vec<PaneState>,
    pub presets: Vec<PresetSummary>,
    pub help_visible: bool,
    pub help: Option<HelpDocument>,
    pub metrics: DashboardMetrics,
}

pub struct Dashboard {
    handle: Handle,
    config: EngineConfig,
    layout: LayoutEngine,
    registry: Arc<PaneRegistry>,
    keyboard: KeyboardDispatcher,
    coordinator: Arc<UpdateCoordinator>,
    help_context: String,
    quit: bool,
}

impl Dashboard {
    /// Builds a dashboard on `registry`, applies `config.preset` and registers its panes.
    pub fn new(
        handle: Handle,
        registry: Arc<PaneRegistry>,
        catalog: PresetCatalog,
        keyboard: KeyboardDispatcher,
        config: EngineConfig,
        dimensions: TerminalDimensions,
    ) -> Result<Self> {
        let coordinator = Arc::new(UpdateCoordinator::new(Arc::clone(&registry), &config));
        let mut dashboard = Self {
            handle,
            layout: LayoutEngine::new(catalog, dimensions),
            registry,
            keyboard,
            coordinator,
            help_context: "general".to_string(),
            quit: false,
            config,
        };
        let preset = dashboard.config.preset.clone();
        dashboard.set_preset(&preset)?;
        Ok(dashboard)
    }

    /// Everything from user settings: preset catalog, key overrides and engine limits.
    pub fn from_settings(
        handle: Handle,
        settings: &Settings,
        dimensions: TerminalDimensions,
    ) -> Result<Self> {
        let config = EngineConfig::from_settings(settings);
        let catalog = if settings.presets.is_empty() {
            PresetCatalog::builtin()
        } else {
            PresetCatalog::new(settings.presets.iter().map(Into::into).collect())?
        };
        let registry = PaneRegistry::builder(handle.clone())
            .default_sources()
            .max_queued_updates(config.max_queued_updates)
            .build();
        let keyboard =
            KeyboardDispatcher::with_overrides(&settings.keybindings, config.key_history_capacity);
        Self::new(handle, registry, catalog, keyboard, config, dimensions)
    }

    /// Starts the registry debounce loop and the coordinator flush loop.
    pub fn start(&self) {
        self.registry.spawn_debounce_loop(self.config.debounce);
        self.coordinator.spawn_flush_loop(&self.handle);
        tracing::info!(preset = %self.layout.active_preset().id, "dashboard started");
    }

    pub fn shutdown(&self) {
        self.coordinator.cleanup();
        self.registry.shutdown();
        tracing::info!("dashboard stopped");
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn layout_engine(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn registry(&self) -> &Arc<PaneRegistry> {
        &self.registry
    }

    pub fn keyboard(&self) -> &KeyboardDispatcher {
        &self.keyboard
    }

    pub fn coordinator(&self) -> &Arc<UpdateCoordinator> {
        &self.coordinator
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn focused_pane(&self) -> Option<&PaneId> {
        self.layout.focused_pane()
    }

    pub fn set_preset(&mut self, name: &str) -> Result<PresetChange> {
        let change = self.layout.set_preset(name)?;
        self.register_active_panes();
        self.sync_focus();
        Ok(change)
    }

    /// Applies new terminal dimensions, downgrading the preset if it no longer fits.
    pub fn resize(&mut self, width: u16, height: u16) -> Option<PresetChange> {
        self.layout.update_dimensions(width, height);
        let active = self.layout.active_preset();
        if active.fits(self.layout.dimensions()) {
            return None;
        }
        let id = active.id.clone();
        match self.set_preset(&id) {
            Ok(change) => Some(change),
            Err(error) => {
                tracing::warn!(%error, "re-applying preset after resize failed");
                None
            }
        }
    }

    pub fn focus_pane(&mut self, pane: &PaneId) -> bool {
        let focused = self.layout.focus_pane(pane);
        if focused {
            self.sync_focus();
        }
        focused
    }

    pub fn handle_key(&mut self, key: &KeyInput) -> KeyOutcome {
        let focused = self.layout.focused_pane().cloned();
        let focused_kind = focused.as_ref().and_then(PaneId::kind);
        let Some(dispatched) = self.keyboard.handle_key(key, focused_kind) else {
            return KeyOutcome::Ignored;
        };

        match dispatched.scope {
            BindingScope::Global => self.run_global(dispatched.action),
            BindingScope::Pane(kind) => {
                let Some(pane) = focused else {
                    return KeyOutcome::Ignored;
                };
                if kind == PaneKind::Metrics && dispatched.action == Action::ResetMetrics {
                    self.reset_metrics();
                    return KeyOutcome::Handled(dispatched.action);
                }
                KeyOutcome::Forwarded {
                    action: dispatched.action,
                    pane,
                }
            }
        }
    }

    fn run_global(&mut self, action: Action) -> KeyOutcome {
        match &action {
            Action::Quit => {
                self.quit = true;
                return KeyOutcome::Quit;
            }
            Action::FocusNext => {
                self.layout.next_pane();
                self.sync_focus();
            }
            Action::FocusPrevious => {
                self.layout.previous_pane();
                self.sync_focus();
            }
            Action::ToggleHelp => {
                self.help_context = self
                    .layout
                    .focused_pane()
                    .and_then(PaneId::kind)
                    .map(|kind| kind.as_str().to_string())
                    .unwrap_or_else(|| "general".to_string());
                self.keyboard.toggle_help();
            }
            Action::CloseHelp => self.keyboard.close_help(),
            Action::RefreshAll => self.refresh_all(),
            Action::ToggleCollapse => {
                if let Some(pane) = self.layout.focused_pane() {
                    self.registry.toggle_collapse(pane);
                }
            }
            Action::SwitchPreset(preset) => {
                if let Err(error) = self.set_preset(preset) {
                    tracing::warn!(%error, "preset switch rejected");
                }
            }
            // pane actions rebound globally by settings
            _ => {
                return match self.layout.focused_pane().cloned() {
                    Some(pane) => KeyOutcome::Forwarded { action, pane },
                    None => KeyOutcome::Ignored,
                };
            }
        }
        KeyOutcome::Handled(action)
    }

    pub fn on_change(
        &self,
        kind: ChangeKind,
        path: impl Into<PathBuf>,
        targets: Option<&[PaneId]>,
    ) -> UpdateEvent {
        self.coordinator.on_change(kind, path, targets)
    }

    /// Flushes pending change events and debounced updates now instead of at the next tick.
    pub fn refresh_all(&self) {
        let coordinator = Arc::clone(&self.coordinator);
        let registry = Arc::clone(&self.registry);
        self.handle.spawn(async move {
            let changes = coordinator.flush().await;
            let queued = registry.flush_queued().await;
            tracing::debug!(?changes, ?queued, "manual refresh");
        });
    }

    pub fn reset_metrics(&mut self) {
        self.registry.reset_metrics();
        self.keyboard.reset_metrics();
        self.coordinator.reset_metrics();
    }

    pub fn metrics(&self) -> DashboardMetrics {
        DashboardMetrics {
            registry: self.registry.metrics(),
            keyboard: self.keyboard.metrics(),
            coordinator: self.coordinator.metrics(),
        }
    }

    pub fn snapshot(&mut self) -> DashboardSnapshot {
        let layout = self.layout.compute_layout();
        let panes = layout
            .panes
            .iter()
            .filter_map(|region| self.registry.get(&region.pane))
            .collect();
        let help_visible = self.keyboard.help_visible();
        DashboardSnapshot {
            layout: Layout::clone(&layout),
            panes,
            presets: self.layout.list_available_presets(),
            help_visible,
            help: help_visible.then(|| self.keyboard.contextual_help(&self.help_context)),
            metrics: self.metrics(),
        }
    }

    fn register_active_panes(&self) {
        let panes = self.layout.active_preset().panes.clone();
        for pane in panes {
            if self.registry.contains(&pane) {
                continue;
            }
            if let Err(error) = self.registry.register(pane.as_str()) {
                tracing::warn!(pane = %pane, %error, "pane not registered");
            }
        }
    }

    fn sync_focus(&self) {
        if let Some(pane) = self.layout.focused_pane() {
            self.registry.set_focus(pane, true);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/dashboard.rs"]
mod tests;
