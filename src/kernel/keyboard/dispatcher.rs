use super::bindings::{BindingScope, KeyBindings, FOCUS_CYCLE_KEYS};
use super::help::{contextual_help, HelpDocument};
use super::history::{KeyHistory, KeyRecord, DEFAULT_KEY_HISTORY_CAPACITY};
use crate::core::{parse_key, Action, KeyInput, KeyModifiers};
use crate::kernel::panes::PaneKind;
use crate::kernel::services::ports::KeybindingRule;
use serde::Serialize;
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyboardMetrics {
    pub key_presses: u64,
    pub commands_dispatched: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub action: Action,
    pub scope: BindingScope,
}

/// Resolves key combos to actions. Binding tables are fixed after construction.
#[derive(Debug, Clone)]
pub struct KeyboardDispatcher {
    bindings: KeyBindings,
    history: KeyHistory,
    help_visible: bool,
    metrics: KeyboardMetrics,
}

impl KeyboardDispatcher {
    pub fn new() -> Self {
        Self::with_bindings(KeyBindings::with_defaults(), DEFAULT_KEY_HISTORY_CAPACITY)
    }

    pub fn with_overrides(rules: &[KeybindingRule], history_capacity: usize) -> Self {
        Self::with_bindings(KeyBindings::with_overrides(rules), history_capacity)
    }

    pub fn with_bindings(bindings: KeyBindings, history_capacity: usize) -> Self {
        Self {
            bindings,
            history: KeyHistory::new(history_capacity),
            help_visible: false,
            metrics: KeyboardMetrics::default(),
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn parse_key(&self, name: &str, modifiers: KeyModifiers) -> String {
        parse_key(name, modifiers)
    }

    pub fn resolve_global(&self, combo: &str) -> Option<Action> {
        self.bindings.resolve_global(combo).cloned()
    }

    pub fn resolve_pane_scoped(&self, kind: PaneKind, combo: &str) -> Option<Action> {
        self.bindings.resolve_pane(kind, combo).cloned()
    }

    /// Focus-cycle keys are always global; otherwise the global table wins over the pane table.
    pub fn dispatch(&mut self, focused: Option<PaneKind>, combo: &str) -> Option<Dispatched> {
        let resolved = if FOCUS_CYCLE_KEYS.contains(&combo) {
            self.resolve_global(combo).map(|action| (action, BindingScope::Global))
        } else {
            self.resolve_global(combo)
                .map(|action| (action, BindingScope::Global))
                .or_else(|| {
                    let kind = focused?;
                    self.resolve_pane_scoped(kind, combo)
                        .map(|action| (action, BindingScope::Pane(kind)))
                })
        };

        let (action, scope) = resolved?;
        self.metrics.commands_dispatched += 1;
        tracing::debug!(combo, action = %action.name(), ?scope, "key dispatched");
        Some(Dispatched { action, scope })
    }

    pub fn handle_key(&mut self, key: &KeyInput, focused: Option<PaneKind>) -> Option<Dispatched> {
        let combo = key.combo();
        self.metrics.key_presses += 1;
        self.history.push(KeyRecord {
            combo: combo.clone(),
            action: None,
            at: SystemTime::now(),
        });

        let dispatched = self.dispatch(focused, &combo)?;
        self.history.resolve_last(dispatched.action.clone());
        Some(dispatched)
    }

    pub fn toggle_help(&mut self) -> bool {
        self.help_visible = !self.help_visible;
        self.help_visible
    }

    pub fn close_help(&mut self) {
        self.help_visible = false;
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn contextual_help(&self, context: &str) -> HelpDocument {
        contextual_help(&self.bindings, context)
    }

    pub fn history(&self) -> Vec<KeyRecord> {
        self.history.iter().cloned().collect()
    }

    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }

    pub fn metrics(&self) -> KeyboardMetrics {
        self.metrics
    }

    pub fn reset_metrics(&mut self) {
        self.metrics = KeyboardMetrics::default();
    }
}

impl Default for KeyboardDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/keyboard/dispatcher.rs"]
mod tests;
