//! Key bindings: canonical combo → action, one global table plus one table per pane kind.

use crate::core::{parse_key, Action, KeyModifiers};
use crate::kernel::panes::PaneKind;
use crate::kernel::services::ports::KeybindingRule;
use rustc_hash::FxHashMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase", tag = "scope", content = "pane")]
pub enum BindingScope {
    Global,
    Pane(PaneKind),
}

impl BindingScope {
    pub fn parse(value: &str) -> Option<Self> {
        let v = value.trim().to_ascii_lowercase();
        match v.as_str() {
            "" | "global" => Some(Self::Global),
            other => PaneKind::parse(other).map(Self::Pane),
        }
    }
}

/// Focus-cycle keys; never overridden by pane tables.
pub const FOCUS_CYCLE_KEYS: [&str; 2] = ["tab", "S-tab"];

#[derive(Debug, Clone)]
pub struct KeyBindings {
    global: FxHashMap<String, Action>,
    panes: FxHashMap<PaneKind, FxHashMap<String, Action>>,
}

impl KeyBindings {
    pub fn with_defaults() -> Self {
        let mut panes = FxHashMap::default();
        for kind in PaneKind::ALL {
            panes.insert(kind, default_pane_keybindings(kind));
        }
        Self {
            global: default_global_keybindings(),
            panes,
        }
    }

    /// Defaults plus `rules` from settings. Rules with an unparsable key or context are skipped.
    pub fn with_overrides(rules: &[KeybindingRule]) -> Self {
        let mut bindings = Self::with_defaults();
        for rule in rules {
            let Some(combo) = parse_keybinding(&rule.key) else {
                tracing::warn!(key = %rule.key, "skipping keybinding with invalid key");
                continue;
            };
            let scope = match rule.context.as_deref() {
                None => Some(BindingScope::Global),
                Some(context) => BindingScope::parse(context),
            };
            let Some(scope) = scope else {
                tracing::warn!(key = %rule.key, context = ?rule.context, "skipping keybinding with unknown context");
                continue;
            };
            let action = Action::from_name(&rule.action);
            tracing::debug!(combo = %combo, action = %action.name(), ?scope, "keybinding override");
            bindings.map_mut(scope).insert(combo, action);
        }
        bindings
    }

    pub fn resolve_global(&self, combo: &str) -> Option<&Action> {
        self.global.get(combo)
    }

    pub fn resolve_pane(&self, kind: PaneKind, combo: &str) -> Option<&Action> {
        self.panes.get(&kind).and_then(|table| table.get(combo))
    }

    pub fn table(&self, scope: BindingScope) -> Option<&FxHashMap<String, Action>> {
        match scope {
            BindingScope::Global => Some(&self.global),
            BindingScope::Pane(kind) => self.panes.get(&kind),
        }
    }

    /// Bindings of `scope` sorted by combo, for help output.
    pub fn sorted(&self, scope: BindingScope) -> Vec<(&str, &Action)> {
        let mut entries: Vec<_> = self
            .table(scope)
            .map(|table| table.iter().map(|(k, a)| (k.as_str(), a)).collect())
            .unwrap_or_default();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    fn map_mut(&mut self, scope: BindingScope) -> &mut FxHashMap<String, Action> {
        match scope {
            BindingScope::Global => &mut self.global,
            BindingScope::Pane(kind) => self.panes.entry(kind).or_default(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Parses a settings key such as `ctrl+r` or `Shift+Tab` into its canonical combo.
pub fn parse_keybinding(value: &str) -> Option<String> {
    let mut modifiers = KeyModifiers::NONE;
    let mut key_part: Option<&str> = None;
    for part in value.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers.ctrl = true,
            "shift" => modifiers.shift = true,
            "alt" | "meta" | "option" => modifiers.alt = true,
            _ => {
                if key_part.is_some() {
                    return None;
                }
                key_part = Some(part);
            }
        }
    }
    let key_part = key_part?;
    let name = match key_part.to_ascii_lowercase().as_str() {
        "esc" | "escape" => "escape".to_string(),
        "return" | "enter" => "enter".to_string(),
        "backtab" => {
            modifiers.shift = true;
            "tab".to_string()
        }
        " " | "space" => "space".to_string(),
        lower if lower.chars().count() > 1 => lower.to_string(),
        _ => {
            let ch = key_part.chars().next()?;
            if ch.is_ascii_uppercase() {
                modifiers.shift = true;
            }
            ch.to_ascii_lowercase().to_string()
        }
    };
    Some(parse_key(&name, modifiers))
}

fn default_global_keybindings() -> FxHashMap<String, Action> {
    let mut bindings = FxHashMap::default();
    bindings.reserve(16);

    bindings.insert("q".to_string(), Action::Quit);
    bindings.insert("C-c".to_string(), Action::Quit);
    bindings.insert("tab".to_string(), Action::FocusNext);
    bindings.insert("S-tab".to_string(), Action::FocusPrevious);
    bindings.insert("?".to_string(), Action::ToggleHelp);
    bindings.insert("h".to_string(), Action::ToggleHelp);
    bindings.insert("escape".to_string(), Action::CloseHelp);
    bindings.insert("r".to_string(), Action::RefreshAll);
    bindings.insert("C-r".to_string(), Action::RefreshAll);
    bindings.insert("space".to_string(), Action::ToggleCollapse);

    for (key, preset) in [
        ("1", "quick"),
        ("2", "development"),
        ("3", "monitoring"),
        ("4", "debug"),
        ("5", "full"),
    ] {
        bindings.insert(key.to_string(), Action::SwitchPreset(preset.to_string()));
    }

    bindings
}

fn default_pane_keybindings(kind: PaneKind) -> FxHashMap<String, Action> {
    let mut bindings = FxHashMap::default();
    let mut bind = |key: &str, action: Action| {
        bindings.insert(key.to_string(), action);
    };

    match kind {
        PaneKind::Progress => {
            bind("d", Action::ShowDetails);
            bind("enter", Action::ShowDetails);
        }
        PaneKind::Tasks => {
            bind("up", Action::SelectPrevious);
            bind("k", Action::SelectPrevious);
            bind("down", Action::SelectNext);
            bind("j", Action::SelectNext);
            bind("enter", Action::OpenSelected);
            bind("/", Action::Search);
        }
        PaneKind::Capabilities => {
            bind("a", Action::AnalyzeCapabilities);
            bind("e", Action::ExpandItem);
            bind("up", Action::SelectPrevious);
            bind("down", Action::SelectNext);
        }
        PaneKind::Metrics => {
            bind("z", Action::ResetMetrics);
        }
        PaneKind::Logs => {
            bind("g", Action::ScrollTop);
            bind("S-g", Action::ScrollBottom);
            bind("f", Action::Filter);
            bind("/", Action::Search);
            bind("p", Action::TogglePause);
        }
        PaneKind::Events => {
            bind("p", Action::TogglePause);
            bind("g", Action::ScrollTop);
            bind("S-g", Action::ScrollBottom);
        }
    }

    bindings
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/keyboard/bindings.rs"]
mod tests;
