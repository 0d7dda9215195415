//! Contextual help documents built from the binding tables.

use super::bindings::{BindingScope, KeyBindings};
use crate::core::Action;
use crate::kernel::panes::PaneKind;
use rustc_hash::FxHashMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpItem {
    pub keys: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpSection {
    pub heading: String,
    pub items: Vec<HelpItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpDocument {
    pub context: String,
    pub title: String,
    pub description: String,
    pub sections: Vec<HelpSection>,
}

pub fn contextual_help(bindings: &KeyBindings, context: &str) -> HelpDocument {
    let context = context.trim().to_ascii_lowercase();
    match context.as_str() {
        "navigation" => navigation_help(bindings),
        "presets" | "layouts" => presets_help(bindings),
        other => match PaneKind::parse(other) {
            Some(kind) => pane_help(bindings, kind),
            None => general_help(bindings),
        },
    }
}

fn general_help(bindings: &KeyBindings) -> HelpDocument {
    HelpDocument {
        context: "general".to_string(),
        title: "Dashboard Help".to_string(),
        description: "Panes refresh automatically when watched files change.".to_string(),
        sections: vec![
            section(
                "Navigation",
                bindings,
                BindingScope::Global,
                is_navigation,
            ),
            section("Layouts", bindings, BindingScope::Global, is_preset),
            section("General", bindings, BindingScope::Global, |action| {
                !is_navigation(action) && !is_preset(action)
            }),
        ],
    }
}

fn navigation_help(bindings: &KeyBindings) -> HelpDocument {
    HelpDocument {
        context: "navigation".to_string(),
        title: "Navigation".to_string(),
        description: "Tab and Shift+Tab always move focus, whatever pane is focused."
            .to_string(),
        sections: vec![section(
            "Focus",
            bindings,
            BindingScope::Global,
            is_navigation,
        )],
    }
}

fn presets_help(bindings: &KeyBindings) -> HelpDocument {
    HelpDocument {
        context: "presets".to_string(),
        title: "Layouts".to_string(),
        description: "A layout that does not fit the terminal falls back to the next smaller one."
            .to_string(),
        sections: vec![section("Presets", bindings, BindingScope::Global, is_preset)],
    }
}

fn pane_help(bindings: &KeyBindings, kind: PaneKind) -> HelpDocument {
    HelpDocument {
        context: kind.as_str().to_string(),
        title: format!("{} Pane", kind.title()),
        description: format!("Keys available while the {} pane is focused.", kind.as_str()),
        sections: vec![section(
            kind.title(),
            bindings,
            BindingScope::Pane(kind),
            |_| true,
        )],
    }
}

/// One item per action; keys bound to the same action are joined.
fn section(
    heading: &str,
    bindings: &KeyBindings,
    scope: BindingScope,
    filter: impl Fn(&Action) -> bool,
) -> HelpSection {
    let mut order: Vec<&Action> = Vec::new();
    let mut keys: FxHashMap<&Action, Vec<&str>> = FxHashMap::default();
    for (combo, action) in bindings.sorted(scope) {
        if !filter(action) {
            continue;
        }
        let entry = keys.entry(action).or_default();
        if entry.is_empty() {
            order.push(action);
        }
        entry.push(combo);
    }
    order.sort_by_key(|action| action.name());

    HelpSection {
        heading: heading.to_string(),
        items: order
            .into_iter()
            .map(|action| HelpItem {
                keys: keys.get(action).map(|k| k.join(", ")).unwrap_or_default(),
                description: action.description(),
            })
            .collect(),
    }
}

fn is_navigation(action: &Action) -> bool {
    matches!(action, Action::FocusNext | Action::FocusPrevious)
}

fn is_preset(action: &Action) -> bool {
    matches!(action, Action::SwitchPreset(_))
}
