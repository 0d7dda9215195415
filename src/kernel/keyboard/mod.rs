//! Keyboard dispatch: key combos → global or pane-scoped actions.

pub mod bindings;
pub mod dispatcher;
pub mod help;
pub mod history;

pub use bindings::{parse_keybinding, BindingScope, KeyBindings, FOCUS_CYCLE_KEYS};
pub use dispatcher::{Dispatched, KeyboardDispatcher, KeyboardMetrics};
pub use help::{contextual_help, HelpDocument, HelpItem, HelpSection};
pub use history::{KeyHistory, KeyRecord, DEFAULT_KEY_HISTORY_CAPACITY};
