//! Action identifiers produced by the keyboard dispatcher.
//!
//! An action says what the user asked for, never which key produced it. Global actions are
//! executed by the dashboard facade; pane actions are handed to the host for the focused pane.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    // global
    Quit,
    FocusNext,
    FocusPrevious,
    ToggleHelp,
    CloseHelp,
    RefreshAll,
    ToggleCollapse,
    SwitchPreset(String),

    // pane scoped
    SelectPrevious,
    SelectNext,
    OpenSelected,
    ScrollTop,
    ScrollBottom,
    Filter,
    Search,
    ShowDetails,
    AnalyzeCapabilities,
    ExpandItem,
    ResetMetrics,
    TogglePause,

    Custom(String),
}

impl Action {
    pub fn name(&self) -> String {
        let name = match self {
            Action::Quit => "quit",
            Action::FocusNext => "focus_next",
            Action::FocusPrevious => "focus_previous",
            Action::ToggleHelp => "toggle_help",
            Action::CloseHelp => "close_help",
            Action::RefreshAll => "refresh_all",
            Action::ToggleCollapse => "toggle_collapse",
            Action::SwitchPreset(preset) => return format!("preset:{preset}"),
            Action::SelectPrevious => "select_previous",
            Action::SelectNext => "select_next",
            Action::OpenSelected => "open_selected",
            Action::ScrollTop => "scroll_top",
            Action::ScrollBottom => "scroll_bottom",
            Action::Filter => "filter",
            Action::Search => "search",
            Action::ShowDetails => "show_details",
            Action::AnalyzeCapabilities => "analyze_capabilities",
            Action::ExpandItem => "expand_item",
            Action::ResetMetrics => "reset_metrics",
            Action::TogglePause => "toggle_pause",
            Action::Custom(name) => return name.clone(),
        };
        name.to_string()
    }

    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if let Some(preset) = name.strip_prefix("preset:") {
            return Action::SwitchPreset(preset.to_string());
        }
        match name {
            "quit" => Action::Quit,
            "focus_next" => Action::FocusNext,
            "focus_previous" => Action::FocusPrevious,
            "toggle_help" => Action::ToggleHelp,
            "close_help" => Action::CloseHelp,
            "refresh_all" => Action::RefreshAll,
            "toggle_collapse" => Action::ToggleCollapse,
            "select_previous" => Action::SelectPrevious,
            "select_next" => Action::SelectNext,
            "open_selected" => Action::OpenSelected,
            "scroll_top" => Action::ScrollTop,
            "scroll_bottom" => Action::ScrollBottom,
            "filter" => Action::Filter,
            "search" => Action::Search,
            "show_details" => Action::ShowDetails,
            "analyze_capabilities" => Action::AnalyzeCapabilities,
            "expand_item" => Action::ExpandItem,
            "reset_metrics" => Action::ResetMetrics,
            "toggle_pause" => Action::TogglePause,
            other => Action::Custom(other.to_string()),
        }
    }

    pub fn description(&self) -> String {
        match self {
            Action::Quit => "Quit the dashboard".to_string(),
            Action::FocusNext => "Focus next pane".to_string(),
            Action::FocusPrevious => "Focus previous pane".to_string(),
            Action::ToggleHelp => "Show or hide help".to_string(),
            Action::CloseHelp => "Close help".to_string(),
            Action::RefreshAll => "Refresh every pane".to_string(),
            Action::ToggleCollapse => "Collapse or expand the focused pane".to_string(),
            Action::SwitchPreset(preset) => format!("Switch to the {preset} layout"),
            Action::SelectPrevious => "Select previous item".to_string(),
            Action::SelectNext => "Select next item".to_string(),
            Action::OpenSelected => "Open selected item".to_string(),
            Action::ScrollTop => "Jump to top".to_string(),
            Action::ScrollBottom => "Jump to bottom".to_string(),
            Action::Filter => "Filter entries".to_string(),
            Action::Search => "Search entries".to_string(),
            Action::ShowDetails => "Show details".to_string(),
            Action::AnalyzeCapabilities => "Run capability analysis".to_string(),
            Action::ExpandItem => "Expand selected item".to_string(),
            Action::ResetMetrics => "Reset metrics".to_string(),
            Action::TogglePause => "Pause or resume the stream".to_string(),
            Action::Custom(name) => name.clone(),
        }
    }

    /// Actions the dashboard facade executes itself.
    pub fn is_global(&self) -> bool {
        matches!(
            self,
            Action::Quit
                | Action::FocusNext
                | Action::FocusPrevious
                | Action::ToggleHelp
                | Action::CloseHelp
                | Action::RefreshAll
                | Action::ToggleCollapse
                | Action::SwitchPreset(_)
        )
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}
