use super::*;

fn rule(key: &str, action: &str, context: Option<&str>) -> KeybindingRule {
    KeybindingRule {
        key: key.to_string(),
        action: action.to_string(),
        context: context.map(str::to_string),
    }
}

#[test]
fn global_binding_wins_over_pane_binding() {
    // bind `q` in the tasks pane; the global quit must still win
    let mut dispatcher =
        KeyboardDispatcher::with_overrides(&[rule("q", "filter", Some("tasks"))], 8);
    let dispatched = dispatcher.dispatch(Some(PaneKind::Tasks), "q").unwrap();
    assert_eq!(dispatched.action, Action::Quit);
    assert_eq!(dispatched.scope, BindingScope::Global);
}

#[test]
fn focus_cycle_keys_are_always_global() {
    let mut dispatcher =
        KeyboardDispatcher::with_overrides(&[rule("tab", "select_next", Some("tasks"))], 8);
    let next = dispatcher.dispatch(Some(PaneKind::Tasks), "tab").unwrap();
    assert_eq!(next.action, Action::FocusNext);
    let prev = dispatcher.dispatch(Some(PaneKind::Tasks), "S-tab").unwrap();
    assert_eq!(prev.action, Action::FocusPrevious);
}

#[test]
fn pane_binding_used_when_no_global() {
    let mut dispatcher = KeyboardDispatcher::new();
    let dispatched = dispatcher.dispatch(Some(PaneKind::Tasks), "j").unwrap();
    assert_eq!(dispatched.action, Action::SelectNext);
    assert_eq!(dispatched.scope, BindingScope::Pane(PaneKind::Tasks));

    assert!(dispatcher.dispatch(None, "j").is_none());
    assert!(dispatcher.dispatch(Some(PaneKind::Metrics), "j").is_none());
}

#[test]
fn parse_key_matches_core() {
    let dispatcher = KeyboardDispatcher::new();
    assert_eq!(dispatcher.parse_key("c", KeyModifiers::ctrl()), "C-c");
    assert_eq!(dispatcher.parse_key("tab", KeyModifiers::shift()), "S-tab");
    assert_eq!(dispatcher.parse_key("q", KeyModifiers::NONE), "q");
}

#[test]
fn handle_key_counts_and_records() {
    let mut dispatcher = KeyboardDispatcher::new();
    assert!(dispatcher
        .handle_key(&KeyInput::ctrl("c"), None)
        .is_some_and(|d| d.action == Action::Quit));
    assert!(dispatcher
        .handle_key(&KeyInput::simple("x"), None)
        .is_none());

    let metrics = dispatcher.metrics();
    assert_eq!(metrics.key_presses, 2);
    assert_eq!(metrics.commands_dispatched, 1);

    let history = dispatcher.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].combo, "C-c");
    assert_eq!(history[0].action, Some(Action::Quit));
    assert_eq!(history[1].combo, "x");
    assert_eq!(history[1].action, None);

    dispatcher.reset_metrics();
    assert_eq!(dispatcher.metrics(), KeyboardMetrics::default());
    assert_eq!(dispatcher.history().len(), 2);
}

#[test]
fn history_never_exceeds_capacity() {
    let mut dispatcher = KeyboardDispatcher::with_overrides(&[], 3);
    for key in ["a", "b", "c", "d", "e"] {
        dispatcher.handle_key(&KeyInput::simple(key), None);
    }
    let combos: Vec<String> = dispatcher.history().into_iter().map(|r| r.combo).collect();
    assert_eq!(combos, vec!["c", "d", "e"]);
    assert_eq!(dispatcher.history_capacity(), 3);
}

#[test]
fn help_toggles() {
    let mut dispatcher = KeyboardDispatcher::new();
    assert!(!dispatcher.help_visible());
    assert!(dispatcher.toggle_help());
    assert!(dispatcher.help_visible());
    assert!(!dispatcher.toggle_help());
    dispatcher.toggle_help();
    dispatcher.close_help();
    assert!(!dispatcher.help_visible());
}

#[test]
fn unknown_help_context_falls_back_to_general() {
    let dispatcher = KeyboardDispatcher::new();
    let unknown = dispatcher.contextual_help("weather");
    let general = dispatcher.contextual_help("general");
    assert_eq!(unknown, general);
    assert_eq!(general.context, "general");
    assert_eq!(general.sections.len(), 3);
}

#[test]
fn pane_help_is_generated_from_bindings() {
    let dispatcher = KeyboardDispatcher::new();
    let help = dispatcher.contextual_help("tasks");
    assert_eq!(help.context, "tasks");
    let items = &help.sections[0].items;
    let select_next = items
        .iter()
        .find(|item| item.description == Action::SelectNext.description())
        .unwrap();
    assert_eq!(select_next.keys, "down, j");
}

#[test]
fn navigation_help_lists_focus_keys() {
    let dispatcher = KeyboardDispatcher::new();
    let help = dispatcher.contextual_help("navigation");
    let keys: Vec<&str> = help.sections[0]
        .items
        .iter()
        .map(|item| item.keys.as_str())
        .collect();
    assert_eq!(keys, vec!["tab", "S-tab"]);
}
