use super::*;
use crate::core::DashboardError;
use crate::kernel::panes::PanePhase;
use crate::kernel::services::ports::KeybindingRule;
use serde_json::json;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn dashboard(rt: &tokio::runtime::Runtime, width: u16, height: u16) -> Dashboard {
    Dashboard::from_settings(
        rt.handle().clone(),
        &Settings::default(),
        TerminalDimensions::new(width, height),
    )
    .unwrap()
}

fn focused_states(dashboard: &Dashboard) -> Vec<String> {
    dashboard
        .registry()
        .states()
        .into_iter()
        .filter(|state| state.focused)
        .map(|state| state.id.to_string())
        .collect()
}

#[test]
fn registers_panes_of_configured_preset() {
    let rt = runtime();
    let dashboard = dashboard(&rt, 120, 40);
    assert_eq!(dashboard.layout_engine().active_preset().id, "development");
    let ids: Vec<String> = dashboard
        .registry()
        .ids()
        .into_iter()
        .map(|id| id.to_string())
        .collect();
    assert_eq!(ids, vec!["progress", "tasks", "capabilities"]);
    assert_eq!(focused_states(&dashboard), vec!["progress"]);

    rt.block_on(async {
        let phase = dashboard
            .registry()
            .wait_ready(&PaneId::new("tasks"))
            .await
            .unwrap();
        assert_eq!(phase, PanePhase::Ready);
    });
}

#[test]
fn unknown_configured_preset_is_an_error() {
    let rt = runtime();
    let settings = Settings {
        preset: Some("galaxy".to_string()),
        ..Settings::default()
    };
    let result = Dashboard::from_settings(
        rt.handle().clone(),
        &settings,
        TerminalDimensions::new(120, 40),
    );
    assert!(matches!(result, Err(DashboardError::InvalidPreset(_))));
}

#[test]
fn tab_moves_focus_in_layout_and_registry() {
    let rt = runtime();
    let mut dashboard = dashboard(&rt, 120, 40);

    let outcome = dashboard.handle_key(&KeyInput::simple("tab"));
    assert_eq!(outcome, KeyOutcome::Handled(Action::FocusNext));
    assert_eq!(dashboard.focused_pane(), Some(&PaneId::new("tasks")));
    assert_eq!(focused_states(&dashboard), vec!["tasks"]);

    dashboard.handle_key(&KeyInput::shift("tab"));
    dashboard.handle_key(&KeyInput::shift("tab"));
    assert_eq!(dashboard.focused_pane(), Some(&PaneId::new("capabilities")));
    assert_eq!(focused_states(&dashboard), vec!["capabilities"]);
}

#[test]
fn pane_actions_are_forwarded_to_focused_pane() {
    let rt = runtime();
    let mut dashboard = dashboard(&rt, 120, 40);
    dashboard.handle_key(&KeyInput::simple("tab"));

    let outcome = dashboard.handle_key(&KeyInput::simple("j"));
    assert_eq!(
        outcome,
        KeyOutcome::Forwarded {
            action: Action::SelectNext,
            pane: PaneId::new("tasks"),
        }
    );
    assert_eq!(dashboard.handle_key(&KeyInput::simple("x")), KeyOutcome::Ignored);
}

#[test]
fn quit_sets_flag() {
    let rt = runtime();
    let mut dashboard = dashboard(&rt, 120, 40);
    assert!(!dashboard.should_quit());
    assert_eq!(dashboard.handle_key(&KeyInput::ctrl("c")), KeyOutcome::Quit);
    assert!(dashboard.should_quit());
}

#[test]
fn preset_key_switches_and_registers_new_panes() {
    let rt = runtime();
    let mut dashboard = dashboard(&rt, 120, 40);

    dashboard.handle_key(&KeyInput::simple("3"));
    assert_eq!(dashboard.layout_engine().active_preset().id, "monitoring");
    assert!(dashboard.registry().contains(&PaneId::new("metrics")));
    assert!(dashboard.registry().contains(&PaneId::new("logs")));

    let snapshot = dashboard.snapshot();
    let shown: Vec<String> = snapshot.panes.iter().map(|s| s.id.to_string()).collect();
    assert_eq!(shown, vec!["progress", "tasks", "metrics", "logs"]);
}

#[test]
fn resize_downgrades_when_preset_no_longer_fits() {
    let rt = runtime();
    let mut dashboard = dashboard(&rt, 120, 40);
    dashboard.set_preset("monitoring").unwrap();

    assert_eq!(dashboard.resize(110, 35), None);
    let change = dashboard.resize(90, 26).unwrap();
    assert_eq!(change.applied, "development");
    assert!(change.downgraded);
    assert_eq!(dashboard.snapshot().layout.preset, "development");
}

#[test]
fn help_snapshot_follows_focused_pane() {
    let rt = runtime();
    let mut dashboard = dashboard(&rt, 120, 40);
    dashboard.handle_key(&KeyInput::simple("tab"));

    assert!(dashboard.snapshot().help.is_none());
    dashboard.handle_key(&KeyInput::simple("?"));
    let snapshot = dashboard.snapshot();
    assert!(snapshot.help_visible);
    assert_eq!(snapshot.help.unwrap().context, "tasks");

    dashboard.handle_key(&KeyInput::simple("escape"));
    assert!(!dashboard.snapshot().help_visible);
}

#[test]
fn space_toggles_collapse_of_focused_pane() {
    let rt = runtime();
    let mut dashboard = dashboard(&rt, 120, 40);
    dashboard.handle_key(&KeyInput::simple("space"));
    let state = dashboard.registry().get(&PaneId::new("progress")).unwrap();
    assert!(state.collapsed);
}

#[test]
fn change_events_reach_panes_on_refresh() {
    let rt = runtime();
    let mut dashboard = dashboard(&rt, 120, 40);
    let event = dashboard.on_change(ChangeKind::Modified, "docs/current_phase.json", None);
    assert_eq!(event.targets, vec![PaneId::new("progress")]);

    dashboard.handle_key(&KeyInput::simple("r"));
    rt.block_on(async { tokio::time::sleep(std::time::Duration::from_millis(20)).await });

    let state = dashboard.registry().get(&PaneId::new("progress")).unwrap();
    assert_eq!(state.data["path"], json!("docs/current_phase.json"));
    assert_eq!(state.data["priority"], json!("high"));
    assert_eq!(dashboard.metrics().coordinator.updates_total, 1);
}

#[test]
fn settings_overrides_reach_keyboard() {
    let rt = runtime();
    let settings = Settings {
        keybindings: vec![KeybindingRule {
            key: "ctrl+q".to_string(),
            action: "quit".to_string(),
            context: None,
        }],
        key_history_capacity: Some(2),
        ..Settings::default()
    };
    let mut dashboard =
        Dashboard::from_settings(rt.handle().clone(), &settings, TerminalDimensions::new(80, 24))
            .unwrap();
    assert_eq!(dashboard.handle_key(&KeyInput::ctrl("q")), KeyOutcome::Quit);
    assert_eq!(dashboard.keyboard().history_capacity(), 2);
}

#[test]
fn snapshot_serializes_to_json() {
    let rt = runtime();
    let mut dashboard = dashboard(&rt, 120, 40);
    let value = serde_json::to_value(dashboard.snapshot()).unwrap();
    assert_eq!(value["layout"]["preset"], json!("development"));
    assert_eq!(value["layout"]["shape"], json!("triple"));
    assert_eq!(value["panes"].as_array().map(Vec::len), Some(3));
}
