use super::*;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = load_settings_from(&dir.path().join("settings.json")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn ensure_writes_loadable_defaults_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    ensure_settings_file_at(&path).unwrap();
    assert!(path.exists());
    assert_eq!(load_settings_from(&path).unwrap(), Settings::default());

    std::fs::write(&path, r#"{"preset": "quick"}"#).unwrap();
    ensure_settings_file_at(&path).unwrap();
    let settings = load_settings_from(&path).unwrap();
    assert_eq!(settings.preset.as_deref(), Some("quick"));
}

#[test]
fn full_settings_parse() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{
            "preset": "monitoring",
            "debounce_ms": 100,
            "watch_root": "/srv/project",
            "keybindings": [
                {"key": "ctrl+q", "action": "quit"},
                {"key": "x", "action": "filter", "context": "logs"}
            ],
            "presets": [
                {"id": "solo", "shape": "single", "panes": ["logs"], "min_width": 20, "min_height": 5}
            ]
        }"#,
    )
    .unwrap();

    let settings = load_settings_from(&path).unwrap();
    assert_eq!(settings.debounce_ms, Some(100));
    assert_eq!(settings.keybindings.len(), 2);
    assert_eq!(settings.keybindings[1].context.as_deref(), Some("logs"));
    assert_eq!(settings.presets[0].id, "solo");
    assert_eq!(
        settings.watch_root.as_deref(),
        Some(std::path::Path::new("/srv/project"))
    );
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        load_settings_from(&path),
        Err(SettingsError::Parse { .. })
    ));
}
