use ridgeline_core::WorkingMode;
use ridgeline_settings::{Config, SettingsError};
use std::path::PathBuf;

#[test]
fn test_round_trip_toml_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.display.show_labels = false;
    config.marking.working_mode = WorkingMode::Ear;
    config.tools.sourceafis_path = Some(PathBuf::from("/opt/sourceafis/cli"));

    for name in ["nested/config.toml", "config.json"] {
        let path = dir.path().join(name);
        config.save_to_file(&path).unwrap();
        assert_eq!(Config::load_from_file(&path).unwrap(), config);
    }
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[display]\nblink_flashes = 5\n").unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.display.blink_flashes, 5);
    assert_eq!(config.display.blink_period_ms, 150);
    assert_eq!(config.marking, Default::default());
    assert_eq!(config.tools.timeout_ms, 30_000);
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "tools": { "timeout_ms": 0 } }"#).unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::InvalidSetting { .. })
    ));

    std::fs::write(&path, "{ nope").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::JsonError(_))
    ));
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}
