use page_annotate::host::ModePolicy;
use page_annotate::keys::ActivationModifier;
use page_annotate::settings::{Settings, DEFAULT_SETTINGS_FILE, SETTINGS_ENV};
use serial_test::serial;
use tempfile::tempdir;

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let settings = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn saved_settings_load_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let path = path.to_str().unwrap();
    let settings = Settings {
        debug_logging: true,
        activation_modifier: ActivationModifier::Ctrl,
        mode_policy: ModePolicy::Independent,
        enable_toasts: false,
        ..Settings::default()
    };
    settings.save(path).unwrap();
    assert_eq!(Settings::load(path).unwrap(), settings);
}

#[test]
fn malformed_json_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(Settings::load(path.to_str().unwrap()).is_err());
}

#[test]
fn unreadable_path_is_an_error() {
    let dir = tempdir().unwrap();
    let err = Settings::load(dir.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("failed to read settings"));
}

#[test]
#[serial]
fn env_var_overrides_default_path() {
    std::env::set_var(SETTINGS_ENV, "/tmp/annotate.json");
    assert_eq!(Settings::default_path(), "/tmp/annotate.json");
    std::env::remove_var(SETTINGS_ENV);
    assert_eq!(Settings::default_path(), DEFAULT_SETTINGS_FILE);
}
