//! Integration tests for Settings loading with an explicit config file.
//!
//! Layers (lowest to highest): defaults, global file, `--config` file, env vars.
//! These tests only use temp directories for the explicit layer.

use std::fs;

use tempfile::TempDir;

use cattree::application::ApplicationError;
use cattree::config::Settings;

#[test]
fn given_explicit_config_when_load_then_overrides_limits_and_snapshot() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("cattree.toml");
    fs::write(
        &config_path,
        r#"
snapshot_file = "/srv/cattree/forest.toml"

[limits]
name_max = 80
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&config_path)).expect("load settings");

    // Assert
    assert_eq!(
        settings.snapshot_file,
        std::path::PathBuf::from("/srv/cattree/forest.toml")
    );
    assert_eq!(settings.limits.name_max, 80);
    assert_eq!(settings.limits.code_max, 20, "unset key keeps its default");
}

#[test]
fn given_tilde_snapshot_path_when_load_then_expanded() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("cattree.toml");
    fs::write(&config_path, "snapshot_file = \"~/forest.toml\"\n").unwrap();

    let settings = Settings::load(Some(&config_path)).unwrap();

    let path = settings.snapshot_file.to_string_lossy().into_owned();
    assert!(!path.starts_with('~'), "should be expanded: {}", path);
    assert!(path.ends_with("forest.toml"));
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();

    let err = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }), "{err}");
}

#[test]
fn given_malformed_config_when_load_then_config_error_names_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("broken.toml");
    fs::write(&config_path, "[limits\nname_max = ").unwrap();

    let err = Settings::load(Some(&config_path)).unwrap_err();

    assert!(err.to_string().contains("broken.toml"), "{err}");
}

#[test]
fn given_zero_limit_in_file_when_load_then_rejected() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("cattree.toml");
    fs::write(&config_path, "[limits]\ncode_max = 0\n").unwrap();

    let err = Settings::load(Some(&config_path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}
