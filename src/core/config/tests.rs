use super::data::{path_display, Config};
use super::defaults::{ConfigKey, DEFAULT_BASE_URL, DEFAULT_MODEL};
use super::io::ConfigError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.set_value(ConfigKey::Model, "gemini-2.5-pro".to_string());
    config.set_value(ConfigKey::Theme, "light".to_string());
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");

    let mut loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded.model.as_deref(), Some("gemini-2.5-pro"));
    assert_eq!(loaded.theme.as_deref(), Some("light"));

    loaded.unset_value(ConfigKey::Model);
    loaded
        .save_to_path(&config_path)
        .expect("Failed to save config");

    let reloaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(reloaded.model, None);
    assert_eq!(reloaded.theme.as_deref(), Some("light"));
}

#[test]
fn parse_errors_name_the_offending_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "model = [unterminated").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("should fail");
    let config_err = err
        .downcast_ref::<ConfigError>()
        .expect("config error type");
    assert!(matches!(config_err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn multiline_overrides_survive_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    let config = Config {
        system_instruction: Some("Línea 1\nLínea 2 \"citada\"".to_string()),
        ..Default::default()
    };
    config.save_to_path(&config_path).expect("save");

    let loaded = Config::load_from_path(&config_path).expect("load");
    assert_eq!(loaded, config);
}

#[test]
fn resolution_prefers_cli_then_file_then_default() {
    let mut config = Config::default();
    assert_eq!(config.resolve_model(None), DEFAULT_MODEL);
    assert_eq!(config.resolve_base_url(), DEFAULT_BASE_URL);

    config.model = Some("from-file".to_string());
    config.base_url = Some("  ".to_string());
    assert_eq!(config.resolve_model(None), "from-file");
    assert_eq!(config.resolve_model(Some("")), "from-file");
    assert_eq!(config.resolve_model(Some("from-cli")), "from-cli");
    assert_eq!(config.resolve_base_url(), DEFAULT_BASE_URL);
}

#[test]
fn config_keys_parse_case_insensitively() {
    assert_eq!("model".parse::<ConfigKey>(), Ok(ConfigKey::Model));
    assert_eq!("BASE-URL".parse::<ConfigKey>(), Ok(ConfigKey::BaseUrl));
    let err = "colour".parse::<ConfigKey>().expect_err("unknown key");
    assert!(err.contains("model, base-url, theme"));
}

#[cfg(unix)]
#[test]
fn path_display_leaves_paths_outside_home_untouched() {
    assert_eq!(path_display("/definitely/not/home"), "/definitely/not/home");
}
