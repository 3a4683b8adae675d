//! Integration tests for configuration loading

use super::test_utils::lock_env;
use frame_relay::config::{ConfigLoader, RelayConfig};
use frame_relay::ReplyOriginPolicy;
use tempfile::TempDir;

#[test]
fn test_load_from_toml_file() {
    let _env = lock_env();
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("relay.toml");

    std::fs::write(
        &config_file,
        r#"
[relay]
reply_origin = "wildcard"

[simulation]
top_location = "https://portal.example/"
navigate_url = "https://idp.example/authorize"

[logging]
level = "debug"
format = "json"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert_eq!(config.relay.reply_origin, ReplyOriginPolicy::Wildcard);
    assert_eq!(config.simulation.top_location, "https://portal.example/");
    assert_eq!(
        config.simulation.navigate_url,
        "https://idp.example/authorize"
    );
    // unspecified fields keep their defaults
    assert_eq!(
        config.simulation.iframe_location,
        RelayConfig::default().simulation.iframe_location
    );
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
}

#[test]
fn test_missing_file_is_an_error_only_when_required() {
    let _env = lock_env();
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("absent.toml");

    assert!(ConfigLoader::load_from_file(&missing).is_err());
    let config = ConfigLoader::load(Some(missing.as_path())).unwrap();
    assert_eq!(config, RelayConfig::default());
}

#[test]
fn test_invalid_values_are_rejected() {
    let _env = lock_env();
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("relay.toml");

    std::fs::write(&config_file, "[simulation]\nnavigate_url = \"not a url\"\n")
        .unwrap();
    let err = ConfigLoader::load_from_file(&config_file).unwrap_err();
    assert!(err.to_string().contains("navigate_url"));

    std::fs::write(&config_file, "[relay]\nreply_origin = \"sometimes\"\n")
        .unwrap();
    assert!(ConfigLoader::load_from_file(&config_file).is_err());
}

#[test]
fn test_environment_overrides_file() {
    let _env = lock_env();
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("relay.toml");
    std::fs::write(&config_file, "[relay]\nreply_origin = \"echo\"\n")
        .unwrap();

    std::env::set_var("FRAME_RELAY__RELAY__REPLY_ORIGIN", "wildcard");
    let result = ConfigLoader::load_from_file(&config_file);
    std::env::remove_var("FRAME_RELAY__RELAY__REPLY_ORIGIN");

    assert_eq!(
        result.unwrap().relay.reply_origin,
        ReplyOriginPolicy::Wildcard
    );
}
