//! Configuration defaults, validation and environment overrides

use std::path::PathBuf;

use kodi_cutter_utils::config::AppConfig;
use kodi_cutter_utils::locator::DatabaseLocator;
use kodi_cutter_utils::paths::SpecialPaths;
use kodi_cutter_utils::CutterError;

#[test]
fn test_default_database_config() {
    let config = AppConfig::default();

    assert_eq!(config.database.directory, "");
    assert_eq!(config.database.name_prefix, "MyVideos");
    assert_eq!(config.database.extension, ".db");
}

#[test]
fn test_default_backend_config() {
    let config = AppConfig::default();

    assert_eq!(config.backend.host, "localhost");
    assert_eq!(config.backend.http_port, 9981);
    assert_eq!(config.backend.finished_limit, 999_999);
    assert!(!config.backend.use_https);
    assert!(!config.backend.send_credentials);
    assert_eq!(config.backend.timeout_secs, None);
}

#[test]
fn test_default_logging_config() {
    let config = AppConfig::default();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file_path, None);
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_config_validation_success() {
    assert!(AppConfig::default().validate().is_ok());
}

#[test]
fn test_config_validation_empty_prefix() {
    let mut config = AppConfig::default();
    config.database.name_prefix = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_zero_limit() {
    let mut config = AppConfig::default();
    config.backend.finished_limit = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_zero_timeout() {
    let mut config = AppConfig::default();
    config.backend.timeout_secs = Some(0);
    assert!(config.validate().is_err());

    config.backend.timeout_secs = Some(30);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_invalid_log_level() {
    let mut config = AppConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_invalid_log_format() {
    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    match config.validate() {
        Err(CutterError::InvalidConfig(reason)) => assert!(reason.contains("xml")),
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn test_explicit_database_directory_wins() {
    let mut config = AppConfig::default();
    config.host.userdata_dir = "/kodi/userdata".to_string();
    config.database.directory = "/mnt/db".to_string();
    assert_eq!(config.database_dir(), PathBuf::from("/mnt/db"));
}

#[test]
fn test_database_dir_agrees_with_special_paths() {
    let mut config = AppConfig::default();
    config.host.home_dir = "/kodi".to_string();
    config.host.userdata_dir = "/kodi/userdata".to_string();

    let special = SpecialPaths::from_config(&config.host);
    assert_eq!(config.database_dir(), special.database_dir());

    let locator = DatabaseLocator::from_config(config.database_dir(), &config.database);
    assert_eq!(locator.directory(), special.database_dir().as_path());
}

#[test]
fn test_load_applies_environment_overrides() {
    std::env::set_var("KODI_CUTTER__BACKEND__HOST", "tvh.example");
    std::env::set_var("KODI_CUTTER__BACKEND__HTTP_PORT", "9982");
    std::env::set_var("KODI_CUTTER__HOST__ENCODING", "");

    let config = AppConfig::load().expect("Failed to load configuration");

    std::env::remove_var("KODI_CUTTER__BACKEND__HOST");
    std::env::remove_var("KODI_CUTTER__BACKEND__HTTP_PORT");
    std::env::remove_var("KODI_CUTTER__HOST__ENCODING");

    assert_eq!(config.backend.host, "tvh.example");
    assert_eq!(config.backend.http_port, 9982);
    assert_eq!(config.database.name_prefix, "MyVideos");
    // An empty encoding is detected at load time
    assert!(!config.host.encoding.is_empty());
}
