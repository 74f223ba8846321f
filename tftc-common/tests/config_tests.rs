//! Tests for layered configuration resolution and TOML loading
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate TFTC_* variables are marked with #[serial].

use serde::Deserialize;
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tftc_common::config::{
    load_toml_config, resolve_config_path, resolve_database_path, resolve_string, ConfigSource,
};

#[derive(Debug, Default, Deserialize, PartialEq)]
struct SampleConfig {
    api_key: Option<String>,
    #[serde(default)]
    worker_count: usize,
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    env::set_var("TFTC_TEST_API_KEY", "env-key");

    let resolved = resolve_string(None, "TFTC_TEST_API_KEY", Some("toml-key"));
    assert_eq!(
        resolved,
        Some(("env-key".to_string(), ConfigSource::Environment))
    );

    env::remove_var("TFTC_TEST_API_KEY");
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    env::set_var("TFTC_TEST_API_KEY", "env-key");

    let resolved = resolve_string(Some("cli-key"), "TFTC_TEST_API_KEY", Some("toml-key"));
    assert_eq!(
        resolved,
        Some(("cli-key".to_string(), ConfigSource::CommandLine))
    );

    env::remove_var("TFTC_TEST_API_KEY");
}

#[test]
#[serial]
fn test_blank_env_does_not_shadow_toml() {
    env::set_var("TFTC_TEST_API_KEY", "   ");

    let resolved = resolve_string(None, "TFTC_TEST_API_KEY", Some("toml-key"));
    assert_eq!(
        resolved,
        Some(("toml-key".to_string(), ConfigSource::TomlFile))
    );

    env::remove_var("TFTC_TEST_API_KEY");
}

#[test]
#[serial]
fn test_no_source_yields_none() {
    env::remove_var("TFTC_TEST_API_KEY");
    assert_eq!(resolve_string(None, "TFTC_TEST_API_KEY", None), None);
}

#[test]
#[serial]
fn test_database_path_priority() {
    env::set_var("TFTC_TEST_DATABASE", "/tmp/from-env.db");

    let (path, source) = resolve_database_path(
        Some(Path::new("/tmp/from-cli.db")),
        "TFTC_TEST_DATABASE",
        Some(Path::new("/tmp/from-toml.db")),
    );
    assert_eq!(path, PathBuf::from("/tmp/from-cli.db"));
    assert_eq!(source, ConfigSource::CommandLine);

    let (path, source) = resolve_database_path(
        None,
        "TFTC_TEST_DATABASE",
        Some(Path::new("/tmp/from-toml.db")),
    );
    assert_eq!(path, PathBuf::from("/tmp/from-env.db"));
    assert_eq!(source, ConfigSource::Environment);

    env::remove_var("TFTC_TEST_DATABASE");

    let (path, source) = resolve_database_path(
        None,
        "TFTC_TEST_DATABASE",
        Some(Path::new("/tmp/from-toml.db")),
    );
    assert_eq!(path, PathBuf::from("/tmp/from-toml.db"));
    assert_eq!(source, ConfigSource::TomlFile);

    let (path, source) = resolve_database_path(None, "TFTC_TEST_DATABASE", None);
    assert!(path.ends_with("tftc.db"));
    assert_eq!(source, ConfigSource::Default);
}

#[test]
#[serial]
fn test_config_path_from_env() {
    env::set_var("TFTC_TEST_CONFIG", "/tmp/tftc-test-config.toml");

    let path = resolve_config_path(None, "TFTC_TEST_CONFIG");
    assert_eq!(path, Some(PathBuf::from("/tmp/tftc-test-config.toml")));

    env::remove_var("TFTC_TEST_CONFIG");
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("absent.toml");

    let config: SampleConfig = load_toml_config(Some(missing.as_path())).unwrap();
    assert_eq!(config, SampleConfig::default());
}

#[test]
fn test_toml_file_is_parsed() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "api_key = \"RGAPI-file\"\nworker_count = 8\n").unwrap();

    let config: SampleConfig = load_toml_config(Some(path.as_path())).unwrap();
    assert_eq!(config.api_key.as_deref(), Some("RGAPI-file"));
    assert_eq!(config.worker_count, 8);
}

#[test]
fn test_malformed_toml_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "worker_count = [not toml").unwrap();

    let result: tftc_common::Result<SampleConfig> = load_toml_config(Some(path.as_path()));
    match result {
        Err(tftc_common::Error::Config(msg)) => assert!(msg.contains("Parse")),
        other => panic!("expected Config error, got {:?}", other),
    }
}
