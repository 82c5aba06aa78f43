//! Unit tests for configuration and graceful degradation
//!
//! Covers:
//! - Metadata directory priority order (CLI → ENV → TOML → fallback)
//! - Missing or broken TOML files never abort resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate AMOC_METADATA_DIR are marked with #[serial].

use amoc_common::config::{
    MetadataDirResolver, TomlConfig, DEFAULT_METADATA_DIR, METADATA_DIR_ENV,
};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_fallback() {
    env::remove_var(METADATA_DIR_ENV);

    let temp_dir = TempDir::new().unwrap();
    let resolver = MetadataDirResolver::new()
        .with_config_file(temp_dir.path().join("missing.toml"));

    assert_eq!(resolver.resolve(), PathBuf::from(DEFAULT_METADATA_DIR));
}

#[test]
#[serial]
fn test_resolver_env_var() {
    env::set_var(METADATA_DIR_ENV, "/tmp/amoc-env-metadata");

    let temp_dir = TempDir::new().unwrap();
    let resolver = MetadataDirResolver::new()
        .with_config_file(temp_dir.path().join("missing.toml"));
    let resolved = resolver.resolve();

    env::remove_var(METADATA_DIR_ENV);
    assert_eq!(resolved, PathBuf::from("/tmp/amoc-env-metadata"));
}

#[test]
#[serial]
fn test_resolver_cli_beats_env() {
    env::set_var(METADATA_DIR_ENV, "/tmp/amoc-env-metadata");

    let resolver = MetadataDirResolver::new().with_cli_arg(Some(PathBuf::from("/tmp/amoc-cli")));
    let resolved = resolver.resolve();

    env::remove_var(METADATA_DIR_ENV);
    assert_eq!(resolved, PathBuf::from("/tmp/amoc-cli"));
}

#[test]
#[serial]
fn test_resolver_toml_file() {
    env::remove_var(METADATA_DIR_ENV);

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "metadata_dir = \"/srv/amoc/metadata\"\n").unwrap();

    let resolver = MetadataDirResolver::new().with_config_file(&config_path);
    assert_eq!(resolver.resolve(), PathBuf::from("/srv/amoc/metadata"));
}

#[test]
#[serial]
fn test_resolver_env_beats_toml() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "metadata_dir = \"/srv/amoc/metadata\"\n").unwrap();

    env::set_var(METADATA_DIR_ENV, "/tmp/amoc-env-metadata");
    let resolved = MetadataDirResolver::new()
        .with_config_file(&config_path)
        .resolve();
    env::remove_var(METADATA_DIR_ENV);

    assert_eq!(resolved, PathBuf::from("/tmp/amoc-env-metadata"));
}

#[test]
#[serial]
fn test_resolver_broken_toml_falls_through() {
    env::remove_var(METADATA_DIR_ENV);

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "metadata_dir = [unterminated").unwrap();

    let resolver = MetadataDirResolver::new().with_config_file(&config_path);
    assert_eq!(resolver.resolve(), PathBuf::from(DEFAULT_METADATA_DIR));
}

#[test]
fn test_toml_config_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[logging]\nlevel = \"debug\"\nlog_dir = \"logs\"\n",
    )
    .unwrap();

    let config = TomlConfig::load(&config_path).unwrap();
    assert!(config.metadata_dir.is_none());
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.log_dir, Some(PathBuf::from("logs")));
}
