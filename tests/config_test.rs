//! Tests for the shipped config.toml

use std::path::Path;

use beamfold::config::Config;

#[test]
fn test_config_file_exists() {
    let config_path = Path::new("config.toml");
    assert!(
        config_path.exists(),
        "config.toml should exist in project root"
    );
}

#[test]
fn test_config_toml_loads() {
    let config = Config::from_file(Path::new("config.toml")).expect("config.toml should parse");
    assert!(config.validate().is_ok());

    let defaults = Config::default();
    assert_eq!(config.folds.count, defaults.folds.count);
    assert_eq!(config.paths.input_name, defaults.paths.input_name);
    assert_eq!(config.folds.train_ratio, 0.7);
    assert_eq!(config.folds.test_ratio, 0.2);
}

#[test]
fn test_config_toml_sections() {
    let content =
        std::fs::read_to_string("config.toml").expect("Should be able to read config.toml");

    for section in ["[paths]", "[folds]", "[logging]"] {
        assert!(
            content.contains(section),
            "config.toml should have {section} section"
        );
    }
}

#[test]
fn test_missing_config_file() {
    assert!(Config::from_file(Path::new("does-not-exist.toml")).is_err());
}
