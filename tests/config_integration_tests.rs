//! Integration tests for config loading from fixture files.

use std::fs;
use std::path::Path;

use thumb_rename::config::{CliOptions, Config, ThumbRenameConfig};

/// Read the sample config file content.
fn read_sample_config() -> String {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    fs::read_to_string(config_path).expect("Failed to read sample config file")
}

#[test]
fn sample_config_is_valid_toml() {
    let config_content = read_sample_config();
    let result: Result<toml::Value, _> = toml::from_str(&config_content);
    assert!(result.is_ok(), "Sample config should be valid TOML: {:?}", result.err());
}

#[test]
fn sample_config_has_thumb_rename_section() {
    let value: toml::Value = toml::from_str(&read_sample_config()).expect("should parse");
    let section = value.get("thumb_rename").expect("should have thumb_rename section");

    for key in [
        "dryrun",
        "overwrite",
        "verbose",
        "ignore",
        "image_extensions",
        "video_extensions",
    ] {
        assert!(section.get(key).is_some(), "thumb_rename should have '{key}'");
    }
}

#[test]
fn sample_config_parses_into_user_config() {
    let config = ThumbRenameConfig::from_toml_str(&read_sample_config()).expect("should parse");
    assert!(!config.dryrun);
    assert_eq!(config.ignore, vec!["Extras", "Featurettes"]);
    assert_eq!(config.image_extensions.len(), 5);
    assert_eq!(config.video_extensions.len(), 5);
}

#[test]
fn sample_config_merges_with_cli_options() {
    let user_config = ThumbRenameConfig::from_toml_str(&read_sample_config()).expect("should parse");
    let options = CliOptions {
        dryrun: true,
        ..CliOptions::default()
    };
    let config = Config::merge(options, user_config);

    assert!(config.dryrun);
    assert!(config.rules.is_ignored("Extras"));
    assert!(config.rules.is_ignored("@eaDir"));
    assert!(config.rules.is_image("cover_s01e01.webp"));
    assert!(config.rules.is_video("Show.S01E01.mkv"));
}
