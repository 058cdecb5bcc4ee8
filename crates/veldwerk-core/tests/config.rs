use std::path::PathBuf;

use veldwerk_core::config::PipelineConfig;

#[test]
fn defaults_target_the_dutch_survey_setup() {
    let config = PipelineConfig::default();
    assert_eq!(config.timezone, chrono_tz::Europe::Amsterdam);
    assert_eq!(config.remove_patterns, vec!["test", "ongeldig", "tim"]);
    assert_eq!(config.output_dir, PathBuf::from("Data_Output"));
    assert_eq!(config.geocode.min_delay_ms, 1_100);
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("veldwerk.toml");
    std::fs::write(
        &path,
        r#"
timezone = "Europe/Brussels"
remove_patterns = ["proef"]

[geocode]
user_agent = "veldwerk_test"
"#,
    )
    .expect("write failed");

    let config = PipelineConfig::load(&path).expect("load failed");
    assert_eq!(config.timezone, chrono_tz::Europe::Brussels);
    assert_eq!(config.remove_patterns, vec!["proef"]);
    assert_eq!(config.geocode.user_agent, "veldwerk_test");
    // Untouched sections keep their defaults.
    assert_eq!(config.output_dir, PathBuf::from("Data_Output"));
    assert_eq!(config.geocode.min_delay_ms, 1_100);
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("veldwerk.toml");
    std::fs::write(&path, "timezone = \"Europe/Amsterdam\"\ntypo_key = 1\n").expect("write failed");
    assert!(PipelineConfig::load(&path).is_err());
}

#[test]
fn invalid_timezone_is_a_config_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("veldwerk.toml");
    std::fs::write(&path, "timezone = \"Europe/Nowhere\"\n").expect("write failed");
    assert!(PipelineConfig::load(&path).is_err());
}
