use super::*;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_pasta_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("PASTA_DATA_DIR");
        env::remove_var("PASTA_MANIFEST");
        env::remove_var("PASTA_SCORES");
        env::remove_var("PASTA_PATCH_DIR");
        env::remove_var("PASTA_ASK_THRESHOLD");
        env::remove_var("PASTA_ACCEPT_THRESHOLD");
        env::remove_var("PASTA_VERSION_MIN");
        env::remove_var("PASTA_VERSION_MAX");
        env::remove_var("PASTA_WORKERS");
        env::remove_var("PASTA_CATALOG_CAPACITY");
        env::remove_var("PASTA_SCORE_CACHE_CAPACITY");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.data_dir, PathBuf::from("./.pasta"));
    assert_eq!(config.manifest_path, PathBuf::from("./patch-stacks.json"));
    assert!(config.scores_path.is_none());
    assert!(config.patch_dir.is_none());
    assert_eq!(config.ask_threshold, 350.0);
    assert_eq!(config.accept_threshold, 400.0);
    assert!(config.workers >= 1);
    assert_eq!(config.catalog_capacity, 10_000);
    assert_eq!(config.score_cache_capacity, 1_000_000);
    assert_eq!(config.version_range(), VersionRange::unbounded());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_pasta_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.data_dir, PathBuf::from("./.pasta"));
    assert_eq!(config.ask_threshold, 350.0);
    assert!(config.version_min.is_none());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_pasta_env();

    let config = with_env_vars(
        &[
            ("PASTA_DATA_DIR", "/tmp/pasta-data"),
            ("PASTA_SCORES", " /tmp/scores.txt "),
            ("PASTA_ASK_THRESHOLD", "300.5"),
            ("PASTA_ACCEPT_THRESHOLD", "420"),
            ("PASTA_VERSION_MIN", "v3.0"),
            ("PASTA_VERSION_MAX", "v3.4-rt1"),
            ("PASTA_WORKERS", "3"),
            ("PASTA_CATALOG_CAPACITY", "50"),
            ("PASTA_SCORE_CACHE_CAPACITY", "2000"),
        ],
        Config::from_env,
    )
    .expect("should parse overrides");

    assert_eq!(config.data_dir, PathBuf::from("/tmp/pasta-data"));
    assert_eq!(config.scores_path, Some(PathBuf::from("/tmp/scores.txt")));
    assert_eq!(config.ask_threshold, 300.5);
    assert_eq!(config.accept_threshold, 420.0);
    assert_eq!(config.workers, 3);
    assert_eq!(config.catalog_capacity, 50);
    assert_eq!(config.score_cache_capacity, 2000);

    let range = config.version_range();
    assert!(range.contains(&Version::parse("3.2").unwrap()));
    assert!(!range.contains(&Version::parse("3.4.1").unwrap()));
}

#[test]
#[serial]
fn test_from_env_empty_optional_is_none() {
    clear_pasta_env();

    let config = with_env_vars(
        &[("PASTA_SCORES", "  "), ("PASTA_VERSION_MIN", "")],
        Config::from_env,
    )
    .unwrap();
    assert!(config.scores_path.is_none());
    assert!(config.version_min.is_none());
}

#[test]
#[serial]
fn test_from_env_bad_numbers_are_errors() {
    clear_pasta_env();

    let result = with_env_vars(&[("PASTA_ASK_THRESHOLD", "high")], Config::from_env);
    assert!(matches!(
        result,
        Err(ConfigError::ThresholdParseError { name: "PASTA_ASK_THRESHOLD", .. })
    ));

    let result = with_env_vars(&[("PASTA_WORKERS", "-2")], Config::from_env);
    assert!(matches!(
        result,
        Err(ConfigError::IntegerParseError { name: "PASTA_WORKERS", .. })
    ));

    let result = with_env_vars(&[("PASTA_VERSION_MAX", "latest")], Config::from_env);
    assert!(matches!(
        result,
        Err(ConfigError::InvalidVersion { name: "PASTA_VERSION_MAX", .. })
    ));
}

#[test]
fn test_validate_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        data_dir: dir.path().join("data"),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_thresholds() {
    let config = Config {
        ask_threshold: 410.0,
        accept_threshold: 400.0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThresholds { .. })
    ));

    let config = Config {
        ask_threshold: f64::NAN,
        ..Default::default()
    };
    assert!(config.thresholds().is_err());
}

#[test]
fn test_validate_version_range_and_workers() {
    let config = Config {
        version_min: Some(Version::parse("v4.0").unwrap()),
        version_max: Some(Version::parse("v3.9").unwrap()),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::EmptyVersionRange { .. })
    ));

    let config = Config {
        workers: 0,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::NoWorkers)));
}

#[test]
fn test_validate_paths() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("file");
    fs::write(&file, "x").unwrap();

    let config = Config {
        data_dir: file.clone(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));

    let config = Config {
        data_dir: dir.path().to_path_buf(),
        scores_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::NotAFile { .. })));

    let config = Config {
        data_dir: dir.path().to_path_buf(),
        patch_dir: Some(dir.path().join("missing")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_for_run_requires_inputs() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("stacks.json");
    fs::write(&manifest, "{}").unwrap();

    let config = Config {
        data_dir: dir.path().join("data"),
        manifest_path: manifest.clone(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate_for_run(),
        Err(ConfigError::MissingSetting { name: "PASTA_SCORES" })
    ));

    let config = Config {
        data_dir: dir.path().join("data"),
        manifest_path: dir.path().join("absent.json"),
        ..Default::default()
    };
    assert!(matches!(
        config.validate_for_run(),
        Err(ConfigError::PathNotFound { .. })
    ));
}
