//! smellscope.toml 통합 설정 테스트
//!
//! - smellscope.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 잘못된 형식 에러 테스트

use std::path::PathBuf;

use smellscope_core::config::{FailurePolicy, SmellscopeConfig};
use smellscope_core::error::{ConfigError, SmellError};

// =============================================================================
// smellscope.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../smellscope.toml.example");
    let config = SmellscopeConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(config.paths.model, PathBuf::from("ST.json"));
    assert_eq!(config.paths.detectors, PathBuf::from("SmellsConfig.json"));
    assert_eq!(config.paths.cache, PathBuf::from(".smellscope/cache.json"));
    assert_eq!(config.runtime.failure_policy, FailurePolicy::Abort);
    assert_eq!(config.runtime.detector_timeout_secs, 0);
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../smellscope.toml.example");
    let config = SmellscopeConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

// =============================================================================
// 부분 설정 테스트
// =============================================================================

#[test]
fn partial_config_keeps_other_defaults() {
    let toml = r#"
[paths]
model = "build/ST.json"
"#;
    let config = SmellscopeConfig::parse(toml).expect("should parse");
    assert_eq!(config.paths.model, PathBuf::from("build/ST.json"));
    assert_eq!(config.paths.detectors, PathBuf::from("SmellsConfig.json"));
    assert_eq!(config.general.log_level, "info");
}

#[test]
fn unknown_failure_policy_fails_to_parse() {
    let toml = r#"
[runtime]
failure_policy = "retry"
"#;
    let err = SmellscopeConfig::parse(toml).unwrap_err();
    assert!(matches!(
        err,
        SmellError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[tokio::test]
async fn from_file_rejects_invalid_log_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smellscope.toml");
    tokio::fs::write(&path, "[general]\nlog_format = \"xml\"\n")
        .await
        .unwrap();

    let err = SmellscopeConfig::from_file(&path).await.unwrap_err();
    assert!(matches!(
        err,
        SmellError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "general.log_format"
    ));
}

#[tokio::test]
async fn from_file_missing_is_file_not_found() {
    let err = SmellscopeConfig::from_file("/nonexistent/smellscope.toml")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SmellError::Config(ConfigError::FileNotFound { .. })
    ));
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[paths]
model = "from-file.json"
"#;

    let original = std::env::var("SMELLSCOPE_PATHS_MODEL").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("SMELLSCOPE_PATHS_MODEL", "from-env.json");
    }

    let mut config = SmellscopeConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.paths.model.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("SMELLSCOPE_PATHS_MODEL", val),
            None => std::env::remove_var("SMELLSCOPE_PATHS_MODEL"),
        }
    }

    assert_eq!(result, PathBuf::from("from-env.json"));
}

#[test]
#[serial_test::serial]
fn env_override_failure_policy_and_timeout() {
    let original_policy = std::env::var("SMELLSCOPE_RUNTIME_FAILURE_POLICY").ok();
    let original_timeout = std::env::var("SMELLSCOPE_RUNTIME_DETECTOR_TIMEOUT_SECS").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("SMELLSCOPE_RUNTIME_FAILURE_POLICY", "isolate");
        std::env::set_var("SMELLSCOPE_RUNTIME_DETECTOR_TIMEOUT_SECS", "15");
    }

    let mut config = SmellscopeConfig::default();
    config.apply_env_overrides();

    // SAFETY: 테스트 정리
    unsafe {
        match original_policy {
            Some(val) => std::env::set_var("SMELLSCOPE_RUNTIME_FAILURE_POLICY", val),
            None => std::env::remove_var("SMELLSCOPE_RUNTIME_FAILURE_POLICY"),
        }
        match original_timeout {
            Some(val) => std::env::set_var("SMELLSCOPE_RUNTIME_DETECTOR_TIMEOUT_SECS", val),
            None => std::env::remove_var("SMELLSCOPE_RUNTIME_DETECTOR_TIMEOUT_SECS"),
        }
    }

    assert_eq!(config.runtime.failure_policy, FailurePolicy::Isolate);
    assert_eq!(config.runtime.detector_timeout_secs, 15);
}

#[test]
#[serial_test::serial]
fn invalid_env_values_are_ignored() {
    let original = std::env::var("SMELLSCOPE_RUNTIME_DETECTOR_TIMEOUT_SECS").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("SMELLSCOPE_RUNTIME_DETECTOR_TIMEOUT_SECS", "soon");
    }

    let mut config = SmellscopeConfig::default();
    config.apply_env_overrides();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("SMELLSCOPE_RUNTIME_DETECTOR_TIMEOUT_SECS", val),
            None => std::env::remove_var("SMELLSCOPE_RUNTIME_DETECTOR_TIMEOUT_SECS"),
        }
    }

    assert_eq!(config.runtime.detector_timeout_secs, 0);
}
