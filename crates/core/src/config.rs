//! 설정 관리 — smellscope.toml 파싱 및 런타임 설정
//!
//! [`SmellscopeConfig`]는 CLI와 엔진이 공유하는 최상위 설정 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`SMELLSCOPE_PATHS_MODEL=ST.json` 형식)
//! 3. 설정 파일 (`smellscope.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), smellscope_core::error::SmellError> {
//! use smellscope_core::config::SmellscopeConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = SmellscopeConfig::load("smellscope.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = SmellscopeConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, SmellError};

/// smellscope 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmellscopeConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 입력/출력 파일 경로
    #[serde(default)]
    pub paths: PathsConfig,
    /// 탐지기 런타임 설정
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl SmellscopeConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 파일이 없으면 기본값에서 시작합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SmellError> {
        let path = path.as_ref();
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(SmellError::Config(ConfigError::FileNotFound { .. })) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SmellError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SmellError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                SmellError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, SmellError> {
        toml::from_str(toml_str).map_err(|e| {
            SmellError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `SMELLSCOPE_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "SMELLSCOPE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "SMELLSCOPE_GENERAL_LOG_FORMAT");

        override_path(&mut self.paths.model, "SMELLSCOPE_PATHS_MODEL");
        override_path(&mut self.paths.detectors, "SMELLSCOPE_PATHS_DETECTORS");
        override_path(&mut self.paths.cache, "SMELLSCOPE_PATHS_CACHE");

        if let Ok(val) = std::env::var("SMELLSCOPE_RUNTIME_FAILURE_POLICY") {
            match FailurePolicy::from_str_loose(&val) {
                Some(policy) => self.runtime.failure_policy = policy,
                None => warn!(
                    env_key = "SMELLSCOPE_RUNTIME_FAILURE_POLICY",
                    value = val.as_str(),
                    "unknown failure policy in env var, ignoring"
                ),
            }
        }
        override_u64(
            &mut self.runtime.detector_timeout_secs,
            "SMELLSCOPE_RUNTIME_DETECTOR_TIMEOUT_SECS",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), SmellError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        for (field, path) in [
            ("paths.model", &self.paths.model),
            ("paths.detectors", &self.paths.detectors),
            ("paths.cache", &self.paths.cache),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_owned(),
                    reason: "path must not be empty".to_owned(),
                }
                .into());
            }
        }

        if self.runtime.detector_timeout_secs > MAX_DETECTOR_TIMEOUT_SECS {
            return Err(ConfigError::InvalidValue {
                field: "runtime.detector_timeout_secs".to_owned(),
                reason: format!("must be 0 (disabled) or 1-{MAX_DETECTOR_TIMEOUT_SECS}"),
            }
            .into());
        }

        Ok(())
    }
}

/// 탐지기 타임아웃 상한 (1시간)
const MAX_DETECTOR_TIMEOUT_SECS: u64 = 3600;

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 파일 경로 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// 구조 모델(ST) JSON 경로
    pub model: PathBuf,
    /// 탐지기 설정 JSON 경로
    pub detectors: PathBuf,
    /// 인시던트 캐시 경로
    pub cache: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("ST.json"),
            detectors: PathBuf::from("SmellsConfig.json"),
            cache: PathBuf::from(".smellscope/cache.json"),
        }
    }
}

/// 탐지기 런타임 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// 탐지기 실패 처리 정책
    pub failure_policy: FailurePolicy,
    /// 탐지기별 실행 제한 시간 (초). 0이면 제한 없음
    pub detector_timeout_secs: u64,
}

impl RuntimeConfig {
    /// 타임아웃이 설정되어 있으면 `Duration`으로 반환합니다.
    pub fn detector_timeout(&self) -> Option<Duration> {
        (self.detector_timeout_secs > 0).then(|| Duration::from_secs(self.detector_timeout_secs))
    }
}

/// 탐지기 실패 처리 정책
///
/// - `Abort`: 첫 번째 실패가 배치 전체를 중단합니다 (기본값).
/// - `Isolate`: 실패한 탐지기만 결과에서 제외하고 나머지 보고서는 유지합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// 첫 실패 시 배치 중단
    #[default]
    Abort,
    /// 탐지기별 실패 격리
    Isolate,
}

impl FailurePolicy {
    /// 문자열에서 정책을 파싱합니다. 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "abort" | "fail-fast" => Some(Self::Abort),
            "isolate" => Some(Self::Isolate),
            _ => None,
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Isolate => write!(f, "isolate"),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_path(target: &mut PathBuf, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = PathBuf::from(val);
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
