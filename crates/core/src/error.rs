//! 에러 타입 — 도메인별 에러 정의

/// smellscope 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum SmellError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 구조 모델(ST) 로딩 에러
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// 탐지기 로딩/실행 에러
    #[error("detector error: {0}")]
    Detector(#[from] DetectorError),

    /// 인시던트 캐시 에러
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// 설정 파일 쓰기 실패
    #[error("failed to write config {path}: {reason}")]
    Write { path: String, reason: String },
}

/// 구조 모델 로딩 에러
///
/// 모델 없이는 의미 있는 실행이 불가능하므로 호출자에게 치명적입니다.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// 모델 파일을 찾을 수 없음
    #[error("model file not found: {path}")]
    FileNotFound { path: String },

    /// 모델 파일 읽기 실패
    #[error("failed to read model {path}: {reason}")]
    Read { path: String, reason: String },

    /// JSON 파싱 실패
    #[error("malformed model {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// 탐지기 에러
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    /// 탐지기 로딩 실패 (레지스트리에서 건너뜀)
    #[error("could not load detector '{name}' from '{path}': {reason}")]
    Load {
        name: String,
        path: String,
        reason: String,
    },

    /// 탐지기 인자 형식 오류
    #[error("invalid arguments for detector '{name}': {reason}")]
    InvalidArgs { name: String, reason: String },

    /// 탐지기 실행 실패
    #[error("detector '{name}' failed: {reason}")]
    Execution { name: String, reason: String },

    /// 탐지기 실행 시간 초과
    #[error("detector '{name}' timed out after {secs}s")]
    Timeout { name: String, secs: u64 },
}

/// 인시던트 캐시 에러
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// 캐시 쓰기 실패
    #[error("failed to write cache {path}: {reason}")]
    Write { path: String, reason: String },

    /// 캐시 직렬화 실패
    #[error("failed to serialize cache: {0}")]
    Serialize(String),
}
