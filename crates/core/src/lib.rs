#![doc = include_str!("../README.md")]

pub mod config;
pub mod detector;
pub mod error;
pub mod metrics;
pub mod model;
pub mod severity;
pub mod stats;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{CacheError, ConfigError, DetectorError, ModelError, SmellError};

// 설정
pub use config::{FailurePolicy, SmellscopeConfig};

// 탐지기 trait
pub use detector::{BoxFuture, Detector, DynDetector};

// 구조 모델
pub use model::{MethodRef, ModelFingerprint, StructuralModel};

// 도메인 타입
pub use severity::{MAX_SMELL_LEVEL, get_smell_lvl};
pub use stats::{SmellStats, SortKey, SortOrder};
pub use types::{Incident, IncidentReport, SourceLocation};
