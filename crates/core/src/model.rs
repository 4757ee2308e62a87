//! 구조 모델(ST)
//!
//! 외부에서 생성된 코드베이스 구조 JSON
//!
//! [`StructuralModel`]은 구조(클래스 등) → 메서드 → 지역 정의의 계층을 담습니다.
//! 탐지기 실행 동안 읽기 전용으로 공유됩니다.
//!
//! ```text
//! { "structures": { "<id>": { "methods": { "<id>": {
//!     "definitions": { ... }, "literals": 3,
//!     "src_info": { "file": "a.cpp", "line": 10, "col": 1 } } } } } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ModelError, SmellError};

/// 구조 모델 루트
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralModel {
    /// 구조 ID → 구조
    #[serde(default)]
    pub structures: BTreeMap<String, Structure>,
}

/// 구조 (클래스, 구조체 등)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// 메서드 ID → 메서드
    #[serde(default)]
    pub methods: BTreeMap<String, Method>,
}

/// 메서드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Method {
    /// 정의 ID → 지역 정의
    #[serde(default)]
    pub definitions: BTreeMap<String, Definition>,
    /// 메서드 본문의 리터럴 개수
    #[serde(default)]
    pub literals: u64,
    /// 소스 위치
    #[serde(default)]
    pub src_info: SrcInfo,
}

/// 지역 변수/선언 위치
///
/// 속성은 모델 생성기마다 다르므로 그대로 보존만 합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// 모델 엔티티의 소스 위치
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrcInfo {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub col: u32,
}

/// 모델 파일 지문. 캐시 유효성 판단 기준
///
/// 내용 해시가 아닌 경로와 수정 시각만 비교합니다. 내용 변경 없이
/// 수정 시각만 바뀐 파일도 캐시를 무효화합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFingerprint {
    /// 모델 파일 경로
    pub file: String,
    /// 수정 시각 (`<초>.<나노초>` 문자열)
    pub last_edit: String,
}

impl ModelFingerprint {
    pub fn new(file: impl Into<String>, last_edit: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            last_edit: last_edit.into(),
        }
    }

    /// 파일 메타데이터에서 지문을 계산합니다.
    pub async fn of_file(path: impl AsRef<Path>) -> Result<Self, SmellError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ModelError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ModelError::Read {
                    path: path.display().to_string(),
                    reason: format!("failed to read file metadata: {e}"),
                }
            }
        })?;
        let modified = metadata.modified().map_err(|e| ModelError::Read {
            path: path.display().to_string(),
            reason: format!("modification time unavailable: {e}"),
        })?;
        Ok(Self::new(path.display().to_string(), format_mtime(modified)))
    }
}

/// 수정 시각을 안정적으로 비교 가능한 문자열로 변환합니다.
pub fn format_mtime(time: SystemTime) -> String {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => format!("{}.{:09}", d.as_secs(), d.subsec_nanos()),
        Err(e) => {
            let d = e.duration();
            format!("-{}.{:09}", d.as_secs(), d.subsec_nanos())
        }
    }
}

/// 모델 내 메서드 하나에 대한 참조
#[derive(Debug, Clone, Copy)]
pub struct MethodRef<'a> {
    pub structure_id: &'a str,
    pub method_id: &'a str,
    pub method: &'a Method,
}

impl StructuralModel {
    /// 모델 파일을 읽고 지문과 함께 반환합니다.
    ///
    /// # Errors
    /// - 파일이 없거나 읽을 수 없는 경우 [`ModelError::FileNotFound`] / [`ModelError::Read`]
    /// - JSON 형식이 잘못된 경우 [`ModelError::Parse`]
    pub async fn load(path: impl AsRef<Path>) -> Result<(Self, ModelFingerprint), SmellError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ModelError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ModelError::Read {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            }
        })?;
        let model = Self::parse(&content, &path.display().to_string())?;
        let fingerprint = ModelFingerprint::of_file(path).await?;

        info!(
            path = %path.display(),
            structures = model.structure_count(),
            methods = model.method_count(),
            last_edit = %fingerprint.last_edit,
            "structural model loaded"
        );

        Ok((model, fingerprint))
    }

    /// JSON 문자열에서 모델을 파싱합니다.
    pub fn parse(json: &str, source: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json).map_err(|e| ModelError::Parse {
            path: source.to_owned(),
            reason: e.to_string(),
        })?;
        debug!(source, structures = model.structure_count(), "parsed model");
        Ok(model)
    }

    pub fn structure_count(&self) -> usize {
        self.structures.len()
    }

    pub fn method_count(&self) -> usize {
        self.structures.values().map(|s| s.methods.len()).sum()
    }

    /// 모든 메서드를 (구조 ID, 메서드 ID) 정렬 순서로 순회합니다.
    pub fn methods(&self) -> impl Iterator<Item = MethodRef<'_>> {
        self.structures.iter().flat_map(|(structure_id, structure)| {
            structure
                .methods
                .iter()
                .map(move |(method_id, method)| MethodRef {
                    structure_id,
                    method_id,
                    method,
                })
        })
    }
}
