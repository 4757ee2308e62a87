//! 인시던트 캐시
//!
//! 모델 지문과 함께 평탄화된 인시던트 목록을 저장
//!
//! 저장 형식:
//! ```text
//! { "computed_for": { "file": "ST.json", "last_edit": "1700000000.000000000" },
//!   "smells": [ <Incident>, ... ] }
//! ```
//!
//! 캐시는 `computed_for`가 현재 지문과 정확히 같을 때만 유효합니다.
//! 지문은 수정 시각 기반이므로 내용 변경 없이 touch 된 모델도 캐시를 무효화합니다.

use std::path::{Path, PathBuf};

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use smellscope_core::error::{CacheError, SmellError};
use smellscope_core::metrics as m;
use smellscope_core::model::ModelFingerprint;
use smellscope_core::types::Incident;

use crate::json::to_pretty_json;

/// 디스크에 저장되는 캐시 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub computed_for: ModelFingerprint,
    pub smells: Vec<Incident>,
}

/// 파일 기반 인시던트 캐시
#[derive(Debug, Clone)]
pub struct IncidentCache {
    path: PathBuf,
}

impl IncidentCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 현재 지문에 해당하는 캐시된 인시던트를 읽습니다.
    ///
    /// 파일이 없거나, 읽을 수 없거나, 형식이 잘못되었거나, 지문이 다르면
    /// `None`(캐시 미스)을 반환합니다. 읽기 실패는 에러가 아닙니다.
    pub async fn load(&self, fingerprint: &ModelFingerprint) -> Option<Vec<Incident>> {
        let entry = self.read_entry().await;
        let hit = match entry {
            Some(entry) if entry.computed_for == *fingerprint => {
                debug!(
                    path = %self.path.display(),
                    incidents = entry.smells.len(),
                    "incident cache hit"
                );
                Some(entry.smells)
            }
            Some(entry) => {
                info!(
                    cached_for = %entry.computed_for.last_edit,
                    current = %fingerprint.last_edit,
                    "incident cache is stale"
                );
                None
            }
            None => None,
        };

        let result = if hit.is_some() { "hit" } else { "miss" };
        counter!(m::CACHE_LOOKUPS_TOTAL, m::LABEL_RESULT => result).increment(1);
        hit
    }

    async fn read_entry(&self) -> Option<CacheEntry> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no incident cache");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "incident cache unreadable");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "incident cache malformed");
                None
            }
        }
    }

    /// 캐시를 지문과 인시던트 목록으로 덮어씁니다.
    ///
    /// 같은 디렉터리의 임시 파일에 쓴 뒤 rename 하므로 읽는 쪽은
    /// 이전 내용이나 새 내용 중 하나만 봅니다.
    ///
    /// # Errors
    /// 직렬화 실패는 [`CacheError::Serialize`], 쓰기 실패는 [`CacheError::Write`].
    pub async fn save(
        &self,
        fingerprint: &ModelFingerprint,
        incidents: &[Incident],
    ) -> Result<(), SmellError> {
        #[derive(Serialize)]
        struct EntryRef<'a> {
            computed_for: &'a ModelFingerprint,
            smells: &'a [Incident],
        }

        let bytes = to_pretty_json(&EntryRef {
            computed_for: fingerprint,
            smells: incidents,
        })
        .map_err(|e| CacheError::Serialize(e.to_string()))?;

        self.write_atomic(&bytes).await.map_err(|e| CacheError::Write {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!(
            path = %self.path.display(),
            incidents = incidents.len(),
            last_edit = %fingerprint.last_edit,
            "incident cache saved"
        );
        Ok(())
    }

    async fn write_atomic(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cache".to_owned());
        let temp_path = self
            .path
            .with_file_name(format!(".{file_name}.{}.tmp", std::process::id()));

        tokio::fs::write(&temp_path, bytes).await?;
        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e);
        }
        Ok(())
    }
}
