//! 세션
//!
//! 한 프로세스 동안의 애플리케이션 상태
//!
//! 모델, 지문, 탐지기 설정, 로드된 탐지기, 현재 인시던트 목록을
//! 하나의 구조체로 묶습니다. 모델과 탐지기 설정은 열 때 한 번만 읽습니다.

use std::path::{Path, PathBuf};

use tracing::info;

use smellscope_core::config::SmellscopeConfig;
use smellscope_core::error::SmellError;
use smellscope_core::model::{ModelFingerprint, StructuralModel};
use smellscope_core::types::Incident;

use crate::cache::IncidentCache;
use crate::registry::{DetectorCatalog, DetectorConfig, DetectorRegistry, LoadedDetector};
use crate::runtime::{DetectorRuntime, RunSummary};

/// 탐지 세션
pub struct SmellSession {
    model: StructuralModel,
    fingerprint: ModelFingerprint,
    detector_config: DetectorConfig,
    detector_config_path: PathBuf,
    detectors: Vec<LoadedDetector>,
    runtime: DetectorRuntime,
    cache: IncidentCache,
    incidents: Option<Vec<Incident>>,
    from_cache: bool,
}

impl SmellSession {
    /// 설정에 따라 모델과 탐지기를 로드하고 캐시된 결과를 확인합니다.
    ///
    /// # Errors
    /// 모델이나 탐지기 설정을 읽을 수 없으면 에러를 반환합니다.
    /// 개별 탐지기 로딩 실패와 캐시 미스는 에러가 아닙니다.
    pub async fn open(
        config: &SmellscopeConfig,
        catalog: DetectorCatalog,
    ) -> Result<Self, SmellError> {
        let (model, fingerprint) = StructuralModel::load(&config.paths.model).await?;

        let detector_config_path = config.paths.detectors.clone();
        let detector_config = DetectorConfig::load(&detector_config_path).await?;
        let base_dir = config_dir(&detector_config_path);
        let detectors = DetectorRegistry::new(catalog).load_all(&detector_config, &base_dir);

        let cache = IncidentCache::new(&config.paths.cache);
        let incidents = cache.load(&fingerprint).await;
        let from_cache = incidents.is_some();
        info!(
            detectors = detectors.len(),
            cached = from_cache,
            "session opened"
        );

        Ok(Self {
            model,
            fingerprint,
            detector_config,
            detector_config_path,
            detectors,
            runtime: DetectorRuntime::from_config(&config.runtime),
            cache,
            incidents,
            from_cache,
        })
    }

    /// 모든 탐지기를 실행하고 결과를 저장합니다.
    ///
    /// 인시던트 목록은 새 결과로 교체되고 캐시에 기록됩니다.
    /// 배치가 끝난 뒤에만 탐지기 설정을 다시 씁니다.
    pub async fn compute(&mut self) -> Result<RunSummary, SmellError> {
        let summary = self.runtime.run_all(&self.detectors, &self.model).await?;
        let incidents = summary.incidents();

        self.cache.save(&self.fingerprint, &incidents).await?;
        self.incidents = Some(incidents);
        self.from_cache = false;

        self.detector_config.save(&self.detector_config_path).await?;
        Ok(summary)
    }

    pub fn model(&self) -> &StructuralModel {
        &self.model
    }

    pub fn fingerprint(&self) -> &ModelFingerprint {
        &self.fingerprint
    }

    pub fn detectors(&self) -> &[LoadedDetector] {
        &self.detectors
    }

    pub fn detector_config(&self) -> &DetectorConfig {
        &self.detector_config
    }

    pub fn cache(&self) -> &IncidentCache {
        &self.cache
    }

    /// 현재 인시던트 목록. 캐시 미스이고 아직 실행하지 않았으면 `None`
    pub fn incidents(&self) -> Option<&[Incident]> {
        self.incidents.as_deref()
    }

    /// 현재 인시던트가 캐시에서 온 것인지 여부
    pub fn from_cache(&self) -> bool {
        self.from_cache
    }
}

/// 설정 파일이 위치한 디렉터리. 상대 파일명이면 현재 디렉터리
pub fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_of_bare_file_is_current_dir() {
        assert_eq!(config_dir(Path::new("SmellsConfig.json")), PathBuf::from("."));
        assert_eq!(
            config_dir(Path::new("/etc/smellscope/SmellsConfig.json")),
            PathBuf::from("/etc/smellscope")
        );
    }
}
