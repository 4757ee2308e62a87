//! 탐지기 레지스트리
//!
//! 설정 파일의 탐지기 목록을 실행 가능한 탐지기로 바인딩
//!
//! 탐지기 설정(`{ folder, smells: [{ name, file, args }] }`)의 각 항목은
//! `folder/file` 경로로 해석되고, 파일 stem으로 [`DetectorCatalog`]에서
//! 구현체를 찾습니다. 구현체 생성 시 `args`가 타입이 있는 인자로 파싱됩니다.
//!
//! 개별 항목 로딩 실패는 경고 로그를 남기고 건너뜁니다.
//! 하나의 잘못된 항목이 나머지 탐지기 로딩을 막지 않습니다.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use smellscope_core::detector::DynDetector;
use smellscope_core::error::{ConfigError, DetectorError, SmellError};
use smellscope_core::metrics as m;

use crate::json::to_pretty_json;

// ─── DetectorConfig ──────────────────────────────────────────────────

/// 탐지기 설정 파일
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// 탐지기 모듈 기준 폴더 (상대 경로면 설정 파일 위치 기준)
    pub folder: String,
    /// 탐지기 항목 (설정 순서 = 실행/보고 순서)
    #[serde(default)]
    pub smells: Vec<DetectorEntry>,
    /// 알 수 없는 최상위 필드. 다시 쓸 때 그대로 보존
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 탐지기 설정 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorEntry {
    /// 탐지기 이름 (설정 내에서 고유)
    pub name: String,
    /// 탐지기 모듈 파일 (`folder` 기준)
    pub file: String,
    /// 탐지기별 인자. 없으면 `Null`이며 다시 쓸 때도 생략
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub args: Value,
    /// 알 수 없는 항목 필드. 다시 쓸 때 그대로 보존
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DetectorConfig {
    /// JSON 파일에서 탐지기 설정을 로드합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SmellError> {
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
        Self::parse(&content)
    }

    /// JSON 문자열에서 탐지기 설정을 파싱합니다.
    pub fn parse(json: &str) -> Result<Self, SmellError> {
        serde_json::from_str(json).map_err(|e| {
            SmellError::Config(ConfigError::ParseFailed {
                reason: format!("detector config: {e}"),
            })
        })
    }

    /// 설정을 같은 경로에 pretty JSON으로 다시 씁니다.
    ///
    /// 읽을 때 있던 필드와 키 순서는 그대로 유지됩니다.
    /// 쓰기 실패는 호출자에게 전파됩니다.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), SmellError> {
        let path = path.as_ref();
        let bytes = to_pretty_json(self).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| ConfigError::Write {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        info!(path = %path.display(), detectors = self.smells.len(), "detector config saved");
        Ok(())
    }

    /// 항목의 모듈 경로를 해석합니다.
    ///
    /// `folder`가 상대 경로이면 `base_dir` 기준으로 해석합니다.
    pub fn resolve_path(&self, base_dir: &Path, entry: &DetectorEntry) -> PathBuf {
        let folder = Path::new(&self.folder);
        let folder = if folder.is_absolute() {
            folder.to_path_buf()
        } else {
            base_dir.join(folder)
        };
        folder.join(&entry.file)
    }
}

// ─── DetectorCatalog ─────────────────────────────────────────────────

/// 탐지기 생성 함수
///
/// 설정 항목의 `args`를 받아 인자가 바인딩된 탐지기를 만듭니다.
/// 인자가 맞지 않으면 사유 문자열을 반환합니다.
pub type DetectorFactory =
    Box<dyn Fn(&Value) -> Result<Box<dyn DynDetector>, String> + Send + Sync>;

/// 컴파일된 탐지기 구현 목록
///
/// 모듈 이름(파일 stem, 소문자)으로 생성 함수를 찾습니다.
pub struct DetectorCatalog {
    factories: BTreeMap<String, DetectorFactory>,
}

impl DetectorCatalog {
    /// 빈 카탈로그를 생성합니다.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// 기본 제공 탐지기가 등록된 카탈로그를 생성합니다.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        crate::detectors::register_builtin(&mut catalog);
        catalog
    }

    /// 모듈 이름으로 생성 함수를 등록합니다. 같은 이름이 있으면 교체합니다.
    pub fn register<F>(&mut self, module: &str, factory: F)
    where
        F: Fn(&Value) -> Result<Box<dyn DynDetector>, String> + Send + Sync + 'static,
    {
        self.factories
            .insert(module.to_lowercase(), Box::new(factory));
    }

    /// 등록된 모듈 이름 목록 (정렬됨)
    pub fn modules(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    fn get(&self, module: &str) -> Option<&DetectorFactory> {
        self.factories.get(module)
    }
}

impl Default for DetectorCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// 모듈 파일 경로에서 카탈로그 키(파일 stem, 소문자)를 추출합니다.
///
/// `smells/Method_locals.js`와 `method_locals`는 같은 모듈을 가리킵니다.
pub fn module_name(file: &Path) -> Option<String> {
    file.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

// ─── LoadedDetector ──────────────────────────────────────────────────

/// 이름과 인자가 바인딩된 실행 가능한 탐지기
///
/// 생성 후에는 변경되지 않습니다. 설정 저장은 레지스트리의
/// [`DetectorConfig`]에서 이루어지며 탐지기 내부 상태는 저장하지 않습니다.
pub struct LoadedDetector {
    name: String,
    path: PathBuf,
    args: Value,
    detector: Box<dyn DynDetector>,
}

impl LoadedDetector {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        args: Value,
        detector: Box<dyn DynDetector>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            args,
            detector,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 해석된 모듈 경로
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn args(&self) -> &Value {
        &self.args
    }

    pub fn detector(&self) -> &dyn DynDetector {
        self.detector.as_ref()
    }
}

impl fmt::Debug for LoadedDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedDetector")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

// ─── DetectorRegistry ────────────────────────────────────────────────

/// 탐지기 레지스트리
///
/// # 사용 예시
/// ```ignore
/// let config = DetectorConfig::load("SmellsConfig.json").await?;
/// let registry = DetectorRegistry::new(DetectorCatalog::builtin());
/// let detectors = registry.load_all(&config, Path::new("."));
/// ```
pub struct DetectorRegistry {
    catalog: DetectorCatalog,
}

impl DetectorRegistry {
    pub fn new(catalog: DetectorCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &DetectorCatalog {
        &self.catalog
    }

    /// 설정의 모든 탐지기를 로드합니다.
    ///
    /// 성공한 탐지기는 설정 순서대로 반환되고, 실패한 항목은 경고 로그를
    /// 남긴 뒤 결과에서 빠집니다. 이름이 중복되면 첫 항목만 사용합니다.
    pub fn load_all(&self, config: &DetectorConfig, base_dir: &Path) -> Vec<LoadedDetector> {
        let mut loaded = Vec::with_capacity(config.smells.len());
        let mut seen_names = HashSet::new();

        for entry in &config.smells {
            if !seen_names.insert(entry.name.as_str()) {
                warn!(
                    detector = %entry.name,
                    "duplicate detector name, skipping"
                );
                counter!(m::DETECTORS_SKIPPED_TOTAL).increment(1);
                continue;
            }

            match self.load_entry(config, entry, base_dir) {
                Ok(detector) => {
                    info!(
                        detector = %detector.name(),
                        path = %detector.path().display(),
                        "loaded detector"
                    );
                    counter!(m::DETECTORS_LOADED_TOTAL).increment(1);
                    loaded.push(detector);
                }
                Err(e) => {
                    warn!(
                        detector = %entry.name,
                        path = %config.resolve_path(base_dir, entry).display(),
                        error = %e,
                        "skipped detector"
                    );
                    counter!(m::DETECTORS_SKIPPED_TOTAL).increment(1);
                }
            }
        }

        info!(
            configured = config.smells.len(),
            loaded = loaded.len(),
            "detector registry loaded"
        );
        loaded
    }

    /// 설정 항목 하나를 로드합니다.
    ///
    /// # Errors
    /// 모듈을 찾을 수 없거나 인자가 맞지 않으면 [`DetectorError::Load`]를 반환합니다.
    /// 에러에는 탐지기 이름과 해석된 경로가 포함됩니다.
    pub fn load_entry(
        &self,
        config: &DetectorConfig,
        entry: &DetectorEntry,
        base_dir: &Path,
    ) -> Result<LoadedDetector, DetectorError> {
        let path = config.resolve_path(base_dir, entry);
        let load_error = |reason: String| DetectorError::Load {
            name: entry.name.clone(),
            path: path.display().to_string(),
            reason,
        };

        let module = module_name(&path)
            .ok_or_else(|| load_error("detector file name is empty".to_owned()))?;
        let factory = self
            .catalog
            .get(&module)
            .ok_or_else(|| load_error(format!("unknown detector module '{module}'")))?;
        let detector = factory(&entry.args).map_err(load_error)?;

        Ok(LoadedDetector::new(
            entry.name.clone(),
            path.clone(),
            entry.args.clone(),
            detector,
        ))
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new(DetectorCatalog::builtin())
    }
}
