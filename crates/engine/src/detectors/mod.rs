//! 기본 제공 탐지기
//!
//! 각 탐지기는 측정값을 `{ min, max }` 임계값과 비교하여
//! [`get_smell_lvl`](smellscope_core::get_smell_lvl)로 강도를 계산합니다.
//! 강도가 0보다 큰 경우에만 인시던트를 보고합니다.
//!
//! | 모듈 | 인자 | 측정값 |
//! |------|------|--------|
//! | `method_literals` | `max_literals` | 메서드의 리터럴 수 |
//! | `method_locals` | `max_locals` | 메서드의 지역 정의 수 |
//! | `structure_methods` | `max_methods` | 구조의 메서드 수 |

pub mod method_literals;
pub mod method_locals;
pub mod structure_methods;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::registry::DetectorCatalog;

pub use method_literals::MethodLiterals;
pub use method_locals::MethodLocals;
pub use structure_methods::StructureMethods;

/// 스멜 임계값
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Threshold {
    /// 이 값 미만은 스멜이 아님
    pub min: f64,
    /// 이 값 이상은 최대 강도
    pub max: f64,
}

impl Threshold {
    /// 측정값의 강도를 계산합니다.
    pub fn level(&self, value: u64) -> u8 {
        smellscope_core::get_smell_lvl(self.min, self.max, value as f64)
    }
}

/// 기본 제공 탐지기를 카탈로그에 등록합니다.
pub fn register_builtin(catalog: &mut DetectorCatalog) {
    catalog.register(method_literals::MODULE, method_literals::factory);
    catalog.register(method_locals::MODULE, method_locals::factory);
    catalog.register(structure_methods::MODULE, structure_methods::factory);
}

/// 설정 항목의 `args`를 탐지기 인자 타입으로 파싱합니다.
pub(crate) fn parse_args<A: DeserializeOwned>(args: &Value) -> Result<A, String> {
    A::deserialize(args).map_err(|e| format!("invalid arguments: {e}"))
}
