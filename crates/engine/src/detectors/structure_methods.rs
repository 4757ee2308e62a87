//! 메서드가 과도한 구조(클래스) 탐지
//!
//! 인자: `{ "max_methods": { "min": 15, "max": 40 } }`
//!
//! 구조 자체에는 소스 위치가 없으므로 정렬 순서상 첫 메서드의 위치를 사용합니다.

use serde::Deserialize;
use serde_json::Value;

use smellscope_core::detector::{Detector, DynDetector};
use smellscope_core::error::SmellError;
use smellscope_core::model::{MethodRef, StructuralModel};
use smellscope_core::types::{Incident, SourceLocation};

use super::{Threshold, parse_args};

pub const MODULE: &str = "structure_methods";

#[derive(Debug, Clone, Deserialize)]
pub struct StructureMethodsArgs {
    pub max_methods: Threshold,
}

#[derive(Debug, Clone)]
pub struct StructureMethods {
    args: StructureMethodsArgs,
}

impl StructureMethods {
    pub fn new(args: StructureMethodsArgs) -> Self {
        Self { args }
    }
}

impl Detector for StructureMethods {
    async fn detect(&self, model: &StructuralModel) -> Result<Vec<Incident>, SmellError> {
        let mut incidents = Vec::new();
        for (structure_id, structure) in &model.structures {
            let count = structure.methods.len() as u64;
            let lvl = self.args.max_methods.level(count);
            // 메서드가 없는 구조는 위치를 만들 수 없음
            let Some((method_id, method)) = structure.methods.iter().next() else {
                continue;
            };
            if lvl > 0 {
                let anchor = MethodRef {
                    structure_id,
                    method_id,
                    method,
                };
                incidents.push(Incident::new(
                    SourceLocation::of_method(&anchor),
                    format!("Structure: \"{structure_id}\" has {count} methods."),
                    lvl,
                ));
            }
            tokio::task::yield_now().await;
        }
        Ok(incidents)
    }
}

pub fn factory(args: &Value) -> Result<Box<dyn DynDetector>, String> {
    let args = parse_args::<StructureMethodsArgs>(args)?;
    Ok(Box::new(StructureMethods::new(args)))
}
