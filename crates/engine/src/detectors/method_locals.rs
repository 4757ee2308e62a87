//! 지역 정의가 과도한 메서드 탐지
//!
//! 인자: `{ "max_locals": { "min": 8, "max": 20 } }`

use serde::Deserialize;
use serde_json::Value;

use smellscope_core::detector::{Detector, DynDetector};
use smellscope_core::error::SmellError;
use smellscope_core::model::{MethodRef, StructuralModel};
use smellscope_core::types::{Incident, SourceLocation};

use super::{Threshold, parse_args};

pub const MODULE: &str = "method_locals";

#[derive(Debug, Clone, Deserialize)]
pub struct MethodLocalsArgs {
    pub max_locals: Threshold,
}

/// 메서드별 지역 정의 수를 임계값과 비교하는 탐지기
#[derive(Debug, Clone)]
pub struct MethodLocals {
    args: MethodLocalsArgs,
}

impl MethodLocals {
    pub fn new(args: MethodLocalsArgs) -> Self {
        Self { args }
    }
}

impl Detector for MethodLocals {
    async fn detect(&self, model: &StructuralModel) -> Result<Vec<Incident>, SmellError> {
        let mut incidents = Vec::new();
        for (structure_id, structure) in &model.structures {
            for (method_id, method) in &structure.methods {
                let locals = method.definitions.len() as u64;
                let lvl = self.args.max_locals.level(locals);
                if lvl == 0 {
                    continue;
                }
                let method_ref = MethodRef {
                    structure_id,
                    method_id,
                    method,
                };
                incidents.push(Incident::new(
                    SourceLocation::of_method(&method_ref),
                    format!("Method: \"{method_id}\" has {locals} local definitions."),
                    lvl,
                ));
            }
            tokio::task::yield_now().await;
        }
        Ok(incidents)
    }
}

pub fn factory(args: &Value) -> Result<Box<dyn DynDetector>, String> {
    let args = parse_args::<MethodLocalsArgs>(args)?;
    Ok(Box::new(MethodLocals::new(args)))
}
