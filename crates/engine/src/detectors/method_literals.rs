//! 리터럴이 과도한 메서드 탐지
//!
//! 인자: `{ "max_literals": { "min": 3, "max": 10 } }`

use serde::Deserialize;
use serde_json::Value;

use smellscope_core::detector::{Detector, DynDetector};
use smellscope_core::error::SmellError;
use smellscope_core::model::{MethodRef, StructuralModel};
use smellscope_core::types::{Incident, SourceLocation};

use super::{Threshold, parse_args};

/// 카탈로그 모듈 이름
pub const MODULE: &str = "method_literals";

#[derive(Debug, Clone, Deserialize)]
pub struct MethodLiteralsArgs {
    pub max_literals: Threshold,
}

/// 메서드별 리터럴 수를 임계값과 비교하는 탐지기
#[derive(Debug, Clone)]
pub struct MethodLiterals {
    args: MethodLiteralsArgs,
}

impl MethodLiterals {
    pub fn new(args: MethodLiteralsArgs) -> Self {
        Self { args }
    }

    fn inspect(&self, method: &MethodRef<'_>) -> Option<Incident> {
        let literals = method.method.literals;
        let lvl = self.args.max_literals.level(literals);
        (lvl > 0).then(|| {
            Incident::new(
                SourceLocation::of_method(method),
                format!("Method: \"{}\" has {} literals.", method.method_id, literals),
                lvl,
            )
        })
    }
}

impl Detector for MethodLiterals {
    async fn detect(&self, model: &StructuralModel) -> Result<Vec<Incident>, SmellError> {
        let mut incidents = Vec::new();
        for (structure_id, structure) in &model.structures {
            for (method_id, method) in &structure.methods {
                let method = MethodRef {
                    structure_id,
                    method_id,
                    method,
                };
                incidents.extend(self.inspect(&method));
            }
            tokio::task::yield_now().await;
        }
        Ok(incidents)
    }
}

pub fn factory(args: &Value) -> Result<Box<dyn DynDetector>, String> {
    let args = parse_args::<MethodLiteralsArgs>(args)?;
    Ok(Box::new(MethodLiterals::new(args)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use smellscope_core::MAX_SMELL_LEVEL;

    fn model_with_literals(literals: u64) -> StructuralModel {
        let json = json!({
            "structures": {
                "Parser": {
                    "methods": {
                        "Parser::next_token": {
                            "definitions": {},
                            "literals": literals,
                            "src_info": { "file": "parser.cpp", "line": 88, "col": 3 }
                        }
                    }
                }
            }
        });
        StructuralModel::parse(&json.to_string(), "inline").unwrap()
    }

    fn detector() -> MethodLiterals {
        MethodLiterals::new(MethodLiteralsArgs {
            max_literals: Threshold { min: 3.0, max: 10.0 },
        })
    }

    #[tokio::test]
    async fn above_max_reports_max_level() {
        let incidents = Detector::detect(&detector(), &model_with_literals(12))
            .await
            .unwrap();
        assert_eq!(incidents.len(), 1);

        let incident = &incidents[0];
        assert_eq!(incident.lvl, MAX_SMELL_LEVEL);
        assert!(incident.msg.contains("Parser::next_token"));
        assert!(incident.msg.contains("12"));
        assert_eq!(incident.src.file, "parser.cpp");
        assert_eq!(incident.src.line, 88);
        assert_eq!(incident.src.structure_id, "Parser");
        assert_eq!(incident.src.method_id, "Parser::next_token");
    }

    #[tokio::test]
    async fn below_min_reports_nothing() {
        let incidents = Detector::detect(&detector(), &model_with_literals(1))
            .await
            .unwrap();
        assert!(incidents.is_empty());
    }

    #[test]
    fn factory_parses_args() {
        assert!(factory(&json!({ "max_literals": { "min": 3, "max": 10 } })).is_ok());
        assert!(factory(&json!({ "max_locals": { "min": 3, "max": 10 } })).is_err());
    }
}
