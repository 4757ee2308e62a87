//! 탐지기 trait
//!
//! 스멜 탐지기 확장 포인트
//!
//! [`Detector`]는 구조 모델을 받아 인시던트 목록을 만드는 비동기 콜백입니다.
//! 탐지기 인자는 생성 시점에 타입이 있는 값으로 바인딩되므로
//! 실행 시에는 모델만 전달합니다.
//!
//! [`Detector`]는 RPITIT를 사용하므로 `dyn Detector`가 불가합니다.
//! 레지스트리는 [`DynDetector`]를 통해 `Box<dyn DynDetector>`로 탐지기를 보관합니다.
//!
//! # 구현 예시
//! ```ignore
//! struct CountMethods;
//!
//! impl Detector for CountMethods {
//!     async fn detect(&self, model: &StructuralModel) -> Result<Vec<Incident>, SmellError> {
//!         Ok(Vec::new())
//!     }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;

use crate::error::SmellError;
use crate::model::StructuralModel;
use crate::types::Incident;

/// Send 가능한 boxed future
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// 모든 스멜 탐지기가 구현하는 trait
///
/// 구현체는 모델을 읽기만 하며, 다른 탐지기와 가변 상태를 공유하지 않습니다.
pub trait Detector: Send + Sync {
    /// 모델을 분석하여 인시던트 목록을 반환합니다.
    fn detect(
        &self,
        model: &StructuralModel,
    ) -> impl Future<Output = Result<Vec<Incident>, SmellError>> + Send;
}

/// dyn-compatible 탐지기 trait
pub trait DynDetector: Send + Sync {
    /// 모델을 분석하여 인시던트 목록을 반환합니다.
    fn detect<'a>(
        &'a self,
        model: &'a StructuralModel,
    ) -> BoxFuture<'a, Result<Vec<Incident>, SmellError>>;
}

/// Detector를 구현한 타입은 자동으로 DynDetector도 구현됩니다.
impl<T: Detector> DynDetector for T {
    fn detect<'a>(
        &'a self,
        model: &'a StructuralModel,
    ) -> BoxFuture<'a, Result<Vec<Incident>, SmellError>> {
        Box::pin(Detector::detect(self, model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectorError;
    use crate::types::SourceLocation;

    /// 테스트용 Mock 탐지기
    struct MockDetector {
        fail: bool,
    }

    impl Detector for MockDetector {
        async fn detect(&self, model: &StructuralModel) -> Result<Vec<Incident>, SmellError> {
            if self.fail {
                return Err(DetectorError::Execution {
                    name: "mock".to_owned(),
                    reason: "mock failure".to_owned(),
                }
                .into());
            }
            Ok(model
                .methods()
                .map(|m| Incident::new(SourceLocation::of_method(&m), "seen", 1))
                .collect())
        }
    }

    fn model() -> StructuralModel {
        StructuralModel::parse(
            r#"{"structures":{"A":{"methods":{"A::f":{},"A::g":{}}}}}"#,
            "inline",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn dyn_detector_delegates_to_detector() {
        let boxed: Box<dyn DynDetector> = Box::new(MockDetector { fail: false });
        let model = model();
        let incidents = boxed.detect(&model).await.unwrap();
        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].src.method_id, "A::f");
    }

    #[tokio::test]
    async fn dyn_detector_propagates_errors() {
        let boxed: Box<dyn DynDetector> = Box::new(MockDetector { fail: true });
        let err = boxed.detect(&model()).await.unwrap_err();
        assert!(matches!(
            err,
            SmellError::Detector(DetectorError::Execution { .. })
        ));
    }
}
