//! 탐지기 런타임
//!
//! 로드된 탐지기를 동시에 실행하고 보고서를 수집
//!
//! 모든 탐지기 future를 먼저 만든 뒤 현재 태스크에서 함께 await 합니다.
//! 스레드를 생성하지 않으므로 탐지기는 협력적으로 번갈아 실행되며,
//! 결과 순서는 완료 순서와 무관하게 설정 순서를 따릅니다.
//!
//! 실패 처리는 [`FailurePolicy`]를 따릅니다.
//! - `Abort`: 첫 실패가 배치를 중단하고 부분 결과를 버립니다.
//! - `Isolate`: 실패한 탐지기만 [`RunSummary::failures`]에 기록합니다.

use std::time::Duration;

use futures_util::future::{join_all, try_join_all};
use metrics::{counter, histogram};
use tokio::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use smellscope_core::config::{FailurePolicy, RuntimeConfig};
use smellscope_core::error::{DetectorError, SmellError};
use smellscope_core::metrics as m;
use smellscope_core::model::StructuralModel;
use smellscope_core::types::{Incident, IncidentReport, flatten_reports};

use crate::registry::LoadedDetector;

/// 격리 정책에서 기록되는 탐지기 실패
#[derive(Debug)]
pub struct DetectorFailure {
    pub detector_name: String,
    pub error: DetectorError,
}

/// 한 번의 배치 실행 결과
#[derive(Debug)]
pub struct RunSummary {
    /// 실행 ID (로그 상관관계용)
    pub run_id: Uuid,
    /// 성공한 탐지기 보고서 (설정 순서)
    pub reports: Vec<IncidentReport>,
    /// 실패한 탐지기 (`Isolate` 정책에서만 채워짐)
    pub failures: Vec<DetectorFailure>,
    /// 배치 전체 실행 시간
    pub elapsed: Duration,
}

impl RunSummary {
    /// 보고서를 실행 순서대로 평탄화한 인시던트 목록
    pub fn incidents(&self) -> Vec<Incident> {
        flatten_reports(&self.reports)
    }

    pub fn incident_count(&self) -> usize {
        self.reports.iter().map(|r| r.incidents.len()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 탐지기 런타임
#[derive(Debug, Clone, Default)]
pub struct DetectorRuntime {
    policy: FailurePolicy,
    timeout: Option<Duration>,
}

impl DetectorRuntime {
    pub fn new(policy: FailurePolicy, timeout: Option<Duration>) -> Self {
        Self { policy, timeout }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.failure_policy, config.detector_timeout())
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// 모든 탐지기를 모델에 대해 실행합니다.
    ///
    /// # Errors
    /// `Abort` 정책에서 탐지기 하나라도 실패하면 [`DetectorError`]를 반환합니다.
    /// `Isolate` 정책에서는 에러를 반환하지 않습니다.
    pub async fn run_all(
        &self,
        detectors: &[LoadedDetector],
        model: &StructuralModel,
    ) -> Result<RunSummary, SmellError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("detector_run", %run_id, policy = %self.policy);

        async move {
            let started = Instant::now();
            info!(detectors = detectors.len(), "running detectors");

            let runs = detectors.iter().map(|d| self.run_one(d, model));
            let (reports, failures) = match self.policy {
                FailurePolicy::Abort => (try_join_all(runs).await?, Vec::new()),
                FailurePolicy::Isolate => {
                    let mut reports = Vec::with_capacity(detectors.len());
                    let mut failures = Vec::new();
                    for (detector, outcome) in detectors.iter().zip(join_all(runs).await) {
                        match outcome {
                            Ok(report) => reports.push(report),
                            Err(error) => failures.push(DetectorFailure {
                                detector_name: detector.name().to_owned(),
                                error,
                            }),
                        }
                    }
                    (reports, failures)
                }
            };

            let summary = RunSummary {
                run_id,
                reports,
                failures,
                elapsed: started.elapsed(),
            };
            info!(
                reports = summary.reports.len(),
                failures = summary.failures.len(),
                incidents = summary.incident_count(),
                elapsed_ms = summary.elapsed.as_millis() as u64,
                "detector run finished"
            );
            Ok::<_, SmellError>(summary)
        }
        .instrument(span)
        .await
    }

    /// 탐지기 하나를 실행하고 보고서를 만듭니다.
    async fn run_one(
        &self,
        loaded: &LoadedDetector,
        model: &StructuralModel,
    ) -> Result<IncidentReport, DetectorError> {
        let name = loaded.name();
        let started = Instant::now();

        let future = loaded.detector().detect(model);
        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, future).await {
                Ok(outcome) => outcome.map_err(|e| execution_error(name, e)),
                Err(_) => Err(DetectorError::Timeout {
                    name: name.to_owned(),
                    secs: limit.as_secs(),
                }),
            },
            None => future.await.map_err(|e| execution_error(name, e)),
        };

        let time = started.elapsed();
        histogram!(m::DETECTOR_DURATION_SECONDS, m::LABEL_DETECTOR => name.to_owned())
            .record(time.as_secs_f64());

        match outcome {
            Ok(mut incidents) => {
                for incident in &mut incidents {
                    incident.smell = name.to_owned();
                }
                counter!(m::INCIDENTS_REPORTED_TOTAL, m::LABEL_DETECTOR => name.to_owned())
                    .increment(incidents.len() as u64);
                debug!(
                    detector = name,
                    incidents = incidents.len(),
                    time_ms = time.as_millis() as u64,
                    "detector finished"
                );
                Ok(IncidentReport {
                    detector_name: name.to_owned(),
                    incidents,
                    time,
                })
            }
            Err(e) => {
                counter!(m::DETECTOR_FAILURES_TOTAL, m::LABEL_DETECTOR => name.to_owned())
                    .increment(1);
                warn!(detector = name, error = %e, "detector failed");
                Err(e)
            }
        }
    }
}

/// 탐지기가 반환한 에러를 탐지기 이름이 포함된 [`DetectorError`]로 변환합니다.
fn execution_error(name: &str, error: SmellError) -> DetectorError {
    match error {
        SmellError::Detector(e) => e,
        other => DetectorError::Execution {
            name: name.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use smellscope_core::Detector;
    use smellscope_core::types::SourceLocation;

    /// 지연 후 인시던트 하나를 보고하는 탐지기
    struct Delayed {
        delay: Duration,
        label: &'static str,
    }

    impl Detector for Delayed {
        async fn detect(&self, _model: &StructuralModel) -> Result<Vec<Incident>, SmellError> {
            tokio::time::sleep(self.delay).await;
            Ok(vec![Incident::new(location(), self.label, 3)])
        }
    }

    struct Failing;

    impl Detector for Failing {
        async fn detect(&self, _model: &StructuralModel) -> Result<Vec<Incident>, SmellError> {
            Err(SmellError::Io(std::io::Error::other("disk on fire")))
        }
    }

    struct Hung;

    impl Detector for Hung {
        async fn detect(&self, _model: &StructuralModel) -> Result<Vec<Incident>, SmellError> {
            std::future::pending::<()>().await;
            Ok(Vec::new())
        }
    }

    fn location() -> SourceLocation {
        SourceLocation {
            file: "a.cpp".to_owned(),
            line: 1,
            col: 1,
            structure_id: "A".to_owned(),
            method_id: "A::f".to_owned(),
        }
    }

    fn loaded(name: &str, detector: impl Detector + 'static) -> LoadedDetector {
        LoadedDetector::new(name, format!("smells/{name}.js"), Value::Null, Box::new(detector))
    }

    fn delayed(name: &'static str, millis: u64) -> LoadedDetector {
        loaded(
            name,
            Delayed {
                delay: Duration::from_millis(millis),
                label: name,
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn reports_follow_config_order_not_completion_order() {
        let detectors = vec![delayed("slow", 300), delayed("fast", 10), delayed("medium", 100)];
        let summary = DetectorRuntime::default()
            .run_all(&detectors, &StructuralModel::default())
            .await
            .unwrap();

        let names: Vec<_> = summary
            .reports
            .iter()
            .map(|r| r.detector_name.as_str())
            .collect();
        assert_eq!(names, vec!["slow", "fast", "medium"]);
        assert!(summary.reports[0].time >= Duration::from_millis(300));
        // 동시 실행이므로 전체 시간은 가장 느린 탐지기와 같음
        assert!(summary.elapsed < Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn incidents_are_stamped_with_detector_name() {
        let detectors = vec![delayed("first", 5), delayed("second", 1)];
        let summary = DetectorRuntime::default()
            .run_all(&detectors, &StructuralModel::default())
            .await
            .unwrap();

        let smells: Vec<_> = summary.incidents().into_iter().map(|i| i.smell).collect();
        assert_eq!(smells, vec!["first", "second"]);
        assert_eq!(summary.incident_count(), 2);
        assert!(summary.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn abort_policy_fails_whole_batch() {
        let detectors = vec![delayed("ok", 10), loaded("broken", Failing)];
        let err = DetectorRuntime::new(FailurePolicy::Abort, None)
            .run_all(&detectors, &StructuralModel::default())
            .await
            .unwrap_err();

        match err {
            SmellError::Detector(DetectorError::Execution { name, reason }) => {
                assert_eq!(name, "broken");
                assert!(reason.contains("disk on fire"), "{reason}");
            }
            other => panic!("expected execution error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn isolate_policy_keeps_sibling_reports() {
        let detectors = vec![delayed("a", 10), loaded("broken", Failing), delayed("b", 1)];
        let summary = DetectorRuntime::new(FailurePolicy::Isolate, None)
            .run_all(&detectors, &StructuralModel::default())
            .await
            .unwrap();

        let names: Vec<_> = summary
            .reports
            .iter()
            .map(|r| r.detector_name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].detector_name, "broken");
        assert!(!summary.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_fails_hung_detector() {
        let detectors = vec![delayed("ok", 10), loaded("hung", Hung)];
        let runtime = DetectorRuntime::new(FailurePolicy::Isolate, Some(Duration::from_secs(2)));
        let summary = runtime
            .run_all(&detectors, &StructuralModel::default())
            .await
            .unwrap();

        assert_eq!(summary.reports.len(), 1);
        assert!(matches!(
            &summary.failures[0].error,
            DetectorError::Timeout { name, secs: 2 } if name == "hung"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_under_abort_is_an_error() {
        let detectors = vec![loaded("hung", Hung)];
        let runtime = DetectorRuntime::new(FailurePolicy::Abort, Some(Duration::from_secs(1)));
        let err = runtime
            .run_all(&detectors, &StructuralModel::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SmellError::Detector(DetectorError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn empty_detector_list_yields_empty_summary() {
        let summary = DetectorRuntime::default()
            .run_all(&[], &StructuralModel::default())
            .await
            .unwrap();
        assert!(summary.reports.is_empty());
        assert!(summary.incidents().is_empty());
    }

    #[test]
    fn from_config_maps_zero_timeout_to_none() {
        let runtime = DetectorRuntime::from_config(&RuntimeConfig::default());
        assert_eq!(runtime.policy(), FailurePolicy::Abort);
        assert_eq!(runtime.timeout(), None);
    }
}
