//! 메트릭 상수
//!
//! 모든 메트릭의 이름을 중앙에서 정의합니다.
//! 엔진은 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 레코더 설치 여부는 바이너리가 결정합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `smellscope_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(smellscope_core::metrics::DETECTORS_LOADED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 탐지기 이름 레이블 키
pub const LABEL_DETECTOR: &str = "detector";

/// 결과 레이블 키 (hit, miss)
pub const LABEL_RESULT: &str = "result";

// ─── Registry 메트릭 ───────────────────────────────────────────────

/// Registry: 로드된 탐지기 수 (counter)
pub const DETECTORS_LOADED_TOTAL: &str = "smellscope_detectors_loaded_total";

/// Registry: 로드 실패로 건너뛴 탐지기 수 (counter)
pub const DETECTORS_SKIPPED_TOTAL: &str = "smellscope_detectors_skipped_total";

// ─── Runtime 메트릭 ────────────────────────────────────────────────

/// Runtime: 탐지기 실행 시간 (histogram, 초, label: detector)
pub const DETECTOR_DURATION_SECONDS: &str = "smellscope_detector_duration_seconds";

/// Runtime: 탐지기 실패 수 (counter, label: detector)
pub const DETECTOR_FAILURES_TOTAL: &str = "smellscope_detector_failures_total";

/// Runtime: 보고된 인시던트 수 (counter, label: detector)
pub const INCIDENTS_REPORTED_TOTAL: &str = "smellscope_incidents_reported_total";

// ─── Cache 메트릭 ──────────────────────────────────────────────────

/// Cache: 캐시 조회 수 (counter, label: result)
pub const CACHE_LOOKUPS_TOTAL: &str = "smellscope_cache_lookups_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더가 설치되지 않았으면 아무 일도 하지 않습니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        DETECTORS_LOADED_TOTAL,
        "Detectors bound from the detector config"
    );
    describe_counter!(
        DETECTORS_SKIPPED_TOTAL,
        "Detector config entries skipped because they failed to load"
    );
    describe_histogram!(
        DETECTOR_DURATION_SECONDS,
        "Wall-clock time of a single detector run in seconds"
    );
    describe_counter!(DETECTOR_FAILURES_TOTAL, "Detector runs that failed or timed out");
    describe_counter!(INCIDENTS_REPORTED_TOTAL, "Incidents reported per detector");
    describe_counter!(CACHE_LOOKUPS_TOTAL, "Incident cache lookups by result");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_share_prefix() {
        for name in [
            DETECTORS_LOADED_TOTAL,
            DETECTORS_SKIPPED_TOTAL,
            DETECTOR_DURATION_SECONDS,
            DETECTOR_FAILURES_TOTAL,
            INCIDENTS_REPORTED_TOTAL,
            CACHE_LOOKUPS_TOTAL,
        ] {
            assert!(name.starts_with("smellscope_"), "{name}");
        }
    }

    #[test]
    fn describe_without_recorder_is_noop() {
        describe_all();
    }
}
