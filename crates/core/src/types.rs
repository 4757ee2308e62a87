//! 도메인 타입 — 인시던트와 탐지기 보고서
//!
//! 탐지기가 생성하고 캐시와 CLI가 소비하는 데이터 구조를 정의합니다.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::MethodRef;

/// 인시던트 소스 위치
///
/// 모델 엔티티에 기록된 위치 정보로부터 만들어집니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub col: u32,
    pub structure_id: String,
    pub method_id: String,
}

impl SourceLocation {
    /// 메서드의 `src_info`와 소유 구조/메서드 ID로 위치를 만듭니다.
    pub fn of_method(method: &MethodRef<'_>) -> Self {
        let src = &method.method.src_info;
        Self {
            file: src.file.clone(),
            line: src.line,
            col: src.col,
            structure_id: method.structure_id.to_owned(),
            method_id: method.method_id.to_owned(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

/// 코드 스멜 인시던트
///
/// 특정 위치에서 보고된 스멜 한 건입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    /// 소스 위치
    pub src: SourceLocation,
    /// 사람이 읽을 수 있는 설명
    pub msg: String,
    /// 스멜 강도 (0 = 스멜 아님)
    pub lvl: u8,
    /// 보고한 탐지기 이름 (런타임이 기록)
    #[serde(default)]
    pub smell: String,
}

impl Incident {
    pub fn new(src: SourceLocation, msg: impl Into<String>, lvl: u8) -> Self {
        Self {
            src,
            msg: msg.into(),
            lvl,
            smell: String::new(),
        }
    }
}

impl fmt::Display for Incident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[lvl {}] {} {}", self.lvl, self.src, self.msg)
    }
}

/// 탐지기 하나의 실행 결과
#[derive(Debug, Clone, Serialize)]
pub struct IncidentReport {
    /// 탐지기 이름
    pub detector_name: String,
    /// 보고된 인시던트
    pub incidents: Vec<Incident>,
    /// 실행 시간 (직렬화 시 밀리초)
    #[serde(serialize_with = "serialize_millis")]
    pub time: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64() * 1000.0)
}

/// 보고서 목록을 실행 순서대로 하나의 인시던트 목록으로 평탄화합니다.
pub fn flatten_reports(reports: &[IncidentReport]) -> Vec<Incident> {
    reports
        .iter()
        .flat_map(|r| r.incidents.iter().cloned())
        .collect()
}
