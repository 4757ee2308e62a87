//! 인시던트 정렬 및 집계 통계
//!
//! 표시 계층이 사용하는 순수 함수들입니다. 입력 목록은 변경하지 않고
//! 정렬된 사본 또는 집계 결과를 반환합니다.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::types::Incident;

/// 정렬 기준
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// 스멜 강도
    #[default]
    Intensity,
    /// 스멜 종류 (탐지기 이름)
    Type,
    /// 소스 파일
    File,
    /// 소유 구조
    Class,
    /// 메시지
    Note,
}

/// 정렬 방향
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Increasing,
    #[default]
    Decreasing,
}

/// 기준과 방향에 따라 정렬된 인시던트 사본을 반환합니다.
///
/// 안정 정렬이므로 같은 키의 인시던트는 원래 순서를 유지합니다.
pub fn sort_incidents(incidents: &[Incident], key: SortKey, order: SortOrder) -> Vec<Incident> {
    let mut sorted = incidents.to_vec();
    sorted.sort_by(|a, b| {
        let ord = match key {
            SortKey::Intensity => a.lvl.cmp(&b.lvl),
            SortKey::Type => a.smell.cmp(&b.smell),
            SortKey::File => (&a.src.file, a.src.line, a.src.col).cmp(&(
                &b.src.file,
                b.src.line,
                b.src.col,
            )),
            SortKey::Class => a.src.structure_id.cmp(&b.src.structure_id),
            SortKey::Note => a.msg.cmp(&b.msg),
        };
        match order {
            SortOrder::Increasing => ord,
            SortOrder::Decreasing => ord.reverse(),
        }
    });
    sorted
}

/// 그룹별 집계
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    /// 그룹 키 (구조 ID, 파일, 스멜 이름)
    pub key: String,
    /// 인시던트 수
    pub count: usize,
    /// 최대 강도
    pub max_level: u8,
    /// 강도 합계
    pub total_level: u64,
}

/// 인시던트 목록 전체 통계
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SmellStats {
    /// 전체 인시던트 수
    pub total: usize,
    /// 최대 강도
    pub max_level: u8,
    /// 평균 강도
    pub mean_level: f64,
    /// 강도별 인시던트 수
    pub by_level: BTreeMap<u8, usize>,
    /// 스멜 종류별 (인시던트 수 내림차순)
    pub by_smell: Vec<GroupStats>,
    /// 구조별 (인시던트 수 내림차순)
    pub by_structure: Vec<GroupStats>,
    /// 파일별 (인시던트 수 내림차순)
    pub by_file: Vec<GroupStats>,
}

impl SmellStats {
    /// 인시던트 목록에서 통계를 계산합니다.
    pub fn compute(incidents: &[Incident]) -> Self {
        if incidents.is_empty() {
            return Self::default();
        }

        let mut by_level = BTreeMap::new();
        let mut level_sum = 0u64;
        for incident in incidents {
            *by_level.entry(incident.lvl).or_insert(0) += 1;
            level_sum += u64::from(incident.lvl);
        }

        Self {
            total: incidents.len(),
            max_level: incidents.iter().map(|i| i.lvl).max().unwrap_or(0),
            mean_level: level_sum as f64 / incidents.len() as f64,
            by_level,
            by_smell: group_by(incidents, |i| &i.smell),
            by_structure: group_by(incidents, |i| &i.src.structure_id),
            by_file: group_by(incidents, |i| &i.src.file),
        }
    }
}

fn group_by<F>(incidents: &[Incident], key_of: F) -> Vec<GroupStats>
where
    F: Fn(&Incident) -> &String,
{
    let mut groups: BTreeMap<&str, GroupStats> = BTreeMap::new();
    for incident in incidents {
        let key = key_of(incident);
        let group = groups.entry(key.as_str()).or_insert_with(|| GroupStats {
            key: key.clone(),
            count: 0,
            max_level: 0,
            total_level: 0,
        });
        group.count += 1;
        group.max_level = group.max_level.max(incident.lvl);
        group.total_level += u64::from(incident.lvl);
    }

    let mut groups: Vec<_> = groups.into_values().collect();
    // 동률이면 BTreeMap 순서(키 오름차순)가 유지됨
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intensity => write!(f, "intensity"),
            Self::Type => write!(f, "type"),
            Self::File => write!(f, "file"),
            Self::Class => write!(f, "class"),
            Self::Note => write!(f, "note"),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increasing => write!(f, "increasing"),
            Self::Decreasing => write!(f, "decreasing"),
        }
    }
}
