//! 스멜 강도 계산
//!
//! 측정값을 `0..=MAX_SMELL_LEVEL` 범위의 강도로 매핑합니다.
//! 탐지기와 무관한 순수 함수이며 `value`에 대해 단조 증가합니다.

/// 최대 스멜 강도
pub const MAX_SMELL_LEVEL: u8 = 10;

/// 측정값의 스멜 강도를 계산합니다.
///
/// - `value < min` → 0 (스멜 아님)
/// - `value >= max` → [`MAX_SMELL_LEVEL`]
/// - 그 사이 → `1..MAX_SMELL_LEVEL` 구간을 선형으로 나눈 단계
///
/// NaN 입력은 0을 반환합니다.
pub fn get_smell_lvl(min: f64, max: f64, value: f64) -> u8 {
    if value.is_nan() || min.is_nan() || max.is_nan() || value < min {
        return 0;
    }
    if value >= max {
        return MAX_SMELL_LEVEL;
    }

    // 여기서 min <= value < max 이므로 max - min > 0
    let ratio = (value - min) / (max - min);
    let steps = f64::from(MAX_SMELL_LEVEL - 1);
    let tier = 1.0 + (ratio * steps).floor();
    tier.clamp(1.0, steps) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_min_is_zero() {
        assert_eq!(get_smell_lvl(3.0, 10.0, 0.0), 0);
        assert_eq!(get_smell_lvl(3.0, 10.0, 2.999), 0);
        assert_eq!(get_smell_lvl(3.0, 10.0, -5.0), 0);
    }

    #[test]
    fn at_or_above_max_is_max_tier() {
        assert_eq!(get_smell_lvl(3.0, 10.0, 10.0), MAX_SMELL_LEVEL);
        assert_eq!(get_smell_lvl(3.0, 10.0, 12.0), MAX_SMELL_LEVEL);
    }

    #[test]
    fn at_min_is_lowest_smell_tier() {
        assert_eq!(get_smell_lvl(3.0, 10.0, 3.0), 1);
    }

    #[test]
    fn between_is_intermediate() {
        let lvl = get_smell_lvl(0.0, 10.0, 5.0);
        assert!(lvl > 1 && lvl < MAX_SMELL_LEVEL, "got {lvl}");
        assert_eq!(lvl, 5);
        assert_eq!(get_smell_lvl(0.0, 10.0, 9.99), MAX_SMELL_LEVEL - 1);
    }

    #[test]
    fn degenerate_range_jumps_to_max() {
        assert_eq!(get_smell_lvl(5.0, 5.0, 4.0), 0);
        assert_eq!(get_smell_lvl(5.0, 5.0, 5.0), MAX_SMELL_LEVEL);
        assert_eq!(get_smell_lvl(8.0, 2.0, 8.0), MAX_SMELL_LEVEL);
        assert_eq!(get_smell_lvl(8.0, 2.0, 7.0), 0);
    }

    #[test]
    fn nan_is_zero() {
        assert_eq!(get_smell_lvl(f64::NAN, 10.0, 5.0), 0);
        assert_eq!(get_smell_lvl(0.0, 10.0, f64::NAN), 0);
    }

    #[test]
    fn monotonic_over_grid() {
        let ranges = [(0.0, 1.0), (3.0, 10.0), (2.5, 7.25), (10.0, 3.0), (4.0, 4.0)];
        for (min, max) in ranges {
            let mut prev = 0u8;
            let mut v = -5.0;
            while v <= 20.0 {
                let lvl = get_smell_lvl(min, max, v);
                assert!(
                    lvl >= prev,
                    "not monotonic at ({min}, {max}, {v}): {lvl} < {prev}"
                );
                assert!(lvl <= MAX_SMELL_LEVEL);
                prev = lvl;
                v += 0.125;
            }
        }
    }
}
