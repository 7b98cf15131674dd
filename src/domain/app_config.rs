// ==========================================
// CCS 质量合规系统 - 业务参数
// ==========================================
// 职责: 当前查看月份 + 标准/自定义两套合格区间
// ==========================================

use serde::{Deserialize, Serialize};

/// 业务参数
///
/// 两套合格区间相互独立：
/// - 标准区间 min_range/max_range 配合 ccs_fixed 方案
/// - 自定义区间 custom_min_range/custom_max_range 配合 ccs_custom 方案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub year: i32,
    pub month: u32,
    pub min_range: f64,
    pub max_range: f64,
    pub custom_min_range: f64,
    pub custom_max_range: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            year: 1403,
            month: 11,
            min_range: 260.0,
            max_range: 310.0,
            custom_min_range: 260.0,
            custom_max_range: 310.0,
        }
    }
}

// ==========================================
// ReportRange - 报表月份区间（闭区间）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRange {
    pub start_year: i32,
    pub start_month: u32,
    pub end_year: i32,
    pub end_month: u32,
}

impl ReportRange {
    pub fn new(start_year: i32, start_month: u32, end_year: i32, end_month: u32) -> Self {
        Self {
            start_year,
            start_month,
            end_year,
            end_month,
        }
    }

    /// 单月区间
    pub fn single_month(year: i32, month: u32) -> Self {
        Self::new(year, month, year, month)
    }

    /// 起止月份均在 1..=12 内
    pub fn has_valid_months(&self) -> bool {
        (1..=12).contains(&self.start_month) && (1..=12).contains(&self.end_month)
    }

    /// (year, month) 是否落在区间内
    pub fn contains(&self, year: i32, month: u32) -> bool {
        (year, month) >= (self.start_year, self.start_month)
            && (year, month) <= (self.end_year, self.end_month)
    }

    /// 按月展开区间，12 月之后回到下一年 1 月
    ///
    /// 终点早于起点时返回空列表
    pub fn months(&self) -> Vec<(i32, u32)> {
        let mut months = Vec::new();
        let (mut year, mut month) = (self.start_year, self.start_month);

        while (year, month) <= (self.end_year, self.end_month) {
            months.push((year, month));
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }

        months
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_months_wraps_year() {
        let range = ReportRange::new(1402, 11, 1403, 2);
        assert_eq!(
            range.months(),
            vec![(1402, 11), (1402, 12), (1403, 1), (1403, 2)]
        );
    }

    #[test]
    fn test_end_before_start_is_empty() {
        let range = ReportRange::new(1403, 5, 1403, 4);
        assert!(range.months().is_empty());
        assert!(!range.contains(1403, 5));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = ReportRange::new(1403, 1, 1403, 12);
        assert!(range.contains(1403, 1));
        assert!(range.contains(1403, 12));
        assert!(!range.contains(1404, 1));
    }

    #[test]
    fn test_month_bounds() {
        assert!(ReportRange::single_month(1403, 12).has_valid_months());
        assert!(!ReportRange::new(1403, 0, 1403, 5).has_valid_months());
        assert!(!ReportRange::new(1403, 1, 1403, 13).has_valid_months());
        assert!(!ReportRange::single_month(1403, 13).has_valid_months());
    }

    #[test]
    fn test_default_config_bands() {
        let config = AppConfig::default();
        assert_eq!(config.min_range, 260.0);
        assert_eq!(config.custom_max_range, 310.0);
    }
}
