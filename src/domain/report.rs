// ==========================================
// CCS 质量合规系统 - 统计结果对象
// ==========================================
// 职责: 周窗口统计 / 月汇总 / 区间报表
// 红线: 纯计算结果，按需重算，不缓存
// ==========================================

use crate::domain::app_config::ReportRange;
use crate::domain::rule::Rule;
use crate::domain::types::RuleType;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// 无样本窗口的标签
pub const NO_DATA_LABEL: &str = "no data";

/// 合规率未命中任何规则的标签
pub const NO_RULE_LABEL: &str = "no rule";

// ==========================================
// 周窗口 (Week Window)
// ==========================================
// 报表约定，与月份实际天数无关：
// 1-7 / 8-14 / 15-22 / 23-31，22 日只属于第 3 窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekWindow {
    /// 窗口序号 (1..=4)
    pub index: u8,
    pub first_day: u32,
    pub last_day: u32,
}

impl WeekWindow {
    pub fn contains(&self, day: u32) -> bool {
        day >= self.first_day && day <= self.last_day
    }

    /// 某日所属窗口
    pub fn for_day(day: u32) -> Option<WeekWindow> {
        WEEK_WINDOWS.iter().copied().find(|w| w.contains(day))
    }
}

/// 固定周窗口
pub const WEEK_WINDOWS: [WeekWindow; 4] = [
    WeekWindow { index: 1, first_day: 1, last_day: 7 },
    WeekWindow { index: 2, first_day: 8, last_day: 14 },
    WeekWindow { index: 3, first_day: 15, last_day: 22 },
    WeekWindow { index: 4, first_day: 23, last_day: 31 },
];

// ==========================================
// RuleVerdict - 规则判定结果
// ==========================================
// NoData 与 NoRule 都按系数 0 计算影响，但必须显式区分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "rule", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleVerdict {
    /// 窗口内无有效样本
    NoData,
    /// 有样本但合规率未命中任何规则
    NoRule,
    /// 命中规则
    Matched(Rule),
}

impl RuleVerdict {
    /// 生效系数（未命中为 0）
    pub fn factor(&self) -> f64 {
        match self {
            RuleVerdict::Matched(rule) => rule.factor,
            _ => 0.0,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RuleVerdict::NoData => NO_DATA_LABEL,
            RuleVerdict::NoRule => NO_RULE_LABEL,
            RuleVerdict::Matched(rule) => &rule.label,
        }
    }

    pub fn rule(&self) -> Option<&Rule> {
        match self {
            RuleVerdict::Matched(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn rule_type(&self) -> Option<RuleType> {
        self.rule().map(|r| r.rule_type)
    }

    /// 是否整批拒收（仅命中规则且系数 <= -100）
    pub fn is_rejection(&self) -> bool {
        self.rule().map(Rule::is_rejection).unwrap_or(false)
    }
}

// ==========================================
// 区间计数
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandCounts {
    pub in_range: u32,
    pub low: u32,
    pub high: u32,
}

// ==========================================
// 单区间统计（标准 / 自定义）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandStats {
    pub counts: BandCounts,
    /// 合规率（%），无样本为 0
    pub pct: f64,
    pub verdict: RuleVerdict,
    /// 影响吨位 = 总吨位 × 系数 / 100
    pub impact: f64,
}

impl BandStats {
    /// 无样本时的区间统计
    pub fn no_data() -> Self {
        Self {
            counts: BandCounts::default(),
            pct: 0.0,
            verdict: RuleVerdict::NoData,
            impact: 0.0,
        }
    }

    pub fn factor(&self) -> f64 {
        self.verdict.factor()
    }

    pub fn is_rejection(&self) -> bool {
        self.verdict.is_rejection()
    }

    pub fn label(&self) -> &str {
        self.verdict.label()
    }
}

// ==========================================
// WeekStats - 窗口统计
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekStats {
    /// 有效样本总数（聚合后）
    pub total_count: u32,
    /// 标准区间 + ccs_fixed 方案
    pub fixed: BandStats,
    /// 自定义区间 + ccs_custom 方案
    pub custom: BandStats,
    pub total_tonnage: f64,
}

impl WeekStats {
    pub fn has_data(&self) -> bool {
        self.total_count > 0
    }

    pub fn impact_totals(&self) -> ImpactTotals {
        ImpactTotals {
            fixed: self.fixed.impact,
            custom: self.custom.impact,
            tonnage: self.total_tonnage,
        }
    }
}

// ==========================================
// ImpactTotals - 影响吨位合计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactTotals {
    pub fixed: f64,
    pub custom: f64,
    pub tonnage: f64,
}

impl Add for ImpactTotals {
    type Output = ImpactTotals;

    fn add(self, rhs: ImpactTotals) -> ImpactTotals {
        ImpactTotals {
            fixed: self.fixed + rhs.fixed,
            custom: self.custom + rhs.custom,
            tonnage: self.tonnage + rhs.tonnage,
        }
    }
}

impl AddAssign for ImpactTotals {
    fn add_assign(&mut self, rhs: ImpactTotals) {
        self.fixed += rhs.fixed;
        self.custom += rhs.custom;
        self.tonnage += rhs.tonnage;
    }
}

// ==========================================
// 报表对象
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekReport {
    pub window: WeekWindow,
    pub stats: WeekStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthReport {
    pub year: i32,
    pub month: u32,
    /// 固定 4 个窗口（空窗口为 no data）
    pub weeks: Vec<WeekReport>,
    /// 各窗口影响之和
    pub totals: ImpactTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub range: ReportRange,
    /// 区间内全部月份的合计
    pub summary: ImpactTotals,
    pub months: Vec<MonthReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CompareOp;

    #[test]
    fn test_week_window_boundaries() {
        assert_eq!(WeekWindow::for_day(7).unwrap().index, 1);
        assert_eq!(WeekWindow::for_day(8).unwrap().index, 2);
        assert_eq!(WeekWindow::for_day(22).unwrap().index, 3);
        assert_eq!(WeekWindow::for_day(23).unwrap().index, 4);
        assert_eq!(WeekWindow::for_day(31).unwrap().index, 4);
        assert!(WeekWindow::for_day(0).is_none());
        assert!(WeekWindow::for_day(32).is_none());
    }

    #[test]
    fn test_no_rule_distinct_from_zero_factor() {
        let zero = RuleVerdict::Matched(Rule::new(
            75.0,
            CompareOp::Gt,
            80.0,
            CompareOp::Lt,
            "合格",
            RuleType::Success,
            0.0,
        ));
        assert_eq!(zero.factor(), RuleVerdict::NoRule.factor());
        assert_ne!(zero, RuleVerdict::NoRule);
        assert_eq!(RuleVerdict::NoRule.label(), NO_RULE_LABEL);
        assert_eq!(RuleVerdict::NoData.label(), NO_DATA_LABEL);
        assert!(!RuleVerdict::NoRule.is_rejection());
    }

    #[test]
    fn test_impact_totals_add() {
        let mut total = ImpactTotals::default();
        total += ImpactTotals { fixed: 5.0, custom: 0.0, tonnage: 1000.0 };
        total = total + ImpactTotals { fixed: -2.0, custom: 1.0, tonnage: 500.0 };
        assert_eq!(total, ImpactTotals { fixed: 3.0, custom: 1.0, tonnage: 1500.0 });
    }
}
