// ==========================================
// CCS 质量合规系统 - 区间汇总引擎
// ==========================================
// 职责: 日记录 → 按月分组 → 按固定周窗口分组 → 窗口统计 → 月/区间合计
// 输入: 任意日记录集合 + 业务参数 + 规则方案 + 采样模式
// 输出: ImpactTotals / MonthReport / PeriodReport
// 红线: 区间合计 = 各月合计之和 = 各窗口影响之和，顶层不做任何再归一
// ==========================================

use crate::domain::app_config::{AppConfig, ReportRange};
use crate::domain::record::DailyRecord;
use crate::domain::report::{ImpactTotals, MonthReport, PeriodReport, WeekReport, WEEK_WINDOWS};
use crate::domain::rule::Profile;
use crate::domain::types::SamplingMode;
use crate::engine::period_stats::PeriodStatsEngine;
use std::collections::BTreeMap;

// ==========================================
// RangeAggregator - 区间汇总引擎
// ==========================================
#[derive(Default)]
pub struct RangeAggregator {
    stats_engine: PeriodStatsEngine,
}

impl RangeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================
    // 合计
    // ==========================================

    /// 全部记录的影响合计
    ///
    /// 按 (年, 月) 升序逐月累加，每月按窗口 1..4 累加非空窗口。
    /// 空集合返回全 0。
    pub fn calculate_total_impact(
        &self,
        records: &[DailyRecord],
        config: &AppConfig,
        profiles: &[Profile],
        mode: SamplingMode,
    ) -> ImpactTotals {
        let mut totals = ImpactTotals::default();

        for month_records in group_by_month(records).values() {
            totals += self.month_totals(month_records, config, profiles, mode);
        }

        totals
    }

    /// 单月的影响合计（窗口 1..4 中的非空窗口之和）
    fn month_totals(
        &self,
        month_records: &[&DailyRecord],
        config: &AppConfig,
        profiles: &[Profile],
        mode: SamplingMode,
    ) -> ImpactTotals {
        let mut totals = ImpactTotals::default();

        for window in WEEK_WINDOWS.iter() {
            let window_records = records_in_window(month_records, window.first_day, window.last_day);
            if window_records.is_empty() {
                continue;
            }
            let stats = self
                .stats_engine
                .calculate(window_records, config, profiles, mode);
            totals += stats.impact_totals();
        }

        totals
    }

    // ==========================================
    // 报表
    // ==========================================

    /// 单月报表：固定 4 个窗口，空窗口为 no data
    pub fn month_report(
        &self,
        records: &[DailyRecord],
        year: i32,
        month: u32,
        config: &AppConfig,
        profiles: &[Profile],
        mode: SamplingMode,
    ) -> MonthReport {
        let month_records = Self::records_in_month(records, year, month);

        let weeks: Vec<WeekReport> = WEEK_WINDOWS
            .iter()
            .map(|window| {
                let window_records =
                    records_in_window(&month_records, window.first_day, window.last_day);
                WeekReport {
                    window: *window,
                    stats: self
                        .stats_engine
                        .calculate(window_records, config, profiles, mode),
                }
            })
            .collect();

        MonthReport {
            year,
            month,
            weeks,
            totals: self.month_totals(&month_records, config, profiles, mode),
        }
    }

    /// 区间报表
    ///
    /// 月份按 (start_year, start_month) → (end_year, end_month) 逐月推进（闭区间）；
    /// 终点早于起点时返回空报表。
    pub fn build_period_report(
        &self,
        records: &[DailyRecord],
        range: ReportRange,
        config: &AppConfig,
        profiles: &[Profile],
        mode: SamplingMode,
    ) -> PeriodReport {
        let months: Vec<MonthReport> = range
            .months()
            .into_iter()
            .map(|(year, month)| self.month_report(records, year, month, config, profiles, mode))
            .collect();

        let mut summary = ImpactTotals::default();
        for month in &months {
            summary += month.totals;
        }

        tracing::debug!(
            months = months.len(),
            fixed = summary.fixed,
            custom = summary.custom,
            tonnage = summary.tonnage,
            "区间报表计算完成"
        );

        PeriodReport {
            range,
            summary,
            months,
        }
    }

    /// 当前月份视图的影响合计
    pub fn month_impacts(
        &self,
        records: &[DailyRecord],
        year: i32,
        month: u32,
        config: &AppConfig,
        profiles: &[Profile],
        mode: SamplingMode,
    ) -> ImpactTotals {
        let month_records = Self::records_in_month(records, year, month);
        self.month_totals(&month_records, config, profiles, mode)
    }

    // ==========================================
    // 过滤
    // ==========================================

    /// 指定年月的记录（保持原顺序）
    pub fn records_in_month(records: &[DailyRecord], year: i32, month: u32) -> Vec<&DailyRecord> {
        records
            .iter()
            .filter(|r| {
                r.date_key()
                    .map(|k| k.year == year && k.month == month)
                    .unwrap_or(false)
            })
            .collect()
    }
}

/// 按 (年, 月) 分组，无法解析日期的记录被忽略
fn group_by_month(records: &[DailyRecord]) -> BTreeMap<(i32, u32), Vec<&DailyRecord>> {
    let mut months: BTreeMap<(i32, u32), Vec<&DailyRecord>> = BTreeMap::new();

    for record in records {
        match record.date_key() {
            Some(key) => months.entry((key.year, key.month)).or_default().push(record),
            None => {
                tracing::warn!(date = %record.date_str, "日记录日期无法解析，未计入汇总");
            }
        }
    }

    months
}

/// 日期落在 [first_day, last_day] 的记录
fn records_in_window<'a>(
    month_records: &[&'a DailyRecord],
    first_day: u32,
    last_day: u32,
) -> Vec<&'a DailyRecord> {
    month_records
        .iter()
        .copied()
        .filter(|r| {
            r.date_key()
                .map(|k| k.day >= first_day && k.day <= last_day)
                .unwrap_or(false)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::DataPoint;
    use crate::domain::report::RuleVerdict;
    use crate::domain::rule::default_profiles;

    fn record(date: &str, tonnage: f64, values: &[f64]) -> DailyRecord {
        let mut r = DailyRecord::empty(date);
        r.tonnage = tonnage;
        r.data_points = values
            .iter()
            .enumerate()
            .map(|(i, v)| DataPoint::new(format!("{:02}:00", (6 + 2 * i) % 24), *v))
            .collect();
        r
    }

    #[test]
    fn test_empty_input_is_zero() {
        let totals = RangeAggregator::new().calculate_total_impact(
            &[],
            &AppConfig::default(),
            &default_profiles(),
            SamplingMode::TwoHour,
        );
        assert_eq!(totals, ImpactTotals { fixed: 0.0, custom: 0.0, tonnage: 0.0 });
    }

    #[test]
    fn test_day_22_in_third_window_only() {
        let records = vec![record("1403/11/22", 100.0, &[300.0])];
        let report = RangeAggregator::new().month_report(
            &records,
            1403,
            11,
            &AppConfig::default(),
            &default_profiles(),
            SamplingMode::TwoHour,
        );

        assert_eq!(report.weeks.len(), 4);
        assert_eq!(report.weeks[2].stats.total_count, 1);
        assert_eq!(report.weeks[3].stats.total_count, 0);
        assert_eq!(report.weeks[3].stats.fixed.verdict, RuleVerdict::NoData);
        assert_eq!(report.totals.tonnage, 100.0);
    }

    #[test]
    fn test_windows_evaluated_separately() {
        // 第 1 窗口全部合格（奖 2%），第 2 窗口全部不合格（拒收）
        let records = vec![
            record("1403/11/01", 1000.0, &[300.0, 300.0]),
            record("1403/11/08", 1000.0, &[200.0, 200.0]),
        ];
        let aggregator = RangeAggregator::new();
        let config = AppConfig::default();
        let profiles = default_profiles();

        let totals =
            aggregator.calculate_total_impact(&records, &config, &profiles, SamplingMode::TwoHour);
        assert_eq!(totals.fixed, 20.0 - 1000.0);
        assert_eq!(totals.tonnage, 2000.0);

        let report =
            aggregator.month_report(&records, 1403, 11, &config, &profiles, SamplingMode::TwoHour);
        assert!(report.weeks[1].stats.fixed.is_rejection());
        assert_eq!(report.totals, totals);
    }

    #[test]
    fn test_records_in_month_filters() {
        let records = vec![
            record("1403/10/30", 0.0, &[]),
            record("1403/11/01", 0.0, &[]),
            record("1404/11/01", 0.0, &[]),
        ];
        let month = RangeAggregator::records_in_month(&records, 1403, 11);
        assert_eq!(month.len(), 1);
        assert_eq!(month[0].date_str, "1403/11/01");
    }

    #[test]
    fn test_period_report_end_before_start() {
        let records = vec![record("1403/11/01", 100.0, &[300.0])];
        let report = RangeAggregator::new().build_period_report(
            &records,
            ReportRange::new(1403, 12, 1403, 11),
            &AppConfig::default(),
            &default_profiles(),
            SamplingMode::Daily,
        );
        assert!(report.months.is_empty());
        assert_eq!(report.summary, ImpactTotals::default());
    }
}
