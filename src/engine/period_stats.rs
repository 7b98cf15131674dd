// ==========================================
// CCS 质量合规系统 - 窗口统计引擎
// ==========================================
// 职责: 单个报表窗口的合规计数 / 合规率 / 奖罚影响
// 输入: 窗口内日记录 + 业务参数 + 规则方案 + 采样模式
// 输出: WeekStats
// 红线: 无样本窗口返回完整的零值结果（no data），不报错
// ==========================================

use crate::domain::app_config::AppConfig;
use crate::domain::record::DailyRecord;
use crate::domain::report::{BandCounts, BandStats, WeekStats};
use crate::domain::rule::{Profile, CUSTOM_PROFILE_ID, FIXED_PROFILE_ID};
use crate::domain::types::{BandPosition, SamplingMode};
use crate::engine::aggregator::Aggregator;
use crate::engine::rule_matcher::RuleMatcher;

// ==========================================
// PeriodStatsEngine - 窗口统计引擎
// ==========================================
#[derive(Default)]
pub struct PeriodStatsEngine {
    aggregator: Aggregator,
    matcher: RuleMatcher,
}

impl PeriodStatsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 计算窗口统计
    ///
    /// # 参数
    /// - `records`: 同一窗口内的日记录
    /// - `config`: 两套合格区间
    /// - `profiles`: 规则方案（按 ccs_fixed / ccs_custom 查找）
    /// - `mode`: 采样模式
    pub fn calculate<'a, I>(
        &self,
        records: I,
        config: &AppConfig,
        profiles: &[Profile],
        mode: SamplingMode,
    ) -> WeekStats
    where
        I: IntoIterator<Item = &'a DailyRecord>,
    {
        let mut total_count = 0u32;
        let mut total_tonnage = 0.0;
        let mut fixed_counts = BandCounts::default();
        let mut custom_counts = BandCounts::default();

        for record in records {
            if record.tonnage.is_finite() {
                total_tonnage += record.tonnage;
            }

            for value in self.aggregator.aggregate(record, mode) {
                let Some(fixed_pos) =
                    BandPosition::classify(value, config.min_range, config.max_range)
                else {
                    continue;
                };
                total_count += 1;
                tally(&mut fixed_counts, fixed_pos);
                if let Some(custom_pos) =
                    BandPosition::classify(value, config.custom_min_range, config.custom_max_range)
                {
                    tally(&mut custom_counts, custom_pos);
                }
            }
        }

        if total_count == 0 {
            return WeekStats {
                total_count: 0,
                fixed: BandStats::no_data(),
                custom: BandStats::no_data(),
                total_tonnage,
            };
        }

        WeekStats {
            total_count,
            fixed: self.band_stats(
                fixed_counts,
                total_count,
                total_tonnage,
                Profile::find(profiles, FIXED_PROFILE_ID),
            ),
            custom: self.band_stats(
                custom_counts,
                total_count,
                total_tonnage,
                Profile::find(profiles, CUSTOM_PROFILE_ID),
            ),
            total_tonnage,
        }
    }

    fn band_stats(
        &self,
        counts: BandCounts,
        total_count: u32,
        total_tonnage: f64,
        profile: Option<&Profile>,
    ) -> BandStats {
        let pct = f64::from(counts.in_range) / f64::from(total_count) * 100.0;
        let verdict = self.matcher.evaluate(pct, profile);
        let impact = total_tonnage * verdict.factor() / 100.0;

        BandStats {
            counts,
            pct,
            verdict,
            impact,
        }
    }
}

fn tally(counts: &mut BandCounts, position: BandPosition) {
    match position {
        BandPosition::InRange => counts.in_range += 1,
        BandPosition::Low => counts.low += 1,
        BandPosition::High => counts.high += 1,
    }
}
