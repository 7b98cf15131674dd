// ==========================================
// CCS 质量合规系统 - 月度摘要
// ==========================================
// 职责: 当前月份日记录 → 每日均值摘要 → 分析提示词
// ==========================================

use crate::domain::app_config::AppConfig;
use crate::domain::record::DailyRecord;
use crate::domain::types::SamplingMode;
use crate::engine::aggregator::Aggregator;
use crate::engine::range_aggregator::RangeAggregator;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// 单日摘要行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestLine {
    pub day: u32,
    /// 当日均值（无有效样本为 None）
    pub mean: Option<f64>,
}

/// 一个月的每日摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDigest {
    pub year: i32,
    pub month: u32,
    pub lines: Vec<DigestLine>,
}

impl DailyDigest {
    /// 取 config 指定月份的记录，按记录顺序生成摘要
    pub fn for_config(records: &[DailyRecord], config: &AppConfig) -> Self {
        let aggregator = Aggregator::new();
        let lines = RangeAggregator::records_in_month(records, config.year, config.month)
            .into_iter()
            .map(|record| {
                let mean = aggregator
                    .aggregate(record, SamplingMode::Daily)
                    .first()
                    .copied()
                    .filter(|v| v.is_finite());
                DigestLine {
                    day: record.day,
                    mean,
                }
            })
            .collect();

        Self {
            year: config.year,
            month: config.month,
            lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// 生成分析提示词
pub fn build_prompt(digest: &DailyDigest, config: &AppConfig) -> String {
    let mut prompt = String::new();

    // String 的 fmt::Write 不会失败
    let _ = writeln!(
        prompt,
        "Analyze the following CCS (Cold Crushing Strength) quality data for month {} of year {}.",
        digest.month, digest.year
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Configuration:");
    let _ = writeln!(
        prompt,
        "- Standard Range: {} - {}",
        config.min_range, config.max_range
    );
    let _ = writeln!(
        prompt,
        "- Custom Range: {} - {}",
        config.custom_min_range, config.custom_max_range
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Data Summary:");
    for line in &digest.lines {
        match line.mean {
            Some(mean) => {
                let _ = writeln!(prompt, "Day {}: {}", line.day, mean);
            }
            None => {
                let _ = writeln!(prompt, "Day {}: No Data", line.day);
            }
        }
    }
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Please provide:");
    let _ = writeln!(prompt, "1. A summary of the quality trends.");
    let _ = writeln!(
        prompt,
        "2. Identification of any problematic days (Low/High CCS)."
    );
    let _ = writeln!(
        prompt,
        "3. Recommendations for process improvement based on the data."
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::DataPoint;

    fn record(date: &str, values: &[f64]) -> DailyRecord {
        let mut r = DailyRecord::empty(date);
        r.data_points = values
            .iter()
            .enumerate()
            .map(|(i, v)| DataPoint::new(format!("{:02}:00", 6 + 2 * i), *v))
            .collect();
        r
    }

    #[test]
    fn test_digest_filters_month_and_averages() {
        let records = vec![
            record("1403/11/01", &[280.0, 290.0]),
            record("1403/11/02", &[]),
            record("1403/12/01", &[300.0]),
        ];
        let digest = DailyDigest::for_config(&records, &AppConfig::default());

        assert_eq!(digest.lines.len(), 2);
        assert_eq!(digest.lines[0], DigestLine { day: 1, mean: Some(285.0) });
        assert_eq!(digest.lines[1].mean, None);
    }

    #[test]
    fn test_prompt_lists_days_and_ranges() {
        let records = vec![record("1403/11/03", &[300.0]), record("1403/11/04", &[])];
        let config = AppConfig::default();
        let prompt = build_prompt(&DailyDigest::for_config(&records, &config), &config);

        assert!(prompt.contains("month 11 of year 1403"));
        assert!(prompt.contains("Standard Range: 260 - 310"));
        assert!(prompt.contains("Day 3: 300"));
        assert!(prompt.contains("Day 4: No Data"));
    }
}
