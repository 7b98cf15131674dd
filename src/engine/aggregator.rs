// ==========================================
// CCS 质量合规系统 - 样本聚合引擎
// ==========================================
// 职责: 单日原始样本 → 采样模式对应的定长数值序列
// 输入: DailyRecord + SamplingMode
// 输出: Vec<f64>（缺测为 NaN，绝不补 0）
// 红线: 无状态引擎,所有方法都是纯函数
// ==========================================

use crate::domain::record::DailyRecord;
use crate::domain::types::SamplingMode;
use crate::engine::normalizer::Normalizer;
use std::collections::BTreeMap;

/// 两小时时段标签（当日 06:00 起，最后三个时段跨入次日凌晨）
pub const TIME_SLOTS_2H: [&str; 12] = [
    "06:00", "08:00", "10:00", "12:00", "14:00", "16:00", "18:00", "20:00", "22:00", "00:00",
    "02:00", "04:00",
];

/// 两小时时段对应的小时
pub const TIME_SLOT_HOURS_2H: [u32; 12] = [6, 8, 10, 12, 14, 16, 18, 20, 22, 0, 2, 4];

/// A 班小时
pub const SHIFT_A_HOURS: [u32; 4] = [6, 8, 10, 12];
/// B 班小时
pub const SHIFT_B_HOURS: [u32; 4] = [14, 16, 18, 20];
/// C 班小时（跨零点）
pub const SHIFT_C_HOURS: [u32; 4] = [22, 0, 2, 4];

/// 班次列标签
pub const SHIFT_LABELS: [&str; 3] = ["Shift A", "Shift B", "Shift C"];

/// 日均列标签
pub const DAILY_LABEL: &str = "Daily";

// ==========================================
// Aggregator - 样本聚合引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    normalizer: Normalizer,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalizer(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    /// 按采样模式聚合单日样本
    ///
    /// # 返回
    /// - 2h: 12 个值（按 TIME_SLOT_HOURS_2H 顺序）
    /// - shift: 3 个班次均值（保留 1 位小数）
    /// - daily: 1 个日均值（保留 1 位小数）
    pub fn aggregate(&self, record: &DailyRecord, mode: SamplingMode) -> Vec<f64> {
        let hours = self.hour_values(record);

        match mode {
            SamplingMode::TwoHour => TIME_SLOT_HOURS_2H
                .iter()
                .map(|h| hours.get(h).copied().unwrap_or(f64::NAN))
                .collect(),
            SamplingMode::Shift => vec![
                mean_of_hours(&hours, &SHIFT_A_HOURS),
                mean_of_hours(&hours, &SHIFT_B_HOURS),
                mean_of_hours(&hours, &SHIFT_C_HOURS),
            ],
            SamplingMode::Daily => {
                let values: Vec<f64> = hours.values().copied().collect();
                vec![rounded_mean(&values)]
            }
        }
    }

    /// 小时 → 数值映射
    ///
    /// 同一小时出现多个样本时保留最后一个（不取平均）。
    /// 无时间、时间无法解析、数值无效的样本被跳过。
    pub fn hour_values(&self, record: &DailyRecord) -> BTreeMap<u32, f64> {
        let mut hours = BTreeMap::new();

        for point in &record.data_points {
            if !point.is_valid() {
                continue;
            }
            let Some(slot) = point.time_slot.as_deref() else {
                continue;
            };
            match self.normalizer.hour_from_slot(slot) {
                Some(hour) => {
                    hours.insert(hour, point.value);
                }
                None => {
                    tracing::debug!(date = %record.date_str, slot, "样本时间无法识别，已跳过");
                }
            }
        }

        hours
    }

    /// 采样模式对应的列标签
    pub fn slot_labels(mode: SamplingMode) -> Vec<&'static str> {
        match mode {
            SamplingMode::TwoHour => TIME_SLOTS_2H.to_vec(),
            SamplingMode::Shift => SHIFT_LABELS.to_vec(),
            SamplingMode::Daily => vec![DAILY_LABEL],
        }
    }
}

fn mean_of_hours(hours: &BTreeMap<u32, f64>, slot_hours: &[u32]) -> f64 {
    let values: Vec<f64> = slot_hours
        .iter()
        .filter_map(|h| hours.get(h).copied())
        .collect();
    rounded_mean(&values)
}

/// 均值保留 1 位小数，空集为 NaN
fn rounded_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    round_to_one_decimal(mean)
}

pub(crate) fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
