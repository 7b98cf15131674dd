// ==========================================
// CCS 质量合规系统 - 日记录构建器
// ==========================================
// 职责: 质量表行 + 产量表行 → 按日期合并的 DailyRecord 列表
// 输入: 原始行 + 列映射
// 输出: 按日期升序的日记录 + 行级统计
// 红线: 单行问题只跳过并计数，不中断整批
// ==========================================

use crate::domain::cell::{RawCell, RawRow};
use crate::domain::record::{DailyRecord, DataPoint, DateKey};
use crate::engine::aggregator::{round_to_one_decimal, TIME_SLOTS_2H};
use crate::engine::normalizer::Normalizer;
use crate::importer::column_mapping::{ColumnRole, SheetMapping};
use crate::importer::error::ImportResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 行级统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowStats {
    /// 读取到的行数（含表头）
    pub total: usize,
    /// 被采纳的行数
    pub accepted: usize,
    /// 被跳过的行数（不含表头）
    pub skipped: usize,
    /// 首行按表头跳过
    pub header_skipped: bool,
    /// 产量无法解析、按 0 计入的行数
    pub zeroed: usize,
}

/// 构建结果
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    pub records: Vec<DailyRecord>,
    pub quality: RowStats,
    pub tonnage: RowStats,
}

// 同一日期的合并中间态
#[derive(Default)]
struct DayAccumulator {
    data_points: Vec<DataPoint>,
    tonnage: f64,
    synthetic_slots: usize,
}

// ==========================================
// RecordBuilder - 日记录构建器
// ==========================================
#[derive(Default)]
pub struct RecordBuilder {
    normalizer: Normalizer,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalizer(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    /// 合并质量表与产量表
    ///
    /// 任一表可缺省（传 None）；两表都缺省时得到空列表。
    pub fn build(
        &self,
        quality: Option<(&[RawRow], &SheetMapping)>,
        tonnage: Option<(&[RawRow], &SheetMapping)>,
    ) -> ImportResult<BuildOutcome> {
        let mut days: BTreeMap<DateKey, DayAccumulator> = BTreeMap::new();
        let mut outcome = BuildOutcome::default();

        if let Some((rows, mapping)) = quality {
            outcome.quality = self.collect_quality(rows, mapping, &mut days)?;
        }
        if let Some((rows, mapping)) = tonnage {
            outcome.tonnage = self.collect_tonnage(rows, mapping, &mut days)?;
        }

        outcome.records = days
            .into_iter()
            .map(|(key, acc)| DailyRecord {
                day: key.day,
                date_str: key.to_string(),
                tonnage: round_to_one_decimal(acc.tonnage),
                data_points: acc.data_points,
            })
            .collect();

        Ok(outcome)
    }

    // ==========================================
    // 质量表
    // ==========================================

    fn collect_quality(
        &self,
        rows: &[RawRow],
        mapping: &SheetMapping,
        days: &mut BTreeMap<DateKey, DayAccumulator>,
    ) -> ImportResult<RowStats> {
        let date_col = mapping.require_column(ColumnRole::Date)?;
        let value_col = mapping.require_column(ColumnRole::CcsValue)?;
        let time_col = mapping.column_for(ColumnRole::Time);

        let mut stats = RowStats {
            total: rows.len(),
            ..RowStats::default()
        };

        for (index, row) in rows.iter().enumerate() {
            let value_cell = cell(row, value_col);
            if index == 0 && !self.normalizer.is_valid_number(value_cell) {
                stats.header_skipped = true;
                continue;
            }

            let Some(key) = self.normalizer.normalize_date_key(cell(row, date_col)) else {
                tracing::debug!(row = index + 1, sheet = %mapping.sheet_name, "质量行日期无效，跳过");
                stats.skipped += 1;
                continue;
            };
            let value = match self.normalizer.parse_numeric(value_cell) {
                Some(v) if v > 0.0 => v,
                _ => {
                    tracing::debug!(row = index + 1, sheet = %mapping.sheet_name, "质量行数值无效，跳过");
                    stats.skipped += 1;
                    continue;
                }
            };

            // 时间非空但无法解析的样本无法落入任何时段
            let explicit_time = match time_col.map(|col| cell(row, col)) {
                Some(time_cell) if !time_cell.is_blank() => {
                    if self.normalizer.hour_from_time(time_cell).is_none() {
                        tracing::debug!(row = index + 1, sheet = %mapping.sheet_name, "质量行时间无效，跳过");
                        stats.skipped += 1;
                        continue;
                    }
                    Some(time_cell.as_text())
                }
                _ => None,
            };

            let day = days.entry(key).or_default();
            let time_slot = match explicit_time {
                Some(time) => time,
                None => {
                    let slot = TIME_SLOTS_2H[day.synthetic_slots % TIME_SLOTS_2H.len()];
                    day.synthetic_slots += 1;
                    slot.to_string()
                }
            };

            day.data_points.push(DataPoint::new(time_slot, value));
            stats.accepted += 1;
        }

        Ok(stats)
    }

    // ==========================================
    // 产量表
    // ==========================================

    fn collect_tonnage(
        &self,
        rows: &[RawRow],
        mapping: &SheetMapping,
        days: &mut BTreeMap<DateKey, DayAccumulator>,
    ) -> ImportResult<RowStats> {
        let date_col = mapping.require_column(ColumnRole::Date)?;
        let tonnage_col = mapping.require_column(ColumnRole::Tonnage)?;

        let mut stats = RowStats {
            total: rows.len(),
            ..RowStats::default()
        };

        for (index, row) in rows.iter().enumerate() {
            let tonnage_cell = cell(row, tonnage_col);
            if index == 0 && !self.normalizer.is_valid_number(tonnage_cell) {
                stats.header_skipped = true;
                continue;
            }

            let Some(key) = self.normalizer.normalize_date_key(cell(row, date_col)) else {
                tracing::debug!(row = index + 1, sheet = %mapping.sheet_name, "产量行日期无效，跳过");
                stats.skipped += 1;
                continue;
            };

            // 产量无法解析时按 0 计入，日期仍然登记
            let tonnage = match self.normalizer.parse_numeric(tonnage_cell) {
                Some(t) => t,
                None => {
                    stats.zeroed += 1;
                    0.0
                }
            };

            days.entry(key).or_default().tonnage += tonnage;
            stats.accepted += 1;
        }

        Ok(stats)
    }
}

/// 按列字母取单元格，缺失视为空
fn cell<'a>(row: &'a RawRow, column: &str) -> &'a RawCell {
    static EMPTY: RawCell = RawCell::Empty;
    row.get(column).unwrap_or(&EMPTY)
}
