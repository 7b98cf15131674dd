// ==========================================
// CCS 质量合规系统 - 记录导入器
// ==========================================
// 流程:
// 1. 打开工作簿（按扩展名选择读取器）
// 2. 读取质量表 / 产量表
// 3. RecordBuilder 合并为日记录
// 4. 生成导入报告（批次号 + 行级统计）
// 红线: 导入结果整体替换现有记录，不做增量合并
// ==========================================

use crate::domain::cell::RawRow;
use crate::domain::record::DailyRecord;
use crate::importer::column_mapping::{ImportConfig, SheetMapping};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::open_sheet_source;
use crate::importer::importer_trait::SheetSource;
use crate::importer::record_builder::{RecordBuilder, RowStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

// ==========================================
// ImportReport - 导入报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub batch_id: String,
    pub source: String,
    pub imported_at: DateTime<Utc>,
    pub record_count: usize,
    pub sample_count: usize,
    pub quality_rows: RowStats,
    pub tonnage_rows: RowStats,
    pub elapsed_ms: u64,
}

/// 导入结果：新的完整记录集 + 报告
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub records: Vec<DailyRecord>,
    pub report: ImportReport,
}

// ==========================================
// RecordImporter - 记录导入器
// ==========================================
#[derive(Default)]
pub struct RecordImporter {
    builder: RecordBuilder,
}

impl RecordImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: RecordBuilder) -> Self {
        Self { builder }
    }

    /// 从工作簿文件导入
    pub fn import_workbook<P: AsRef<Path>>(
        &self,
        path: P,
        config: &ImportConfig,
    ) -> ImportResult<ImportOutcome> {
        let path = path.as_ref();
        tracing::info!(file = %path.display(), "开始导入工作簿");

        let mut source = open_sheet_source(path)?;
        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        self.import_from_source(source.as_mut(), &source_name, config)
    }

    /// 从已打开的工作表源导入
    pub fn import_from_source(
        &self,
        source: &mut dyn SheetSource,
        source_name: &str,
        config: &ImportConfig,
    ) -> ImportResult<ImportOutcome> {
        if config.is_empty() {
            return Err(ImportError::NoSheetSelected);
        }

        let start = Instant::now();
        let batch_id = Uuid::new_v4().to_string();

        let quality_rows = read_mapped(source, config.quality.as_ref())?;
        let tonnage_rows = read_mapped(source, config.tonnage.as_ref())?;

        let outcome = self.builder.build(
            zip_mapping(quality_rows.as_deref(), config.quality.as_ref()),
            zip_mapping(tonnage_rows.as_deref(), config.tonnage.as_ref()),
        )?;

        let sample_count = outcome.records.iter().map(|r| r.data_points.len()).sum();
        let report = ImportReport {
            batch_id,
            source: source_name.to_string(),
            imported_at: Utc::now(),
            record_count: outcome.records.len(),
            sample_count,
            quality_rows: outcome.quality,
            tonnage_rows: outcome.tonnage,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            batch_id = %report.batch_id,
            records = report.record_count,
            samples = report.sample_count,
            quality_skipped = report.quality_rows.skipped,
            tonnage_skipped = report.tonnage_rows.skipped,
            "导入完成"
        );

        Ok(ImportOutcome {
            records: outcome.records,
            report,
        })
    }
}

fn read_mapped(
    source: &mut dyn SheetSource,
    mapping: Option<&SheetMapping>,
) -> ImportResult<Option<Vec<RawRow>>> {
    match mapping {
        Some(mapping) => Ok(Some(source.read_sheet(&mapping.sheet_name)?)),
        None => Ok(None),
    }
}

fn zip_mapping<'a>(
    rows: Option<&'a [RawRow]>,
    mapping: Option<&'a SheetMapping>,
) -> Option<(&'a [RawRow], &'a SheetMapping)> {
    rows.zip(mapping)
}
