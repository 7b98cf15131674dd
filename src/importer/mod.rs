// ==========================================
// CCS 质量合规系统 - 导入层
// ==========================================
// 职责: 工作簿 → 按列映射 → 日记录
// 支持: Excel (.xlsx/.xls/.xlsm/.ods), CSV
// ==========================================

// 模块声明
pub mod column_mapping;
pub mod error;
pub mod file_parser;
pub mod importer_trait;
pub mod record_builder;
pub mod record_importer;

// 重导出核心类型
pub use column_mapping::{ColumnRole, ImportConfig, SheetMapping};
pub use error::{ImportError, ImportResult};
pub use file_parser::{column_letter, open_sheet_source, CsvSheetReader, WorkbookReader};
pub use record_builder::{BuildOutcome, RecordBuilder, RowStats};
pub use record_importer::{ImportOutcome, ImportReport, RecordImporter};

// 重导出 Trait 接口
pub use importer_trait::SheetSource;
