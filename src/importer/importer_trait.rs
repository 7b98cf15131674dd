// ==========================================
// CCS 质量合规系统 - 导入 Trait
// ==========================================
// 职责: 定义工作表读取接口（不包含实现）
// ==========================================

use crate::domain::cell::RawRow;
use crate::importer::error::ImportResult;

// ==========================================
// SheetSource Trait
// ==========================================
// 用途: 按工作表名读取原始行
// 实现者: WorkbookReader, CsvSheetReader
pub trait SheetSource: Send {
    /// 可选工作表名（保持文件内顺序）
    fn sheet_names(&self) -> Vec<String>;

    /// 读取指定工作表的全部行
    ///
    /// # 返回
    /// - 每行为 列字母 → 单元格 的映射，首行（表头）不做特殊处理
    /// - 工作表不存在返回 ImportError::SheetNotFound
    fn read_sheet(&mut self, sheet_name: &str) -> ImportResult<Vec<RawRow>>;
}
