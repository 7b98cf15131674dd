// ==========================================
// CCS 质量合规系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls/.xlsm/.ods) / CSV (.csv)
// 输出: 按列字母索引的原始单元格行
// 红线: 解析器不解释单元格含义，日期/时间/数值一律交给 Normalizer
// ==========================================

use crate::domain::cell::{RawCell, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::SheetSource;
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// 列序号（0 起）→ 列字母（A, B, …, Z, AA, AB, …）
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

// ==========================================
// Excel 工作簿读取器
// ==========================================
pub struct WorkbookReader {
    workbook: Sheets<BufReader<File>>,
}

impl WorkbookReader {
    pub fn open<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let workbook = open_workbook_auto(path)?;
        Ok(Self { workbook })
    }
}

impl SheetSource for WorkbookReader {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn read_sheet(&mut self, sheet_name: &str) -> ImportResult<Vec<RawRow>> {
        if !self.sheet_names().iter().any(|name| name == sheet_name) {
            return Err(ImportError::SheetNotFound(sheet_name.to_string()));
        }

        let range = self.workbook.worksheet_range(sheet_name)?;
        // 使用区域可能不从 A1 开始
        let (first_row, first_col) = range.start().unwrap_or((0, 0));
        if first_row > 0 {
            tracing::debug!(sheet = sheet_name, first_row, "工作表使用区域不从第 1 行开始");
        }

        let mut rows = Vec::new();
        for data_row in range.rows() {
            let mut row = RawRow::new();
            for (offset, cell) in data_row.iter().enumerate() {
                let raw = convert_cell(cell);
                if !raw.is_blank() {
                    row.insert(column_letter(first_col as usize + offset), raw);
                }
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

/// calamine 单元格 → 原始单元格
///
/// 日期时间单元格保留序列号数值，由 Normalizer 统一识别。
fn convert_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::DateTime(dt) => RawCell::Number(dt.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::from(s.as_str()),
        Data::Bool(b) => RawCell::Text(b.to_string()),
        Data::Error(_) | Data::Empty => RawCell::Empty,
    }
}

// ==========================================
// CSV 读取器（单工作表，表名取文件名）
// ==========================================
pub struct CsvSheetReader {
    path: PathBuf,
    sheet_name: String,
}

impl CsvSheetReader {
    pub fn open<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let sheet_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Sheet1".to_string());

        Ok(Self {
            path: path.to_path_buf(),
            sheet_name,
        })
    }
}

impl SheetSource for CsvSheetReader {
    fn sheet_names(&self) -> Vec<String> {
        vec![self.sheet_name.clone()]
    }

    fn read_sheet(&mut self, sheet_name: &str) -> ImportResult<Vec<RawRow>> {
        if sheet_name != self.sheet_name {
            return Err(ImportError::SheetNotFound(sheet_name.to_string()));
        }

        let file = File::open(&self.path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row = RawRow::new();
            for (col_idx, value) in record.iter().enumerate() {
                let raw = RawCell::from(value.trim());
                if !raw.is_blank() {
                    row.insert(column_letter(col_idx), raw);
                }
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// 按扩展名打开
// ==========================================
pub fn open_sheet_source<P: AsRef<Path>>(path: P) -> ImportResult<Box<dyn SheetSource>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => Ok(Box::new(CsvSheetReader::open(path)?)),
        "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Ok(Box::new(WorkbookReader::open(path)?)),
        _ => Err(ImportError::UnsupportedFormat(ext)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(15), "P");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_csv_reader_keys_by_letter() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "日期,时间,CCS").unwrap();
        writeln!(temp_file, "1403/11/01,06:00,285").unwrap();
        writeln!(temp_file, "1403/11/01,,290").unwrap();
        temp_file.flush().unwrap();

        let mut reader = CsvSheetReader::open(temp_file.path()).unwrap();
        let sheet = reader.sheet_names()[0].clone();
        let rows = reader.read_sheet(&sheet).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("C"), Some(&RawCell::Text("CCS".to_string())));
        assert_eq!(rows[1].get("A"), Some(&RawCell::Text("1403/11/01".to_string())));
        assert!(rows[2].get("B").is_none());
    }

    #[test]
    fn test_csv_reader_unknown_sheet() {
        let temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        let mut reader = CsvSheetReader::open(temp_file.path()).unwrap();
        assert!(matches!(
            reader.read_sheet("Production"),
            Err(ImportError::SheetNotFound(_))
        ));
    }

    #[test]
    fn test_open_sheet_source_unsupported() {
        let result = open_sheet_source("data.txt");
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_open_sheet_source_missing_file() {
        let result = open_sheet_source("/nonexistent/quality.csv");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_convert_cell_variants() {
        assert_eq!(convert_cell(&Data::Int(285)), RawCell::Number(285.0));
        assert_eq!(convert_cell(&Data::Float(0.25)), RawCell::Number(0.25));
        assert_eq!(convert_cell(&Data::String(String::new())), RawCell::Empty);
        assert_eq!(convert_cell(&Data::Empty), RawCell::Empty);
    }
}
