// ==========================================
// CCS 质量合规系统 - 列角色映射
// ==========================================
// 职责: 用户为每个工作表指定 "哪一列是什么"
// 列标识: 表格列字母（A / B / … / AA）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// ColumnRole - 列角色
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Date,
    Time,
    CcsValue,
    Tonnage,
    Ignore,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::Date => write!(f, "date"),
            ColumnRole::Time => write!(f, "time"),
            ColumnRole::CcsValue => write!(f, "ccs_value"),
            ColumnRole::Tonnage => write!(f, "tonnage"),
            ColumnRole::Ignore => write!(f, "ignore"),
        }
    }
}

// ==========================================
// SheetMapping - 单个工作表的列映射
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetMapping {
    pub sheet_name: String,
    /// 列字母 → 角色（有序，保证同角色多列时取字母序第一列）
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnRole>,
}

impl SheetMapping {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            columns: BTreeMap::new(),
        }
    }

    /// 链式指定列角色
    pub fn with_column(mut self, column: &str, role: ColumnRole) -> Self {
        self.columns.insert(column.trim().to_uppercase(), role);
        self
    }

    /// 指定角色的列（未指定返回 None）
    pub fn column_for(&self, role: ColumnRole) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, r)| **r == role)
            .map(|(col, _)| col.as_str())
    }

    /// 必需角色的列
    pub fn require_column(&self, role: ColumnRole) -> ImportResult<&str> {
        self.column_for(role)
            .ok_or_else(|| ImportError::MissingColumnRole {
                sheet: self.sheet_name.clone(),
                role: role.to_string(),
            })
    }
}

// ==========================================
// ImportConfig - 一次导入的完整映射
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// 质量表（date / time / ccs_value）
    #[serde(default)]
    pub quality: Option<SheetMapping>,
    /// 产量表（date / tonnage）
    #[serde(default)]
    pub tonnage: Option<SheetMapping>,
}

impl ImportConfig {
    /// 从 JSON 文本解析
    pub fn from_json(json: &str) -> ImportResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.quality.is_none() && self.tonnage.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_for_role() {
        let mapping = SheetMapping::new("CCS")
            .with_column("a", ColumnRole::Date)
            .with_column("B", ColumnRole::Time)
            .with_column("P", ColumnRole::CcsValue)
            .with_column("C", ColumnRole::Ignore);

        assert_eq!(mapping.column_for(ColumnRole::Date), Some("A"));
        assert_eq!(mapping.column_for(ColumnRole::CcsValue), Some("P"));
        assert_eq!(mapping.column_for(ColumnRole::Tonnage), None);
        assert!(matches!(
            mapping.require_column(ColumnRole::Tonnage),
            Err(ImportError::MissingColumnRole { .. })
        ));
    }

    #[test]
    fn test_import_config_from_json() {
        let json = r#"{
            "quality": {"sheetName": "CCS", "columns": {"A": "date", "B": "time", "P": "ccs_value"}},
            "tonnage": {"sheetName": "Production", "columns": {"A": "date", "D": "tonnage"}}
        }"#;
        let config = ImportConfig::from_json(json).unwrap();
        let tonnage = config.tonnage.unwrap();
        assert_eq!(tonnage.column_for(ColumnRole::Tonnage), Some("D"));
        assert!(!ImportConfig::default().quality.is_some());
    }

    #[test]
    fn test_import_config_bad_json() {
        let result = ImportConfig::from_json("{\"quality\": 1}");
        assert!(matches!(result, Err(ImportError::MappingFormatError(_))));
    }
}
