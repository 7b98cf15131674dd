// ==========================================
// CCS 质量合规系统 - 原始单元格值
// ==========================================
// 职责: 表格读取器交给引擎的单元格内容（未经任何解析）
// ==========================================

use std::collections::HashMap;
use std::fmt;

/// 原始单元格
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    /// 数值单元格（日期单元格以序列号形式出现）
    Number(f64),
    Text(String),
}

impl RawCell {
    /// 空单元格或纯空白文本
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Number(_) => false,
            RawCell::Text(s) => s.trim().is_empty(),
        }
    }

    /// 去除首尾空白后的文本形式
    pub fn as_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Number(n) => n.to_string(),
            RawCell::Text(s) => s.trim().to_string(),
        }
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(value.to_string())
        }
    }
}

impl From<String> for RawCell {
    fn from(value: String) -> Self {
        if value.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(value)
        }
    }
}

/// 一行原始数据：列标识（A/B/C…）→ 单元格
pub type RawRow = HashMap<String, RawCell>;
