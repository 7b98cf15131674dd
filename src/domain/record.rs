// ==========================================
// CCS 质量合规系统 - 日记录实体
// ==========================================
// 职责: 原始样本点 / 日记录 / 日期键
// 红线: date_str 是日记录唯一标识，同日期只允许一条记录
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// DataPoint - 原始样本点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    /// 采样时间（规范 "HH:MM" 或源文件原始时间文本）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,

    /// CCS 数值
    pub value: f64,
}

impl DataPoint {
    pub fn new(time_slot: impl Into<String>, value: f64) -> Self {
        Self {
            time_slot: Some(time_slot.into()),
            value,
        }
    }

    /// 数值是否可作为有效质量输入
    pub fn is_valid(&self) -> bool {
        self.value.is_finite()
    }
}

// ==========================================
// DailyRecord - 日记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    /// 月内日序号 (1..31)
    pub day: u32,

    /// 规范日期 "YYYY/MM/DD"
    pub date_str: String,

    /// 当日产量（吨）
    #[serde(default)]
    pub tonnage: f64,

    /// 当日样本（按导入顺序）
    #[serde(default)]
    pub data_points: Vec<DataPoint>,
}

impl DailyRecord {
    /// 以规范日期创建空记录
    ///
    /// 日期无法解析时 day 记为 0
    pub fn empty(date_str: impl Into<String>) -> Self {
        let date_str = date_str.into();
        let day = DateKey::parse(&date_str).map(|k| k.day).unwrap_or(0);
        Self {
            day,
            date_str,
            tonnage: 0.0,
            data_points: Vec::new(),
        }
    }

    /// 解析日期键
    pub fn date_key(&self) -> Option<DateKey> {
        DateKey::parse(&self.date_str)
    }
}

// ==========================================
// DateKey - 日期键 (年/月/日)
// ==========================================
// 排序按 (year, month, day) 字典序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateKey {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// 解析 "YYYY/MM/DD" 或 "YYYY-MM-DD"
    pub fn parse(date_str: &str) -> Option<Self> {
        let parts: Vec<&str> = date_str
            .trim()
            .split(|c| c == '/' || c == '-')
            .collect();
        if parts.len() < 3 {
            return None;
        }
        let year = parts[0].trim().parse::<i32>().ok()?;
        let month = parts[1].trim().parse::<u32>().ok()?;
        let day = parts[2].trim().parse::<u32>().ok()?;
        Some(Self { year, month, day })
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_key_parse_and_format() {
        let key = DateKey::parse("1403/3/5").unwrap();
        assert_eq!(key, DateKey::new(1403, 3, 5));
        assert_eq!(key.to_string(), "1403/03/05");
        assert!(DateKey::parse("1403/03").is_none());
        assert!(DateKey::parse("abc/de/fg").is_none());
    }

    #[test]
    fn test_date_key_ordering() {
        let mut keys = vec![
            DateKey::new(1403, 12, 1),
            DateKey::new(1403, 2, 30),
            DateKey::new(1402, 12, 29),
        ];
        keys.sort();
        assert_eq!(keys[0], DateKey::new(1402, 12, 29));
        assert_eq!(keys[2], DateKey::new(1403, 12, 1));
    }

    #[test]
    fn test_daily_record_json_field_names() {
        let record = DailyRecord {
            day: 5,
            date_str: "1403/03/05".to_string(),
            tonnage: 1200.5,
            data_points: vec![DataPoint::new("06:00", 300.0)],
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["dateStr"], "1403/03/05");
        assert_eq!(json["dataPoints"][0]["timeSlot"], "06:00");

        let back: DailyRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_empty_record_day_from_date() {
        let record = DailyRecord::empty("1403/11/22");
        assert_eq!(record.day, 22);
        assert!(record.data_points.is_empty());
    }
}
