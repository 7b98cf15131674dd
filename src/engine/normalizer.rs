// ==========================================
// CCS 质量合规系统 - 单元格规范化引擎
// ==========================================
// 职责: 原始单元格 → 规范日期键 "YYYY/MM/DD" / 小时 [0,23] / 数值
// 输入: RawCell（数值 / 文本 / 表格序列号）
// 输出: Option（None 表示无法识别，由调用方跳过该样本）
// 红线: 无状态引擎,所有方法都是纯函数
// ==========================================

use crate::domain::cell::RawCell;
use crate::domain::record::DateKey;
use chrono::{Datelike, Days, NaiveDate};

/// 大于该值的数值按表格日期序列号解析，否则视为普通年/日数字
pub const SERIAL_DATE_THRESHOLD: f64 = 40000.0;

/// 两位年份补齐偏移量
///
/// 领域约定（伊朗历 14xx 年代）：年份 < 100 时加 1400，如 "03/05/02" → 1403/05/02。
/// 不是通用日历规则，其它历法的数据源需通过 NormalizerPolicy 调整。
pub const TWO_DIGIT_YEAR_OFFSET: i32 = 1400;

/// 低于该值的年份视为两位年份
pub const TWO_DIGIT_YEAR_LIMIT: i32 = 100;

/// 表格序列号 0 对应的日期（序列号 25569 = 1970-01-01）
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// 每天分钟数
const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

// ==========================================
// NormalizerPolicy - 规范化策略参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizerPolicy {
    pub serial_date_threshold: f64,
    pub two_digit_year_offset: i32,
}

impl Default for NormalizerPolicy {
    fn default() -> Self {
        Self {
            serial_date_threshold: SERIAL_DATE_THRESHOLD,
            two_digit_year_offset: TWO_DIGIT_YEAR_OFFSET,
        }
    }
}

// ==========================================
// Normalizer - 规范化引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    policy: NormalizerPolicy,
}

impl Normalizer {
    /// 创建默认策略的规范化引擎
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: NormalizerPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &NormalizerPolicy {
        &self.policy
    }

    // ==========================================
    // 日期
    // ==========================================

    /// 规范化日期单元格为 "YYYY/MM/DD"
    pub fn normalize_date(&self, cell: &RawCell) -> Option<String> {
        self.normalize_date_key(cell).map(|key| key.to_string())
    }

    /// 规范化日期单元格为 DateKey
    ///
    /// # 解析顺序
    /// 1. 数值且大于阈值 → 表格序列号
    /// 2. 按 `/` 或 `-` 拆分出至少 3 段 → 年/月/日
    ///    - 首段 < 100 且末段 >= 100 时按 月/日/年 解析（如 "3/5/1403"）
    ///    - 年份 < 100 时加两位年份偏移
    pub fn normalize_date_key(&self, cell: &RawCell) -> Option<DateKey> {
        let text = match cell {
            RawCell::Empty => return None,
            RawCell::Number(n) => {
                if *n > self.policy.serial_date_threshold {
                    return serial_to_date_key(*n);
                }
                n.to_string()
            }
            RawCell::Text(s) => {
                let trimmed = s.trim();
                if let Ok(n) = trimmed.parse::<f64>() {
                    if n > self.policy.serial_date_threshold {
                        return serial_to_date_key(n);
                    }
                }
                trimmed.to_string()
            }
        };

        let parts: Vec<&str> = text.split(|c| c == '/' || c == '-').collect();
        if parts.len() < 3 {
            return None;
        }

        let first = leading_int(parts[0])?;
        let second = leading_int(parts[1])?;
        let third = leading_int(parts[2])?;

        let (mut year, month, day) =
            if first < i64::from(TWO_DIGIT_YEAR_LIMIT) && third >= i64::from(TWO_DIGIT_YEAR_LIMIT) {
                (third, first, second)
            } else {
                (first, second, third)
            };

        if year < 0 || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        if year < i64::from(TWO_DIGIT_YEAR_LIMIT) {
            year += i64::from(self.policy.two_digit_year_offset);
        }

        Some(DateKey::new(
            i32::try_from(year).ok()?,
            u32::try_from(month).ok()?,
            u32::try_from(day).ok()?,
        ))
    }

    // ==========================================
    // 时间
    // ==========================================

    /// 解析时间单元格为小时 [0,23]
    ///
    /// # 解析顺序
    /// 1. 数值 [0,1) → 当日时间小数（分钟四舍五入后取整点，24 → 0）
    /// 2. 数值 [1,24) → 向下取整
    /// 3. 文本 "HH:MM" / "HH:MM:SS" / "hh:mm AM|PM" → 取首段小时，24 → 0
    pub fn hour_from_time(&self, cell: &RawCell) -> Option<u32> {
        match cell {
            RawCell::Empty => None,
            RawCell::Number(n) => hour_from_number(*n).or_else(|| hour_from_text(&n.to_string())),
            RawCell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                match trimmed.parse::<f64>() {
                    Ok(n) => hour_from_number(n).or_else(|| hour_from_text(trimmed)),
                    Err(_) => hour_from_text(trimmed),
                }
            }
        }
    }

    /// 解析样本点上的时间文本
    pub fn hour_from_slot(&self, slot: &str) -> Option<u32> {
        self.hour_from_time(&RawCell::Text(slot.to_string()))
    }

    // ==========================================
    // 数值
    // ==========================================

    /// 解析数值单元格（去除千分位逗号，仅接受有限数）
    pub fn parse_numeric(&self, cell: &RawCell) -> Option<f64> {
        match cell {
            RawCell::Empty => None,
            RawCell::Number(n) => n.is_finite().then_some(*n),
            RawCell::Text(s) => {
                let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
                if cleaned.is_empty() {
                    return None;
                }
                cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }

    /// 单元格是否为有效数值
    pub fn is_valid_number(&self, cell: &RawCell) -> bool {
        self.parse_numeric(cell).is_some()
    }
}

/// 序列号 → 日期（小数部分为当日时间，舍去）
fn serial_to_date_key(serial: f64) -> Option<DateKey> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    let date = epoch.checked_add_days(Days::new(serial.floor() as u64))?;
    Some(DateKey::new(date.year(), date.month(), date.day()))
}

fn hour_from_number(n: f64) -> Option<u32> {
    if (0.0..1.0).contains(&n) {
        let total_minutes = (n * MINUTES_PER_DAY).round() as u32;
        let hour = total_minutes / 60;
        return Some(if hour == 24 { 0 } else { hour });
    }
    if (1.0..24.0).contains(&n) {
        return Some(n.floor() as u32);
    }
    None
}

fn hour_from_text(raw: &str) -> Option<u32> {
    let upper = raw.trim().to_uppercase();
    let is_pm = upper.contains("PM");
    let is_am = upper.contains("AM");

    let time_part = upper.replace("AM", "").replace("PM", "");
    let first = time_part.trim().split(':').next()?;
    let mut hour = leading_int(first)?;

    if is_am || is_pm {
        if is_pm && hour < 12 {
            hour += 12;
        }
        if is_am && hour == 12 {
            hour = 0;
        }
    } else if hour == 24 {
        hour = 0;
    }

    if (0..24).contains(&hour) {
        u32::try_from(hour).ok()
    } else {
        None
    }
}

/// 读取文本开头的整数（忽略前导空白和其后的非数字内容）
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    #[test]
    fn test_serial_date() {
        let n = Normalizer::new();
        assert_eq!(n.normalize_date(&RawCell::Number(45000.0)), Some("2023/03/15".to_string()));
        assert_eq!(n.normalize_date(&RawCell::Number(25569.0)), None); // 低于阈值
        assert_eq!(n.normalize_date(&text("45000")), Some("2023/03/15".to_string()));
        // 小数部分为当日时间
        assert_eq!(n.normalize_date(&RawCell::Number(45000.75)), Some("2023/03/15".to_string()));
    }

    #[test]
    fn test_string_dates() {
        let n = Normalizer::new();
        assert_eq!(n.normalize_date(&text("1403/3/5")), Some("1403/03/05".to_string()));
        assert_eq!(n.normalize_date(&text("1403-11-22")), Some("1403/11/22".to_string()));
        assert_eq!(n.normalize_date(&text("3/5/1403")), Some("1403/03/05".to_string()));
        assert_eq!(n.normalize_date(&text("03/11/22")), Some("1403/11/22".to_string()));
        assert_eq!(n.normalize_date(&text("1403/11/05 08:00")), Some("1403/11/05".to_string()));
    }

    #[test]
    fn test_unparseable_dates() {
        let n = Normalizer::new();
        assert_eq!(n.normalize_date(&RawCell::Empty), None);
        assert_eq!(n.normalize_date(&text("تاریخ")), None);
        assert_eq!(n.normalize_date(&text("1403/11")), None);
        assert_eq!(n.normalize_date(&text("1403/13/01")), None);
        assert_eq!(n.normalize_date(&RawCell::Number(1403.0)), None);
    }

    #[test]
    fn test_custom_year_offset() {
        let n = Normalizer::with_policy(NormalizerPolicy {
            two_digit_year_offset: 2000,
            ..NormalizerPolicy::default()
        });
        assert_eq!(n.normalize_date(&text("24/01/15")), Some("2024/01/15".to_string()));
    }

    #[test]
    fn test_fractional_day_time() {
        let n = Normalizer::new();
        assert_eq!(n.hour_from_time(&RawCell::Number(0.25)), Some(6));
        assert_eq!(n.hour_from_time(&RawCell::Number(0.0)), Some(0));
        assert_eq!(n.hour_from_time(&RawCell::Number(0.9999)), Some(0)); // 分钟进位到 24:00
        assert_eq!(n.hour_from_time(&text("0.5")), Some(12));
    }

    #[test]
    fn test_numeric_hour() {
        let n = Normalizer::new();
        assert_eq!(n.hour_from_time(&RawCell::Number(14.0)), Some(14));
        assert_eq!(n.hour_from_time(&RawCell::Number(14.9)), Some(14));
        assert_eq!(n.hour_from_time(&RawCell::Number(24.0)), Some(0));
        assert_eq!(n.hour_from_time(&RawCell::Number(30.0)), None);
    }

    #[test]
    fn test_text_time() {
        let n = Normalizer::new();
        assert_eq!(n.hour_from_slot("06:00"), Some(6));
        assert_eq!(n.hour_from_slot("22:30:00"), Some(22));
        assert_eq!(n.hour_from_slot("24:00"), Some(0));
        assert_eq!(n.hour_from_slot("2:00 PM"), Some(14));
        assert_eq!(n.hour_from_slot("12:00 PM"), Some(12));
        assert_eq!(n.hour_from_slot("12:00 am"), Some(0));
        assert_eq!(n.hour_from_slot("25:00"), None);
        assert_eq!(n.hour_from_slot("شب"), None);
        assert_eq!(n.hour_from_time(&RawCell::Empty), None);
    }

    #[test]
    fn test_parse_numeric() {
        let n = Normalizer::new();
        assert_eq!(n.parse_numeric(&text("1,250.5")), Some(1250.5));
        assert_eq!(n.parse_numeric(&RawCell::Number(300.0)), Some(300.0));
        assert_eq!(n.parse_numeric(&text("")), None);
        assert_eq!(n.parse_numeric(&text("abc")), None);
        assert_eq!(n.parse_numeric(&text("NaN")), None);
        assert_eq!(n.parse_numeric(&RawCell::Number(f64::NAN)), None);
        assert!(!n.is_valid_number(&RawCell::Empty));
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("08"), Some(8));
        assert_eq!(leading_int(" 5 00:00"), Some(5));
        assert_eq!(leading_int("-3"), Some(-3));
        assert_eq!(leading_int("x1"), None);
    }
}
