// ==========================================
// CCS 质量合规系统 - 领域类型定义
// ==========================================
// 职责: 采样模式 / 比较运算符 / 规则等级 / 区间位置
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 采样模式 (Sampling Mode)
// ==========================================
// 决定原始样本聚合到哪个时间粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamplingMode {
    /// 两小时一个点位（12 个固定时段）
    #[serde(rename = "2h")]
    TwoHour,
    /// 按班次平均（A/B/C 三班）
    #[serde(rename = "shift")]
    Shift,
    /// 按日平均
    #[serde(rename = "daily")]
    Daily,
}

impl Default for SamplingMode {
    fn default() -> Self {
        SamplingMode::TwoHour
    }
}

impl SamplingMode {
    /// 该模式下每天输出的数值个数
    pub fn slot_count(&self) -> usize {
        match self {
            SamplingMode::TwoHour => 12,
            SamplingMode::Shift => 3,
            SamplingMode::Daily => 1,
        }
    }
}

impl fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingMode::TwoHour => write!(f, "2h"),
            SamplingMode::Shift => write!(f, "shift"),
            SamplingMode::Daily => write!(f, "daily"),
        }
    }
}

impl FromStr for SamplingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "2h" => Ok(SamplingMode::TwoHour),
            "shift" => Ok(SamplingMode::Shift),
            "daily" => Ok(SamplingMode::Daily),
            other => Err(format!("未知采样模式: {}", other)),
        }
    }
}

// ==========================================
// 比较运算符 (Compare Op)
// ==========================================
// 规则上下界的开闭由运算符决定
// 下界: 仅 gt 为开区间, 其余为闭区间
// 上界: lt 为开区间, 其余为闭区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// 作为下界时是否为开区间
    pub fn is_exclusive_lower(&self) -> bool {
        matches!(self, CompareOp::Gt)
    }

    /// 作为上界时是否为开区间
    pub fn is_exclusive_upper(&self) -> bool {
        matches!(self, CompareOp::Lt)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Lt => write!(f, "lt"),
            CompareOp::Le => write!(f, "le"),
            CompareOp::Gt => write!(f, "gt"),
            CompareOp::Ge => write!(f, "ge"),
        }
    }
}

// ==========================================
// 规则等级 (Rule Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Success, // 达标/奖励
    Warning, // 罚款
    Danger,  // 拒收
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleType::Success => write!(f, "success"),
            RuleType::Warning => write!(f, "warning"),
            RuleType::Danger => write!(f, "danger"),
        }
    }
}

// ==========================================
// 区间位置 (Band Position)
// ==========================================
// 单个数值相对于 [min, max] 合格区间的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BandPosition {
    InRange,
    Low,
    High,
}

impl BandPosition {
    /// 数值分类（闭区间）
    ///
    /// NaN 不属于任何位置，返回 None
    pub fn classify(value: f64, min: f64, max: f64) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        if value >= min && value <= max {
            Some(BandPosition::InRange)
        } else if value < min {
            Some(BandPosition::Low)
        } else {
            Some(BandPosition::High)
        }
    }
}

impl fmt::Display for BandPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandPosition::InRange => write!(f, "IN_RANGE"),
            BandPosition::Low => write!(f, "LOW"),
            BandPosition::High => write!(f, "HIGH"),
        }
    }
}
