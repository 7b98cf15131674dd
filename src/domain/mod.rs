// ==========================================
// CCS 质量合规系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、统计结果对象
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod app_config;
pub mod cell;
pub mod record;
pub mod report;
pub mod rule;
pub mod types;

// 重导出核心类型
pub use app_config::{AppConfig, ReportRange};
pub use cell::{RawCell, RawRow};
pub use record::{DailyRecord, DataPoint, DateKey};
pub use report::{
    BandCounts, BandStats, ImpactTotals, MonthReport, PeriodReport, RuleVerdict, WeekReport,
    WeekStats, WeekWindow, NO_DATA_LABEL, NO_RULE_LABEL, WEEK_WINDOWS,
};
pub use rule::{
    default_profiles, Profile, Rule, CUSTOM_PROFILE_ID, FIXED_PROFILE_ID,
    REJECTION_FACTOR_THRESHOLD,
};
pub use types::{BandPosition, CompareOp, RuleType, SamplingMode};
