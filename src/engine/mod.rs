// ==========================================
// CCS 质量合规系统 - 引擎层
// ==========================================
// 职责: 规范化 → 聚合 → 规则匹配 → 窗口统计 → 区间汇总
// 红线: 引擎不做 I/O，不持有可变状态，同样输入必得同样输出
// ==========================================

pub mod aggregator;
pub mod normalizer;
pub mod period_stats;
pub mod range_aggregator;
pub mod rule_matcher;

// 重导出核心引擎
pub use aggregator::{Aggregator, TIME_SLOTS_2H, TIME_SLOT_HOURS_2H};
pub use normalizer::{
    Normalizer, NormalizerPolicy, SERIAL_DATE_THRESHOLD, TWO_DIGIT_YEAR_OFFSET,
};
pub use period_stats::PeriodStatsEngine;
pub use range_aggregator::RangeAggregator;
pub use rule_matcher::RuleMatcher;
