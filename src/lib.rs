// ==========================================
// CCS 质量合规系统 - 核心库
// ==========================================
// 职责: 耐压强度 (CCS) 抽检数据 → 合规率 → 按吨位计的奖罚影响
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 计算规则
pub mod engine;

// 导入层 - 工作簿
pub mod importer;

// 数据仓储层 - 记录存储
pub mod repository;

// 配置层 - 业务参数与规则方案
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 分析层 - 月度摘要
pub mod analysis;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型与实体
pub use domain::{
    AppConfig, DailyRecord, DataPoint, ImpactTotals, MonthReport, PeriodReport, Profile,
    ReportRange, Rule, RuleVerdict, SamplingMode, WeekStats,
};

// 引擎
pub use engine::{Aggregator, Normalizer, PeriodStatsEngine, RangeAggregator, RuleMatcher};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "CCS 质量合规系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!APP_NAME.is_empty());
    }
}
