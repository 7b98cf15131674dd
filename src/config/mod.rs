// ==========================================
// CCS 质量合规系统 - 配置层
// ==========================================
// 职责: 业务参数与规则方案的持久化
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod config_reader_trait;
pub mod error;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use config_reader_trait::ComplianceConfigReader;
pub use error::{ConfigError, ConfigResult};
