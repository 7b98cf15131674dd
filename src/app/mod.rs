// ==========================================
// CCS 质量合规系统 - 应用层
// ==========================================
// 职责: 组装配置、存储与引擎，供命令行入口使用
// ==========================================

pub mod error;
pub mod state;

// 重导出
pub use error::{AppError, AppResult};
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
