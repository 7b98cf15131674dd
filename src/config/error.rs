// ==========================================
// CCS 质量合规系统 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("数据库操作失败: {0}")]
    DatabaseError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("配置值格式错误 (key={key}): {message}")]
    InvalidValue { key: String, message: String },

    #[error("规则方案不存在: {0}")]
    ProfileNotFound(String),

    #[error("规则方案只读: {0}")]
    ReadonlyProfile(String),

    #[error("规则序号越界: profile={profile_id}, index={index}")]
    RuleIndexOutOfRange { profile_id: String, index: usize },

    #[error("快照格式错误: {0}")]
    SnapshotFormatError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for ConfigError {
    fn from(err: rusqlite::Error) -> Self {
        ConfigError::DatabaseError(err.to_string())
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
