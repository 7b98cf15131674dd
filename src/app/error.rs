// ==========================================
// CCS 质量合规系统 - 应用层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 汇总导入/仓储/配置三层错误，供命令行入口统一输出
// ==========================================

use crate::config::ConfigError;
use crate::importer::ImportError;
use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("存储失败: {0}")]
    Repository(#[from] RepositoryError),

    #[error("配置失败: {0}")]
    Config(#[from] ConfigError),

    #[error("参数错误: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
