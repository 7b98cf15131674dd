// ==========================================
// CCS 质量合规系统 - 本地缓存存储
// ==========================================
// 存储: 单个 JSON 文件（记录数组）
// 用途: 远端存储不可用时的兜底副本
// ==========================================

use crate::domain::record::DailyRecord;
use crate::repository::error::RepositoryResult;
use crate::repository::record_store::RecordStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// 默认缓存文件名
pub const LOCAL_CACHE_FILE: &str = "ccs_v3_db.json";

pub struct LocalCacheStore {
    path: PathBuf,
}

impl LocalCacheStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// 用户数据目录下的默认缓存位置
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ccs-compliance")
            .join(LOCAL_CACHE_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordStore for LocalCacheStore {
    async fn load(&self) -> RepositoryResult<Vec<DailyRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = tokio::fs::read_to_string(&self.path).await?;
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&json)?)
    }

    async fn save(&self, records: &[DailyRecord]) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string(records)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
