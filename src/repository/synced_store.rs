// ==========================================
// CCS 质量合规系统 - 主存储 + 本地缓存
// ==========================================
// 读取: 主存储（限时）→ 成功则刷新缓存；任何失败 → 读缓存
// 写入: 先写缓存，再写主存储；主存储失败只降级为本地状态
// ==========================================

use crate::domain::record::DailyRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::local_cache::LocalCacheStore;
use crate::repository::record_store::RecordStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 主存储读取超时
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// 最近一次写入的同步状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// 缓存与主存储均已写入
    Synced,
    /// 仅写入本地缓存
    Local,
}

impl SyncStatus {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncStatus::Synced)
    }
}

pub struct SyncedRecordStore<P: RecordStore> {
    primary: P,
    cache: LocalCacheStore,
    load_timeout: Duration,
}

impl<P: RecordStore> SyncedRecordStore<P> {
    pub fn new(primary: P, cache: LocalCacheStore) -> Self {
        Self {
            primary,
            cache,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn cache(&self) -> &LocalCacheStore {
        &self.cache
    }

    /// 读取记录，主存储不可用时回退到缓存
    pub async fn load_with_fallback(&self) -> RepositoryResult<Vec<DailyRecord>> {
        match self.load_primary().await {
            Ok(records) => {
                if let Err(e) = self.cache.save(&records).await {
                    tracing::warn!(error = %e, "刷新本地缓存失败");
                }
                Ok(records)
            }
            Err(e) => {
                tracing::warn!(error = %e, "主存储读取失败，改用本地缓存");
                self.cache.load().await
            }
        }
    }

    /// 写入记录并返回同步状态
    ///
    /// 缓存写入失败是错误；主存储写入失败只降级为 Local。
    pub async fn save_with_status(&self, records: &[DailyRecord]) -> RepositoryResult<SyncStatus> {
        self.cache.save(records).await?;

        match self.primary.save(records).await {
            Ok(()) => Ok(SyncStatus::Synced),
            Err(e) => {
                tracing::error!(error = %e, "主存储写入失败，仅保存在本地缓存");
                Ok(SyncStatus::Local)
            }
        }
    }

    /// 写入记录，返回是否已同步到主存储
    pub async fn save_data(&self, records: &[DailyRecord]) -> bool {
        match self.save_with_status(records).await {
            Ok(status) => status.is_synced(),
            Err(e) => {
                tracing::error!(error = %e, "本地缓存写入失败");
                false
            }
        }
    }

    async fn load_primary(&self) -> RepositoryResult<Vec<DailyRecord>> {
        match tokio::time::timeout(self.load_timeout, self.primary.load()).await {
            Ok(result) => result,
            Err(_) => Err(RepositoryError::Timeout(self.load_timeout.as_millis() as u64)),
        }
    }
}

#[async_trait]
impl<P: RecordStore> RecordStore for SyncedRecordStore<P> {
    async fn load(&self) -> RepositoryResult<Vec<DailyRecord>> {
        self.load_with_fallback().await
    }

    async fn save(&self, records: &[DailyRecord]) -> RepositoryResult<()> {
        self.save_with_status(records).await.map(|_| ())
    }
}
