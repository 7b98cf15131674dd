// ==========================================
// CCS 质量合规系统 - 记录存储 Trait
// ==========================================
// 职责: 定义日记录集合的整体读写接口（不包含实现）
// 红线: 存储只做整体替换，不做按日增量
// ==========================================

use crate::domain::record::DailyRecord;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// RecordStore Trait
// ==========================================
// 实现者: SqliteRecordStore, LocalCacheStore, SyncedRecordStore
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 读取全部日记录（无数据时返回空列表）
    async fn load(&self) -> RepositoryResult<Vec<DailyRecord>>;

    /// 以给定记录整体替换已存储的记录
    async fn save(&self, records: &[DailyRecord]) -> RepositoryResult<()>;
}
