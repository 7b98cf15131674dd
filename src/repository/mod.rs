// ==========================================
// CCS 质量合规系统 - 数据仓储层
// ==========================================
// 职责: 日记录集合的持久化
// 红线: Repository 不含业务逻辑
// ==========================================

pub mod error;
pub mod local_cache;
pub mod record_store;
pub mod sqlite_record_store;
pub mod synced_store;

pub use error::{RepositoryError, RepositoryResult};
pub use local_cache::{LocalCacheStore, LOCAL_CACHE_FILE};
pub use record_store::RecordStore;
pub use sqlite_record_store::{SqliteRecordStore, MAIN_RECORDS_ID};
pub use synced_store::{SyncStatus, SyncedRecordStore, DEFAULT_LOAD_TIMEOUT};
