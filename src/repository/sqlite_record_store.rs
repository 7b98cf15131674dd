// ==========================================
// CCS 质量合规系统 - SQLite 记录存储
// ==========================================
// 存储: ccs_storage 表，固定主键 main_records，data 列为 JSON 数组
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::record::DailyRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::RecordStore;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// 记录集合的固定主键
pub const MAIN_RECORDS_ID: &str = "main_records";

// ==========================================
// SqliteRecordStore
// ==========================================
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// 打开数据库并建表
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（建表幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 最近一次写入时间（RFC 3339），无数据返回 None
    pub fn last_updated(&self) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT updated_at FROM ccs_storage WHERE id = ?1",
                params![MAIN_RECORDS_ID],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn load(&self) -> RepositoryResult<Vec<DailyRecord>> {
        let conn = self.get_conn()?;
        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM ccs_storage WHERE id = ?1",
                params![MAIN_RECORDS_ID],
                |row| row.get(0),
            )
            .optional()?;

        match data {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, records: &[DailyRecord]) -> RepositoryResult<()> {
        let json = serde_json::to_string(records)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO ccs_storage (id, data, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at
            "#,
            params![MAIN_RECORDS_ID, json, Utc::now().to_rfc3339()],
        )?;

        tracing::debug!(records = records.len(), "记录已写入 ccs_storage");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::DataPoint;
    use tempfile::NamedTempFile;

    fn sample_record() -> DailyRecord {
        let mut record = DailyRecord::empty("1403/11/05");
        record.tonnage = 1250.5;
        record.data_points.push(DataPoint::new("06:00", 287.0));
        record
    }

    #[tokio::test]
    async fn test_empty_store_loads_nothing() {
        let temp_file = NamedTempFile::new().unwrap();
        let store = SqliteRecordStore::new(temp_file.path().to_str().unwrap()).unwrap();

        assert!(store.load().await.unwrap().is_empty());
        assert!(store.last_updated().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_whole_set() {
        let temp_file = NamedTempFile::new().unwrap();
        let store = SqliteRecordStore::new(temp_file.path().to_str().unwrap()).unwrap();

        store.save(&[sample_record(), DailyRecord::empty("1403/11/06")]).await.unwrap();
        store.save(&[sample_record()]).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, vec![sample_record()]);
        assert!(store.last_updated().unwrap().is_some());
    }
}
