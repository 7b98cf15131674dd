// ==========================================
// CCS 质量合规系统 - 配置管理器
// ==========================================
// 职责: 业务参数 / 规则方案 / 采样模式 / 导入列映射 的加载与保存
// 存储: config_kv 表 (scope_id='global'，value 为 JSON)
// 说明: 缺失或损坏的配置项回落到默认值，不阻断计算
// ==========================================

use crate::config::config_reader_trait::ComplianceConfigReader;
use crate::config::error::{ConfigError, ConfigResult};
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::domain::app_config::AppConfig;
use crate::domain::rule::{default_profiles, Profile, Rule};
use crate::domain::types::SamplingMode;
use crate::importer::column_mapping::ImportConfig;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA 并建表（均幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    // ==========================================
    // 原始键值
    // ==========================================

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取 JSON 配置，缺失或无法解析时返回 None
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<Option<T>> {
        let Some(raw) = self.get_global_config_value(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "配置值无法解析，使用默认值");
                Ok(None)
            }
        }
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> ConfigResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.set_global_config_value(key, &raw)
    }

    // ==========================================
    // 业务参数
    // ==========================================

    pub fn load_app_config(&self) -> ConfigResult<AppConfig> {
        Ok(self
            .get_json(config_keys::APP_CONFIG)?
            .unwrap_or_default())
    }

    pub fn save_app_config(&self, config: &AppConfig) -> ConfigResult<()> {
        self.set_json(config_keys::APP_CONFIG, config)
    }

    pub fn load_sampling_mode(&self) -> ConfigResult<SamplingMode> {
        Ok(self
            .get_json(config_keys::SAMPLING_MODE)?
            .unwrap_or_default())
    }

    pub fn save_sampling_mode(&self, mode: SamplingMode) -> ConfigResult<()> {
        self.set_json(config_keys::SAMPLING_MODE, &mode)
    }

    // ==========================================
    // 规则方案
    // ==========================================

    pub fn load_profiles(&self) -> ConfigResult<Vec<Profile>> {
        Ok(self
            .get_json(config_keys::RULE_PROFILES)?
            .unwrap_or_else(default_profiles))
    }

    pub fn save_profiles(&self, profiles: &[Profile]) -> ConfigResult<()> {
        self.set_json(config_keys::RULE_PROFILES, profiles)
    }

    /// 恢复默认规则方案
    pub fn reset_profiles(&self) -> ConfigResult<Vec<Profile>> {
        let profiles = default_profiles();
        self.save_profiles(&profiles)?;
        Ok(profiles)
    }

    /// 在方案末尾追加一条初始规则，返回新规则序号
    pub fn add_rule(&self, profile_id: &str) -> ConfigResult<usize> {
        self.edit_profile(profile_id, |profile| {
            profile.rules.push(Rule::placeholder());
            Ok(profile.rules.len() - 1)
        })
    }

    /// 替换方案中第 index 条规则
    pub fn update_rule(&self, profile_id: &str, index: usize, rule: Rule) -> ConfigResult<()> {
        self.edit_profile(profile_id, |profile| {
            let slot = profile
                .rules
                .get_mut(index)
                .ok_or_else(|| ConfigError::RuleIndexOutOfRange {
                    profile_id: profile.id.clone(),
                    index,
                })?;
            *slot = rule;
            Ok(())
        })
    }

    /// 删除方案中第 index 条规则，返回被删除的规则
    pub fn remove_rule(&self, profile_id: &str, index: usize) -> ConfigResult<Rule> {
        self.edit_profile(profile_id, |profile| {
            if index >= profile.rules.len() {
                return Err(ConfigError::RuleIndexOutOfRange {
                    profile_id: profile.id.clone(),
                    index,
                });
            }
            Ok(profile.rules.remove(index))
        })
    }

    fn edit_profile<T>(
        &self,
        profile_id: &str,
        edit: impl FnOnce(&mut Profile) -> ConfigResult<T>,
    ) -> ConfigResult<T> {
        let mut profiles = self.load_profiles()?;
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == profile_id)
            .ok_or_else(|| ConfigError::ProfileNotFound(profile_id.to_string()))?;
        if profile.readonly {
            return Err(ConfigError::ReadonlyProfile(profile_id.to_string()));
        }

        let result = edit(profile)?;
        self.save_profiles(&profiles)?;
        tracing::info!(profile_id, "规则方案已更新");
        Ok(result)
    }

    // ==========================================
    // 导入列映射
    // ==========================================

    /// 上次使用的导入列映射（未保存过返回 None）
    pub fn load_import_config(&self) -> ConfigResult<Option<ImportConfig>> {
        self.get_json(config_keys::IMPORT_MAPPING)
    }

    pub fn save_import_config(&self, config: &ImportConfig) -> ConfigResult<()> {
        self.set_json(config_keys::IMPORT_MAPPING, config)
    }

    // ==========================================
    // 快照
    // ==========================================

    /// 所有 global 配置的 JSON 快照（key → value 原文）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&config_map)
            .map_err(|e| ConfigError::SnapshotFormatError(e.to_string()))
    }

    /// 从快照恢复配置，返回写入的配置项数量
    ///
    /// 覆盖同名配置，快照中没有的键保持不变。
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)
            .map_err(|e| ConfigError::SnapshotFormatError(e.to_string()))?;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value, updated_at)
                 VALUES ('global', ?1, ?2, datetime('now'))
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }
        tx.commit()?;

        Ok(count)
    }
}

// ==========================================
// ComplianceConfigReader 实现
// ==========================================
#[async_trait]
impl ComplianceConfigReader for ConfigManager {
    async fn get_app_config(&self) -> ConfigResult<AppConfig> {
        self.load_app_config()
    }

    async fn get_profiles(&self) -> ConfigResult<Vec<Profile>> {
        self.load_profiles()
    }

    async fn get_sampling_mode(&self) -> ConfigResult<SamplingMode> {
        self.load_sampling_mode()
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 当前月份 + 合格区间
    pub const APP_CONFIG: &str = "app_config";

    // 规则方案（ccs_fixed / ccs_custom）
    pub const RULE_PROFILES: &str = "rule_profiles";

    // 采样模式（2h / shift / daily）
    pub const SAMPLING_MODE: &str = "sampling_mode";

    // 上次使用的导入列映射
    pub const IMPORT_MAPPING: &str = "import_mapping";
}
