// ==========================================
// CCS 质量合规系统 - 应用状态
// ==========================================
// 职责: 持有配置、记录存储与内存中的记录集，向入口提供计算结果
// 红线: 记录集只做整体替换；计算全部委托给引擎层
// ==========================================

use crate::analysis::summarizer::{summarize_month, QualitySummarizer};
use crate::app::error::{AppError, AppResult};
use crate::config::{ComplianceConfigReader, ConfigManager};
use crate::domain::app_config::{AppConfig, ReportRange};
use crate::domain::record::DailyRecord;
use crate::domain::report::{ImpactTotals, MonthReport, PeriodReport};
use crate::domain::rule::Profile;
use crate::domain::types::SamplingMode;
use crate::engine::range_aggregator::RangeAggregator;
use crate::importer::column_mapping::ImportConfig;
use crate::importer::record_importer::{ImportReport, RecordImporter};
use crate::repository::{
    LocalCacheStore, RecordStore, SqliteRecordStore, SyncedRecordStore, LOCAL_CACHE_FILE,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "CCS_COMPLIANCE_DB_PATH";

/// 默认数据库文件名
pub const DEFAULT_DB_FILE: &str = "ccs_compliance.db";

// 一次计算所需的全部配置
struct CalcContext {
    config: AppConfig,
    profiles: Vec<Profile>,
    mode: SamplingMode,
}

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    store: Arc<dyn RecordStore>,
    records: RwLock<Vec<DailyRecord>>,
    importer: RecordImporter,
    range_aggregator: RangeAggregator,
}

impl AppState {
    /// 以 SQLite 为主存储、数据库同目录 JSON 文件为缓存创建应用状态
    pub fn new(db_path: String) -> AppResult<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let config_manager = Arc::new(ConfigManager::new(&db_path)?);
        let primary = SqliteRecordStore::new(&db_path)?;
        let cache = LocalCacheStore::new(cache_path_for(&db_path));
        let store: Arc<dyn RecordStore> = Arc::new(SyncedRecordStore::new(primary, cache));

        Ok(Self::with_store(db_path, config_manager, store))
    }

    /// 使用指定存储创建（记录集初始为空，需调用 load_records）
    pub fn with_store(
        db_path: String,
        config_manager: Arc<ConfigManager>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            db_path,
            config_manager,
            store,
            records: RwLock::new(Vec::new()),
            importer: RecordImporter::new(),
            range_aggregator: RangeAggregator::new(),
        }
    }

    // ==========================================
    // 记录集
    // ==========================================

    /// 从存储加载记录集，返回记录数
    pub async fn load_records(&self) -> AppResult<usize> {
        let loaded = self.store.load().await?;
        let count = loaded.len();
        *self.records.write().await = loaded;
        tracing::info!(records = count, "记录集已加载");
        Ok(count)
    }

    /// 当前记录集副本
    pub async fn records(&self) -> Vec<DailyRecord> {
        self.records.read().await.clone()
    }

    /// 以新记录集整体替换并保存
    pub async fn replace_records(&self, records: Vec<DailyRecord>) -> AppResult<()> {
        self.store.save(&records).await?;
        *self.records.write().await = records;
        Ok(())
    }

    /// 导入工作簿并整体替换记录集
    ///
    /// mapping 为 None 时使用上次保存的列映射；使用的映射会被保存。
    pub async fn import_workbook(
        &self,
        path: &Path,
        mapping: Option<ImportConfig>,
    ) -> AppResult<ImportReport> {
        let mapping = match mapping {
            Some(m) => m,
            None => self.config_manager.load_import_config()?.ok_or_else(|| {
                AppError::InvalidArgument("未提供列映射，且没有已保存的列映射".to_string())
            })?,
        };

        let outcome = self.importer.import_workbook(path, &mapping)?;
        self.config_manager.save_import_config(&mapping)?;
        self.replace_records(outcome.records).await?;

        Ok(outcome.report)
    }

    // ==========================================
    // 计算
    // ==========================================

    async fn calc_context(&self) -> AppResult<CalcContext> {
        let reader: &dyn ComplianceConfigReader = self.config_manager.as_ref();
        Ok(CalcContext {
            config: reader.get_app_config().await?,
            profiles: reader.get_profiles().await?,
            mode: reader.get_sampling_mode().await?,
        })
    }

    /// 当前月份（AppConfig.year/month）的影响合计
    pub async fn current_month_impacts(&self) -> AppResult<ImpactTotals> {
        let ctx = self.calc_context().await?;
        let records = self.records.read().await;
        Ok(self.range_aggregator.month_impacts(
            &records,
            ctx.config.year,
            ctx.config.month,
            &ctx.config,
            &ctx.profiles,
            ctx.mode,
        ))
    }

    /// 全部记录的影响合计
    pub async fn total_impacts(&self) -> AppResult<ImpactTotals> {
        let ctx = self.calc_context().await?;
        let records = self.records.read().await;
        Ok(self
            .range_aggregator
            .calculate_total_impact(&records, &ctx.config, &ctx.profiles, ctx.mode))
    }

    /// 指定月份的 4 个窗口统计
    pub async fn month_report(&self, year: i32, month: u32) -> AppResult<MonthReport> {
        check_range(&ReportRange::single_month(year, month))?;
        let ctx = self.calc_context().await?;
        let records = self.records.read().await;
        Ok(self.range_aggregator.month_report(
            &records,
            year,
            month,
            &ctx.config,
            &ctx.profiles,
            ctx.mode,
        ))
    }

    /// 月份区间报表
    pub async fn period_report(&self, range: ReportRange) -> AppResult<PeriodReport> {
        check_range(&range)?;
        let ctx = self.calc_context().await?;
        let records = self.records.read().await;
        Ok(self.range_aggregator.build_period_report(
            &records,
            range,
            &ctx.config,
            &ctx.profiles,
            ctx.mode,
        ))
    }

    /// 当前月份的质量分析文本
    pub async fn analyze_current_month(&self, summarizer: &dyn QualitySummarizer) -> AppResult<String> {
        let config = self.config_manager.load_app_config()?;
        let records = self.records.read().await;
        Ok(summarize_month(summarizer, &records, &config).await)
    }
}

fn check_range(range: &ReportRange) -> AppResult<()> {
    if range.has_valid_months() {
        Ok(())
    } else {
        Err(AppError::InvalidArgument(format!(
            "月份必须在 1..=12 内: {}/{} - {}/{}",
            range.start_year, range.start_month, range.end_year, range.end_month
        )))
    }
}

/// 缓存文件与数据库放在同一目录
fn cache_path_for(db_path: &str) -> PathBuf {
    match Path::new(db_path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(LOCAL_CACHE_FILE),
        _ => LocalCacheStore::default_path(),
    }
}

/// 默认数据库路径
///
/// 优先使用环境变量 CCS_COMPLIANCE_DB_PATH，其次用户数据目录，最后当前目录。
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(".").join(DEFAULT_DB_FILE);
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("ccs-compliance");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DEFAULT_DB_FILE);
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_path_next_to_db() {
        let path = cache_path_for("/tmp/ccs/ccs_compliance.db");
        assert_eq!(path, PathBuf::from("/tmp/ccs").join(LOCAL_CACHE_FILE));
    }

    #[test]
    fn test_default_db_path_ends_with_file() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
    }
}
