// ==========================================
// CCS 质量合规系统 - 合规配置读取 Trait
// ==========================================
// 职责: 定义计算所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigResult;
use crate::domain::app_config::AppConfig;
use crate::domain::rule::Profile;
use crate::domain::types::SamplingMode;
use async_trait::async_trait;

// ==========================================
// ComplianceConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ComplianceConfigReader: Send + Sync {
    /// 当前月份与两套合格区间
    ///
    /// # 默认值
    /// - 1403/11, 260..310, 260..310
    async fn get_app_config(&self) -> ConfigResult<AppConfig>;

    /// 规则方案列表
    ///
    /// # 默认值
    /// - default_profiles()（ccs_fixed + ccs_custom）
    async fn get_profiles(&self) -> ConfigResult<Vec<Profile>>;

    /// 采样模式
    ///
    /// # 默认值
    /// - 2h
    async fn get_sampling_mode(&self) -> ConfigResult<SamplingMode>;
}
