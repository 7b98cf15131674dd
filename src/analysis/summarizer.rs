// ==========================================
// CCS 质量合规系统 - 质量分析摘要
// ==========================================
// 职责: 调用外部文本分析服务，为当前月份生成质量分析
// 红线: 分析失败只返回提示文本，不影响任何计算结果
// ==========================================

use crate::analysis::digest::{build_prompt, DailyDigest};
use crate::domain::app_config::AppConfig;
use crate::domain::record::DailyRecord;
use async_trait::async_trait;

/// 当前月份无数据
pub const NO_MONTH_DATA_MESSAGE: &str = "本月没有可分析的数据。";

/// 服务返回空文本
pub const EMPTY_ANALYSIS_MESSAGE: &str = "未生成分析结果。";

/// 分析失败的提示前缀
pub const ANALYSIS_ERROR_PREFIX: &str = "智能分析失败: ";

// ==========================================
// QualitySummarizer Trait
// ==========================================
// 实现者: 外部文本生成服务的适配器
#[async_trait]
pub trait QualitySummarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> anyhow::Result<String>;
}

/// 生成 config 所指月份的质量分析文本
pub async fn summarize_month(
    summarizer: &dyn QualitySummarizer,
    records: &[DailyRecord],
    config: &AppConfig,
) -> String {
    let digest = DailyDigest::for_config(records, config);
    if digest.is_empty() {
        return NO_MONTH_DATA_MESSAGE.to_string();
    }

    let prompt = build_prompt(&digest, config);
    match summarizer.summarize(&prompt).await {
        Ok(text) if text.trim().is_empty() => EMPTY_ANALYSIS_MESSAGE.to_string(),
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "质量分析服务调用失败");
            format!("{}{}", ANALYSIS_ERROR_PREFIX, e)
        }
    }
}
