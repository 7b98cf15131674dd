// ==========================================
// CCS 质量合规系统 - 分析层
// ==========================================
// 职责: 月度质量摘要与外部分析服务接口
// ==========================================

pub mod digest;
pub mod summarizer;

pub use digest::{build_prompt, DailyDigest, DigestLine};
pub use summarizer::{summarize_month, QualitySummarizer, NO_MONTH_DATA_MESSAGE};
