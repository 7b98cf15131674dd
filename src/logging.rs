// ==========================================
// CCS 质量合规系统 - 日志初始化
// ==========================================
// 使用 tracing + tracing-subscriber
// 环境变量:
// - RUST_LOG: 过滤器（默认 info），如 RUST_LOG=ccs_compliance=debug
// - CCS_LOG_FORMAT: text（默认）/ json
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志格式环境变量
pub const LOG_FORMAT_ENV: &str = "CCS_LOG_FORMAT";

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// 从环境变量读取，未设置或无法识别时为 Text
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(v) => Self::parse(&v),
            Err(_) => LogFormat::Text,
        }
    }

    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// 初始化日志系统（命令行入口调用一次）
///
/// # 示例
/// ```no_run
/// use ccs_compliance::logging;
/// logging::init();
/// ```
pub fn init() {
    init_with(LogFormat::from_env(), "info");
}

/// 指定格式与默认级别初始化；RUST_LOG 存在时以其为准
///
/// 重复初始化时静默忽略。
pub fn init_with(format: LogFormat, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// 初始化测试环境的日志系统（debug 级别，输出到测试捕获）
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
