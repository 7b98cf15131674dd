// ==========================================
// CCS 质量合规系统 - 命令行入口
// ==========================================
// 用法:
//   ccs-compliance import <workbook> [mapping.json]
//   ccs-compliance report <startYear> <startMonth> <endYear> <endMonth>
//   ccs-compliance month [year month]
//   ccs-compliance mode <2h|shift|daily>
//   ccs-compliance config [snapshot.json]
// 数据库: CCS_COMPLIANCE_DB_PATH 或用户数据目录
// ==========================================

use ccs_compliance::app::{get_default_db_path, AppError, AppResult, AppState};
use ccs_compliance::domain::{ReportRange, SamplingMode};
use ccs_compliance::importer::ImportConfig;
use ccs_compliance::logging;
use std::path::Path;
use std::process::ExitCode;

const USAGE: &str = "用法:
  ccs-compliance import <workbook> [mapping.json]
  ccs-compliance report <startYear> <startMonth> <endYear> <endMonth>
  ccs-compliance month [year month]
  ccs-compliance mode <2h|shift|daily>
  ccs-compliance config [snapshot.json]";

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::InvalidArgument(msg)) => {
            eprintln!("{}\n\n{}", msg, USAGE);
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!(error = %e, "命令执行失败");
            eprintln!("错误: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> AppResult<()> {
    let Some(command) = args.first() else {
        return Err(AppError::InvalidArgument("缺少命令".to_string()));
    };

    let db_path = get_default_db_path();
    tracing::info!("ccs-compliance {} 使用数据库: {}", ccs_compliance::VERSION, db_path);
    let state = AppState::new(db_path)?;

    match command.as_str() {
        "import" => {
            let workbook = arg(args, 1, "workbook")?;
            let mapping = match args.get(2) {
                Some(path) => {
                    let json = std::fs::read_to_string(path)
                        .map_err(|e| AppError::InvalidArgument(format!("无法读取列映射 {}: {}", path, e)))?;
                    Some(ImportConfig::from_json(&json)?)
                }
                None => None,
            };
            let report = state.import_workbook(Path::new(workbook), mapping).await?;
            print_json(&report)
        }
        "report" => {
            state.load_records().await?;
            let range = ReportRange::new(
                parse_num(args, 1, "startYear")?,
                parse_num(args, 2, "startMonth")?,
                parse_num(args, 3, "endYear")?,
                parse_num(args, 4, "endMonth")?,
            );
            let report = state.period_report(range).await?;
            print_json(&report)
        }
        "month" => {
            state.load_records().await?;
            let report = if args.len() >= 3 {
                state
                    .month_report(parse_num(args, 1, "year")?, parse_num(args, 2, "month")?)
                    .await?
            } else {
                let config = state.config_manager.load_app_config()?;
                state.month_report(config.year, config.month).await?
            };
            print_json(&report)
        }
        "mode" => {
            let mode: SamplingMode = arg(args, 1, "mode")?
                .parse()
                .map_err(AppError::InvalidArgument)?;
            state.config_manager.save_sampling_mode(mode)?;
            println!("{}", mode);
            Ok(())
        }
        "config" => match args.get(1) {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| AppError::InvalidArgument(format!("无法读取快照 {}: {}", path, e)))?;
                let count = state.config_manager.restore_config_from_snapshot(&json)?;
                println!("restored={}", count);
                Ok(())
            }
            None => {
                println!("{}", state.config_manager.get_config_snapshot()?);
                Ok(())
            }
        },
        other => Err(AppError::InvalidArgument(format!("未知命令: {}", other))),
    }
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> AppResult<&'a str> {
    args.get(index)
        .map(|s| s.as_str())
        .ok_or_else(|| AppError::InvalidArgument(format!("缺少参数 <{}>", name)))
}

fn parse_num<T: std::str::FromStr>(args: &[String], index: usize, name: &str) -> AppResult<T> {
    let raw = arg(args, index, name)?;
    raw.trim()
        .parse()
        .map_err(|_| AppError::InvalidArgument(format!("参数 <{}> 不是有效数字: {}", name, raw)))
}

fn print_json<T: serde::Serialize>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
    println!("{}", json);
    Ok(())
}
