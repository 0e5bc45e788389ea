// ==========================================
// 周中聚会节目派工系统 - 命令行入口
// ==========================================
// 用法:
//   ministry-scheduler <request.json|-> [--db <path>] [--confirm] [--force]
//
// - 读取生成请求 JSON,输出结果 JSON 到 stdout
// - 请求未携带 options 时,从 --db 的 config_kv 表读取默认选项
// - --confirm: 确认并保存到 SQLite; --force: 带冲突也保存
// ==========================================

use anyhow::{bail, Context};
use chrono::NaiveDate;
use ministry_scheduler::config::ConfigManager;
use ministry_scheduler::db::{init_schema, open_sqlite_connection};
use ministry_scheduler::{
    GenerationOptions, Member, ProgramPart, ScheduleOrchestrator, SqliteAssignmentRepository,
};
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// 生成请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationRequest {
    week_start_date: NaiveDate,
    members: Vec<Member>,
    parts: Vec<ProgramPart>,
    #[serde(default)]
    options: Option<GenerationOptions>,
}

#[derive(Debug, Default)]
struct CliArgs {
    request_path: Option<String>,
    db_path: Option<String>,
    confirm: bool,
    force: bool,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut args = CliArgs::default();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--db" => {
                args.db_path = Some(iter.next().context("--db 需要路径参数")?);
            }
            "--confirm" => args.confirm = true,
            "--force" => args.force = true,
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with("--") => bail!("未知参数: {}", other),
            other => args.request_path = Some(other.to_string()),
        }
    }

    Ok(args)
}

fn print_usage() {
    eprintln!("{} {}", ministry_scheduler::APP_NAME, ministry_scheduler::VERSION);
    eprintln!("用法: ministry-scheduler <request.json|-> [--db <path>] [--confirm] [--force]");
}

/// 默认数据库路径
///
/// 优先读取 MINISTRY_SCHEDULER_DB_PATH,否则使用用户数据目录
fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("MINISTRY_SCHEDULER_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./ministry_scheduler.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("ministry-scheduler");
        std::fs::create_dir_all(&dir).ok();
        path = dir.join("ministry_scheduler.db");
    }
    path.to_string_lossy().to_string()
}

fn read_request(path: Option<&str>) -> anyhow::Result<GenerationRequest> {
    let raw = match path {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("读取 stdin 失败")?;
            buf
        }
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("读取请求文件失败: {}", p))?,
    };
    serde_json::from_str(&raw).context("请求 JSON 解析失败")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ministry_scheduler::logging::init();

    let args = parse_args()?;
    let request = read_request(args.request_path.as_deref())?;

    if !args.confirm && args.db_path.is_none() {
        // 纯预览: 不触碰数据库
        let options = request.options.unwrap_or_default();
        let orchestrator = ScheduleOrchestrator::new(Arc::new(options.clone()));
        let result = orchestrator
            .generate(request.members, request.parts, request.week_start_date, &options)
            .await?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let db_path = args.db_path.clone().unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);
    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let orchestrator = ScheduleOrchestrator::new(Arc::new(ConfigManager::from_connection(conn.clone())?));
    let options = match request.options {
        Some(options) => options,
        None => orchestrator.default_options().await?,
    };
    let result = orchestrator
        .generate(request.members, request.parts, request.week_start_date, &options)
        .await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if args.confirm {
        let repo = SqliteAssignmentRepository::new(conn);
        orchestrator.confirm_and_save(&result, &repo, args.force).await?;
    }

    Ok(())
}
