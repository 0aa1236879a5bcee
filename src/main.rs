use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use handover_core::{AppConfig, JobKind};
use noc_handover::app::Application;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "noc-handover")]
#[command(version)]
#[command(about = "NOC交接报告自动化服务")]
struct Cli {
    /// 配置文件路径（默认依次查找 config/handover.toml、handover.toml、/etc/noc-handover/config.toml）
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// 日志级别，覆盖配置文件
    #[arg(short, long, global = true, value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: Option<String>,

    /// 日志格式，覆盖配置文件
    #[arg(long, global = true, value_parser = ["json", "pretty"])]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 运行定时任务与按需报告服务（默认）
    Serve,
    /// 立即执行一次指定任务后退出
    RunJob {
        /// am_update | mid_handover | standup_reminder | overnight_handover | followup_reminder
        job: JobKind,
    },
    /// 以纯文本渲染一份报告到标准输出
    Preview {
        /// 报告名称，例如 full_ho、outstanding_incidents
        component: String,
    },
    /// 列出触发器及其之后的触发时间
    Jobs {
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("加载配置文件失败: {path}"),
        None => "加载配置失败".to_string(),
    })?;

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.observability.log_level.clone());
    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.observability.log_format.clone());
    init_logging(&log_level, &log_format)?;

    let mut app = Application::new(config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(app).await,
        Commands::RunJob { job } => {
            if matches!(job, JobKind::AmUpdate) {
                warn!("单次运行时没有已创建的交接工单，am_update 不会产生任何效果");
            }
            app.run_job(job).await
        }
        Commands::Preview { component } => {
            println!("{}", app.preview(&component).await?);
            Ok(())
        }
        Commands::Jobs { count } => {
            for line in app.schedule_table(Utc::now(), count) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

async fn serve(app: Application) -> Result<()> {
    info!("启动NOC交接服务");

    app.run_until(wait_for_shutdown_signal()).await?;

    info!("NOC交接服务已退出");
    Ok(())
}

/// 初始化日志系统，`RUST_LOG` 优先于配置的级别
fn init_logging(log_level: &str, log_format: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .context("初始化JSON日志格式失败")?;
        }
        "pretty" => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()
                .context("初始化Pretty日志格式失败")?;
        }
        _ => {
            return Err(anyhow::anyhow!("不支持的日志格式: {log_format}"));
        }
    }

    Ok(())
}

/// 等待 Ctrl+C 或 SIGTERM
async fn wait_for_shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("安装SIGTERM信号处理器失败")?;

        tokio::select! {
            result = signal::ctrl_c() => {
                result.context("安装Ctrl+C信号处理器失败")?;
                info!("收到Ctrl+C信号");
            },
            _ = terminate.recv() => {
                info!("收到SIGTERM信号");
            },
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await.context("安装Ctrl+C信号处理器失败")?;
        info!("收到Ctrl+C信号");
    }

    Ok(())
}
