//! NHC CLI 应用

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "nhc")]
#[command(about = "OCloudView NHC - 网络健康自动化测试平台", long_about = None)]
#[command(version)]
struct Cli {
    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 执行健康检查运行
    Run {
        /// 测试床文件 (YAML)
        #[arg(long, short = 't')]
        testbed: Option<String>,

        /// 检查配置文件 (YAML)
        #[arg(long, short = 'c')]
        checks: Option<String>,

        /// 运行名称
        #[arg(long, default_value = "network-health")]
        name: String,

        /// 报告输出路径 (JSON)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// 运行结束后发送 Webex 状态通知
        #[arg(long)]
        notify: bool,
    },

    /// 测试床管理
    Testbed {
        #[command(subcommand)]
        action: TestbedAction,
    },

    /// 通知管理
    Notify {
        #[command(subcommand)]
        action: NotifyAction,
    },
}

#[derive(Subcommand)]
enum TestbedAction {
    /// 查看测试床设备
    Show {
        /// 测试床文件 (YAML)
        #[arg(long, short = 't')]
        testbed: Option<String>,
    },

    /// 校验测试床与检查配置
    Validate {
        /// 测试床文件 (YAML)
        #[arg(long, short = 't')]
        testbed: Option<String>,

        /// 检查配置文件 (YAML)
        #[arg(long, short = 'c')]
        checks: Option<String>,
    },
}

#[derive(Subcommand)]
enum NotifyAction {
    /// 发送测试消息验证 Webex 配置
    Test {
        /// 消息内容
        #[arg(default_value = "NHC 通知链路测试")]
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("NHC CLI 启动");

    // 处理命令
    match cli.command {
        Commands::Run {
            testbed,
            checks,
            name,
            output,
            notify,
        } => commands::run::handle(testbed, checks, name, output, notify).await?,
        Commands::Testbed { action } => commands::testbed::handle(action).await?,
        Commands::Notify { action } => commands::notify::handle(action).await?,
    }

    Ok(())
}
