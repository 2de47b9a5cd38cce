//! StillUp 主程序入口
//!
//! 执行一次完整的站点检测后退出

use anyhow::{Context, Result};
use clap::Parser;
use stillup::app::{self, EXIT_OK};
use stillup::cli::Args;
use stillup::logging::{LogConfig, LoggingSystem};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.log_level.clone().into(),
        json_format: args.json_logs,
        ..Default::default()
    };

    let _logging_system = LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    info!("StillUp v{} 启动", stillup::VERSION);

    let code = app::run(&args).await;
    if code != EXIT_OK {
        std::process::exit(code);
    }

    Ok(())
}
