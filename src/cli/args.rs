//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口。所有参数都是可选的，无参数即可运行一次完整检测。

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// StillUp - 站点可用性定时检测
#[derive(Parser, Debug, Clone)]
#[command(
    name = "stillup",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// TOML配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "TOML配置文件路径",
        env = "STILLUP_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// 本地开发env文件路径
    #[arg(
        long,
        value_name = "FILE",
        default_value = crate::config::DEFAULT_ENV_FILE,
        help = "本地开发env文件路径",
        env = "STILLUP_ENV_FILE"
    )]
    pub env_file: PathBuf,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "STILLUP_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 是否输出JSON格式日志
    #[arg(long, help = "输出JSON格式日志", env = "STILLUP_JSON_LOGS")]
    pub json_logs: bool,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let args = Args::try_parse_from(["stillup"]).unwrap();
        assert!(args.config.is_none());
        assert_eq!(args.env_file, PathBuf::from(".env.local"));
        assert_eq!(args.log_level, LogLevel::Info);
        assert!(!args.json_logs);
    }

    #[test]
    fn test_all_arguments() {
        let args = Args::try_parse_from([
            "stillup",
            "--config",
            "/etc/stillup.toml",
            "--env-file",
            ".env",
            "--log-level",
            "debug",
            "--json-logs",
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("/etc/stillup.toml")));
        assert_eq!(args.env_file, PathBuf::from(".env"));
        assert_eq!(args.log_level, LogLevel::Debug);
        assert!(args.json_logs);
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(log::LevelFilter::from(LogLevel::Warn), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_invalid_log_level() {
        assert!(Args::try_parse_from(["stillup", "--log-level", "verbose"]).is_err());
    }
}
