//! 日志系统模块
//!
//! 提供结构化日志配置和初始化功能，日志输出到标准输出

use crate::monitor::{PassOutcome, PassReport};
use log::LevelFilter;
use std::collections::HashMap;
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter, Layer};

/// 全局初始化结果，进程内只初始化一次
static LOGGING_INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// 日志配置结构
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 是否使用JSON格式
    pub json_format: bool,
    /// 模块级别日志控制（设置了 `RUST_LOG` 时不生效）
    pub module_levels: HashMap<String, LevelFilter>,
}

impl Default for LogConfig {
    fn default() -> Self {
        let mut module_levels = HashMap::new();
        // 屏蔽HTTP客户端的连接级调试日志
        module_levels.insert("hyper_util".to_string(), LevelFilter::Info);
        module_levels.insert("reqwest".to_string(), LevelFilter::Info);

        Self {
            level: LevelFilter::Info,
            json_format: false,
            module_levels,
        }
    }
}

/// 日志系统管理器
#[derive(Debug)]
pub struct LoggingSystem;

impl LoggingSystem {
    /// 初始化日志系统
    ///
    /// # 参数
    /// * `config` - 日志配置
    ///
    /// # 返回
    /// * `Result<LoggingSystem, anyhow::Error>` - 初始化结果
    ///
    /// 全局只初始化一次，重复调用返回第一次的结果。
    pub fn setup_logging(config: LogConfig) -> anyhow::Result<Self> {
        LOGGING_INIT
            .get_or_init(|| Self::perform_initialization(&config).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|e| anyhow::anyhow!("日志系统初始化失败: {}", e))?;

        Ok(Self)
    }

    /// 执行实际的日志系统初始化
    fn perform_initialization(config: &LogConfig) -> anyhow::Result<()> {
        // log crate 到 tracing 的桥接
        tracing_log::LogTracer::init().map_err(|e| anyhow::anyhow!("LogTracer初始化失败: {}", e))?;

        let fmt_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_current_span(true)
                .boxed()
        } else {
            fmt::layer()
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_ansi(std::io::stdout().is_terminal())
                .with_target(false)
                .boxed()
        };

        let subscriber = registry().with(Self::build_env_filter(config)).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| anyhow::anyhow!("tracing subscriber初始化失败: {}", e))?;

        tracing::debug!("日志配置: {:?}", config);
        Ok(())
    }

    /// 构建环境过滤器
    ///
    /// 设置了 `RUST_LOG` 时完全按其指令过滤，未覆盖的部分回退到配置的级别；
    /// 未设置时使用配置级别加模块级别。
    fn build_env_filter(config: &LogConfig) -> EnvFilter {
        let rust_log_set = std::env::var(EnvFilter::DEFAULT_ENV)
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false);

        let mut env_filter = EnvFilter::builder()
            .with_default_directive(Self::convert_level_to_directive(config.level))
            .from_env_lossy();

        if !rust_log_set {
            for (module, level) in &config.module_levels {
                if let Ok(directive) =
                    format!("{}={}", module, Self::level_to_string(*level)).parse()
                {
                    env_filter = env_filter.add_directive(directive);
                }
            }
        }

        env_filter
    }

    /// 将 log::LevelFilter 转换为 tracing 的指令
    fn convert_level_to_directive(level: LevelFilter) -> Directive {
        use tracing_subscriber::filter::LevelFilter as TracingLevel;
        let level = match level {
            LevelFilter::Off => TracingLevel::OFF,
            LevelFilter::Error => TracingLevel::ERROR,
            LevelFilter::Warn => TracingLevel::WARN,
            LevelFilter::Info => TracingLevel::INFO,
            LevelFilter::Debug => TracingLevel::DEBUG,
            LevelFilter::Trace => TracingLevel::TRACE,
        };
        Directive::from(level)
    }

    /// 将 log::LevelFilter 转换为字符串
    fn level_to_string(level: LevelFilter) -> &'static str {
        match level {
            LevelFilter::Off => "off",
            LevelFilter::Error => "error",
            LevelFilter::Warn => "warn",
            LevelFilter::Info => "info",
            LevelFilter::Debug => "debug",
            LevelFilter::Trace => "trace",
        }
    }
}

/// 记录一次检测的汇总日志，统计数据作为结构化字段输出
pub fn log_pass_summary(report: &PassReport) {
    let outcome = match report.outcome {
        PassOutcome::Completed => "completed",
        PassOutcome::NoSites => "no_sites",
        PassOutcome::FetchFailed => "fetch_failed",
    };
    let duration_ms = report
        .finished_at
        .map(|end| (end - report.started_at).num_milliseconds())
        .unwrap_or(0);

    tracing::info!(
        run_id = %report.run_id,
        outcome,
        sites = report.checks.len(),
        up = report.up_count(),
        down = report.down_count(),
        write_failures = report.write_failures(),
        duration_ms,
        "--- 检测完成 ---"
    );
}
