//! StillUp - 站点可用性定时检测
//!
//! 一次性运行的检测任务：
//! - 从 Supabase 读取全部被监控站点
//! - 逐个发起带超时的HTTP探测
//! - 把 up/down 状态和检测时间写回数据库
//!
//! 定时触发由外部调度器（cron、CI）负责。

pub mod app;
pub mod cli;
pub mod config;
pub mod datastore;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod probe;

// 重新导出主要类型
pub use config::{Config, DatastoreConfig, ProbeConfig};
pub use datastore::{Site, SiteId, SiteStore, SupabaseStore};
pub use error::StillUpError;
pub use monitor::{PassOutcome, PassReport, SiteChecker};
pub use probe::{HttpProber, ProbeResult, Prober, SiteStatus};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 探测请求使用的User-Agent
pub const USER_AGENT: &str = "StillUp-Bot/1.0 (Uptime Monitor)";
