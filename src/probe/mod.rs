//! 站点探测模块
//!
//! 提供URL补全、状态码归类和HTTP探测功能

pub mod checker;
pub mod result;

// 重新导出主要类型
pub use checker::{classify_status, normalize_url, HttpProber, Prober};
pub use result::{ProbeResult, SiteStatus};
