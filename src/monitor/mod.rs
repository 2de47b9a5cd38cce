//! 站点监控模块
//!
//! 串行执行一次完整的检测流程

pub mod pass;

// 重新导出主要类型
pub use pass::{PassOutcome, PassReport, SiteCheck, SiteChecker};
