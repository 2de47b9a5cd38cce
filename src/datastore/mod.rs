//! 数据存储模块
//!
//! 定义站点数据结构、存储接口和 Supabase REST 实现

pub mod store;
pub mod supabase;
pub mod types;

// 重新导出主要类型
pub use store::SiteStore;
pub use supabase::SupabaseStore;
pub use types::{Site, SiteId, SiteUpdate};
