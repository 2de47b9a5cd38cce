//! 站点存储接口

use crate::datastore::types::{Site, SiteId, SiteUpdate};
use crate::error::DatastoreError;
use async_trait::async_trait;

/// 站点存储trait，定义读取和写回接口
#[async_trait]
pub trait SiteStore: Send + Sync {
    /// 读取全部站点
    ///
    /// # 返回
    /// * `Result<Vec<Site>, DatastoreError>` - 按数据库返回顺序排列的站点
    async fn fetch_sites(&self) -> Result<Vec<Site>, DatastoreError>;

    /// 写回单个站点的状态和检测时间
    ///
    /// # 参数
    /// * `id` - 站点ID
    /// * `update` - 写回内容
    async fn update_site(&self, id: &SiteId, update: &SiteUpdate) -> Result<(), DatastoreError>;
}
