//! 站点数据结构
//!
//! 对应数据库 `sites` 表中的行和写回内容

use crate::probe::SiteStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 站点ID
///
/// 数据库主键可能是整数也可能是uuid字符串，原样保留用于更新过滤条件。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SiteId {
    /// 整数主键
    Int(i64),
    /// 字符串主键（uuid等）
    Text(String),
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteId::Int(id) => write!(f, "{}", id),
            SiteId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for SiteId {
    fn from(id: i64) -> Self {
        SiteId::Int(id)
    }
}

impl From<i32> for SiteId {
    fn from(id: i32) -> Self {
        SiteId::Int(i64::from(id))
    }
}

impl From<&str> for SiteId {
    fn from(id: &str) -> Self {
        SiteId::Text(id.to_string())
    }
}

/// 被监控的站点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// 站点ID
    pub id: SiteId,
    /// 站点URL，可能缺少协议
    pub url: String,
    /// 当前状态
    #[serde(default)]
    pub status: Option<SiteStatus>,
    /// 最后检测时间（UTC）
    #[serde(default)]
    pub last_checked_at: Option<DateTime<Utc>>,
    /// 所属用户
    #[serde(default)]
    pub user_id: Option<String>,
    /// 创建时间
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Site {
    /// 创建只包含ID和URL的站点
    pub fn new(id: impl Into<SiteId>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            status: None,
            last_checked_at: None,
            user_id: None,
            created_at: None,
        }
    }
}

/// 探测结束后写回数据库的内容
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteUpdate {
    /// 新状态
    pub status: SiteStatus,
    /// 检测时间（UTC）
    pub last_checked_at: DateTime<Utc>,
}

impl SiteUpdate {
    /// 使用当前UTC时间创建写回内容
    pub fn now(status: SiteStatus) -> Self {
        Self {
            status,
            last_checked_at: Utc::now(),
        }
    }
}
