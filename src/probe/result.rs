//! 探测结果数据结构
//!
//! 定义站点状态枚举和单次探测的结果类型

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 站点状态枚举
///
/// 探测只会产生 `Up` / `Down`；`Pending` 由控制台在新增站点时写入，
/// 其余无法识别的值读取为 `Unknown`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    /// 站点可访问
    Up,
    /// 站点不可访问
    Down,
    /// 尚未检测
    Pending,
    /// 未知状态
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SiteStatus {
    /// 数据库中保存的字符串形式
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteStatus::Up => "up",
            SiteStatus::Down => "down",
            SiteStatus::Pending => "pending",
            SiteStatus::Unknown => "unknown",
        }
    }

    /// 日志中使用的大写标签
    pub fn label(&self) -> &'static str {
        match self {
            SiteStatus::Up => "UP",
            SiteStatus::Down => "DOWN",
            SiteStatus::Pending => "PENDING",
            SiteStatus::Unknown => "UNKNOWN",
        }
    }

    /// 判断状态是否为可访问
    pub fn is_up(&self) -> bool {
        matches!(self, SiteStatus::Up)
    }
}

/// 单次探测结果
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    /// 实际探测的URL（已补全协议）
    pub url: String,
    /// 判定的状态
    pub status: SiteStatus,
    /// HTTP状态码（传输失败时为空）
    pub status_code: Option<u16>,
    /// 响应时间
    pub response_time: Duration,
    /// 错误类别描述（仅记录日志，不写回数据库）
    pub error_message: Option<String>,
}

impl ProbeResult {
    /// 创建新的探测结果
    pub fn new(url: String, status: SiteStatus) -> Self {
        Self {
            url,
            status,
            status_code: None,
            response_time: Duration::from_millis(0),
            error_message: None,
        }
    }

    /// 设置HTTP状态码
    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// 设置响应时间
    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response_time = response_time;
        self
    }

    /// 设置错误信息
    pub fn with_error(mut self, error_message: String) -> Self {
        self.error_message = Some(error_message);
        self
    }

    /// 获取响应时间（毫秒）
    pub fn response_time_ms(&self) -> u64 {
        self.response_time.as_millis() as u64
    }

    /// 日志中的结果描述，例如 `UP (200)` 或 `DOWN (Error: Request timeout)`
    pub fn summary(&self) -> String {
        match (self.status_code, &self.error_message) {
            (Some(code), _) => format!("{} ({})", self.status.label(), code),
            (None, Some(err)) => format!("{} (Error: {})", self.status.label(), err),
            (None, None) => self.status.label().to_string(),
        }
    }
}
