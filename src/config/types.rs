//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑

use serde::{Deserialize, Serialize};

/// 主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// 数据库配置
    #[serde(default)]
    pub datastore: DatastoreConfig,
    /// 探测配置
    #[serde(default)]
    pub probe: ProbeConfig,
}

/// 数据库（Supabase REST 接口）配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatastoreConfig {
    /// 项目地址，例如 https://xyz.supabase.co
    #[serde(default)]
    pub url: String,
    /// service role 密钥
    #[serde(default)]
    pub service_key: String,
    /// 站点表名
    #[serde(default = "default_table")]
    pub table: String,
    /// 数据库请求超时时间（秒）
    #[serde(default = "default_datastore_timeout")]
    pub request_timeout_seconds: u64,
}

/// 站点探测配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeConfig {
    /// 单次探测超时时间（秒）
    #[serde(default = "default_probe_timeout")]
    pub timeout_seconds: u64,
    /// 探测请求使用的User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            service_key: String::new(),
            table: default_table(),
            request_timeout_seconds: default_datastore_timeout(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_probe_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

// 默认值函数
fn default_table() -> String {
    "sites".to_string()
}
fn default_datastore_timeout() -> u64 {
    30
}
fn default_probe_timeout() -> u64 {
    15
}
fn default_user_agent() -> String {
    crate::USER_AGENT.to_string()
}

/// 配置验证函数
///
/// 缺失的必需项由加载器报告为 `MissingVar`，这里只检查取值是否合理。
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    let datastore = &config.datastore;

    if datastore.url.trim().is_empty() {
        return Err("数据库地址不能为空".to_string());
    }

    if !datastore.url.starts_with("http://") && !datastore.url.starts_with("https://") {
        return Err(format!("数据库地址格式无效: {}", datastore.url));
    }

    if datastore.service_key.trim().is_empty() {
        return Err("service role 密钥不能为空".to_string());
    }

    if datastore.table.trim().is_empty() {
        return Err("站点表名不能为空".to_string());
    }

    if datastore.request_timeout_seconds == 0 {
        return Err("数据库请求超时时间不能为0".to_string());
    }

    if config.probe.timeout_seconds == 0 {
        return Err("探测超时时间不能为0".to_string());
    }

    if config.probe.user_agent.trim().is_empty() {
        return Err("User-Agent不能为空".to_string());
    }

    Ok(())
}
