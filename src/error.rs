//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// StillUp 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum StillUpError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 数据存储相关错误
    #[error("数据库错误: {0}")]
    Datastore(#[from] DatastoreError),

    /// 探测器相关错误
    #[error("探测错误: {0}")]
    Probe(#[from] ProbeError),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 必需的环境变量缺失
    #[error("缺少必需的配置项: {var}")]
    MissingVar { var: String },

    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },

    /// 本地env文件读取错误
    #[error("读取env文件 {path} 失败: {message}")]
    EnvFile { path: String, message: String },
}

/// 数据存储错误类型
#[derive(Error, Debug)]
pub enum DatastoreError {
    /// HTTP请求错误
    #[error("请求失败: {0}")]
    Request(#[from] reqwest::Error),

    /// 接口返回非成功状态码
    #[error("接口返回错误 {status}: {message}")]
    Api { status: u16, message: String },

    /// 响应体解析错误
    #[error("响应解析失败: {0}")]
    Decode(String),

    /// 数据库地址无效
    #[error("无效的数据库地址: {0}")]
    InvalidUrl(String),
}

/// 探测器错误类型
///
/// 探测本身从不返回错误，失败一律记为 down；这里只覆盖探测器的构建。
#[derive(Error, Debug)]
pub enum ProbeError {
    /// HTTP客户端构建失败
    #[error("HTTP客户端构建失败: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, StillUpError>;
