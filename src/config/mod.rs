//! 配置管理模块
//!
//! 提供配置解析、环境变量加载和验证功能

pub mod loader;
pub mod types;

// 重新导出主要类型
pub use loader::{
    resolve_credentials, ConfigLoader, EnvConfigLoader, DATASTORE_URL_FALLBACK_VAR,
    DATASTORE_URL_VAR, DEFAULT_ENV_FILE, SERVICE_KEY_VAR,
};
pub use types::{validate_config, Config, DatastoreConfig, ProbeConfig};
