//! 配置加载器实现
//!
//! 从进程环境变量、本地 `.env.local` 文件和可选的TOML配置文件加载配置

use crate::config::types::{validate_config, Config};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};

/// 数据库地址环境变量
pub const DATASTORE_URL_VAR: &str = "NEXT_PUBLIC_SUPABASE_URL";
/// 数据库地址的备用环境变量
pub const DATASTORE_URL_FALLBACK_VAR: &str = "SUPABASE_URL";
/// service role 密钥环境变量
pub const SERVICE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";
/// 默认的本地开发env文件
pub const DEFAULT_ENV_FILE: &str = ".env.local";

/// 配置加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 加载并验证完整配置
    ///
    /// # 返回
    /// * `Result<Config>` - 加载的配置或错误
    async fn load(&self) -> Result<Config>;

    /// 验证配置
    ///
    /// # 参数
    /// * `config` - 要验证的配置
    ///
    /// # 返回
    /// * `Result<()>` - 验证结果
    fn validate(&self, config: &Config) -> Result<()>;
}

/// 基于环境变量的配置加载器
///
/// 加载顺序：env文件（不覆盖已有变量）→ TOML文件（可选）→ 环境变量补全缺失的凭据。
#[derive(Debug, Clone)]
pub struct EnvConfigLoader {
    /// 本地env文件路径
    env_file: Option<PathBuf>,
    /// TOML配置文件路径
    config_file: Option<PathBuf>,
}

impl Default for EnvConfigLoader {
    fn default() -> Self {
        Self::new(Some(PathBuf::from(DEFAULT_ENV_FILE)), None)
    }
}

impl EnvConfigLoader {
    /// 创建新的配置加载器
    ///
    /// # 参数
    /// * `env_file` - 本地env文件路径，文件不存在时跳过
    /// * `config_file` - 可选的TOML配置文件路径
    ///
    /// # 返回
    /// * `Self` - 配置加载器实例
    pub fn new(env_file: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            env_file,
            config_file,
        }
    }

    /// 加载本地env文件，已存在的进程环境变量不会被覆盖
    fn load_env_file(&self) -> Result<()> {
        let Some(path) = &self.env_file else {
            return Ok(());
        };

        if !path.exists() {
            log::debug!("未找到env文件，跳过: {}", path.display());
            return Ok(());
        }

        dotenvy::from_path(path).map_err(|e| ConfigError::EnvFile {
            path: path.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;

        log::info!("已加载env文件: {}", path.display());
        Ok(())
    }

    /// 替换字符串中的环境变量
    ///
    /// # 参数
    /// * `content` - 要处理的字符串
    ///
    /// # 返回
    /// * `Result<String>` - 替换后的字符串或错误
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        // 匹配 ${VAR_NAME} 格式的环境变量
        let env_var_regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ConfigError::ParseError(format!("正则表达式错误: {}", e)))?;

        let mut result = content.to_string();

        for captures in env_var_regex.captures_iter(content) {
            let full_match = &captures[0];
            let var_name = &captures[1];

            match std::env::var(var_name) {
                Ok(value) => {
                    result = result.replace(full_match, &value);
                }
                Err(_) => {
                    return Err(ConfigError::EnvVarError {
                        var: var_name.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(result)
    }

    /// 解析TOML内容
    fn parse_toml(&self, content: &str) -> Result<Config> {
        let processed_content = self.substitute_env_vars(content)?;

        let config: Config = toml::from_str(&processed_content)
            .map_err(|e| ConfigError::ParseError(format!("TOML解析失败: {}", e)))?;

        Ok(config)
    }

    /// 读取TOML配置文件
    async fn read_config_file(&self, path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ParseError(format!("读取文件失败: {}", e)))?;

        let config = self.parse_toml(&content)?;
        log::info!("成功加载配置文件: {}", path.display());

        Ok(config)
    }

    /// 从TOML字符串加载配置（不补全凭据、不验证）
    pub fn load_from_string(&self, content: &str) -> Result<Config> {
        self.parse_toml(content)
    }
}

/// 用环境变量补全配置中缺失的数据库地址和密钥
///
/// # 参数
/// * `config` - 待补全的配置
/// * `lookup` - 环境变量查询函数
///
/// # 返回
/// * `Result<Config>` - 补全后的配置；仍然缺失时返回 `MissingVar`
pub fn resolve_credentials<F>(mut config: Config, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

    if config.datastore.url.trim().is_empty() {
        config.datastore.url = non_empty(DATASTORE_URL_VAR)
            .or_else(|| non_empty(DATASTORE_URL_FALLBACK_VAR))
            .ok_or_else(|| ConfigError::MissingVar {
                var: DATASTORE_URL_VAR.to_string(),
            })?;
    }

    if config.datastore.service_key.trim().is_empty() {
        config.datastore.service_key =
            non_empty(SERVICE_KEY_VAR).ok_or_else(|| ConfigError::MissingVar {
                var: SERVICE_KEY_VAR.to_string(),
            })?;
    }

    Ok(config)
}

#[async_trait]
impl ConfigLoader for EnvConfigLoader {
    async fn load(&self) -> Result<Config> {
        self.load_env_file()?;

        let config = match &self.config_file {
            Some(path) => self.read_config_file(path).await?,
            None => Config::default(),
        };

        let config = resolve_credentials(config, |var| std::env::var(var).ok())?;

        self.validate(&config)?;

        log::debug!(
            "配置加载完成: 数据库 {}，表 {}，探测超时 {}s",
            config.datastore.url,
            config.datastore.table,
            config.probe.timeout_seconds
        );

        Ok(config)
    }

    fn validate(&self, config: &Config) -> Result<()> {
        validate_config(config).map_err(|e| ConfigError::ValidationError(e).into())
    }
}
