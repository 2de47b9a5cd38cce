//! Supabase REST 存储实现
//!
//! 通过 PostgREST 接口读写站点表，使用 service role 密钥绕过行级权限

use crate::config::DatastoreConfig;
use crate::datastore::store::SiteStore;
use crate::datastore::types::{Site, SiteId, SiteUpdate};
use crate::error::DatastoreError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use std::time::Duration;
use tracing::debug;

/// Supabase 站点存储
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    /// HTTP客户端
    client: Client,
    /// 表接口地址：{url}/rest/v1/{table}
    table_url: String,
    /// service role 密钥
    service_key: String,
}

impl SupabaseStore {
    /// 创建新的 Supabase 存储
    ///
    /// # 参数
    /// * `base_url` - 项目地址
    /// * `service_key` - service role 密钥
    /// * `table` - 站点表名
    /// * `timeout` - 请求超时时间
    ///
    /// # 返回
    /// * `Result<Self, DatastoreError>` - 存储实例
    pub fn new(
        base_url: &str,
        service_key: &str,
        table: &str,
        timeout: Duration,
    ) -> Result<Self, DatastoreError> {
        let base_url = base_url.trim_end_matches('/');
        Url::parse(base_url).map_err(|e| DatastoreError::InvalidUrl(format!("{base_url}: {e}")))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            table_url: format!("{}/rest/v1/{}", base_url, table),
            service_key: service_key.to_string(),
        })
    }

    /// 根据数据库配置创建存储
    pub fn from_config(config: &DatastoreConfig) -> Result<Self, DatastoreError> {
        Self::new(
            &config.url,
            &config.service_key,
            &config.table,
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    /// 附加认证请求头
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// 非成功状态码转换为 `DatastoreError::Api`
    async fn check_status(response: Response) -> Result<Response, DatastoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        // PostgREST 的错误体形如 {"code": "...", "message": "..."}
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or(body);

        Err(DatastoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SiteStore for SupabaseStore {
    async fn fetch_sites(&self) -> Result<Vec<Site>, DatastoreError> {
        debug!("读取站点列表: {}", self.table_url);

        let response = self
            .authorized(self.client.get(&self.table_url))
            .query(&[("select", "*")])
            .send()
            .await?;

        let body = Self::check_status(response).await?.text().await?;

        serde_json::from_str(&body).map_err(|e| DatastoreError::Decode(e.to_string()))
    }

    async fn update_site(&self, id: &SiteId, update: &SiteUpdate) -> Result<(), DatastoreError> {
        debug!("写回站点状态: id={} status={}", id, update.status);

        let response = self
            .authorized(self.client.patch(&self.table_url))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(update)
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }
}
