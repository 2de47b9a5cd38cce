//! HTTP站点探测器实现
//!
//! 对单个站点发起带超时的GET请求，并把结果归类为 up / down

use crate::config::ProbeConfig;
use crate::error::{ProbeError, Result};
use crate::probe::result::{ProbeResult, SiteStatus};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// 探测器trait，定义单站点探测接口
///
/// 探测不会返回错误：任何失败都体现为 `SiteStatus::Down` 的结果。
#[async_trait]
pub trait Prober: Send + Sync {
    /// 探测站点
    ///
    /// # 参数
    /// * `raw_url` - 数据库中保存的原始URL，可能缺少协议
    ///
    /// # 返回
    /// * `ProbeResult` - 探测结果
    async fn probe(&self, raw_url: &str) -> ProbeResult;
}

/// 补全URL协议：不以 `http` 开头的地址加上 `https://` 前缀
pub fn normalize_url(raw_url: &str) -> String {
    if raw_url.starts_with("http") {
        raw_url.to_string()
    } else {
        format!("https://{}", raw_url)
    }
}

/// 按状态码归类：[200, 400) 为 up，其余为 down
pub fn classify_status(status_code: u16) -> SiteStatus {
    if (200..400).contains(&status_code) {
        SiteStatus::Up
    } else {
        SiteStatus::Down
    }
}

/// HTTP探测器实现
#[derive(Debug, Clone)]
pub struct HttpProber {
    /// HTTP客户端
    client: Client,
    /// 单次探测超时时间
    timeout: Duration,
}

impl HttpProber {
    /// 创建新的HTTP探测器
    ///
    /// # 参数
    /// * `timeout` - 单次探测超时时间
    /// * `user_agent` - 请求使用的User-Agent
    ///
    /// # 返回
    /// * `Result<Self>` - 探测器实例
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(ProbeError::ClientBuild)?;

        Ok(Self { client, timeout })
    }

    /// 根据探测配置创建探测器
    pub fn from_config(config: &ProbeConfig) -> Result<Self> {
        Self::new(
            Duration::from_secs(config.timeout_seconds),
            &config.user_agent,
        )
    }

    /// 执行单次HTTP请求
    async fn perform_request(&self, url: String) -> ProbeResult {
        let start_time = Instant::now();

        let response_result = timeout(self.timeout, self.client.get(&url).send()).await;

        let response_time = start_time.elapsed();

        match response_result {
            Ok(Ok(response)) => {
                let status_code = response.status().as_u16();
                ProbeResult::new(url, classify_status(status_code))
                    .with_status_code(status_code)
                    .with_response_time(response_time)
            }
            Ok(Err(e)) => ProbeResult::new(url, SiteStatus::Down)
                .with_response_time(response_time)
                .with_error(Self::format_request_error(&e)),
            Err(_) => ProbeResult::new(url, SiteStatus::Down)
                .with_response_time(response_time)
                .with_error("Request timeout".to_string()),
        }
    }

    /// 把请求错误归类为简短的错误类别
    fn format_request_error(error: &reqwest::Error) -> String {
        if error.is_timeout() {
            "Request timeout".to_string()
        } else if error.is_builder() {
            "Invalid URL".to_string()
        } else if error.is_redirect() {
            "Too many redirects".to_string()
        } else if error.is_connect() {
            let error_str = format!("{:?}", error).to_lowercase();
            if error_str.contains("dns") || error_str.contains("resolve") {
                "DNS resolution failed".to_string()
            } else if error_str.contains("certificate") || error_str.contains("tls") {
                "SSL/TLS certificate error".to_string()
            } else {
                "Connection refused".to_string()
            }
        } else if error.is_decode() {
            "Response decode error".to_string()
        } else {
            let error_str = error.to_string();
            if error_str.contains("dns") || error_str.contains("DNS") {
                "DNS resolution failed".to_string()
            } else if error_str.contains("certificate")
                || error_str.contains("tls")
                || error_str.contains("ssl")
            {
                "SSL/TLS certificate error".to_string()
            } else {
                format!("Request failed: {}", error_str)
            }
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, raw_url: &str) -> ProbeResult {
        self.perform_request(normalize_url(raw_url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::USER_AGENT;

    fn create_test_prober(timeout: Duration) -> HttpProber {
        HttpProber::new(timeout, USER_AGENT).unwrap()
    }

    #[test]
    fn test_normalize_url_adds_https() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(
            normalize_url("example.com/health?x=1"),
            "https://example.com/health?x=1"
        );
    }

    #[test]
    fn test_normalize_url_keeps_http_prefixed() {
        assert_eq!(normalize_url("https://down.example"), "https://down.example");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        // 与数据库中已有数据的处理方式保持一致：只看 `http` 前缀
        assert_eq!(normalize_url("httpbin.org"), "httpbin.org");
    }

    #[test]
    fn test_classify_status() {
        for code in [200, 201, 204, 301, 302, 304, 399] {
            assert_eq!(classify_status(code), SiteStatus::Up, "code {}", code);
        }
        for code in [100, 101, 199, 400, 401, 404, 429, 500, 502, 503] {
            assert_eq!(classify_status(code), SiteStatus::Down, "code {}", code);
        }
    }

    #[test]
    fn test_from_config() {
        let prober = HttpProber::from_config(&ProbeConfig::default()).unwrap();
        assert_eq!(prober.timeout, Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_probe_up_sends_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .create_async()
            .await;

        let prober = create_test_prober(Duration::from_secs(5));
        let result = prober.probe(&format!("{}/health", server.url())).await;

        mock.assert_async().await;
        assert_eq!(result.status, SiteStatus::Up);
        assert_eq!(result.status_code, Some(200));
        assert!(result.error_message.is_none());
    }

    #[tokio::test]
    async fn test_probe_error_status_is_down() {
        let mut server = mockito::Server::new_async().await;
        let _not_found = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;
        let _broken = server
            .mock("GET", "/broken")
            .with_status(500)
            .create_async()
            .await;

        let prober = create_test_prober(Duration::from_secs(5));

        let result = prober.probe(&format!("{}/missing", server.url())).await;
        assert_eq!(result.status, SiteStatus::Down);
        assert_eq!(result.status_code, Some(404));

        let result = prober.probe(&format!("{}/broken", server.url())).await;
        assert_eq!(result.status, SiteStatus::Down);
        assert_eq!(result.status_code, Some(500));
    }

    #[tokio::test]
    async fn test_probe_follows_redirect() {
        let mut server = mockito::Server::new_async().await;
        let _old = server
            .mock("GET", "/old")
            .with_status(301)
            .with_header("location", "/new")
            .create_async()
            .await;
        let new = server
            .mock("GET", "/new")
            .with_status(200)
            .create_async()
            .await;

        let prober = create_test_prober(Duration::from_secs(5));
        let result = prober.probe(&format!("{}/old", server.url())).await;

        new.assert_async().await;
        assert_eq!(result.status, SiteStatus::Up);
        assert_eq!(result.status_code, Some(200));
    }

    #[tokio::test]
    async fn test_probe_timeout_is_down() {
        // 接受连接但从不响应
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let prober = create_test_prober(Duration::from_millis(200));
        let result = prober.probe(&format!("http://{}/", addr)).await;

        assert_eq!(result.status, SiteStatus::Down);
        assert_eq!(result.status_code, None);
        assert_eq!(result.error_message.as_deref(), Some("Request timeout"));
    }

    #[tokio::test]
    async fn test_probe_connection_refused_is_down() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let prober = create_test_prober(Duration::from_secs(2));
        let result = prober.probe(&format!("http://{}/", addr)).await;

        assert_eq!(result.status, SiteStatus::Down);
        assert_eq!(result.status_code, None);
        assert!(result.error_message.is_some());
    }

    #[tokio::test]
    async fn test_probe_invalid_url_is_down() {
        let prober = create_test_prober(Duration::from_secs(2));
        let result = prober.probe("not a valid host").await;

        assert_eq!(result.url, "https://not a valid host");
        assert_eq!(result.status, SiteStatus::Down);
        assert!(result.error_message.is_some());
    }
}
