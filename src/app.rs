//! 应用程序核心逻辑
//!
//! 一次运行的生命周期：加载配置、创建客户端、执行检测、输出汇总，并给出进程退出码

use crate::cli::Args;
use crate::config::{Config, ConfigLoader, EnvConfigLoader, DATASTORE_URL_VAR, SERVICE_KEY_VAR};
use crate::datastore::SupabaseStore;
use crate::logging::log_pass_summary;
use crate::monitor::SiteChecker;
use crate::probe::HttpProber;
use std::sync::Arc;
use tracing::{error, info};

/// 检测流程已执行（包括读取站点失败、部分站点写回失败的情况）
pub const EXIT_OK: i32 = 0;

/// 配置缺失或无效，未处理任何站点
pub const EXIT_CONFIG_ERROR: i32 = 1;

/// 执行一次完整的检测并返回进程退出码
///
/// 只有配置阶段的失败会返回非零退出码；数据库不可达、单站点写回失败
/// 都只记录日志，下一次调度会重新检测。
pub async fn run(args: &Args) -> i32 {
    let config = match load_config(args).await {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("错误: {}", e);
            eprintln!(
                "请设置 {} 和 {}；本地运行时检查 {} 文件",
                DATASTORE_URL_VAR,
                SERVICE_KEY_VAR,
                args.env_file.display()
            );
            return EXIT_CONFIG_ERROR;
        }
    };

    let store = match SupabaseStore::from_config(&config.datastore) {
        Ok(store) => store,
        Err(e) => {
            error!("创建数据库客户端失败: {}", e);
            eprintln!("错误: 创建数据库客户端失败: {}", e);
            return EXIT_CONFIG_ERROR;
        }
    };

    let prober = match HttpProber::from_config(&config.probe) {
        Ok(prober) => prober,
        Err(e) => {
            error!("创建HTTP探测器失败: {}", e);
            eprintln!("错误: 创建HTTP探测器失败: {}", e);
            return EXIT_CONFIG_ERROR;
        }
    };

    info!("开始检测，数据表: {}", config.datastore.table);

    let checker = SiteChecker::new(Arc::new(store), Arc::new(prober));
    let report = checker.run_pass().await;

    log_pass_summary(&report);

    EXIT_OK
}

/// 加载并验证配置
async fn load_config(args: &Args) -> crate::error::Result<Config> {
    let loader = EnvConfigLoader::new(Some(args.env_file.clone()), args.config.clone());
    loader.load().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DATASTORE_URL_FALLBACK_VAR;
    use clap::Parser;
    use mockito::Matcher;
    use serial_test::serial;
    use std::env;

    const MISSING_ENV_FILE: &str = "/nonexistent/stillup/.env.local";

    fn args_without_env_file() -> Args {
        Args::try_parse_from(["stillup", "--env-file", MISSING_ENV_FILE]).unwrap()
    }

    fn clear_credential_vars() {
        env::remove_var(DATASTORE_URL_VAR);
        env::remove_var(DATASTORE_URL_FALLBACK_VAR);
        env::remove_var(SERVICE_KEY_VAR);
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_configuration_exits_with_error() {
        clear_credential_vars();

        let code = run(&args_without_env_file()).await;

        assert_eq!(code, EXIT_CONFIG_ERROR);
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_service_key_exits_with_error() {
        clear_credential_vars();
        env::set_var(DATASTORE_URL_VAR, "https://project.supabase.co");

        let code = run(&args_without_env_file()).await;
        clear_credential_vars();

        assert_eq!(code, EXIT_CONFIG_ERROR);
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_failure_exits_cleanly() {
        let mut server = mockito::Server::new_async().await;
        let fetch = server
            .mock("GET", "/rest/v1/sites")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body(r#"{"message":"service unavailable"}"#)
            .create_async()
            .await;
        let update = server
            .mock("PATCH", "/rest/v1/sites")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        clear_credential_vars();
        env::set_var(DATASTORE_URL_VAR, server.url());
        env::set_var(SERVICE_KEY_VAR, "service-role-key");

        let code = run(&args_without_env_file()).await;
        clear_credential_vars();

        assert_eq!(code, EXIT_OK);
        fetch.assert_async().await;
        update.assert_async().await;
    }

    #[tokio::test]
    #[serial]
    async fn test_empty_site_list_exits_cleanly() {
        let mut server = mockito::Server::new_async().await;
        let fetch = server
            .mock("GET", "/rest/v1/sites")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        clear_credential_vars();
        env::set_var(DATASTORE_URL_FALLBACK_VAR, server.url());
        env::set_var(SERVICE_KEY_VAR, "service-role-key");

        let code = run(&args_without_env_file()).await;
        clear_credential_vars();

        assert_eq!(code, EXIT_OK);
        fetch.assert_async().await;
    }
}
