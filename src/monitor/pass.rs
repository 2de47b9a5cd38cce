//! 单次检测流程
//!
//! 读取全部站点 → 逐个探测 → 逐个写回。任何单站点失败都不会中断整个流程。

use crate::datastore::{Site, SiteId, SiteStore, SiteUpdate};
use crate::probe::{ProbeResult, Prober};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// 检测流程的结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// 所有站点都已处理
    Completed,
    /// 数据库中没有站点
    NoSites,
    /// 读取站点列表失败，未处理任何站点
    FetchFailed,
}

/// 单个站点的处理结果
#[derive(Debug, Clone)]
pub struct SiteCheck {
    /// 站点ID
    pub site_id: SiteId,
    /// 探测结果
    pub probe: ProbeResult,
    /// 写回的检测时间
    pub checked_at: DateTime<Utc>,
    /// 是否成功写回
    pub written: bool,
}

/// 检测流程报告
#[derive(Debug, Clone)]
pub struct PassReport {
    /// 本次运行ID
    pub run_id: Uuid,
    /// 开始时间
    pub started_at: DateTime<Utc>,
    /// 结束时间
    pub finished_at: Option<DateTime<Utc>>,
    /// 结束方式
    pub outcome: PassOutcome,
    /// 各站点处理结果，顺序与读取顺序一致
    pub checks: Vec<SiteCheck>,
}

impl PassReport {
    pub(crate) fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            outcome: PassOutcome::Completed,
            checks: Vec::new(),
        }
    }

    pub(crate) fn finish(mut self, outcome: PassOutcome) -> Self {
        self.outcome = outcome;
        self.finished_at = Some(Utc::now());
        self
    }

    /// 状态为 up 的站点数
    pub fn up_count(&self) -> usize {
        self.checks.iter().filter(|c| c.probe.status.is_up()).count()
    }

    /// 状态为 down 的站点数
    pub fn down_count(&self) -> usize {
        self.checks.len() - self.up_count()
    }

    /// 写回失败的站点数
    pub fn write_failures(&self) -> usize {
        self.checks.iter().filter(|c| !c.written).count()
    }
}

/// 站点检测器
pub struct SiteChecker {
    /// 站点存储
    store: Arc<dyn SiteStore>,
    /// 探测器
    prober: Arc<dyn Prober>,
}

impl SiteChecker {
    /// 创建新的站点检测器
    pub fn new(store: Arc<dyn SiteStore>, prober: Arc<dyn Prober>) -> Self {
        Self { store, prober }
    }

    /// 执行一次完整检测
    ///
    /// 读取失败时直接返回；站点按读取顺序串行处理，每个站点恰好写回一次。
    pub async fn run_pass(&self) -> PassReport {
        let report = PassReport::new();
        let span = info_span!("pass", run_id = %report.run_id);

        self.execute(report).instrument(span).await
    }

    async fn execute(&self, mut report: PassReport) -> PassReport {
        info!(
            "--- 开始检测: {} UTC ---",
            report.started_at.format("%Y-%m-%d %H:%M:%S")
        );

        let sites = match self.store.fetch_sites().await {
            Ok(sites) => sites,
            Err(e) => {
                error!("数据库错误: {}", e);
                return report.finish(PassOutcome::FetchFailed);
            }
        };

        if sites.is_empty() {
            info!("数据库中没有站点");
            return report.finish(PassOutcome::NoSites);
        }

        info!("共 {} 个站点待检测", sites.len());

        for site in &sites {
            let check = self.check_site(site).await;
            report.checks.push(check);
        }

        let report = report.finish(PassOutcome::Completed);
        info!(
            "本轮检测结束: up {}，down {}，写回失败 {}",
            report.up_count(),
            report.down_count(),
            report.write_failures()
        );
        report
    }

    /// 探测并写回单个站点
    async fn check_site(&self, site: &Site) -> SiteCheck {
        let probe = self.prober.probe(&site.url).await;

        if probe.status.is_up() {
            info!("已检测 {}: {}", probe.url, probe.summary());
        } else {
            warn!("已检测 {}: {}", probe.url, probe.summary());
        }

        // 时间戳在探测完成后获取
        let update = SiteUpdate::now(probe.status);
        let written = match self.store.update_site(&site.id, &update).await {
            Ok(()) => true,
            Err(e) => {
                error!("写回数据库失败 {}: {}", probe.url, e);
                false
            }
        };

        SiteCheck {
            site_id: site.id.clone(),
            probe,
            checked_at: update.last_checked_at,
            written,
        }
    }
}
