//! 投票发送流程
//!
//! 定义一次完整发送的流程编排：诊断抓取 → 页面分类 → 负载构建 →
//! 并发投递。严格顺序，前一步完成之前后一步不会开始。

use crate::clients::PingoClient;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult, PageError};
use crate::models::VotePayload;
use crate::services::{build_payload, parse_survey_page};
use crate::settings::VoteSettings;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// 投递统计
///
/// 尽力而为的发送策略：失败只计数，不重试也不中止其余任务
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub success: usize,
    pub failed: usize,
}

impl DispatchStats {
    /// 实际投出的请求总数
    pub fn total(&self) -> usize {
        self.success + self.failed
    }
}

/// 投票发送流程
pub struct VoteFlow {
    client: PingoClient,
    max_concurrent_votes: usize,
}

impl VoteFlow {
    /// 创建发送流程
    pub fn new(client: PingoClient, config: &AppConfig) -> Self {
        Self {
            client,
            max_concurrent_votes: config.max_concurrent_votes,
        }
    }

    /// 执行一次完整的发送
    ///
    /// 问卷未运行时只告警并返回零投递统计；页面标记缺失或选项索引
    /// 越界则带类型化错误中止，一个投票请求都不会发出
    pub async fn run(&self, settings: &VoteSettings) -> AppResult<DispatchStats> {
        let html = self.client.fetch_survey_page(settings.session).await?;

        let page = match parse_survey_page(&html, settings.session) {
            Ok(page) => page,
            Err(PageError::NotRunning { session }) => {
                warn!("⚠️ 问卷 {} 未在运行?", session);
                return Ok(DispatchStats::default());
            }
            Err(e) => return Err(AppError::Page(e)),
        };

        debug!("  authenticity_token: {}", page.token);
        debug!("  id: {}", page.record_id);

        let payload = build_payload(&page, settings)?;

        self.dispatch(payload, settings).await
    }

    /// 并发投递
    ///
    /// 通过固定容量的信号量投出 amount 个携带同一负载的请求，
    /// 逐任务收集成败计入统计。一旦开始投递就不再取消，
    /// 调用方阻塞到所有任务返回为止。
    async fn dispatch(
        &self,
        payload: VotePayload,
        settings: &VoteSettings,
    ) -> AppResult<DispatchStats> {
        info!(
            "📤 开始投递: 问卷 {} 共 {} 次",
            settings.session, settings.amount
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_votes));
        let payload = Arc::new(payload);
        let mut handles = Vec::new();

        for _ in 0..settings.amount {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| AppError::Other(e.to_string()))?;
            let client = self.client.clone();
            let payload = payload.clone();
            let session = settings.session;

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                client.post_vote(&payload, session).await.is_ok()
            }));
        }

        let mut stats = DispatchStats::default();
        for result in futures::future::join_all(handles).await {
            match result {
                Ok(true) => stats.success += 1,
                Ok(false) => stats.failed += 1,
                Err(e) => {
                    warn!("投递任务执行失败: {}", e);
                    stats.failed += 1;
                }
            }
        }

        info!("✓ 投递完成: 成功 {}/{}", stats.success, stats.total());

        Ok(stats)
    }
}
