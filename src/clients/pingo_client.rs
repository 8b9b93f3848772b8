//! PINGO 站点 HTTP 客户端
//!
//! 封装对站点的两类访问：按访问编号寻址的诊断抓取（GET），
//! 和携带伪装浏览器请求头的投票提交（POST）

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::models::VotePayload;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION, CONTENT_TYPE,
    REFERER, USER_AGENT,
};
use tracing::debug;

/// 伪装浏览器的 User-Agent
const FAKE_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:25.0) Gecko/20100101 Firefox/25.0";

/// PINGO 客户端
///
/// 内部的 reqwest::Client 是连接池的句柄，克隆代价很低，
/// 可以直接克隆进每个并发投递任务
#[derive(Clone)]
pub struct PingoClient {
    http: reqwest::Client,
    base_url: String,
}

impl PingoClient {
    /// 创建新的 PINGO 客户端
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(AppError::client_build_failed)?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// 问卷页面 URL（按访问编号寻址）
    pub fn survey_url(&self, session: u32) -> String {
        format!("{}/{}", self.base_url, session)
    }

    /// 抓取问卷页面
    ///
    /// # 参数
    /// - `session`: 访问编号
    ///
    /// # 返回
    /// 返回页面原始 HTML
    pub async fn fetch_survey_page(&self, session: u32) -> AppResult<String> {
        let url = self.survey_url(session);
        debug!("抓取问卷页面: {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::request_failed(&url, e))?;

        let html = response
            .text()
            .await
            .map_err(|e| AppError::request_failed(&url, e))?;

        Ok(html)
    }

    /// 提交一次投票
    ///
    /// 不检查响应状态码：单次投票的失败不重试也不单独上报，
    /// 由调度层汇总为成功/失败计数
    pub async fn post_vote(&self, payload: &VotePayload, session: u32) -> AppResult<()> {
        let url = format!("{}/vote", self.base_url);

        self.http
            .post(&url)
            .headers(self.vote_headers(session))
            .form(&payload.to_form())
            .send()
            .await
            .map_err(|e| AppError::request_failed(&url, e))?;

        Ok(())
    }

    /// 为投票请求生成伪装浏览器的请求头
    ///
    /// 无共享可变状态，任意并发任务都可调用；
    /// Referer 从访问编号派生
    fn vote_headers(&self, session: u32) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(USER_AGENT, HeaderValue::from_static(FAKE_USER_AGENT));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        if let Ok(referer) = HeaderValue::from_str(&self.survey_url(session)) {
            headers.insert(REFERER, referer);
        }
        headers
    }
}
