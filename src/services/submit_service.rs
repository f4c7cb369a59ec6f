//! 答案提交服务 - 业务能力层
//!
//! 发送一次 POST 并解读响应信封。网络错误、非 2xx、响应无法解析都只记录日志并返回 None，
//! 由上层平稳结束解题链。

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::models::{SubmissionPayload, SubmissionResult};

/// 提交能力
#[async_trait]
pub trait Submitter: Send + Sync {
    /// 提交答案，失败时返回 None（不是错误）
    async fn submit(
        &self,
        submit_url: &str,
        payload: &SubmissionPayload,
    ) -> Option<SubmissionResult>;
}

/// 基于 reqwest 的提交客户端
pub struct HttpSubmitter {
    client: reqwest::Client,
}

impl HttpSubmitter {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("无法创建 HTTP 客户端")?;
        Ok(Self { client })
    }

    async fn post(
        &self,
        submit_url: &str,
        payload: &SubmissionPayload,
    ) -> Result<Option<SubmissionResult>> {
        let response = self
            .client
            .post(submit_url)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("请求 {} 失败", submit_url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("提交返回 HTTP {}: {}", status, body);
            return Ok(None);
        }

        let result = response
            .json::<SubmissionResult>()
            .await
            .context("无法解析提交响应")?;
        Ok(Some(result))
    }
}

#[async_trait]
impl Submitter for HttpSubmitter {
    async fn submit(
        &self,
        submit_url: &str,
        payload: &SubmissionPayload,
    ) -> Option<SubmissionResult> {
        info!("📤 正在提交答案到 {}", submit_url);
        debug!("提交内容: url={}, answer={}", payload.url, payload.answer);

        match self.post(submit_url, payload).await {
            Ok(Some(result)) => {
                if result.correct {
                    info!("✓ 答案正确");
                } else {
                    warn!("✗ 答案错误: {}", result.reason);
                }
                debug!("提交响应: {:?}", result);
                Some(result)
            }
            Ok(None) => None,
            Err(e) => {
                error!("提交答案失败: {:#}", e);
                None
            }
        }
    }
}
