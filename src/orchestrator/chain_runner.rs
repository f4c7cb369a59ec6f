//! 解题链控制器 - 编排层
//!
//! ## 职责
//!
//! 在固定的时长预算内串行处理题目：渲染 → 分析 → 提交 → 跟随下一题地址，
//! 直到没有下一题、时间即将耗尽或出现致命错误。
//!
//! ## 时间预算
//!
//! - 会话开始时间只在第一次进入循环时记录一次
//! - 剩余时间每次都由开始时间重新计算，不维护倒计时变量
//! - 剩余时间不超过安全余量时不再开始新题；正在进行的题目无法中断，
//!   因此总耗时最多超出预算一道题的时间

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::models::Credentials;
use crate::utils::logging::{log_chain_summary, log_question_start};
use crate::workflow::{FinishReason, QuestionFlow, QuestionOutcome};

/// 为最后一道进行中的题目预留的时间
pub const SAFETY_MARGIN: Duration = Duration::from_secs(10);

/// 解题会话：身份凭据 + 开始时间，创建后不可变
#[derive(Debug, Clone)]
pub struct Session {
    credentials: Credentials,
    started_at: Instant,
}

impl Session {
    fn start(credentials: Credentials) -> Self {
        Self {
            credentials,
            started_at: Instant::now(),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// 相对总预算的剩余时间
    pub fn remaining(&self, total: Duration) -> Duration {
        total.saturating_sub(self.elapsed())
    }
}

/// 解题链的结束方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// 平稳结束
    Completed(FinishReason),
    /// 时间即将耗尽，未开始 `pending_url`
    TimedOut { pending_url: String },
    /// 某道题出现致命错误
    Aborted { url: String, error: String },
}

/// 解题链运行报告，仅用于观察，不作为错误通道
#[derive(Debug, Clone)]
pub struct ChainReport {
    /// 开始处理的题目数
    pub questions: usize,
    pub elapsed: Duration,
    pub outcome: ChainOutcome,
}

/// 解题链控制器
pub struct ChainRunner {
    flow: Arc<QuestionFlow>,
    credentials: Credentials,
    total_timeout: Duration,
    session: Option<Session>,
}

impl ChainRunner {
    pub fn new(flow: Arc<QuestionFlow>, credentials: Credentials, total_timeout: Duration) -> Self {
        Self {
            flow,
            credentials,
            total_timeout,
            session: None,
        }
    }

    /// 当前会话（首次运行前为 None）
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// 从 `start_url` 开始处理解题链
    ///
    /// 不会返回错误：所有结果都体现在日志和返回的报告中
    pub async fn run(&mut self, start_url: &str) -> ChainReport {
        let session = self
            .session
            .get_or_insert_with(|| Session::start(self.credentials.clone()))
            .clone();
        info!("🚀 开始解题链: {}", start_url);

        let mut current_url = Some(start_url.trim().to_string()).filter(|url| !url.is_empty());
        let mut questions = 0;

        let outcome = loop {
            let Some(url) = current_url.take() else {
                break ChainOutcome::Completed(FinishReason::NoNextUrl);
            };

            let remaining = session.remaining(self.total_timeout);
            if remaining <= SAFETY_MARGIN {
                break ChainOutcome::TimedOut { pending_url: url };
            }

            questions += 1;
            log_question_start(questions, &url, remaining);

            match self.flow.run(questions, &url, session.credentials()).await {
                Ok(QuestionOutcome::Advance { next_url }) => {
                    info!("➡️ 进入下一题: {}", next_url);
                    current_url = Some(next_url);
                }
                Ok(QuestionOutcome::Finished(reason)) => {
                    break ChainOutcome::Completed(reason);
                }
                Err(e) => {
                    error!("❌ 处理题目 {} 失败: {:?}", url, e);
                    break ChainOutcome::Aborted {
                        url,
                        error: format!("{:#}", e),
                    };
                }
            }
        };

        match &outcome {
            ChainOutcome::Completed(reason) => info!("🎉 解题链完成 ({:?})", reason),
            ChainOutcome::TimedOut { pending_url } => {
                warn!("⏰ 时间即将耗尽，停止解题链，未处理: {}", pending_url)
            }
            ChainOutcome::Aborted { url, .. } => error!("🛑 解题链因错误中止于 {}", url),
        }

        let elapsed = session.elapsed();
        log_chain_summary(questions, elapsed);

        ChainReport {
            questions,
            elapsed,
            outcome,
        }
    }
}
