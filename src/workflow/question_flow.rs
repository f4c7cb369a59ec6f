//! 题目处理流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整处理流程
//!
//! 流程顺序（每一步都依赖上一步成功）：
//! 1. 渲染页面 → 题目文本
//! 2. LLM 分析 → Analysis
//! 3. 解析提交地址（找不到则平稳结束）
//! 4. 求解 → Answer
//! 5. 提交 → SubmissionResult
//! 6. 返回下一题地址
//!
//! 渲染、分析、求解的错误原样向上传播，由解题链统一处理

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::infrastructure::PageRenderer;
use crate::models::{Credentials, SubmissionPayload};
use crate::services::{AnswerSolver, EndpointResolver, Oracle, Submitter};
use crate::utils::truncate_text;
use crate::workflow::question_ctx::QuestionCtx;

/// 日志中题目文本的预览长度
const QUESTION_PREVIEW_CHARS: usize = 500;

/// 单道题的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionOutcome {
    /// 已提交，继续处理下一题
    Advance { next_url: String },
    /// 解题链在这道题平稳结束
    Finished(FinishReason),
}

/// 平稳结束的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// 提交响应中没有下一题
    NoNextUrl,
    /// 找不到提交地址
    NoSubmitUrl,
    /// 提交失败（网络错误或非 2xx）
    SubmissionFailed,
}

impl QuestionOutcome {
    /// 下一题地址
    pub fn next_url(&self) -> Option<&str> {
        match self {
            QuestionOutcome::Advance { next_url } => Some(next_url),
            QuestionOutcome::Finished(_) => None,
        }
    }
}

/// 题目处理流程
///
/// - 编排单道题的完整处理流程
/// - 不持有浏览器 page，只依赖注入的能力
pub struct QuestionFlow {
    renderer: Arc<dyn PageRenderer>,
    oracle: Arc<dyn Oracle>,
    submitter: Arc<dyn Submitter>,
    resolver: EndpointResolver,
    solver: AnswerSolver,
}

impl QuestionFlow {
    /// 创建新的题目处理流程
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        oracle: Arc<dyn Oracle>,
        submitter: Arc<dyn Submitter>,
    ) -> Result<Self> {
        Ok(Self {
            renderer,
            solver: AnswerSolver::new(oracle.clone()),
            oracle,
            submitter,
            resolver: EndpointResolver::new()?,
        })
    }

    pub async fn run(
        &self,
        question_no: usize,
        quiz_url: &str,
        credentials: &Credentials,
    ) -> Result<QuestionOutcome> {
        // ========== 1. 渲染 ==========
        let question_text = self.renderer.render_text(quiz_url).await?;
        let mut ctx = QuestionCtx::new(question_no, quiz_url, question_text);
        info!(
            "{} 题目文本:\n{}",
            ctx,
            truncate_text(&ctx.question_text, QUESTION_PREVIEW_CHARS)
        );

        // ========== 2. 分析 ==========
        let analysis = self.oracle.analyze_question(&ctx.question_text).await?;
        info!("{} 分析结果: {:?}", ctx, analysis);

        // ========== 3. 提交地址 ==========
        ctx.submit_url = self
            .resolver
            .resolve(&ctx.question_text, &analysis, &ctx.quiz_url);
        let Some(submit_url) = ctx.submit_url.as_deref() else {
            error!("{} ❌ 找不到提交地址", ctx);
            return Ok(QuestionOutcome::Finished(FinishReason::NoSubmitUrl));
        };
        info!("{} 提交地址: {}", ctx, submit_url);

        // ========== 4. 求解 ==========
        let answer = self.solver.solve(&ctx.question_text, &analysis).await?;
        info!("{} 答案: {}", ctx, answer);

        // ========== 5. 提交 ==========
        let payload = SubmissionPayload::new(credentials, &ctx.quiz_url, answer);
        let Some(result) = self.submitter.submit(submit_url, &payload).await else {
            warn!("{} ⚠️ 提交失败，结束解题链", ctx);
            return Ok(QuestionOutcome::Finished(FinishReason::SubmissionFailed));
        };

        // ========== 6. 下一题 ==========
        // 答错时响应里也可能带有下一题地址，照常继续
        Ok(match result.next_url() {
            Some(next_url) => QuestionOutcome::Advance {
                next_url: next_url.to_string(),
            },
            None => QuestionOutcome::Finished(FinishReason::NoNextUrl),
        })
    }
}
