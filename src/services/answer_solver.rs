//! 解题策略 - 业务能力层
//!
//! 首选：让 LLM 直接作答，并把回复转换为数字或字符串。
//! 兜底：直接作答失败时让 LLM 生成解题代码，仅记录日志，绝不执行，
//! 返回占位答案。

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::models::{Analysis, Answer};
use crate::services::Oracle;

/// 解题器
pub struct AnswerSolver {
    oracle: Arc<dyn Oracle>,
}

impl AnswerSolver {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    /// 求解题目
    ///
    /// 分析结果目前只用于兜底的代码生成，不参与策略选择
    pub async fn solve(&self, question_text: &str, analysis: &Analysis) -> Result<Answer> {
        match self.oracle.answer_directly(question_text).await {
            Ok(reply) => Ok(Answer::from_reply(&reply)),
            Err(e) => {
                error!("直接作答失败: {:#}", e);
                self.fallback(question_text, analysis).await
            }
        }
    }

    async fn fallback(&self, question_text: &str, analysis: &Analysis) -> Result<Answer> {
        let code = self
            .oracle
            .generate_solution_code(question_text, analysis)
            .await
            .map_err(|e| {
                error!("生成解题代码失败: {:#}", e);
                e
            })?;

        info!("生成的解题代码:\n{}", code);
        // 生成的代码来自不可信来源，不在进程内执行
        warn!("⚠️ 不会自动执行生成的代码，提交占位答案");

        Ok(Answer::unsolved())
    }
}
