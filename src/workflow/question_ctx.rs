//! 题目处理上下文
//!
//! 封装"我正在处理第几题、题目在哪、答案交到哪"这一信息，每道题重新创建

use std::fmt::Display;

/// 题目处理上下文
#[derive(Debug, Clone)]
pub struct QuestionCtx {
    /// 题目序号（从1开始，仅用于日志显示）
    pub question_no: usize,

    /// 当前题目地址
    pub quiz_url: String,

    /// 渲染得到的题目文本
    pub question_text: String,

    /// 解析出的提交地址
    pub submit_url: Option<String>,
}

impl QuestionCtx {
    /// 创建新的题目上下文
    pub fn new(question_no: usize, quiz_url: impl Into<String>, question_text: String) -> Self {
        Self {
            question_no,
            quiz_url: quiz_url.into(),
            question_text,
            submit_url: None,
        }
    }
}

impl Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[题目#{} {}]", self.question_no, self.quiz_url)
    }
}
