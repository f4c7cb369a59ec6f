#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use quiz_chain_solver::{
    Analysis, Credentials, Oracle, PageRenderer, QuestionFlow, SubmissionPayload,
    SubmissionResult, Submitter,
};

pub fn credentials() -> Credentials {
    Credentials::new("student@example.com", "s3cret")
}

/// 按 URL 返回固定文本的渲染器
#[derive(Default)]
pub struct FakeRenderer {
    pages: HashMap<String, String>,
    default_page: Option<String>,
    latency: Duration,
    pub visited: Mutex<Vec<String>>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }

    /// 未登记的 URL 也返回这段文本
    pub fn with_default_page(mut self, text: &str) -> Self {
        self.default_page = Some(text.to_string());
        self
    }

    /// 每次渲染耗时
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageRenderer for FakeRenderer {
    async fn render_text(&self, url: &str) -> Result<String> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.visited.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .or(self.default_page.as_ref())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("navigation to {} failed", url))
    }
}

/// 固定回复的 LLM
pub struct FakeOracle {
    analysis: Option<Analysis>,
    reply: Option<String>,
    code: Option<String>,
    pub code_requests: Mutex<usize>,
}

impl FakeOracle {
    pub fn answering(reply: &str) -> Self {
        Self {
            analysis: Some(Analysis::default()),
            reply: Some(reply.to_string()),
            code: Some("answer = sum(range(10))".to_string()),
            code_requests: Mutex::new(0),
        }
    }

    /// 直接作答总是失败
    pub fn failing() -> Self {
        Self {
            reply: None,
            ..Self::answering("")
        }
    }

    pub fn with_analysis(mut self, analysis: Analysis) -> Self {
        self.analysis = Some(analysis);
        self
    }

    /// 分析调用失败（如返回内容不是 JSON）
    pub fn with_failing_analysis(mut self) -> Self {
        self.analysis = None;
        self
    }

    /// 生成解题代码也失败
    pub fn with_failing_codegen(mut self) -> Self {
        self.code = None;
        self
    }

    pub fn code_requests(&self) -> usize {
        *self.code_requests.lock().unwrap()
    }
}

#[async_trait]
impl Oracle for FakeOracle {
    async fn analyze_question(&self, _question_text: &str) -> Result<Analysis> {
        self.analysis
            .clone()
            .ok_or_else(|| anyhow::anyhow!("无法解析题目分析结果"))
    }

    async fn answer_directly(&self, _question_text: &str) -> Result<String> {
        self.reply
            .clone()
            .ok_or_else(|| anyhow::anyhow!("LLM API 调用失败"))
    }

    async fn generate_solution_code(
        &self,
        _question_text: &str,
        _analysis: &Analysis,
    ) -> Result<String> {
        *self.code_requests.lock().unwrap() += 1;
        self.code
            .clone()
            .ok_or_else(|| anyhow::anyhow!("LLM 代码生成失败"))
    }
}

type Responder = Box<dyn Fn(usize) -> Option<SubmissionResult> + Send + Sync>;

/// 记录每次提交的假提交客户端
pub struct RecordingSubmitter {
    responder: Responder,
    pub calls: Mutex<Vec<(String, SubmissionPayload)>>,
}

impl RecordingSubmitter {
    /// 按提交次序（从0开始）决定响应
    pub fn new(responder: impl Fn(usize) -> Option<SubmissionResult> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 每次都返回下一题地址，形成无限链
    pub fn endless() -> Self {
        Self::new(|n| Some(result(true, Some(&format!("https://host/q{}", n + 2)))))
    }

    pub fn calls(&self) -> Vec<(String, SubmissionPayload)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Submitter for RecordingSubmitter {
    async fn submit(
        &self,
        submit_url: &str,
        payload: &SubmissionPayload,
    ) -> Option<SubmissionResult> {
        let mut calls = self.calls.lock().unwrap();
        let n = calls.len();
        calls.push((submit_url.to_string(), payload.clone()));
        (self.responder)(n)
    }
}

pub fn result(correct: bool, next_url: Option<&str>) -> SubmissionResult {
    SubmissionResult {
        correct,
        reason: if correct { String::new() } else { "Wrong answer".to_string() },
        url: next_url.map(str::to_string),
    }
}

pub fn build_flow(
    renderer: Arc<FakeRenderer>,
    oracle: Arc<FakeOracle>,
    submitter: Arc<RecordingSubmitter>,
) -> Arc<QuestionFlow> {
    Arc::new(QuestionFlow::new(renderer, oracle, submitter).unwrap())
}
