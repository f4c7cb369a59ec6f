//! LLM 服务 - 业务能力层
//!
//! 充当"答题顾问"：分析题目、直接作答、生成解题代码。不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use std::time::Duration;

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::models::Analysis;
use crate::utils::truncate_text;

/// 各类请求的 token 上限
const ANALYZE_MAX_TOKENS: u32 = 2000;
const ANSWER_MAX_TOKENS: u32 = 1000;
const CODE_MAX_TOKENS: u32 = 4000;

/// 答题顾问能力
#[async_trait]
pub trait Oracle: Send + Sync {
    /// 分析题目，返回结构化的任务描述
    async fn analyze_question(&self, question_text: &str) -> Result<Analysis>;

    /// 直接作答，返回简短的原始回复
    async fn answer_directly(&self, question_text: &str) -> Result<String>;

    /// 生成能够计算答案的代码（只返回，不执行）
    async fn generate_solution_code(&self, question_text: &str, analysis: &Analysis)
        -> Result<String>;
}

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API
/// - 构建三类 prompt 并解析回复
/// - 不出现提交地址、会话等流程概念
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    timeout: Duration,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            timeout: config.llm_timeout(),
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// 其他所有 LLM 相关功能都基于此函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    /// - `max_tokens`: 回复长度上限
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（已去除首尾空白）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        max_tokens: u32,
    ) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.0)
            .max_tokens(max_tokens)
            .build()?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|elapsed| {
                warn!("LLM API 调用超时 ({:?})", self.timeout);
                AppError::oracle_failed(&self.model_name, elapsed)
            })?
            .map_err(|e| {
                warn!("LLM API 调用失败: {}", e);
                AppError::oracle_failed(&self.model_name, e)
            })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::EmptyOracleReply {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }

    fn build_analyze_message(question_text: &str) -> String {
        format!(
            r#"You are analyzing a data quiz question. Extract the following information:

Question:
{}

Provide your analysis in JSON format with these fields:
{{
    "task_type": "pdf_analysis|web_scraping|api_call|data_analysis|visualization|other",
    "data_source": "URL or description of where to get data",
    "operations": ["list of operations to perform"],
    "answer_format": "number|string|boolean|json|base64_image",
    "submit_url": "URL where answer should be submitted"
}}

Respond ONLY with valid JSON, no other text."#,
            question_text
        )
    }

    fn build_answer_message(question_text: &str) -> String {
        format!(
            r#"Solve this data quiz question directly. Provide ONLY the final answer, nothing else.

Question:
{}

Answer (just the value, no explanation):"#,
            question_text
        )
    }

    fn build_code_message(question_text: &str, analysis: &Analysis) -> String {
        let analysis_json = serde_json::to_string_pretty(analysis).unwrap_or_default();
        format!(
            r#"You are a data analysis expert. Generate Python code to solve this quiz question.

Question:
{}

Analysis:
{}

Generate a complete Python script that:
1. Fetches/downloads the required data
2. Processes and analyzes it
3. Returns the final answer

The code should:
- Use common libraries (requests, pandas, PyPDF2, etc.)
- Handle errors gracefully
- Return the answer in a variable called 'answer'
- Be ready to execute as-is

Respond with ONLY the Python code, no explanation or markdown formatting."#,
            question_text, analysis_json
        )
    }
}

/// 从 LLM 回复中提取 JSON 对象
///
/// 去掉 markdown 代码块标记，再截取第一个 `{` 到最后一个 `}`
pub fn extract_json_object(response: &str) -> &str {
    let mut text = response.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text.trim(),
    }
}

/// 解析题目分析回复
pub fn parse_analysis(response: &str) -> Result<Analysis> {
    let json_text = extract_json_object(response);
    serde_json::from_str(json_text)
        .map_err(|e| AppError::analysis_parse_failed(response, e).into())
}

#[async_trait]
impl Oracle for LlmService {
    async fn analyze_question(&self, question_text: &str) -> Result<Analysis> {
        info!("🔍 正在用 LLM 分析题目...");

        let response = self
            .send_to_llm(
                &Self::build_analyze_message(question_text),
                None,
                ANALYZE_MAX_TOKENS,
            )
            .await?;
        debug!("LLM 分析回复: {}", truncate_text(&response, 200));

        parse_analysis(&response).map_err(|e| {
            warn!("分析结果不是合法的 JSON: {:#}", e);
            e
        })
    }

    async fn answer_directly(&self, question_text: &str) -> Result<String> {
        info!("🤖 请求 LLM 直接作答...");

        let answer = self
            .send_to_llm(
                &Self::build_answer_message(question_text),
                None,
                ANSWER_MAX_TOKENS,
            )
            .await?;
        info!("LLM 直接作答: {}", answer);

        Ok(answer)
    }

    async fn generate_solution_code(
        &self,
        question_text: &str,
        analysis: &Analysis,
    ) -> Result<String> {
        info!("🧩 请求 LLM 生成解题代码...");

        let code = self
            .send_to_llm(
                &Self::build_code_message(question_text, analysis),
                None,
                CODE_MAX_TOKENS,
            )
            .await?;
        info!("已生成解题代码 ({} 字符)", code.chars().count());

        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerFormat, TaskType};

    /// 创建测试用的 LlmService
    fn create_test_service() -> LlmService {
        let config = Config {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or_default(),
            ..Config::default()
        };
        LlmService::new(&config)
    }

    #[test]
    fn test_extract_json_from_fenced_reply() {
        let reply = "```json\n{\"task_type\": \"api_call\"}\n```";
        assert_eq!(extract_json_object(reply), "{\"task_type\": \"api_call\"}");
    }

    #[test]
    fn test_extract_json_with_surrounding_prose() {
        let reply = "Here is the analysis:\n{\"a\": {\"b\": 1}}\nHope this helps!";
        assert_eq!(extract_json_object(reply), "{\"a\": {\"b\": 1}}");
    }

    #[test]
    fn test_parse_analysis() {
        let analysis = parse_analysis(
            "```\n{\"task_type\": \"data_analysis\", \"answer_format\": \"number\", \"submit_url\": \"https://host/submit\"}\n```",
        )
        .unwrap();
        assert_eq!(analysis.task_type, TaskType::DataAnalysis);
        assert_eq!(analysis.answer_format, Some(AnswerFormat::Number));
        assert_eq!(analysis.submission_hint(), Some("https://host/submit"));
    }

    #[test]
    fn test_parse_analysis_rejects_non_json() {
        let err = parse_analysis("I cannot help with that.").unwrap_err();
        assert!(err.downcast_ref::<AppError>().is_some());
    }

    #[test]
    fn test_prompts_embed_question() {
        let question = "What is the sum of column B?";
        assert!(LlmService::build_analyze_message(question).contains(question));
        assert!(LlmService::build_answer_message(question).contains(question));

        let analysis = Analysis {
            data_source: "https://host/data.csv".to_string(),
            ..Analysis::default()
        };
        let code_prompt = LlmService::build_code_message(question, &analysis);
        assert!(code_prompt.contains(question));
        assert!(code_prompt.contains("https://host/data.csv"));
    }

    /// 测试通用 LLM 调用（需要真实的 LLM_API_KEY）
    #[tokio::test]
    #[ignore]
    async fn test_answer_directly_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = create_test_service();
        let answer = service
            .answer_directly("What is 6 multiplied by 7?")
            .await
            .expect("LLM 调用失败");

        println!("LLM 回复: {}", answer);
        assert!(answer.contains("42"));
    }
}
