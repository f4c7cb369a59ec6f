//! 题目分析结果
//!
//! 由 LLM 对题目文本进行分类后产生，每道题生成一次，生成后只读

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

/// 任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    PdfAnalysis,
    WebScraping,
    ApiCall,
    DataAnalysis,
    Visualization,
    #[default]
    Other,
}

/// 期望的答案格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerFormat {
    Number,
    String,
    Boolean,
    Json,
    Base64Image,
}

/// LLM 返回的结构化题目分析
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub task_type: TaskType,
    /// 数据来源描述（URL 或文字）
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub data_source: String,
    /// 需要执行的操作，按顺序
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub operations: Vec<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub answer_format: Option<AnswerFormat>,
    /// 提交地址提示，可能是相对路径
    #[serde(
        default,
        rename = "submit_url",
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub submission_url_hint: Option<String>,
}

impl Analysis {
    /// 返回非空的提交地址提示
    pub fn submission_hint(&self) -> Option<&str> {
        self.submission_url_hint
            .as_deref()
            .map(str::trim)
            .filter(|hint| !hint.is_empty())
    }
}

/// 容忍 LLM 返回的未知枚举值或类型不符的字段，解析失败时视为缺失
fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient_option(deserializer)?.unwrap_or_default())
}
