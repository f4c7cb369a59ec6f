//! 提交信封：请求体与响应体

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::Answer;

/// 身份凭据，每次提交时原样带上
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            secret: secret.into(),
        }
    }
}

/// 提交请求体 `{email, secret, url, answer}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    pub email: String,
    pub secret: String,
    /// 当前题目地址
    pub url: String,
    pub answer: Answer,
}

impl SubmissionPayload {
    pub fn new(credentials: &Credentials, quiz_url: &str, answer: Answer) -> Self {
        Self {
            email: credentials.email.clone(),
            secret: credentials.secret.clone(),
            url: quiz_url.to_string(),
            answer,
        }
    }
}

/// 提交响应 `{correct, reason, url}`，所有字段可缺省
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubmissionResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub correct: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl SubmissionResult {
    /// 下一题地址，空字符串视为没有下一题
    pub fn next_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
