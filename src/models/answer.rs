//! 答案类型

use std::fmt::{self, Display};

use serde::{ser::Error as _, Serialize, Serializer};
use serde_json::value::RawValue;

/// 无法自动求解时提交的占位答案
pub const UNSOLVED_SENTINEL: &str = "Unable to solve automatically";

/// 弱类型答案，按原样序列化进提交请求的 `answer` 字段
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Integer(i64),
    /// 超出 i64 范围的整数，保存规范化后的十进制数字，原样写入 JSON
    BigInteger(#[serde(serialize_with = "serialize_digits")] String),
    Float(f64),
    Text(String),
}

impl Answer {
    /// 将 LLM 的回复转换为答案：先尝试整数，再尝试浮点数，都失败则保留原始字符串
    pub fn from_reply(reply: &str) -> Self {
        let reply = reply.trim();
        if let Ok(value) = reply.parse::<i64>() {
            return Answer::Integer(value);
        }
        if let Some(digits) = normalize_integer(reply) {
            return Answer::BigInteger(digits);
        }
        match reply.parse::<f64>() {
            // NaN / inf 无法写入 JSON
            Ok(value) if value.is_finite() => Answer::Float(value),
            _ => Answer::Text(reply.to_string()),
        }
    }

    /// 占位答案
    pub fn unsolved() -> Self {
        Answer::Text(UNSOLVED_SENTINEL.to_string())
    }

    pub fn is_unsolved(&self) -> bool {
        matches!(self, Answer::Text(text) if text == UNSOLVED_SENTINEL)
    }
}

/// `[+-]数字` 形式的整数转换为 JSON 合法的写法：去掉 `+` 和前导零
fn normalize_integer(text: &str) -> Option<String> {
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = digits.trim_start_matches('0');
    Some(match (negative, digits.is_empty()) {
        (_, true) => "0".to_string(),
        (true, false) => format!("-{}", digits),
        (false, false) => digits.to_string(),
    })
}

fn serialize_digits<S: Serializer>(digits: &str, serializer: S) -> Result<S::Ok, S::Error> {
    RawValue::from_string(digits.to_string())
        .map_err(S::Error::custom)?
        .serialize(serializer)
}

impl Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Integer(v) => write!(f, "{}", v),
            Answer::BigInteger(v) => write!(f, "{}", v),
            Answer::Float(v) => write!(f, "{}", v),
            Answer::Text(v) => write!(f, "{}", v),
        }
    }
}
