//! 提交地址解析 - 业务能力层
//!
//! 根据题目文本、分析结果和当前页面地址推断答案应提交到哪个 URL。
//! 纯函数，不做任何 I/O。
//!
//! 优先级（先命中者胜出）：
//! 1. 分析结果中的 `submit_url` 提示（相对地址按当前页面补全）
//! 2. `POST ... to <绝对URL>`
//! 3. `submit ... <包含 submit 的绝对URL>`
//! 4. `POST ... <绝对URL>`
//! 5. 文本中第一个包含 submit 的绝对 URL
//! 6. `(POST|submit) ... to </相对路径>`，按当前页面补全

use anyhow::Result;
use regex::Regex;
use tracing::debug;
use url::Url;

use crate::models::Analysis;

/// URL 末尾常见的句读符号
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':'];

/// 单条文本匹配规则
pub struct TextMatcher {
    name: &'static str,
    pattern: Regex,
    extract: Extract,
}

/// 匹配后如何取出地址
enum Extract {
    /// 第一个捕获组即绝对 URL
    Absolute,
    /// 遍历所有匹配，取第一个小写形式包含指定子串的
    FirstContaining(&'static str),
    /// 第一个捕获组是相对路径，需按当前页面补全
    Relative,
}

impl TextMatcher {
    fn new(name: &'static str, pattern: &str, extract: Extract) -> Result<Self> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            extract,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 在文本中查找地址
    pub fn find(&self, text: &str, current_url: &str) -> Option<String> {
        match self.extract {
            Extract::Absolute => self
                .pattern
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| trim_trailing_punctuation(m.as_str()).to_string()),
            Extract::FirstContaining(needle) => self
                .pattern
                .find_iter(text)
                .map(|m| m.as_str())
                .find(|url| url.to_lowercase().contains(needle))
                .map(|url| trim_trailing_punctuation(url).to_string()),
            Extract::Relative => self
                .pattern
                .captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| join_url(current_url, trim_trailing_punctuation(m.as_str()))),
        }
    }
}

/// 提交地址解析器：按固定优先级依次尝试各条规则
pub struct EndpointResolver {
    matchers: Vec<TextMatcher>,
}

impl EndpointResolver {
    pub fn new() -> Result<Self> {
        let matchers = vec![
            TextMatcher::new(
                "post-to-absolute",
                r"(?i)POST.*?to\s+(https?://\S+)",
                Extract::Absolute,
            )?,
            TextMatcher::new(
                "submit-absolute",
                r"(?i)submit.*?(https?://\S+submit\S*)",
                Extract::Absolute,
            )?,
            TextMatcher::new("post-absolute", r"(?i)POST.*?(https?://\S+)", Extract::Absolute)?,
            TextMatcher::new(
                "any-submit-url",
                r#"https?://[^\s<>"]+"#,
                Extract::FirstContaining("submit"),
            )?,
            TextMatcher::new(
                "relative-path",
                r"(?i)(?:POST|submit).*?to\s+(/\S+)",
                Extract::Relative,
            )?,
        ];

        Ok(Self { matchers })
    }

    /// 解析提交地址，找不到时返回 None（不是错误）
    pub fn resolve(&self, text: &str, analysis: &Analysis, current_url: &str) -> Option<String> {
        if let Some(hint) = analysis.submission_hint() {
            debug!("使用分析结果中的提交地址: {}", hint);
            return if is_absolute(hint) {
                Some(hint.to_string())
            } else {
                join_url(current_url, hint)
            };
        }

        self.matchers.iter().find_map(|matcher| {
            let found = matcher.find(text, current_url);
            if let Some(url) = &found {
                debug!("规则 {} 命中提交地址: {}", matcher.name(), url);
            }
            found
        })
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// 将相对地址按基准地址补全
fn join_url(base: &str, relative: &str) -> Option<String> {
    Url::parse(base)
        .and_then(|base| base.join(relative))
        .map(String::from)
        .ok()
}

fn trim_trailing_punctuation(url: &str) -> &str {
    url.trim_end_matches(TRAILING_PUNCTUATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT: &str = "https://host/q1";

    fn resolver() -> EndpointResolver {
        EndpointResolver::new().unwrap()
    }

    fn with_hint(hint: &str) -> Analysis {
        Analysis {
            submission_url_hint: Some(hint.to_string()),
            ..Analysis::default()
        }
    }

    fn matcher(name: &str) -> TextMatcher {
        resolver()
            .matchers
            .into_iter()
            .find(|m| m.name() == name)
            .unwrap()
    }

    #[test]
    fn test_hint_wins_over_text() {
        let text = "POST your answer to /submit-abc";
        let url = resolver().resolve(text, &with_hint("https://other/submit"), CURRENT);
        assert_eq!(url.as_deref(), Some("https://other/submit"));
    }

    #[test]
    fn test_relative_hint_is_joined() {
        let url = resolver().resolve("", &with_hint("/next"), CURRENT);
        assert_eq!(url.as_deref(), Some("https://host/next"));
    }

    #[test]
    fn test_post_to_absolute_is_trimmed() {
        let text = "Compute the total. POST to https://x/submit.";
        let url = resolver().resolve(text, &Analysis::default(), CURRENT);
        assert_eq!(url.as_deref(), Some("https://x/submit"));
    }

    #[test]
    fn test_post_to_absolute_case_insensitive() {
        let m = matcher("post-to-absolute");
        assert_eq!(
            m.find("Please post the value to https://s/sub1;", CURRENT).as_deref(),
            Some("https://s/sub1")
        );
    }

    #[test]
    fn test_submit_absolute_requires_submit_in_url() {
        let m = matcher("submit-absolute");
        assert_eq!(
            m.find("Submit at https://s/api/submit-7, then wait", CURRENT).as_deref(),
            Some("https://s/api/submit-7")
        );
        assert_eq!(m.find("Submit at https://s/api/answer", CURRENT), None);
    }

    #[test]
    fn test_bare_post_absolute() {
        let m = matcher("post-absolute");
        assert_eq!(
            m.find("POST JSON: https://s/answer:", CURRENT).as_deref(),
            Some("https://s/answer")
        );
    }

    #[test]
    fn test_any_url_containing_submit() {
        let text = "Data at https://s/data.csv and the checker lives at https://s/SUBMIT/q3.";
        let m = matcher("any-submit-url");
        assert_eq!(m.find(text, CURRENT).as_deref(), Some("https://s/SUBMIT/q3"));
        assert_eq!(
            resolver().resolve(text, &Analysis::default(), CURRENT).as_deref(),
            Some("https://s/SUBMIT/q3")
        );
    }

    #[test]
    fn test_relative_instruction_is_joined() {
        let text = "When done, submit it to /answers/q1.";
        let url = resolver().resolve(text, &Analysis::default(), CURRENT);
        assert_eq!(url.as_deref(), Some("https://host/answers/q1"));
    }

    #[test]
    fn test_no_endpoint_found() {
        let text = "What is the capital of France?";
        assert_eq!(resolver().resolve(text, &Analysis::default(), CURRENT), None);
    }

    #[test]
    fn test_priority_order_prefers_post_to() {
        // 同时满足多条规则时取优先级最高的
        let text = "Data: https://s/submit-data.csv. POST your answer to https://s/check";
        let url = resolver().resolve(text, &Analysis::default(), CURRENT);
        assert_eq!(url.as_deref(), Some("https://s/check"));
    }
}
