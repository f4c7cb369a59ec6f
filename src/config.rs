use std::time::Duration;

use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- 身份凭据 ---
    pub email: String,
    pub secret: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 单次 LLM 调用超时（秒）
    pub llm_timeout_secs: u64,
    // --- 解题链配置 ---
    /// 整条解题链的总时长预算（秒）
    pub total_timeout_secs: u64,
    /// 单次页面渲染超时（毫秒）
    pub browser_timeout_ms: u64,
    /// 页面加载后的静置等待（毫秒）
    pub browser_settle_ms: u64,
    /// 浏览器可执行文件路径，为空时由 chromiumoxide 自动探测
    pub chrome_executable: Option<String>,
    /// 浏览器调试端口，设置后连接已有浏览器而不是启动新的
    pub browser_debug_port: Option<u16>,
    /// 提交答案的 HTTP 超时（秒）
    pub submit_timeout_secs: u64,
    // --- 服务配置 ---
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            email: String::new(),
            secret: String::new(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_timeout_secs: 60,
            total_timeout_secs: 180,
            browser_timeout_ms: 30_000,
            browser_settle_ms: 2_000,
            chrome_executable: None,
            browser_debug_port: None,
            submit_timeout_secs: 30,
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Config {
    /// 从环境变量加载配置（会先读取 `.env`）
    ///
    /// 必填项只校验是否存在，不校验格式
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源加载配置，便于测试
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::EnvVarNotFound {
                    var_name: name.to_string(),
                })
        };

        Ok(Self {
            email: required("EMAIL")?,
            secret: required("SECRET")?,
            llm_api_key: required("LLM_API_KEY")?,
            llm_api_base_url: lookup("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: lookup("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", default.llm_timeout_secs)?,
            total_timeout_secs: parse_or(&lookup, "TIMEOUT_SECONDS", default.total_timeout_secs)?,
            browser_timeout_ms: parse_or(&lookup, "BROWSER_TIMEOUT_MS", default.browser_timeout_ms)?,
            browser_settle_ms: parse_or(&lookup, "BROWSER_SETTLE_MS", default.browser_settle_ms)?,
            chrome_executable: lookup("CHROME_EXECUTABLE").filter(|v| !v.is_empty()),
            browser_debug_port: parse_optional(&lookup, "BROWSER_DEBUG_PORT")?,
            submit_timeout_secs: parse_or(&lookup, "SUBMIT_TIMEOUT_SECS", default.submit_timeout_secs)?,
            host: lookup("HOST").unwrap_or(default.host),
            port: parse_or(&lookup, "PORT", default.port)?,
        })
    }

    pub fn total_timeout(&self) -> Duration {
        Duration::from_secs(self.total_timeout_secs)
    }

    pub fn browser_timeout(&self) -> Duration {
        Duration::from_millis(self.browser_timeout_ms)
    }

    pub fn browser_settle(&self) -> Duration {
        Duration::from_millis(self.browser_settle_ms)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    /// 服务监听地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 解析可选的数值型变量，缺失时使用默认值
fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    Ok(parse_optional(lookup, name)?.unwrap_or(default))
}

fn parse_optional<F, T>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name).filter(|v| !v.trim().is_empty()) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            }),
    }
}
