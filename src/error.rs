use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 页面渲染失败（超时、导航错误等）
    #[error("渲染页面 {url} 失败: {source}")]
    Render {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// LLM 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    Oracle {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// LLM 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyOracleReply { model: String },

    /// 题目分析结果不是合法的 JSON
    #[error("无法解析题目分析结果 (响应: {response}): {source}")]
    AnalysisParse {
        response: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },

    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建页面渲染错误
    pub fn render_failed(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        AppError::Render {
            url: url.into(),
            source: source.into(),
        }
    }

    /// 创建LLM API调用错误
    pub fn oracle_failed(
        model: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        AppError::Oracle {
            model: model.into(),
            source: source.into(),
        }
    }

    /// 创建分析结果解析错误
    pub fn analysis_parse_failed(response: impl Into<String>, source: serde_json::Error) -> Self {
        AppError::AnalysisParse {
            response: response.into(),
            source,
        }
    }
}
