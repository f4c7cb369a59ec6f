//! JS 执行器 - 基础设施层
//!
//! 持有单次渲染使用的 page，只暴露"执行 JS"的能力

use anyhow::Result;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// 读取页面可见文本（不是 HTML 源码）
const VISIBLE_TEXT_JS: &str = "document.body ? document.body.innerText : ''";

/// JS 执行器
///
/// 职责：
/// - 独占一个 Page
/// - 暴露 eval() 能力
/// - 不认识题目、答案
/// - 用完后通过 close() 归还 page
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于导航等操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 页面的可见文本
    pub async fn visible_text(&self) -> Result<String> {
        self.eval_as::<Option<String>>(VISIBLE_TEXT_JS)
            .await
            .map(Option::unwrap_or_default)
    }

    /// 关闭 page（浏览器本身保持运行）
    pub async fn close(self) -> Result<()> {
        self.page.close().await?;
        Ok(())
    }
}
