/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::time::Duration;

use tracing::info;

use crate::config::Config;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 解题链服务");
    info!("📧 身份: {}", config.email);
    info!("🔑 Secret: {}", "*".repeat(config.secret.chars().count()));
    info!("🤖 模型: {} ({})", config.llm_model_name, config.llm_api_base_url);
    info!("⏱️ 总时长预算: {}s", config.total_timeout_secs);
    info!("🌐 监听地址: {}", config.bind_addr());
    info!("{}", "=".repeat(60));
}

/// 记录单道题开始信息
///
/// # 参数
/// - `question_no`: 题目序号（从1开始）
/// - `url`: 题目地址
/// - `remaining`: 剩余时间
pub fn log_question_start(question_no: usize, url: &str, remaining: Duration) {
    info!("\n{}", "=".repeat(60));
    info!("📝 第 {} 题: {}", question_no, url);
    info!("⏱️ 剩余时间: {:.1}s", remaining.as_secs_f64());
    info!("{}\n", "=".repeat(60));
}

/// 打印解题链最终统计
pub fn log_chain_summary(questions: usize, elapsed: Duration) {
    info!("\n{}", "─".repeat(60));
    info!("📊 共处理 {} 道题，耗时 {:.1}s", questions, elapsed.as_secs_f64());
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
