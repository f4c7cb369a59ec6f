use std::path::Path;

use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::Config;

/// 启动无头浏览器
///
/// 返回浏览器句柄和后台事件处理任务
pub async fn launch_headless_browser(config: &Config) -> Result<(Browser, JoinHandle<()>)> {
    info!("🚀 启动无头浏览器...");

    let mut builder = BrowserConfig::builder()
        .new_headless_mode()
        .request_timeout(config.browser_timeout())
        .args(vec![
            "--no-sandbox",              // 容器内无法使用沙盒
            "--disable-setuid-sandbox",
            "--disable-gpu",
            "--disable-dev-shm-usage",   // 防止共享内存不足
        ]);

    if let Some(executable) = &config.chrome_executable {
        debug!("使用指定的浏览器: {}", executable);
        builder = builder.chrome_executable(Path::new(executable));
    }

    let browser_config = builder.build().map_err(|e| {
        error!("配置无头浏览器失败: {}", e);
        anyhow::anyhow!("配置无头浏览器失败: {}", e)
    })?;

    let (browser, handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        anyhow::anyhow!("启动无头浏览器失败: {}", e)
    })?;

    let handler_task = super::spawn_handler(handler);

    info!("✅ 无头浏览器已启动");
    Ok((browser, handler_task))
}
