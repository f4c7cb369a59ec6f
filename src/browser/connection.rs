use anyhow::Result;
use chromiumoxide::Browser;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 连接到已在运行的浏览器（需以 `--remote-debugging-port` 启动）
pub async fn connect_to_browser(port: u16) -> Result<(Browser, JoinHandle<()>)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        e
    })?;

    let handler_task = super::spawn_handler(handler);

    info!("✓ 浏览器连接成功");
    Ok((browser, handler_task))
}
