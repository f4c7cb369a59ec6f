//! 页面渲染器 - 基础设施层
//!
//! 在完整浏览器环境中加载 URL（执行页面 JS），返回页面的可见文本

use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::{EventLifecycleEvent, NavigateParams};
use chromiumoxide::Browser;
use futures::{Stream, StreamExt};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::JsExecutor;

/// 渲染能力：URL → 可见文本
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render_text(&self, url: &str) -> Result<String>;
}

/// 浏览器的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowserOwnership {
    /// 本进程启动，退出时关闭
    Launched,
    /// 通过调试端口连接，退出时只断开连接
    Attached,
}

impl BrowserOwnership {
    fn closes_on_shutdown(self) -> bool {
        matches!(self, BrowserOwnership::Launched)
    }
}

/// 基于 chromiumoxide 的渲染器
///
/// 持有一个长期运行的浏览器进程；每次渲染新建一个 page，渲染结束（无论成败）后关闭该 page
pub struct BrowserRenderer {
    browser: Mutex<Browser>,
    ownership: BrowserOwnership,
    handler_task: Mutex<Option<JoinHandle<()>>>,
    render_timeout: Duration,
    settle_delay: Duration,
}

impl BrowserRenderer {
    /// 启动（或连接）浏览器
    pub async fn start(config: &Config) -> Result<Self> {
        let ((browser, handler_task), ownership) = match config.browser_debug_port {
            Some(port) => (
                browser::connect_to_browser(port).await?,
                BrowserOwnership::Attached,
            ),
            None => (
                browser::launch_headless_browser(config).await?,
                BrowserOwnership::Launched,
            ),
        };

        Ok(Self {
            browser: Mutex::new(browser),
            ownership,
            handler_task: Mutex::new(Some(handler_task)),
            render_timeout: config.browser_timeout(),
            settle_delay: config.browser_settle(),
        })
    }

    /// 释放浏览器，只在进程退出前调用
    ///
    /// 自行启动的浏览器会被关闭；连接上的外部浏览器只断开连接
    pub async fn shutdown(&self) -> Result<()> {
        if self.ownership.closes_on_shutdown() {
            info!("正在关闭浏览器...");
            let mut browser = self.browser.lock().await;
            if let Err(e) = browser.close().await {
                warn!("关闭浏览器失败: {}", e);
            }
            let _ = browser.wait().await;
        } else {
            info!("断开与外部浏览器的连接");
        }

        if let Some(task) = self.handler_task.lock().await.take() {
            task.abort();
        }
        info!("✓ 浏览器已释放");
        Ok(())
    }

    /// 导航，等待网络空闲和稳定时间后读取可见文本
    async fn load_visible_text(&self, executor: &JsExecutor, url: &str) -> Result<String> {
        let page = executor.page();
        // 导航前订阅，生命周期事件在通道中缓冲
        let lifecycle = page.event_listener::<EventLifecycleEvent>().await?;

        let navigation = page.execute(NavigateParams::new(url)).await?;
        if let Some(error_text) = &navigation.error_text {
            bail!("导航失败: {}", error_text);
        }

        // 同文档导航没有新的 loader，不会再有 networkIdle
        if let Some(loader_id) = &navigation.loader_id {
            let watch = NetworkIdleWatch::new(navigation.frame_id.inner(), loader_id.inner());
            wait_for_network_idle(
                lifecycle.map(|event| {
                    (
                        event.frame_id.inner().clone(),
                        event.loader_id.inner().clone(),
                        event.name.clone(),
                    )
                }),
                &watch,
            )
            .await?;
            debug!("页面网络空闲: {}", url);
        }

        tokio::time::sleep(self.settle_delay).await;
        executor.visible_text().await
    }
}

/// 只认本次导航（frame + loader）的 `networkIdle` 生命周期事件
#[derive(Debug, Clone)]
struct NetworkIdleWatch {
    frame_id: String,
    loader_id: String,
}

impl NetworkIdleWatch {
    fn new(frame_id: &str, loader_id: &str) -> Self {
        Self {
            frame_id: frame_id.to_string(),
            loader_id: loader_id.to_string(),
        }
    }

    fn is_idle(&self, frame_id: &str, loader_id: &str, name: &str) -> bool {
        name == "networkIdle" && frame_id == self.frame_id && loader_id == self.loader_id
    }
}

/// 消费 `(frame, loader, name)` 事件直到网络空闲；事件流结束说明 page 已关闭
async fn wait_for_network_idle<S>(events: S, watch: &NetworkIdleWatch) -> Result<()>
where
    S: Stream<Item = (String, String, String)>,
{
    futures::pin_mut!(events);
    while let Some((frame_id, loader_id, name)) = events.next().await {
        if watch.is_idle(&frame_id, &loader_id, &name) {
            return Ok(());
        }
    }
    bail!("页面在网络空闲前关闭")
}

#[async_trait]
impl PageRenderer for BrowserRenderer {
    async fn render_text(&self, url: &str) -> Result<String> {
        info!("🌐 正在渲染页面: {}", url);

        let page = {
            let browser = self.browser.lock().await;
            browser
                .new_page("about:blank")
                .await
                .map_err(|e| AppError::render_failed(url, e))?
        };
        let executor = JsExecutor::new(page);

        let outcome = tokio::time::timeout(
            self.render_timeout,
            self.load_visible_text(&executor, url),
        )
        .await;

        // 成功失败都要释放 page
        if let Err(e) = executor.close().await {
            warn!("关闭页面失败: {}", e);
        }

        match outcome {
            Ok(Ok(text)) => {
                info!("✓ 页面渲染完成 ({} 字符)", text.chars().count());
                debug!("页面文本: {}", text);
                Ok(text)
            }
            Ok(Err(e)) => {
                error!("渲染页面 {} 失败: {:#}", url, e);
                Err(AppError::render_failed(url, e).into())
            }
            Err(elapsed) => {
                error!("渲染页面 {} 超时 ({:?})", url, self.render_timeout);
                Err(AppError::render_failed(url, elapsed).into())
            }
        }
    }
}
