//! 应用入口 - 编排层
//!
//! 1. **初始化**：启动浏览器、创建 LLM 服务和提交客户端
//! 2. **运行**：启动入站 HTTP 服务，每个合法请求在后台启动一条解题链
//! 3. **清理**：收到 Ctrl-C 后停止服务并关闭浏览器

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::api::{self, ChainDispatcher};
use crate::config::Config;
use crate::infrastructure::BrowserRenderer;
use crate::models::Credentials;
use crate::orchestrator::ChainRunner;
use crate::services::{HttpSubmitter, LlmService};
use crate::utils::logging::log_startup;
use crate::workflow::QuestionFlow;

/// 在后台启动解题链
pub struct ChainLauncher {
    flow: Arc<QuestionFlow>,
    total_timeout: Duration,
}

impl ChainLauncher {
    pub fn new(flow: Arc<QuestionFlow>, total_timeout: Duration) -> Self {
        Self {
            flow,
            total_timeout,
        }
    }
}

impl ChainDispatcher for ChainLauncher {
    fn dispatch(&self, credentials: Credentials, start_url: String) {
        let mut runner = ChainRunner::new(self.flow.clone(), credentials, self.total_timeout);
        tokio::spawn(async move {
            runner.run(&start_url).await;
        });
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    renderer: Arc<BrowserRenderer>,
    flow: Arc<QuestionFlow>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let renderer = Arc::new(BrowserRenderer::start(&config).await?);
        let oracle = Arc::new(LlmService::new(&config));
        let submitter = Arc::new(HttpSubmitter::new(config.submit_timeout())?);
        let flow = Arc::new(QuestionFlow::new(renderer.clone(), oracle, submitter)?);

        Ok(Self {
            config,
            renderer,
            flow,
        })
    }

    /// 运行入站服务，直到收到 Ctrl-C
    pub async fn run(self) -> Result<()> {
        let dispatcher = Arc::new(ChainLauncher::new(
            self.flow.clone(),
            self.config.total_timeout(),
        ));
        let expected = Credentials::new(&self.config.email, &self.config.secret);
        let router = api::create_router(expected, dispatcher);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr()).await?;
        info!("🌐 服务监听于 {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
            .await?;

        self.renderer.shutdown().await
    }
}

/// 等待退出信号；信号注册失败时记录原因并立即返回
async fn shutdown_signal(signal: impl Future<Output = io::Result<()>>) {
    match signal.await {
        Ok(()) => info!("收到退出信号"),
        Err(e) => warn!("无法监听退出信号，服务将立即停止: {}", e),
    }
}
