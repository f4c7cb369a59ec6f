//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行、清理）
//! - 持有浏览器渲染器，启动入站服务
//!
//! ### `chain_runner` - 解题链控制器
//! - 在时长预算内逐题处理
//! - 区分三种结束方式：完成、超时、出错
//!
//! ## 层次关系
//!
//! ```text
//! app (持有资源，接收触发)
//!     ↓
//! chain_runner (处理一条解题链)
//!     ↓
//! workflow::QuestionFlow (处理单道题)
//!     ↓
//! services (能力层：llm / resolver / solver / submit)
//!     ↓
//! infrastructure (基础设施：BrowserRenderer / JsExecutor)
//! ```

pub mod app;
pub mod chain_runner;

pub use app::{App, ChainLauncher};
pub use chain_runner::{ChainOutcome, ChainReport, ChainRunner, Session, SAFETY_MARGIN};
