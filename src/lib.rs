//! # Quiz Chain Solver
//!
//! 自动完成一串网页测验题：渲染题目页面、推断答案、提交，并跟随响应中的下一题地址，
//! 全程受总时长预算约束
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - 启动或连接 Chromium
//! - `infrastructure/` - `BrowserRenderer` 持有浏览器，`JsExecutor` 持有单次渲染的 page
//!
//! ### ② 业务能力层（Services）
//! - `LlmService` - 分析题目、直接作答、生成解题代码
//! - `EndpointResolver` - 推断提交地址
//! - `AnswerSolver` - 直接作答 + 兜底
//! - `HttpSubmitter` - 提交答案并解读响应
//!
//! ### ③ 流程层（Workflow）
//! - `QuestionFlow` - 单道题：渲染 → 分析 → 提交地址 → 求解 → 提交
//!
//! ### ④ 编排层（Orchestration）
//! - `ChainRunner` - 时长预算内的解题链循环
//! - `App` - 资源生命周期与入站服务

pub mod api;
pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, ConfigError};
pub use infrastructure::{BrowserRenderer, JsExecutor, PageRenderer};
pub use models::{Analysis, Answer, Credentials, SubmissionPayload, SubmissionResult};
pub use orchestrator::{App, ChainOutcome, ChainReport, ChainRunner};
pub use services::{EndpointResolver, Oracle, Submitter};
pub use workflow::{FinishReason, QuestionCtx, QuestionFlow, QuestionOutcome};
