//! 入站服务
//!
//! - `GET /`：健康检查
//! - `POST /solve`：校验身份后在后台启动解题链，立即返回，不等待结果

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::models::Credentials;

const SERVICE_NAME: &str = "Quiz Solver API";

/// 启动解题链的能力
pub trait ChainDispatcher: Send + Sync {
    /// 在后台启动，不等待结果
    fn dispatch(&self, credentials: Credentials, start_url: String);
}

#[derive(Clone)]
struct ApiState {
    expected: Arc<Credentials>,
    dispatcher: Arc<dyn ChainDispatcher>,
}

/// 触发请求 `{email, secret, url}`
#[derive(Debug, Clone, Deserialize)]
pub struct SolveRequest {
    pub email: String,
    pub secret: String,
    pub url: String,
}

/// 受理回复
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

pub fn create_router(expected: Credentials, dispatcher: Arc<dyn ChainDispatcher>) -> Router {
    let state = ApiState {
        expected: Arc::new(expected),
        dispatcher,
    };

    Router::new()
        .route("/", get(health_check))
        .route("/solve", post(solve_quiz))
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "running",
        "service": SERVICE_NAME,
        "timestamp": now_iso(),
    }))
}

async fn solve_quiz(State(state): State<ApiState>, Json(request): Json<SolveRequest>) -> Response {
    info!("收到解题请求: {}", request.url);

    // 两项独立校验
    if request.secret != state.expected.secret {
        warn!("Secret 错误，邮箱: {}", request.email);
        return forbidden("Invalid secret");
    }
    if request.email != state.expected.email {
        warn!("邮箱不匹配: {}", request.email);
        return forbidden("Email does not match");
    }

    info!("✓ 身份校验通过: {}", request.email);

    let message = format!("Quiz solving started for {}", request.url);
    state
        .dispatcher
        .dispatch(Credentials::new(request.email, request.secret), request.url);

    Json(SolveResponse {
        status: "accepted".to_string(),
        message,
        timestamp: now_iso(),
    })
    .into_response()
}

fn forbidden(detail: &str) -> Response {
    (StatusCode::FORBIDDEN, Json(json!({ "detail": detail }))).into_response()
}

fn now_iso() -> String {
    chrono::Local::now().to_rfc3339()
}
