use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use quiz_chain_solver::services::HttpSubmitter;
use quiz_chain_solver::{Answer, Credentials, SubmissionPayload, Submitter};
use serde_json::{json, Value};

type Received = Arc<Mutex<Vec<Value>>>;

/// 启动一个本地的假判题服务，返回基地址
async fn spawn_checker(received: Received) -> String {
    async fn check(State(received): State<Received>, Json(body): Json<Value>) -> Json<Value> {
        received.lock().unwrap().push(body);
        Json(json!({"correct": false, "reason": "Wrong sum", "url": "https://host/q2"}))
    }

    async fn last(Json(_body): Json<Value>) -> Json<Value> {
        Json(json!({"correct": true}))
    }

    async fn broken() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "boom")
    }

    async fn garbage() -> &'static str {
        "this is not json"
    }

    async fn slow() -> Json<Value> {
        tokio::time::sleep(Duration::from_secs(3)).await;
        Json(json!({"correct": true}))
    }

    let app = Router::new()
        .route("/submit", post(check))
        .route("/last", post(last))
        .route("/broken", post(broken))
        .route("/garbage", post(garbage))
        .route("/slow", post(slow))
        .with_state(received);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn payload(answer: Answer) -> SubmissionPayload {
    SubmissionPayload::new(
        &Credentials::new("student@example.com", "s3cret"),
        "https://host/q1",
        answer,
    )
}

#[tokio::test]
async fn test_submit_sends_envelope_and_forwards_next_url() {
    let received = Received::default();
    let base = spawn_checker(received.clone()).await;
    let submitter = HttpSubmitter::new(Duration::from_secs(30)).unwrap();

    let result = submitter
        .submit(&format!("{}/submit", base), &payload(Answer::Integer(7)))
        .await
        .expect("应返回提交结果");

    assert!(!result.correct);
    assert_eq!(result.reason, "Wrong sum");
    assert_eq!(result.next_url(), Some("https://host/q2"));

    let bodies = received.lock().unwrap().clone();
    assert_eq!(
        bodies,
        vec![json!({
            "email": "student@example.com",
            "secret": "s3cret",
            "url": "https://host/q1",
            "answer": 7
        })]
    );
}

#[tokio::test]
async fn test_missing_fields_use_defaults() {
    let base = spawn_checker(Received::default()).await;
    let submitter = HttpSubmitter::new(Duration::from_secs(30)).unwrap();

    let result = submitter
        .submit(&format!("{}/last", base), &payload(Answer::Text("Paris".into())))
        .await
        .unwrap();

    assert!(result.correct);
    assert_eq!(result.reason, "");
    assert_eq!(result.next_url(), None);
}

#[tokio::test]
async fn test_non_success_status_returns_none() {
    let base = spawn_checker(Received::default()).await;
    let submitter = HttpSubmitter::new(Duration::from_secs(30)).unwrap();

    let result = submitter
        .submit(&format!("{}/broken", base), &payload(Answer::Integer(1)))
        .await;

    assert!(result.is_none());
}

#[tokio::test]
async fn test_unparsable_body_returns_none() {
    let base = spawn_checker(Received::default()).await;
    let submitter = HttpSubmitter::new(Duration::from_secs(30)).unwrap();

    let result = submitter
        .submit(&format!("{}/garbage", base), &payload(Answer::Integer(1)))
        .await;

    assert!(result.is_none());
}

#[tokio::test]
async fn test_timeout_returns_none() {
    let base = spawn_checker(Received::default()).await;
    let submitter = HttpSubmitter::new(Duration::from_millis(200)).unwrap();

    let result = submitter
        .submit(&format!("{}/slow", base), &payload(Answer::Integer(1)))
        .await;

    assert!(result.is_none());
}

#[tokio::test]
async fn test_unreachable_endpoint_returns_none() {
    // 绑定后立即释放，得到一个无人监听的端口
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let submitter = HttpSubmitter::new(Duration::from_secs(5)).unwrap();
    let result = submitter
        .submit(&format!("http://{}/submit", addr), &payload(Answer::Integer(1)))
        .await;

    assert!(result.is_none());
}
