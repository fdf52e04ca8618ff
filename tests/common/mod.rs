//! Mock upstream completion server for integration tests

#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    fail_with: Option<StatusCode>,
    reply: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

pub struct MockUpstream {
    addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockUpstream {
    pub async fn replying(reply: &str) -> Self {
        Self::start(None, reply).await
    }

    pub async fn failing(status: StatusCode) -> Self {
        Self::start(Some(status), "").await
    }

    async fn start(fail_with: Option<StatusCode>, reply: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let state = MockState {
            fail_with,
            reply: reply.to_string(),
            calls: calls.clone(),
        };

        let app = Router::new()
            .route("/v1/chat/completions", post(mock_chat_completions))
            .with_state(state);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            calls,
            _handle: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn mock_chat_completions(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.calls.lock().unwrap().push(RecordedCall {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    if let Some(status) = state.fail_with {
        return (status, Json(json!({ "error": { "message": "mock failure" } }))).into_response();
    }

    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": "gpt-4-vision-preview",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": state.reply },
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}
