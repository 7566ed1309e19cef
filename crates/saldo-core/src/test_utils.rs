//! Test utilities for saldo-core
//!
//! Provides a mock OpenAI-compatible server so the advisory client can be
//! exercised over real HTTP without an API credential.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Mock OpenAI chat-completions server for testing
pub struct MockAdvisorServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockAdvisorServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        Self::start_failing_for(&[]).await
    }

    /// Start a mock server that returns HTTP 500 for completion requests
    /// whose prompt embeds one of the given totals, and a canned
    /// completion otherwise.
    pub async fn start_failing_for(totals: &[i64]) -> Self {
        let fail: Arc<HashSet<i64>> = Arc::new(totals.iter().copied().collect());

        let app = Router::new()
            .route("/v1/chat/completions", post(handle_chat))
            .route("/v1/models", get(handle_models))
            .with_state(fail);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockAdvisorServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Models listing endpoint (health check)
async fn handle_models() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "object": "list",
        "data": [{"id": "gpt-3.5-turbo", "object": "model"}]
    }))
}

/// Chat completions endpoint
///
/// Rejects unauthenticated requests like the real API does, so a missing
/// credential behaves the same against the mock.
async fn handle_chat(
    State(fail): State<Arc<HashSet<i64>>>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Response {
    if !headers.contains_key("authorization") {
        return (StatusCode::UNAUTHORIZED, "missing API key").into_response();
    }

    let user_prompt = request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.as_str())
        .unwrap_or_default();

    let total = extract_total(user_prompt);

    if let Some(total) = total {
        if fail.contains(&total) {
            return (StatusCode::INTERNAL_SERVER_ERROR, "mock quota exceeded").into_response();
        }
    }

    Json(ChatResponse {
        choices: vec![ChatChoice {
            message: ChatResponseMessage {
                role: "assistant".to_string(),
                content: format!(
                    "Consejo de prueba para un saldo de {}.",
                    total.unwrap_or_default()
                ),
            },
        }],
    })
    .into_response()
}

/// Pull the embedded total back out of the fixed prompt template
fn extract_total(prompt: &str) -> Option<i64> {
    let rest = &prompt[prompt.find("cash flow of ")? + "cash flow of ".len()..];
    let token: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    token.parse().ok()
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[allow(dead_code)]
    model: String,
    messages: Vec<ChatRequestMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatRequestMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Serialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Serialize)]
struct ChatResponseMessage {
    role: String,
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_total() {
        assert_eq!(
            extract_total("I have a projected cash flow of 1500 for next month."),
            Some(1500)
        );
        assert_eq!(
            extract_total("I have a projected cash flow of -50 for next month."),
            Some(-50)
        );
        assert_eq!(extract_total("no total here"), None);
    }
}
