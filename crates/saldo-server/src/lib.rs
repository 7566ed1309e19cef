//! Saldo Web Server
//!
//! Axum-based upload API for the saldo installment-statement service.
//! One endpoint receives a statement workbook, aggregates it per card and
//! returns the annotated summaries; aggregation state is request-scoped
//! and discarded with the response.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use saldo_core::advisor::{AdvisorBackend, AdvisorClient};

mod handlers;

#[cfg(test)]
mod tests;

/// Maximum statement upload size (10 MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Shared application state
pub struct AppState {
    pub advisor: AdvisorClient,
}

/// Create the application router, wiring the advisor from the environment
pub fn create_router() -> Router {
    create_router_with_advisor(AdvisorClient::from_env())
}

/// Create the application router with a specific advisor (for testing)
pub fn create_router_with_advisor(advisor: AdvisorClient) -> Router {
    info!(
        "Advisor backend configured: {} (model: {})",
        advisor.host(),
        advisor.model()
    );

    let state = Arc::new(AppState { advisor });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/upload", post(handlers::upload_statement))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(host: &str, port: u16) -> anyhow::Result<()> {
    check_advisor_connection().await;

    let app = create_router();
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Log advisor backend reachability at startup.
///
/// The credential is deliberately not validated here; an unreachable or
/// unauthenticated backend only degrades advisory text to the fallback.
async fn check_advisor_connection() {
    let advisor = AdvisorClient::from_env();
    if advisor.health_check().await {
        info!(
            "Advisor backend connected: {} (model: {})",
            advisor.host(),
            advisor.model()
        );
    } else {
        warn!(
            "Advisor backend not responding: {} (model: {}) - summaries will carry fallback advice",
            advisor.host(),
            advisor.model()
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
