//! Pluggable advisory backend abstraction
//!
//! Each card summary gets a short natural-language suggestion from a
//! text-generation service. The call is best-effort: the numeric
//! aggregates are the primary value, so any failure is logged and the
//! fixed fallback text is substituted instead of failing the request.
//!
//! # Architecture
//!
//! - `AdvisorBackend` trait: defines the interface for advisory operations
//! - `AdvisorClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAiBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `ADVISOR_BACKEND`: Backend to use (openai, mock). Default: openai
//! - `OPENAI_API_KEY`: API credential (read once at startup, not validated)
//! - `OPENAI_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_BASE_URL`: Server URL (default: https://api.openai.com)

mod mock;
mod openai;

pub use mock::MockBackend;
pub use openai::OpenAiBackend;

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;
use crate::models::CardSummary;

/// Fallback advisory text substituted when the external call fails.
pub const FALLBACK_ADVICE: &str = "No se pudo obtener un consejo en este momento.";

/// Trait defining the interface for advisory backends
#[async_trait]
pub trait AdvisorBackend: Send + Sync {
    /// Produce a short advisory string for a card's outstanding total
    async fn advise(&self, total: i64) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete advisor client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AdvisorClient {
    /// OpenAI chat-completions backend
    OpenAi(OpenAiBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AdvisorClient {
    /// Create an advisor client from environment variables.
    ///
    /// The OpenAI credential is read here but deliberately not validated:
    /// a missing key is discovered when the first call fails, and that
    /// failure only costs the advisory text, never the aggregates.
    pub fn from_env() -> Self {
        let backend = std::env::var("ADVISOR_BACKEND").unwrap_or_else(|_| "openai".to_string());

        match backend.to_lowercase().as_str() {
            "openai" => AdvisorClient::OpenAi(OpenAiBackend::from_env()),
            "mock" => AdvisorClient::Mock(MockBackend::new()),
            _ => {
                warn!(backend = %backend, "Unknown ADVISOR_BACKEND, falling back to openai");
                AdvisorClient::OpenAi(OpenAiBackend::from_env())
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AdvisorClient::Mock(MockBackend::new())
    }
}

// Implement AdvisorBackend for AdvisorClient by delegating to the inner backend
#[async_trait]
impl AdvisorBackend for AdvisorClient {
    async fn advise(&self, total: i64) -> Result<String> {
        match self {
            AdvisorClient::OpenAi(b) => b.advise(total).await,
            AdvisorClient::Mock(b) => b.advise(total).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AdvisorClient::OpenAi(b) => b.health_check().await,
            AdvisorClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AdvisorClient::OpenAi(b) => b.model(),
            AdvisorClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AdvisorClient::OpenAi(b) => b.host(),
            AdvisorClient::Mock(b) => b.host(),
        }
    }
}

/// Attach advisory text to each summary, one sequential call per card.
///
/// A failed call substitutes [`FALLBACK_ADVICE`] and continues with the
/// remaining cards; advisory failures never propagate to the caller.
pub async fn annotate_summaries(client: &AdvisorClient, summaries: &mut [CardSummary]) {
    for summary in summaries.iter_mut() {
        summary.consejo = match client.advise(summary.suma_total_restante).await {
            Ok(text) => text,
            Err(e) => {
                warn!(tarjeta = %summary.tarjeta, error = %e, "Advisory call failed, using fallback");
                FALLBACK_ADVICE.to_string()
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockAdvisorServer;

    fn summary(tarjeta: &str, total: i64) -> CardSummary {
        CardSummary {
            tarjeta: tarjeta.to_string(),
            datos: vec![],
            suma_total_restante: total,
            consejo: String::new(),
        }
    }

    #[test]
    fn test_advisor_client_mock() {
        let client = AdvisorClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AdvisorClient::mock();
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_annotate_with_mock_backend() {
        let client = AdvisorClient::mock();
        let mut summaries = vec![summary("XXXX-1111", 1500)];

        annotate_summaries(&client, &mut summaries).await;

        assert!(summaries[0].consejo.contains("1500"));
    }

    #[tokio::test]
    async fn test_annotate_substitutes_fallback_on_failure() {
        let client = AdvisorClient::Mock(MockBackend::failing());
        let mut summaries = vec![summary("XXXX-1111", 1500), summary("XXXX-2222", 2600)];

        annotate_summaries(&client, &mut summaries).await;

        assert_eq!(summaries[0].consejo, FALLBACK_ADVICE);
        assert_eq!(summaries[1].consejo, FALLBACK_ADVICE);
    }

    #[tokio::test]
    async fn test_openai_backend_against_mock_server() {
        let server = MockAdvisorServer::start().await;
        let backend = OpenAiBackend::with_api_key(&server.url(), "gpt-3.5-turbo", "test-key");

        let advice = backend.advise(1234).await.unwrap();
        assert!(advice.contains("1234"));
        assert!(backend.health_check().await);
    }

    #[tokio::test]
    async fn test_failure_isolation_between_cards() {
        // The server rejects the call for card A's total only; card B
        // still gets generated advice and both stay in first-seen order.
        let server = MockAdvisorServer::start_failing_for(&[1500]).await;
        let client = AdvisorClient::OpenAi(OpenAiBackend::with_api_key(
            &server.url(),
            "gpt-3.5-turbo",
            "test-key",
        ));

        let mut summaries = vec![summary("XXXX-1111", 1500), summary("XXXX-2222", 2600)];
        annotate_summaries(&client, &mut summaries).await;

        assert_eq!(summaries[0].tarjeta, "XXXX-1111");
        assert_eq!(summaries[0].consejo, FALLBACK_ADVICE);
        assert_eq!(summaries[1].tarjeta, "XXXX-2222");
        assert!(summaries[1].consejo.contains("2600"));
    }

    #[tokio::test]
    async fn test_missing_credential_fails_the_call_not_the_run() {
        let server = MockAdvisorServer::start().await;
        // No API key: the mock server rejects unauthenticated requests,
        // mirroring a credential left unset in the environment.
        let backend = OpenAiBackend::new(&server.url(), "gpt-3.5-turbo");
        let client = AdvisorClient::OpenAi(backend);

        let mut summaries = vec![summary("XXXX-1111", 100)];
        annotate_summaries(&client, &mut summaries).await;

        assert_eq!(summaries[0].consejo, FALLBACK_ADVICE);
    }
}
