//! OpenAI chat-completions backend
//!
//! Works with api.openai.com and any server implementing the OpenAI
//! `/v1/chat/completions` API (the test suite points it at a local mock).
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_API_KEY`: API credential (optional at startup; a missing key
//!   surfaces as the first call failing)
//! - `OPENAI_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_BASE_URL`: Server URL (default: https://api.openai.com)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::AdvisorBackend;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Fixed advisor persona sent as the system message.
const SYSTEM_PROMPT: &str = "You are a financial advisor. in spanish, ";

/// OpenAI-backed advisor
///
/// Sends the fixed Spanish financial-advisor persona plus a prompt
/// template embedding the card's outstanding total.
#[derive(Clone)]
pub struct OpenAiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiBackend {
    /// Create a new backend without a credential
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            ..Self::new(base_url, model)
        }
    }

    /// Create from environment variables
    ///
    /// The credential is read once here and deliberately not validated.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let mut backend = Self::new(&base_url, &model);
        backend.api_key = std::env::var("OPENAI_API_KEY").ok();
        backend
    }

    /// Fixed prompt template embedding the outstanding total.
    fn user_prompt(total: i64) -> String {
        format!(
            "I have a projected cash flow of {} for next month. What should I do with the extra money? \
             recomienda comprar algun libro con nombre y autor de autoayuda o motivacional",
            total
        )
    }

    /// Make a chat completion request
    async fn chat_completion(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: 0.7,
            max_tokens: 150,
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::InvalidData("No response from OpenAI API".into()))
    }
}

#[async_trait]
impl AdvisorBackend for OpenAiBackend {
    async fn advise(&self, total: i64) -> Result<String> {
        self.chat_completion(SYSTEM_PROMPT, &Self::user_prompt(total))
            .await
    }

    async fn health_check(&self) -> bool {
        let mut req = self
            .http_client
            .get(format!("{}/v1/models", self.base_url));
        if let Some(ref api_key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }
        match req.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}
