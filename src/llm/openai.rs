//! OpenAI API client implementation
//!
//! This module implements the LlmClient trait for the OpenAI
//! chat-completions API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::error::{PipelinrError, Result};
use crate::llm::client::{CompletionRequest, CompletionResponse, LlmClient, Usage};

/// OpenAI chat-completions URL
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model to use
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default max tokens
const DEFAULT_MAX_TOKENS: u32 = 500;

/// Default sampling temperature
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Configuration for the OpenAI client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
    pub api_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(300),
            api_url: OPENAI_API_URL.to_string(),
        }
    }
}

impl OpenAiConfig {
    /// Create a new config with a specific model
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Build from the crate-level LLM config section
    pub fn from_llm_config(config: &crate::config::LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: Duration::from_millis(config.timeout_ms),
            api_url: config.api_base.clone().unwrap_or_else(|| OPENAI_API_URL.to_string()),
        }
    }
}

/// OpenAI API client
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    config: OpenAiConfig,
    usage: Arc<Mutex<Usage>>,
}

impl OpenAiClient {
    /// Create a new OpenAI client
    ///
    /// Reads OPENAI_API_KEY from environment
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let api_key =
            std::env::var("OPENAI_API_KEY").map_err(|_| PipelinrError::Llm("OPENAI_API_KEY not set".to_string()))?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: String, config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PipelinrError::Llm(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            config,
            usage: Arc::new(Mutex::new(Usage::default())),
        })
    }

    /// Build the request body for the chat-completions API
    fn build_request(&self, request: &CompletionRequest) -> Value {
        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let max_tokens = request.max_tokens.unwrap_or(self.config.max_tokens);
        let temperature = request.temperature.unwrap_or(self.config.temperature);

        let mut messages: Vec<Value> = Vec::with_capacity(request.messages.len() + 1);
        if !request.system.is_empty() {
            messages.push(json!({"role": "system", "content": request.system}));
        }
        for m in &request.messages {
            messages.push(json!({"role": m.role, "content": m.content}));
        }

        json!({
            "model": model,
            "messages": messages,
            "max_tokens": max_tokens,
            "temperature": temperature
        })
    }

    /// Parse the API response into a CompletionResponse
    fn parse_response(&self, body: Value) -> Result<CompletionResponse> {
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| PipelinrError::Llm("No completion content in response".to_string()))?
            .to_string();

        let usage = if let Some(u) = body.get("usage") {
            Usage::new(
                u["prompt_tokens"].as_u64().unwrap_or(0),
                u["completion_tokens"].as_u64().unwrap_or(0),
            )
        } else {
            Usage::default()
        };

        // Track cumulative usage
        {
            let mut total = self.usage.lock().unwrap();
            total.add(&usage);
        }

        Ok(CompletionResponse { content, usage })
    }

    /// Send a request to the OpenAI API
    async fn send_request(&self, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelinrError::Llm(format!("Request failed: {}", e)))?;

        let status = response.status();

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(PipelinrError::Llm(format!(
                "Rate limited, retry after {} seconds",
                retry_after
            )));
        }

        // Handle other errors
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelinrError::Llm(format!("API error {}: {}", status, error_body)));
        }

        response
            .json()
            .await
            .map_err(|e| PipelinrError::Llm(format!("Failed to parse response: {}", e)))
    }

    /// Get cumulative token usage
    pub fn total_usage(&self) -> Usage {
        self.usage.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = self.build_request(&request);
        let response = self.send_request(body).await?;
        self.parse_response(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.config.model)
            .field("max_tokens", &self.config.max_tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OpenAiConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.api_url, OPENAI_API_URL);
    }

    #[test]
    fn test_config_with_model() {
        let config = OpenAiConfig::with_model("gpt-4");
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_config_from_llm_config() {
        let mut llm = crate::config::LlmConfig::default();
        llm.model = "gpt-4".to_string();
        llm.api_base = Some("http://localhost:8080/v1/chat/completions".to_string());

        let config = OpenAiConfig::from_llm_config(&llm);
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.api_url, "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.max_tokens, 500);
    }

    #[test]
    fn test_client_with_api_key() {
        let client = OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();
        assert!(client.is_ready());
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_empty_api_key_not_ready() {
        let client = OpenAiClient::with_api_key(String::new(), OpenAiConfig::default()).unwrap();
        assert!(!client.is_ready());
    }

    #[test]
    fn test_build_request_basic() {
        let client = OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();

        let request = CompletionRequest::new("You are helpful").with_user_message("Hello");
        let body = client.build_request(&request);

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], DEFAULT_MAX_TOKENS);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are helpful");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Hello");
    }

    #[test]
    fn test_build_request_without_system() {
        let client = OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();

        let request = CompletionRequest::default().with_user_message("Hello");
        let body = client.build_request(&request);

        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn test_build_request_custom_model() {
        let client = OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();

        let request = CompletionRequest::new("ctx").with_user_message("Hello").with_model("gpt-4o");
        let body = client.build_request(&request);

        assert_eq!(body["model"], "gpt-4o");
    }

    #[test]
    fn test_parse_response() {
        let client = OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();

        let api_response = json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Hello there!" } }
            ],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
        });

        let response = client.parse_response(api_response).unwrap();
        assert_eq!(response.content, "Hello there!");
        assert_eq!(response.usage, Usage::new(10, 5));
    }

    #[test]
    fn test_parse_response_without_content_is_error() {
        let client = OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();

        let api_response = json!({ "choices": [] });
        assert!(client.parse_response(api_response).is_err());
    }

    #[test]
    fn test_total_usage_accumulation() {
        let client = OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();

        let _ = client.parse_response(json!({
            "choices": [{ "message": { "content": "a" } }],
            "usage": { "prompt_tokens": 100, "completion_tokens": 50 }
        }));
        let _ = client.parse_response(json!({
            "choices": [{ "message": { "content": "b" } }],
            "usage": { "prompt_tokens": 200, "completion_tokens": 100 }
        }));

        assert_eq!(client.total_usage(), Usage::new(300, 150));
    }

    #[test]
    fn test_debug_impl_hides_key() {
        let client = OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();

        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("OpenAiClient"));
        assert!(debug_str.contains(DEFAULT_MODEL));
        assert!(!debug_str.contains("test-key"));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OpenAiClient>();
    }
}
