//! LLM client: the single point of entry for all oracle calls.
//!
//! ARCHITECTURAL RULE: no other module talks to a text-generation backend
//! directly. Callers hold an `Arc<dyn Oracle>` built once at startup and go
//! through `ask()` + `parse_lenient()`, which turn every failure mode
//! (transport, status, timeout, malformed JSON) into `None`.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{Config, OracleProvider};

pub mod coerce;
pub mod prompts;

use prompts::JSON_ONLY_SYSTEM;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Model used when the Anthropic backend is selected.
pub const ANTHROPIC_MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 2048;
const MAX_RETRIES: u32 = 3;
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A text-generation backend. Output is untrusted free text.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Builds the configured oracle. Called once at startup; the result is shared read-only.
pub fn build_oracle(config: &Config) -> Result<Arc<dyn Oracle>, LlmError> {
    match config.oracle_provider {
        OracleProvider::Anthropic => {
            let key = config.anthropic_api_key.clone().unwrap_or_default();
            Ok(Arc::new(AnthropicClient::new(key)?))
        }
        OracleProvider::Ollama => Ok(Arc::new(OllamaClient::new(
            config.ollama_url.clone(),
            config.ollama_model.clone(),
        )?)),
    }
}

/// Calls the oracle under a request-level timeout.
///
/// Transport errors and timeouts are logged and collapse to `None`, the same
/// outcome as unparseable output.
pub async fn ask(oracle: &dyn Oracle, prompt: &str, timeout: Duration) -> Option<String> {
    match tokio::time::timeout(timeout, oracle.generate(prompt)).await {
        Ok(Ok(text)) => Some(text),
        Ok(Err(e)) => {
            warn!("Oracle call failed, degrading: {e}");
            None
        }
        Err(_) => {
            warn!("Oracle call timed out after {}s, degrading", timeout.as_secs());
            None
        }
    }
}

/// Strips code fences and deserializes oracle output, `None` on any failure.
pub fn parse_lenient<T: DeserializeOwned>(text: &str) -> Option<T> {
    let cleaned = strip_json_fences(text);
    match serde_json::from_str(cleaned) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Oracle output is not the expected JSON shape: {e}");
            None
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let unfenced = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```JSON"))
        .or_else(|| text.strip_prefix("```"));

    match unfenced {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim()),
        None => text.strip_suffix("```").map(|s| s.trim()).unwrap_or(text),
    }
}

fn http_client() -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(HTTP_TIMEOUT).build()?)
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic Messages API
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicResponse {
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Oracle backed by the Anthropic Messages API, with retry on 429 and 5xx.
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client()?,
            api_key,
        })
    }
}

#[async_trait]
impl Oracle for AnthropicClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = AnthropicRequest {
            model: ANTHROPIC_MODEL,
            max_tokens: MAX_TOKENS,
            system: JSON_ONLY_SYSTEM,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Oracle attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Anthropic API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: AnthropicResponse = response.json().await?;
            debug!(
                "Oracle call succeeded: input_tokens={}, output_tokens={}",
                parsed.usage.input_tokens, parsed.usage.output_tokens
            );

            return parsed
                .text()
                .map(str::to_string)
                .ok_or(LlmError::EmptyContent);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ollama (local generation server)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

/// Oracle backed by a local Ollama server (`POST /api/generate`, non-streaming).
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }
}

#[async_trait]
impl Oracle for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = OllamaRequest {
            model: &self.model,
            system: JSON_ONLY_SYSTEM,
            prompt,
            stream: false,
            options: OllamaOptions { temperature: 0.2 },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let parsed: OllamaResponse = response.json().await?;
        if parsed.response.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        debug!(model = %self.model, chars = parsed.response.len(), "Oracle call succeeded");
        Ok(parsed.response)
    }
}
