//! OpenAI-compatible chat completions backend.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use wordwise_core::traits::{
    build_blurb_prompt, clean_generated_text, BlurbRequest, GeneratedText, TextGenerator,
    DEFAULT_SYSTEM_PROMPT,
};

use crate::error::GeneratorError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Blurbs are a few dozen words at most.
const MAX_TOKENS: u32 = 256;

/// Blurb generator backed by an OpenAI-compatible API.
pub struct OpenAiGenerator {
    api_key: String,
    base_url: String,
    model: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OpenAiGenerator {
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        model: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, GeneratorError> {
        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GeneratorError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_secs,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self, request), fields(model = %self.model, length = request.length))]
    async fn generate(&self, request: &BlurbRequest) -> anyhow::Result<GeneratedText> {
        let start = Instant::now();

        let body = ChatRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: 0.7,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: DEFAULT_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_blurb_prompt(request),
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout(self.timeout_secs)
                } else {
                    GeneratorError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(GeneratorError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            return Err(GeneratorError::ModelNotFound(self.model.clone()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let api_response: ChatResponse = response.json().await.map_err(|e| GeneratorError::ApiError {
            status,
            message: format!("failed to parse response: {e}"),
        })?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        let text = clean_generated_text(&content);
        if text.is_empty() {
            return Err(GeneratorError::EmptyResponse(self.name().to_string()).into());
        }

        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(latency_ms, "blurb generated");

        Ok(GeneratedText {
            text,
            model: api_response.model.unwrap_or_else(|| self.model.clone()),
            latency_ms,
        })
    }
}
