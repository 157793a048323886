//! OpenAI-compatible chat completions backend
//!
//! Works against any gateway exposing `POST {api_base}/chat/completions`
//! (OpenAI, DeepSeek, SiliconFlow and similar). Requests are blocking; the
//! per-request timeout comes from [`OpenAiConfig::timeout_secs`].

use crate::{
    error::ConfigError,
    generator::{GenerationError, Generator},
};
use serde::{Deserialize, Serialize};
use std::{env, time::Duration};

/// Longest slice of an error body kept in error messages
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Backend settings, usually read from the `[generation]` config section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Base URL without the `/chat/completions` suffix
    pub api_base: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// API key; falls back to the environment variable named by `api_key_env`
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Optional completion length limit
    pub max_tokens: Option<u32>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
            max_tokens: None,
        }
    }
}

impl OpenAiConfig {
    /// API key from the config, else from the environment
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.to_string());
        }

        env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey {
                env_var: self.api_key_env.clone(),
            })
    }

    /// Full chat completions endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    /// Check values that would make every request fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("generation model is empty".to_string()));
        }
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Generator backed by an OpenAI-compatible HTTP API
#[derive(Debug)]
pub struct OpenAiGenerator {
    client: reqwest::blocking::Client,
    config: OpenAiConfig,
    api_key: String,
}

impl OpenAiGenerator {
    /// Build a generator, resolving the API key up front
    pub fn new(config: OpenAiConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let api_key = config.resolve_api_key()?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Backend settings
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn request_body<'a>(&'a self, prompt: &'a str, context: &'a str) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if !context.trim().is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: context,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages,
            max_tokens: self.config.max_tokens,
        }
    }
}

impl Generator for OpenAiGenerator {
    fn generate(&self, prompt: &str, context: &str) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt, context))
            .send()
            .map_err(classify_transport)?;

        let status = response.status().as_u16();
        let body = response.text().map_err(classify_transport)?;

        if !(200..300).contains(&status) {
            return Err(classify_status(status, &body));
        }

        parse_completion(&body)
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

/// Map a non-success HTTP status to a generation error
pub fn classify_status(status: u16, body: &str) -> GenerationError {
    let message = format!("HTTP {status}: {}", truncate(body.trim()));
    match status {
        408 | 429 | 500..=599 => GenerationError::Transient(message),
        _ => GenerationError::Permanent(message),
    }
}

fn classify_transport(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
        GenerationError::Transient(err.to_string())
    } else {
        GenerationError::Permanent(err.to_string())
    }
}

/// Extract the first choice's content from a chat completions body
pub fn parse_completion(body: &str) -> Result<String, GenerationError> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
        GenerationError::Permanent(format!("malformed completion response: {e}"))
    })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| GenerationError::Permanent("completion response has no content".to_string()))
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
