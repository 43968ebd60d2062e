//! Chat-completion client.
//!
//! Sends one system+user prompt pair to an OpenAI-compatible
//! `/v1/chat/completions` endpoint and returns the reply text plus token
//! usage. Also hosts the tolerant JSON extraction for model replies that
//! ignore the "no markdown" instruction.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Configuration for the chat client.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model_name: String,
    pub temperature: f32,
    pub max_tokens: usize,
    pub timeout_seconds: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_string(),
            api_key: None,
            model_name: "gpt-4o".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Token accounting returned by the API.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Reply text plus metrics for one completion call.
#[derive(Debug)]
pub struct ChatOutcome {
    pub content: String,
    pub usage: Option<ChatUsage>,
    pub elapsed_seconds: f64,
}

/// Client for one chat-completion endpoint.
pub struct ChatClient {
    config: ChatConfig,
    http_client: reqwest::Client,
}

impl ChatClient {
    /// Create a client from the given configuration.
    pub fn new(config: ChatConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Send one system+user prompt pair and return the reply.
    pub async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<ChatOutcome> {
        let url = format!("{}/v1/chat/completions", self.config.api_url.trim_end_matches('/'));

        let request = ChatRequest {
            model: self.config.model_name.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(
            "Sending completion request to {} (model {}, {} prompt chars)",
            url,
            self.config.model_name,
            user_prompt.len()
        );

        let start = Instant::now();
        let mut builder = self.http_client.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                anyhow::anyhow!(
                    "Model request timed out after {}s",
                    self.config.timeout_seconds
                )
            } else if e.is_connect() {
                anyhow::anyhow!("Cannot connect to the model API at {}", self.config.api_url)
            } else {
                anyhow::anyhow!("Failed to send model request: {}", e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Model API error {}: {}", status, body));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse model response")?;
        let elapsed_seconds = start.elapsed().as_secs_f64();

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .context("Model response contained no choices")?;

        if let Some(usage) = chat_response.usage {
            info!(
                "Tokens used: prompt={}, completion={}, total={}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }
        info!("Model responded in {:.2}s", elapsed_seconds);

        Ok(ChatOutcome {
            content,
            usage: chat_response.usage,
            elapsed_seconds,
        })
    }
}

/// Parse the JSON payload of a model reply into `T`.
///
/// Models are asked for raw JSON but occasionally wrap it in markdown
/// fences or prefix it with prose; this strips fences and falls back to the
/// outermost `{...}` span before giving up.
pub fn parse_json_reply<T: DeserializeOwned>(reply: &str) -> Result<T> {
    let trimmed = reply.trim();

    if let Ok(value) = serde_json::from_str::<T>(trimmed) {
        return Ok(value);
    }

    let unfenced = strip_fences(trimmed);
    if let Ok(value) = serde_json::from_str::<T>(unfenced) {
        warn!("Model reply was fenced despite instructions; stripped the fence");
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (unfenced.find('{'), unfenced.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<T>(&unfenced[start..=end]) {
                warn!("Model reply mixed prose with JSON; extracted the JSON object");
                return Ok(value);
            }
        }
    }

    Err(anyhow::anyhow!("Model reply is not valid JSON"))
}

/// Strip a leading/trailing ``` fence (with optional `json` tag).
fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start_matches(['\r', '\n']);
    rest.strip_suffix("```").map_or(rest, str::trim_end)
}
