use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use docqa_core::config::GenerationConfig;
use docqa_core::traits::Generator;

use super::endpoint_url;

const SYSTEM_PROMPT: &str = "You answer questions using only the documents in the user's message.";

/// Client for any OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct OpenAiGenerator {
    api_key: String,
    url: String,
    model: String,
    temperature: f32,
    client: Client,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, endpoint: &str, model: String, temperature: f32, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build OpenAI HTTP client")?;
        Ok(Self { api_key, url: endpoint_url(endpoint, "v1/chat/completions"), model, temperature, client })
    }

    /// Reads the API key from the env var named by `api_key_env`.
    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| anyhow!("{} is not set", config.api_key_env))?;
        Self::new(
            api_key,
            &config.endpoint,
            config.model.clone(),
            config.temperature,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

impl Generator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", self.api_key.trim());
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&auth).context("invalid OpenAI API key")?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            max_tokens,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: prompt },
            ],
        };
        let resp = self
            .client
            .post(&self.url)
            .headers(headers)
            .json(&body)
            .send()
            .context("failed to call chat completions")?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_else(|_| "<body unavailable>".to_string());
            bail!("chat completions returned {}: {}", status, text);
        }
        let parsed: ChatResponse = resp.json().context("failed to parse chat completions response")?;
        first_choice(parsed)
    }
}

fn first_choice(parsed: ChatResponse) -> Result<String> {
    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| anyhow!("chat completions returned no choices"))
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: usize,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}
