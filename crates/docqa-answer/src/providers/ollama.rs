use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use docqa_core::config::GenerationConfig;
use docqa_core::traits::Generator;

use super::endpoint_url;

/// Non-streaming client for an Ollama server's `/api/generate`.
pub struct OllamaGenerator {
    url: String,
    model: String,
    temperature: f32,
    client: Client,
}

impl OllamaGenerator {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build Ollama HTTP client")?;
        Ok(Self {
            url: endpoint_url(&config.endpoint, "api/generate"),
            model: config.model.clone(),
            temperature: config.temperature,
            client,
        })
    }
}

impl Generator for OllamaGenerator {
    fn name(&self) -> &str {
        "ollama"
    }

    fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions { temperature: self.temperature, num_predict: max_tokens },
        };
        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .with_context(|| format!("failed to call {}", self.url))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_else(|_| "<body unavailable>".to_string());
            bail!("Ollama returned {}: {}", status, text);
        }
        let parsed: GenerateResponse = resp.json().context("failed to parse Ollama response")?;
        Ok(parsed.response)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: usize,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}
