//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `APP_*` env vars (`__` separates nested keys, so
//! `APP_RETRIEVAL__TOP_K=5` sets `retrieval.top_k`). Provides helpers to
//! expand `~` and `${VAR}` and to resolve relative paths against a known base
//! directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::chunker::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::{DistanceMetric, DEFAULT_COLLECTION};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub collection: String,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub history: HistoryConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            history: HistoryConfig::default(),
            embedding: EmbeddingConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Neighbours fetched per question.
    pub top_k: usize,
    /// Best-match distance above which a question is declined. Calibrated
    /// against `metric`.
    pub distance_threshold: f32,
    pub metric: DistanceMetric,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3, distance_threshold: 1.5, metric: DistanceMetric::SquaredL2 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Directory holding `config.json`, `tokenizer.json` and the weights.
    pub model_dir: Option<String>,
    pub dimension: usize,
    pub max_len: usize,
    pub use_fake: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { model_dir: None, dimension: 384, max_len: 256, use_fake: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationBackend {
    Ollama,
    OpenAi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub backend: GenerationBackend,
    pub endpoint: String,
    pub model: String,
    pub max_new_tokens: usize,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Name of the env var holding the API key (OpenAI-compatible backends).
    pub api_key_env: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: GenerationBackend::Ollama,
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            max_new_tokens: 150,
            temperature: 0.7,
            timeout_secs: 120,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.collection.trim().is_empty() {
            return Err(Error::InvalidConfig("collection name must not be empty".into()));
        }
        self.chunking.validate()?;
        if self.retrieval.top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.top_k must be at least 1".into()));
        }
        let threshold = self.retrieval.distance_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "retrieval.distance_threshold must be a finite non-negative number, got {threshold}"
            )));
        }
        if self.history.capacity == 0 {
            return Err(Error::InvalidConfig("history.capacity must be at least 1".into()));
        }
        if self.embedding.dimension == 0 || self.embedding.max_len == 0 {
            return Err(Error::InvalidConfig("embedding.dimension and embedding.max_len must be positive".into()));
        }
        if self.generation.max_new_tokens == 0 {
            return Err(Error::InvalidConfig("generation.max_new_tokens must be positive".into()));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate_for_env(env_name)?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let settings = self.settings()?;
        if matches!(env, "prod" | "production") && settings.embedding.use_fake {
            return Err(anyhow::anyhow!("Prod config must not use fake embeddings"));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
