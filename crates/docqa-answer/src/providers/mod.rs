use anyhow::Result;

use docqa_core::config::{GenerationBackend, GenerationConfig};
use docqa_core::traits::Generator;

mod ollama;
mod openai;

pub use ollama::OllamaGenerator;
pub use openai::OpenAiGenerator;

/// Generator for the configured backend.
pub fn build_generator(config: &GenerationConfig) -> Result<Box<dyn Generator>> {
    Ok(match config.backend {
        GenerationBackend::Ollama => Box::new(OllamaGenerator::new(config)?),
        GenerationBackend::OpenAi => Box::new(OpenAiGenerator::from_config(config)?),
    })
}

fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
