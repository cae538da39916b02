use tracing::{debug, warn};

use docqa_core::traits::Generator;
use docqa_core::types::{Chunk, Personality};
use docqa_core::{Error, Result};

use crate::prompt::build_prompt;

pub const DEFAULT_MAX_NEW_TOKENS: usize = 150;

/// Turns a question plus gated context into an answer with an external
/// generator. Only meant for results the relevance gate accepted.
pub struct Synthesizer {
    generator: Box<dyn Generator>,
    max_new_tokens: usize,
}

impl Synthesizer {
    pub fn new(generator: Box<dyn Generator>) -> Self {
        Self { generator, max_new_tokens: DEFAULT_MAX_NEW_TOKENS }
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: usize) -> Self {
        self.max_new_tokens = max_new_tokens.max(1);
        self
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub fn max_new_tokens(&self) -> usize {
        self.max_new_tokens
    }

    pub fn synthesize(&self, question: &str, context: &[Chunk], personality: &Personality) -> Result<String> {
        let prompt = build_prompt(question, context, personality);
        debug!(generator = self.generator.name(), chunks = context.len(), prompt_chars = prompt.len(), "generating answer");
        let raw = self.generator.generate(&prompt, self.max_new_tokens).map_err(|e| {
            warn!(generator = self.generator.name(), error = %e, "generation failed");
            Error::generation(&e)
        })?;
        Ok(raw.trim().to_string())
    }
}
