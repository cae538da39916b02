//! Answer synthesis: prompt construction and text-generation backends.

pub mod prompt;
pub mod providers;
mod synthesizer;

pub use prompt::build_prompt;
pub use providers::{build_generator, OllamaGenerator, OpenAiGenerator};
pub use synthesizer::{Synthesizer, DEFAULT_MAX_NEW_TOKENS};
