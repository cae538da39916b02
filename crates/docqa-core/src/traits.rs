pub trait Embedder: Send + Sync {
    /// Stable identifier for the model (e.g., `minilm:d384`). Used as a cache key.
    fn model_id(&self) -> &str;
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector"))
    }
}

/// Text generation capability. Given a prompt and an output budget in
/// tokens, returns raw generated text.
pub trait Generator: Send + Sync {
    fn name(&self) -> &str;
    fn generate(&self, prompt: &str, max_tokens: usize) -> anyhow::Result<String>;
}
