use docqa_core::config::EmbeddingConfig;
use docqa_core::traits::Embedder;
use docqa_embed::get_default_embedder;

fn main() -> anyhow::Result<()> {
    let embedder = get_default_embedder(&EmbeddingConfig::default())?;
    let texts = vec!["hello world".to_string(), "rust embeddings".to_string()];
    let embs = embedder.embed_batch(&texts)?;
    println!("model={} B={} dim={}", embedder.model_id(), embs.len(), embedder.dim());
    Ok(())
}
