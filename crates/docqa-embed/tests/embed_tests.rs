use docqa_core::config::EmbeddingConfig;
use docqa_core::traits::Embedder;
use docqa_embed::{get_default_embedder, FakeEmbedder};

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[test]
fn fake_embedder_shapes_and_determinism() {
    let config = EmbeddingConfig { use_fake: true, ..EmbeddingConfig::default() };
    let embedder = get_default_embedder(&config).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 384);
    assert_eq!(embedder.dim(), 384);

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn fake_embedder_favours_shared_words() {
    let embedder = FakeEmbedder::new(384);
    let q = embedder.embed("What is the capital of France?").unwrap();
    let near = embedder.embed("The capital of France is Paris.").unwrap();
    let far = embedder.embed("Bananas ripen quickly in warm kitchens.").unwrap();
    assert!(cosine(&q, &near) > cosine(&q, &far));
}

#[test]
fn fake_embedder_ignores_case_and_punctuation() {
    let embedder = FakeEmbedder::new(64);
    let a = embedder.embed("Hello, World!").unwrap();
    let b = embedder.embed("hello world").unwrap();
    for (x, y) in a.iter().zip(&b) { assert!((x - y).abs() <= 1e-6); }
    assert_eq!(embedder.model_id(), "fake:d64");
}

#[test]
fn empty_batch_yields_no_vectors() {
    let embedder = FakeEmbedder::new(16);
    assert!(embedder.embed_batch(&[]).unwrap().is_empty());
}
