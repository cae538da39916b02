use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use docqa_core::config::EmbeddingConfig;
use docqa_core::traits::Embedder;
use docqa_embed::{FakeEmbedder, LazyEmbedder};

#[test]
fn concurrent_first_calls_build_once() {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&builds);
    let lazy = LazyEmbedder::new(32, 128, move || {
        counter.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(20));
        Ok(Box::new(FakeEmbedder::new(32)) as Box<dyn Embedder>)
    });
    assert!(!lazy.is_initialized());
    assert_eq!(lazy.model_id(), "lazy:d32");

    std::thread::scope(|s| {
        for i in 0..8 {
            let lazy = &lazy;
            s.spawn(move || {
                let v = lazy.embed(&format!("text {i}")).unwrap();
                assert_eq!(v.len(), 32);
            });
        }
    });

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(lazy.is_initialized());
    assert_eq!(lazy.model_id(), "lazy:d32");
    assert_eq!(lazy.backend_id(), Some("fake:d32"));
}

#[test]
fn failed_initialization_is_retried() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let lazy = LazyEmbedder::new(16, 64, move || {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            anyhow::bail!("model files missing");
        }
        Ok(Box::new(FakeEmbedder::new(16)) as Box<dyn Embedder>)
    });

    assert!(lazy.embed("first").is_err());
    assert!(!lazy.is_initialized());
    assert!(lazy.embed("second").is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn dimension_mismatch_is_an_error() {
    let lazy = LazyEmbedder::new(16, 64, || Ok(Box::new(FakeEmbedder::new(8)) as Box<dyn Embedder>));
    assert!(lazy.embed("x").is_err());
    assert_eq!(lazy.dim(), 16);
}

#[test]
fn model_id_does_not_change_on_initialization() {
    let lazy = LazyEmbedder::new(8, 64, || Ok(Box::new(FakeEmbedder::new(8)) as Box<dyn Embedder>)).with_model_id("minilm:d8");
    assert_eq!(lazy.model_id(), "minilm:d8");
    assert_eq!(lazy.backend_id(), None);
    lazy.embed("warm up").unwrap();
    assert_eq!(lazy.model_id(), "minilm:d8");
}

#[test]
fn configured_id_names_the_backend() {
    let fake = LazyEmbedder::from_config(EmbeddingConfig { dimension: 8, use_fake: true, ..EmbeddingConfig::default() });
    assert_eq!(fake.model_id(), "fake:d8");
    assert!(!fake.is_initialized());
    fake.embed("hello").unwrap();
    assert_eq!(fake.model_id(), "fake:d8");
}
