use std::sync::{Arc, Mutex};

use docqa_answer::{build_generator, Synthesizer, DEFAULT_MAX_NEW_TOKENS};
use docqa_core::config::{GenerationBackend, GenerationConfig};
use docqa_core::traits::Generator;
use docqa_core::types::{Chunk, Document, Personality};
use docqa_core::Error;

#[derive(Clone, Default)]
struct Recorder { calls: Arc<Mutex<Vec<(String, usize)>>> }

struct ScriptedGenerator { reply: anyhow::Result<String>, recorder: Recorder }

impl Generator for ScriptedGenerator {
    fn name(&self) -> &str { "scripted" }
    fn generate(&self, prompt: &str, max_tokens: usize) -> anyhow::Result<String> {
        self.recorder.calls.lock().unwrap().push((prompt.to_string(), max_tokens));
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(e) => Err(anyhow::anyhow!("{e}")),
        }
    }
}

fn chunks() -> Vec<Chunk> {
    let doc = Document::new("geo", "geo.txt", "");
    vec![
        Chunk::new(&doc, 0, "Paris is the capital of France.".into(), vec![]),
        Chunk::new(&doc, 1, "Lyon is known for food.".into(), vec![]),
    ]
}

#[test]
fn output_is_trimmed_and_budget_forwarded() {
    let recorder = Recorder::default();
    let synth = Synthesizer::new(Box::new(ScriptedGenerator { reply: Ok("  Paris.\n".into()), recorder: recorder.clone() }));
    let answer = synth.synthesize("What is the capital of France?", &chunks(), &Personality::default()).unwrap();
    assert_eq!(answer, "Paris.");

    let calls = recorder.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (prompt, max_tokens) = &calls[0];
    assert_eq!(*max_tokens, DEFAULT_MAX_NEW_TOKENS);
    assert!(prompt.contains("Document 1: Paris is the capital of France."));
    assert!(prompt.contains("Document 2: Lyon is known for food."));
    assert!(prompt.find("Document 1").unwrap() < prompt.find("Document 2").unwrap());
    assert!(prompt.contains("Question: What is the capital of France?"));
    assert!(prompt.contains("Answer ONLY using the information provided above"));
}

#[test]
fn personality_only_changes_the_preamble() {
    let recorder = Recorder::default();
    let synth = Synthesizer::new(Box::new(ScriptedGenerator { reply: Ok("ok".into()), recorder: recorder.clone() }))
        .with_max_new_tokens(64);
    let expert = Personality::preset("expert").unwrap();
    synth.synthesize("q", &chunks(), &expert).unwrap();
    let calls = recorder.calls.lock().unwrap();
    assert!(calls[0].0.contains("detailed and technical"));
    assert_eq!(calls[0].1, 64);
}

#[test]
fn generator_failure_is_a_generation_error() {
    let synth = Synthesizer::new(Box::new(ScriptedGenerator {
        reply: Err(anyhow::anyhow!("connection refused")),
        recorder: Recorder::default(),
    }));
    let err = synth.synthesize("q", &chunks(), &Personality::default()).unwrap_err();
    match err {
        Error::GenerationBackend(msg) => assert!(msg.contains("connection refused")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn builds_configured_backend() {
    let ollama = build_generator(&GenerationConfig::default()).unwrap();
    assert_eq!(ollama.name(), "ollama");

    std::env::set_var("DOCQA_ANSWER_TEST_KEY", "sk-test");
    let config = GenerationConfig {
        backend: GenerationBackend::OpenAi,
        endpoint: "http://127.0.0.1:9".into(),
        api_key_env: "DOCQA_ANSWER_TEST_KEY".into(),
        ..GenerationConfig::default()
    };
    assert_eq!(build_generator(&config).unwrap().name(), "openai");
}
