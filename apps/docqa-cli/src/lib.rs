//! Shared pieces of the command-line front ends.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use docqa_core::types::{Answer, Personality};
use docqa_rag::{IngestProgress, IngestReport, RagService};

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

pub fn parse_personality(name: &str) -> Result<Personality> {
    Personality::preset(name).with_context(|| format!("unknown personality '{name}' (helpful, friendly, expert, default)"))
}

/// Ingest every text file under `dir`, with a progress bar.
pub fn ingest_with_progress(service: &RagService, collection: &str, dir: &Path) -> Result<IngestReport> {
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents {msg}")?
        .progress_chars("#>-");
    let pb = ProgressBar::new(0).with_style(style);
    let report = service
        .ingest_directory_with(collection, dir, |event| match event {
            IngestProgress::Started { documents } => pb.set_length(documents as u64),
            IngestProgress::Finished { document, .. } => {
                pb.set_message(document.filename.clone());
                pb.inc(1);
            }
        })
        .with_context(|| format!("loading documents from {}", dir.display()))?;
    pb.finish_with_message("done");
    for failure in &report.failed {
        warn!(file = %failure.name, error = %failure.error, "not ingested");
    }
    Ok(report)
}

/// Run the question on a blocking thread and race it against Ctrl-C.
/// `None` means the user gave up; the dropped answer never reaches the
/// history.
pub async fn ask_abandonable(
    service: Arc<RagService>,
    collection: String,
    question: String,
    personality: Personality,
) -> Result<Option<Answer>> {
    let worker = Arc::clone(&service);
    let asked = question.clone();
    let task = tokio::task::spawn_blocking(move || worker.answer(&collection, &asked, &personality));
    tokio::select! {
        joined = task => {
            let answer = joined.context("answer task failed")??;
            service.record_answer(&question, &answer)?;
            Ok(Some(answer))
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, discarding pending answer");
            Ok(None)
        }
    }
}

pub fn print_answer(answer: &Answer) {
    println!("{}", answer.answer);
    println!("Source: {}", answer.source);
}
