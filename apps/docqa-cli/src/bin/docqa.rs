use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use docqa_cli::{ask_abandonable, ingest_with_progress, init_tracing, parse_personality, print_answer};
use docqa_core::config::Config;
use docqa_core::types::Personality;
use docqa_rag::RagService;

#[derive(Parser, Debug)]
#[command(name = "docqa", about = "Ask questions about a folder of text documents")]
struct Cli {
    /// Collection to use instead of the configured one
    #[arg(long, global = true)]
    collection: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest a directory and answer one question
    Ask {
        dir: PathBuf,
        question: String,
        /// helpful, friendly, expert or default
        #[arg(long, default_value = "default")]
        personality: String,
    },
    /// Ingest a directory and answer questions interactively
    Chat {
        dir: PathBuf,
        #[arg(long, default_value = "default")]
        personality: String,
    },
    /// Print document statistics for a directory
    Stats { dir: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Config::load()?.settings()?;
    let collection = cli.collection.clone().unwrap_or_else(|| settings.collection.clone());
    let service = Arc::new(RagService::from_settings(settings)?);

    match cli.command {
        Command::Ask { dir, question, personality } => {
            let personality = parse_personality(&personality)?;
            load(&service, &collection, &dir)?;
            if let Some(answer) = ask_abandonable(Arc::clone(&service), collection, question, personality).await? {
                print_answer(&answer);
            }
        }
        Command::Chat { dir, personality } => {
            let personality = parse_personality(&personality)?;
            load(&service, &collection, &dir)?;
            chat(service, collection, personality).await?;
        }
        Command::Stats { dir } => {
            load(&service, &collection, &dir)?;
            print_stats(&service, &collection)?;
        }
    }
    Ok(())
}

fn load(service: &RagService, collection: &str, dir: &Path) -> Result<()> {
    let report = ingest_with_progress(service, collection, dir)?;
    println!(
        "Ingested {} documents ({} chunks), {} failed",
        report.ingested.len(),
        report.total_chunks(),
        report.failed.len()
    );
    Ok(())
}

fn print_stats(service: &RagService, collection: &str) -> Result<()> {
    let stats = service.stats(collection)?;
    println!("Documents:     {}", stats.total_documents);
    println!("Chunks:        {}", service.chunk_count(collection)?);
    println!("Total words:   {}", stats.total_words);
    println!("Average words: {}", stats.average_words);
    println!("Min / max:     {} / {}", stats.min_words, stats.max_words);
    for (ext, count) in &stats.by_extension {
        let ext = if ext.is_empty() { "(none)" } else { ext.as_str() };
        println!("  {ext}: {count}");
    }
    Ok(())
}

async fn chat(service: Arc<RagService>, collection: String, personality: Personality) -> Result<()> {
    println!("Type a question, or :history, :clear, :delete <id>, :stats, :quit");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        match line.split_once(' ').map_or((line, ""), |(cmd, rest)| (cmd, rest.trim())) {
            ("", _) => continue,
            (":quit" | ":q", _) => break,
            (":history", _) => {
                for (i, entry) in service.history()?.iter().enumerate() {
                    println!("{}. [{}] {}", i + 1, entry.timestamp.format("%Y-%m-%d %H:%M:%S"), entry.question);
                    println!("   {} (source: {})", entry.answer, entry.source_filename);
                }
            }
            (":clear", _) => {
                service.clear_history()?;
                println!("History cleared");
            }
            (":delete", id) if !id.is_empty() => {
                let removed = service.delete(&collection, id)?;
                println!("Removed {removed} chunks of '{id}'");
            }
            (":stats", _) => print_stats(&service, &collection)?,
            _ => {
                let pending = ask_abandonable(Arc::clone(&service), collection.clone(), line.to_string(), personality.clone());
                match pending.await {
                    Ok(Some(answer)) => print_answer(&answer),
                    Ok(None) => println!("(cancelled)"),
                    Err(e) => eprintln!("Error: {e:#}"),
                }
            }
        }
    }
    Ok(())
}
