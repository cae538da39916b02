use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use docqa_core::chunker::{Chunker, ChunkingConfig};

/// Show how a text file would be split into chunks.
#[derive(Parser, Debug)]
#[command(name = "chunk-preview")]
struct Args {
    file: PathBuf,
    #[arg(long, default_value_t = ChunkingConfig::default().chunk_size)]
    size: usize,
    #[arg(long, default_value_t = ChunkingConfig::default().chunk_overlap)]
    overlap: usize,
    /// Characters of each chunk to print
    #[arg(long, default_value_t = 80)]
    width: usize,
}

fn main() -> Result<()> {
    docqa_cli::init_tracing();
    let args = Args::parse();
    let text = std::fs::read_to_string(&args.file).with_context(|| format!("reading {}", args.file.display()))?;
    let chunker = Chunker::new(ChunkingConfig { chunk_size: args.size, chunk_overlap: args.overlap })?;
    let chunks = chunker.chunk(&text);
    println!("{}: {} chars -> {} chunks", args.file.display(), text.chars().count(), chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        let preview: String = chunk.chars().take(args.width).collect::<String>().replace('\n', " ");
        let overlap = i.checked_sub(1).map_or(0, |prev| shared_edge(&chunks[prev], chunk));
        println!("[{i:>3}] {:>4} chars, {overlap:>3} overlap | {preview}", chunk.chars().count());
    }
    Ok(())
}

/// Longest suffix of `prev` that is also a prefix of `next`, in chars.
fn shared_edge(prev: &str, next: &str) -> usize {
    let next_chars: Vec<char> = next.chars().collect();
    let prev_chars: Vec<char> = prev.chars().collect();
    (1..=prev_chars.len().min(next_chars.len()))
        .rev()
        .find(|&n| prev_chars[prev_chars.len() - n..] == next_chars[..n])
        .unwrap_or(0)
}
