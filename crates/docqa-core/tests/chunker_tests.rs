use docqa_core::chunker::{Chunker, ChunkingConfig};
use docqa_core::error::Error;

/// Longest prefix of `next` (up to `max` chars) that is also a suffix of `prev`.
fn shared_overlap(prev: &str, next: &str, max: usize) -> usize {
    let prev: Vec<char> = prev.chars().collect();
    let next: Vec<char> = next.chars().collect();
    (1..=max.min(prev.len()).min(next.len()))
        .rev()
        .find(|&k| prev[prev.len() - k..] == next[..k])
        .unwrap_or(0)
}

#[test]
fn empty_text_yields_no_chunks() {
    assert!(Chunker::default().chunk("").is_empty());
}

#[test]
fn short_text_is_one_chunk() {
    let text = "Olympique de Marseille was founded in 1899.";
    assert_eq!(Chunker::default().chunk(text), vec![text.to_string()]);
}

#[test]
fn unbroken_run_is_cut_with_exact_overlap() {
    let text = "x".repeat(1500);
    let chunks = Chunker::default().chunk(&text);

    let lens: Vec<usize> = chunks.iter().map(|c| c.chars().count()).collect();
    assert_eq!(lens, vec![700, 700, 300]);
    for pair in chunks.windows(2) {
        assert_eq!(shared_overlap(&pair[0], &pair[1], 100), 100);
    }
}

#[test]
fn words_without_paragraph_breaks_make_three_chunks() {
    let text = "abcd ".repeat(300);
    assert_eq!(text.chars().count(), 1500);

    let chunks = Chunker::default().chunk(&text);

    assert_eq!(chunks.len(), 3);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 700, "chunk too long: {}", chunk.len());
        assert!(!chunk.starts_with(' ') && !chunk.ends_with(' '));
    }
    for pair in chunks.windows(2) {
        let overlap = shared_overlap(&pair[0], &pair[1], 100);
        assert!(overlap > 90 && overlap <= 100, "overlap was {overlap}");
    }
}

#[test]
fn paragraphs_are_preferred_break_points() {
    let para_a = "a".repeat(400);
    let para_b = "b".repeat(400);
    let text = format!("{para_a}\n\n{para_b}");

    let chunks = Chunker::default().chunk(&text);

    assert_eq!(chunks, vec![para_a, para_b]);
}

#[test]
fn lines_are_used_inside_long_paragraphs() {
    let lines: Vec<String> = (0..12).map(|i| format!("line {i:02} {}", "z".repeat(80))).collect();
    let text = lines.join("\n");

    let chunks = Chunker::default().chunk(&text);

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 700);
        assert!(chunk.starts_with("line "), "chunk should start on a line boundary: {chunk:.20}");
    }
}

#[test]
fn chunking_is_deterministic() {
    let text = "Le Classique.\n\nThe Velodrome hosts matches. ".repeat(60);
    let chunker = Chunker::default();
    assert_eq!(chunker.chunk(&text), chunker.chunk(&text));
}

#[test]
fn multibyte_text_is_measured_in_chars() {
    let text = "é".repeat(1000);
    let chunks = Chunker::default().chunk(&text);
    assert_eq!(chunks[0].chars().count(), 700);
    assert_eq!(chunks.len(), 2);
}

#[test]
fn every_chunk_respects_a_custom_size() {
    let chunker = Chunker::new(ChunkingConfig { chunk_size: 50, chunk_overlap: 10 }).unwrap();
    let text = "The stadium's roof reflects Mediterranean waves. ".repeat(20);
    let chunks = chunker.chunk(&text);
    assert!(chunks.len() > 10);
    assert!(chunks.iter().all(|c| c.chars().count() <= 50));
}

#[test]
fn overlap_must_be_smaller_than_size() {
    let err = Chunker::new(ChunkingConfig { chunk_size: 100, chunk_overlap: 100 }).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
    assert!(Chunker::new(ChunkingConfig { chunk_size: 0, chunk_overlap: 0 }).is_err());
}
