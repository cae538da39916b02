use chrono::{Duration, TimeZone, Utc};

use docqa_core::gate::{gate, Decision, DEFAULT_DISTANCE_THRESHOLD};
use docqa_core::history::SearchHistory;
use docqa_core::source::{document_from_chunk_id, pick_source};
use docqa_core::types::{Chunk, Document, QueryResult};

fn chunk(filename: &str, doc_id: &str, index: usize) -> Chunk {
    let doc = Document::new(doc_id, filename, "");
    Chunk::new(&doc, index, format!("text of {filename} #{index}"), vec![1.0, 0.0])
}

fn result(distances: &[f32]) -> QueryResult {
    QueryResult {
        chunks: (0..distances.len()).map(|i| chunk("doc.txt", "doc", i)).collect(),
        distances: distances.to_vec(),
    }
}

#[test]
fn empty_result_is_declined() {
    assert_eq!(gate(QueryResult::empty(), DEFAULT_DISTANCE_THRESHOLD), Decision::Declined);
}

#[test]
fn best_match_above_threshold_is_declined() {
    assert!(gate(result(&[1.6, 1.9]), 1.5).is_declined());
}

#[test]
fn one_close_match_makes_the_whole_result_usable() {
    match gate(result(&[0.4, 1.8, 1.9]), 1.5) {
        Decision::Usable { chunks, distances } => {
            assert_eq!(chunks.len(), 3, "no per-chunk filtering");
            assert_eq!(distances, vec![0.4, 1.8, 1.9]);
        }
        Decision::Declined => panic!("expected usable"),
    }
}

#[test]
fn threshold_is_inclusive() {
    assert!(!gate(result(&[1.5]), 1.5).is_declined());
}

#[test]
fn nan_distances_are_declined() {
    assert!(gate(result(&[f32::NAN]), 1.5).is_declined());
}

#[test]
fn source_is_the_closest_chunks_document() {
    let chunks = vec![chunk("b.txt", "B", 0), chunk("a.txt", "A", 3)];
    let (picked, doc_id) = pick_source(&chunks, &[0.9, 0.3]).unwrap();
    assert_eq!(doc_id, "A");
    assert_eq!(picked.id, "a.txt_chunk_3");
}

#[test]
fn ties_go_to_the_first_chunk() {
    let chunks = vec![chunk("first.txt", "first", 0), chunk("second.txt", "second", 0)];
    let (_, doc_id) = pick_source(&chunks, &[0.5, 0.5]).unwrap();
    assert_eq!(doc_id, "first");
}

#[test]
fn empty_chunks_have_no_source() {
    assert!(pick_source(&[], &[]).is_none());
}

#[test]
fn id_suffix_is_the_fallback_for_missing_metadata() {
    let mut orphan = chunk("report.pdf", "", 7);
    orphan.document_id.clear();
    let (_, doc_id) = pick_source(std::slice::from_ref(&orphan), &[0.1]).unwrap();
    assert_eq!(doc_id, "report.pdf");
}

#[test]
fn chunk_id_parsing() {
    assert_eq!(document_from_chunk_id("DocA_chunk_0"), "DocA");
    assert_eq!(document_from_chunk_id("my_chunk_file_chunk_12"), "my_chunk_file");
    assert_eq!(document_from_chunk_id("DocA_chunk_x"), "DocA_chunk_x");
    assert_eq!(document_from_chunk_id("plain"), "plain");
}

#[test]
fn history_keeps_the_ten_most_recent_first() {
    let mut history = SearchHistory::default();
    let start = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
    for i in 0..11 {
        history.record_at(format!("q{i}"), format!("a{i}"), "src.txt", start + Duration::seconds(i));
    }

    let entries = history.list();
    assert_eq!(entries.len(), 10);
    assert_eq!(entries[0].question, "q10");
    assert_eq!(entries[9].question, "q1", "q0 was least recently inserted and got evicted");
    assert!(entries.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
}

#[test]
fn history_length_is_min_of_records_and_capacity() {
    for n in 0..15 {
        let mut history = SearchHistory::new(10);
        for i in 0..n {
            history.record(format!("q{i}"), "a", "s");
        }
        assert_eq!(history.len(), n.min(10));
    }
}

#[test]
fn history_clear_empties_the_buffer() {
    let mut history = SearchHistory::new(3);
    history.record("q", "a", "s");
    history.clear();
    assert!(history.is_empty());
    assert!(history.list().is_empty());
}

#[test]
fn zero_capacity_is_raised_to_one() {
    let mut history = SearchHistory::new(0);
    history.record("q1", "a", "s");
    history.record("q2", "a", "s");
    assert_eq!(history.capacity(), 1);
    assert_eq!(history.list()[0].question, "q2");
}
