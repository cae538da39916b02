use crate::types::{Chunk, CHUNK_ID_MARKER};

/// Pick the chunk with the smallest distance and the id of its document.
/// Ties go to the earliest chunk. Returns `None` for an empty slice.
pub fn pick_source<'a>(chunks: &'a [Chunk], distances: &[f32]) -> Option<(&'a Chunk, &'a str)> {
    let mut best = 0usize;
    let mut best_distance = f32::INFINITY;
    for (i, &distance) in distances.iter().enumerate().take(chunks.len()) {
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    let chunk = chunks.get(best)?;
    Some((chunk, document_id_of(chunk)))
}

/// Stored metadata wins; the id suffix is only parsed when it is missing.
pub fn document_id_of(chunk: &Chunk) -> &str {
    if chunk.document_id.is_empty() {
        document_from_chunk_id(&chunk.id)
    } else {
        &chunk.document_id
    }
}

/// Strip a trailing `_chunk_<digits>` from a chunk id.
pub fn document_from_chunk_id(id: &str) -> &str {
    match id.rsplit_once(CHUNK_ID_MARKER) {
        Some((prefix, index)) if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) => prefix,
        _ => id,
    }
}
