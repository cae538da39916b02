//! Relevance gate: accept or decline a query result based on its best match.

use crate::types::{Chunk, QueryResult};

pub const DEFAULT_DISTANCE_THRESHOLD: f32 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Chunks and distances, in retrieval order (closest first).
    Usable { chunks: Vec<Chunk>, distances: Vec<f32> },
    Declined,
}

impl Decision {
    pub fn is_declined(&self) -> bool {
        matches!(self, Decision::Declined)
    }
}

/// All-or-nothing on the closest match: the whole result is usable when its
/// smallest distance is within `threshold`, otherwise it is declined. An
/// empty result, or one without any finite distance, is declined.
pub fn gate(result: QueryResult, threshold: f32) -> Decision {
    match result.best_distance() {
        Some(best) if !result.is_empty() && best <= threshold => {
            Decision::Usable { chunks: result.chunks, distances: result.distances }
        }
        _ => Decision::Declined,
    }
}
