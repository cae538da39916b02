//! Document question answering over an in-memory embedding index.
//!
//! [`RagService`] owns the whole pipeline: documents are chunked, embedded
//! and stored per collection; questions are embedded, matched, gated on the
//! best distance, answered from the retrieved context and recorded in a
//! bounded history.

mod registry;
mod report;
mod service;

pub use report::{IngestFailure, IngestProgress, IngestReport, IngestedDocument};
pub use service::RagService;
