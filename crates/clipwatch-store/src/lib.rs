//! On-disk observation store for clipwatch.
//!
//! Each collection run persists its ranked batch as one JSON snapshot file,
//! keyed by query. The archive is append-only: the orchestrator writes a new
//! snapshot after every run and reads back the most recent one for the same
//! query to give the scoring engine its prior batch.

mod snapshot;

pub use snapshot::{SnapshotStore, DEFAULT_MAX_AGE};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed snapshot {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
