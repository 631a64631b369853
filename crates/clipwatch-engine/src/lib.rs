//! Virality scoring engine for clipwatch.
//!
//! Pure, synchronous computation over fully materialized in-memory batches:
//! match each current observation to its prior observation by
//! `(platform, video_id)` identity, derive growth and per-hour velocity,
//! blend them into a single `viral_score`, and rank the batch.
//!
//! Nothing in here performs I/O or returns an error. Malformed input —
//! non-numeric counts, unparsable timestamps, missing history — degrades to
//! defined fallback values so one bad field never costs a whole ranking.
//! Invocations share no state, so callers may score independent queries
//! concurrently without coordination.

pub mod count;
mod metrics;
pub mod scorer;

pub use count::coerce_count;
pub use scorer::score_and_rank;
