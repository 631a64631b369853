//! Platform scrapers for clipwatch.
//!
//! Collects raw [`clipwatch_core::Observation`] batches from the supported
//! short-video platforms. Each platform is a thin HTTP + parse capability;
//! the aggregator runs them in sequence, skips failures, and hands the
//! scoring engine a deduplicated batch. Count fields are passed through as
//! scraped — coercion is the engine's job.

mod client;
mod error;
mod rate_limit;
mod sources;

pub use client::SourceClient;
pub use error::ScrapeError;
pub use sources::collect_observations;
