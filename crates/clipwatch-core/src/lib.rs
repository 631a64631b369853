//! Shared configuration and the observation data model for clipwatch.
//!
//! Everything the other crates agree on lives here: the [`Observation`] /
//! [`ScoredObservation`] records that flow from the platform sources through
//! the scoring engine into the snapshot store, the [`Platform`] selector,
//! and the env-driven [`AppConfig`].

mod app_config;
mod config;
mod records;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{Observation, Platform, RawCount, ScoredObservation, TIMESTAMP_FORMAT};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
}
