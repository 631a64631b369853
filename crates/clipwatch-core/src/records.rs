//! Observation records shared by the scraper, engine, and store crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Wire format for [`Observation::collected_at`] timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Platforms clipwatch knows how to collect from.
///
/// Records carry the platform as a plain string label (see
/// [`Observation::platform`]) so that snapshots written by older builds or
/// external collectors stay loadable; this enum only drives source selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Youtube,
    Tiktok,
    Instagram,
    Vk,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Youtube,
        Platform::Tiktok,
        Platform::Instagram,
        Platform::Vk,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Vk => "vk",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "youtube" => Ok(Platform::Youtube),
            "tiktok" => Ok(Platform::Tiktok),
            "instagram" => Ok(Platform::Instagram),
            "vk" => Ok(Platform::Vk),
            other => Err(CoreError::UnknownPlatform(other.to_string())),
        }
    }
}

/// A count field as it arrives from a platform.
///
/// Sources report views/likes/comments either as bare numbers or as display
/// strings (`"1.5M"`, `"2 тыс"`, `"N/A"`), depending on which endpoint
/// answered. This keeps the raw value intact; the engine coerces it to an
/// integer right before arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCount {
    Number(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for RawCount {
    fn from(n: i64) -> Self {
        RawCount::Number(n)
    }
}

impl From<i32> for RawCount {
    fn from(n: i32) -> Self {
        RawCount::Number(i64::from(n))
    }
}

impl From<&str> for RawCount {
    fn from(s: &str) -> Self {
        RawCount::Text(s.to_string())
    }
}

/// One platform's measurement of one video at one instant.
///
/// Identity is the `(platform, video_id)` pair — `video_id` alone is not
/// unique across platforms. Within one collection batch the pair is unique;
/// the collection layer deduplicates before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub platform: String,
    pub video_id: String,
    /// Second-precision `%Y-%m-%d %H:%M:%S` timestamp of the measurement.
    pub collected_at: String,
    /// Search query the observation was collected under; partition key for
    /// historical lookup.
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub publish_time: Option<String>,
    #[serde(default)]
    pub views: Option<RawCount>,
    #[serde(default)]
    pub likes: Option<RawCount>,
    #[serde(default)]
    pub comments: Option<RawCount>,
    /// Display-only; never enters the score.
    #[serde(default)]
    pub shares: Option<RawCount>,
}

impl Observation {
    /// Matching and dedup identity.
    #[must_use]
    pub fn identity(&self) -> (&str, &str) {
        (self.platform.as_str(), self.video_id.as_str())
    }
}

/// An [`Observation`] plus the seven derived virality metrics.
///
/// The serialized form is a strict superset of the input record: original
/// fields are flattened in unchanged, derived fields are appended. Produced
/// once per scoring run and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredObservation {
    #[serde(flatten)]
    pub observation: Observation,
    pub views_growth: i64,
    pub likes_growth: i64,
    pub comments_growth: i64,
    pub views_velocity: f64,
    pub likes_velocity: f64,
    pub comments_velocity: f64,
    pub viral_score: f64,
}
