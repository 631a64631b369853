//! Platform observation sources.
//!
//! One fetch capability per platform, each independently replaceable. The
//! aggregator fetches platforms one at a time with a pause in between,
//! logs and skips failures, and enforces the batch invariant the scoring
//! engine relies on: one observation per `(platform, video_id)`.

mod instagram;
mod tiktok;
mod vk;
mod youtube;

use std::collections::HashSet;
use std::time::Duration;

use clipwatch_core::{AppConfig, Observation, Platform, RawCount, TIMESTAMP_FORMAT};

use crate::client::SourceClient;

/// Collect the current batch of observations for `query` across `platforms`.
///
/// A failing platform is logged and skipped so the run still produces a
/// batch; an empty result means every platform failed or returned nothing.
pub async fn collect_observations(
    client: &SourceClient,
    config: &AppConfig,
    query: &str,
    limit: usize,
    platforms: &[Platform],
) -> Vec<Observation> {
    let mut observations = Vec::new();
    let collected_at = now_timestamp();

    for (i, platform) in platforms.iter().enumerate() {
        if i > 0 && config.scraper_inter_platform_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.scraper_inter_platform_delay_ms))
                .await;
        }

        let fetched = match platform {
            Platform::Youtube => {
                youtube::fetch_youtube(client, query, limit, &collected_at).await
            }
            Platform::Tiktok => tiktok::fetch_tiktok(client, query, limit, &collected_at).await,
            Platform::Instagram => {
                instagram::fetch_instagram(client, query, limit, &collected_at).await
            }
            Platform::Vk => match config.vk_access_token.as_deref() {
                Some(token) => vk::fetch_vk(client, token, query, limit, &collected_at).await,
                None => {
                    tracing::warn!(
                        platform = %platform,
                        "skipping platform — CLIPWATCH_VK_ACCESS_TOKEN is not set"
                    );
                    continue;
                }
            },
        };

        match fetched {
            Ok(batch) => {
                tracing::debug!(
                    platform = %platform,
                    count = batch.len(),
                    "collected observations"
                );
                observations.extend(batch);
            }
            Err(e) => {
                tracing::warn!(platform = %platform, error = %e, "platform fetch failed");
            }
        }
    }

    dedup_by_identity(&mut observations);
    observations
}

/// Enforce the batch invariant: one observation per `(platform, video_id)`,
/// first occurrence wins.
fn dedup_by_identity(observations: &mut Vec<Observation>) {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    observations.retain(|obs| {
        let (platform, video_id) = obs.identity();
        seen.insert((platform.to_string(), video_id.to_string()))
    });
}

/// Numeric strings become numbers; anything else stays text for the engine's
/// coercion to deal with.
pub(crate) fn raw_count(raw: &str) -> RawCount {
    raw.parse::<i64>()
        .map(RawCount::Number)
        .unwrap_or_else(|_| RawCount::Text(raw.to_string()))
}

fn now_timestamp() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}
