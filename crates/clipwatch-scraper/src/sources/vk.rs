//! `VK` video search source.
//!
//! Uses the official `video.search` API method, which needs a user or service
//! access token. The aggregator skips this platform entirely when no token is
//! configured.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use clipwatch_core::{Observation, RawCount};

use crate::client::SourceClient;
use crate::error::ScrapeError;

const API_VERSION: &str = "5.199";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    response: Option<SearchResult>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    items: Vec<VkVideo>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    error_msg: String,
}

#[derive(Debug, Deserialize)]
struct VkVideo {
    id: i64,
    owner_id: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    views: Option<RawCount>,
    #[serde(default)]
    comments: Option<RawCount>,
    #[serde(default)]
    likes: Option<LikesInfo>,
    #[serde(default)]
    reposts: Option<RepostsInfo>,
    #[serde(default)]
    date: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct LikesInfo {
    #[serde(default)]
    count: Option<RawCount>,
}

#[derive(Debug, Deserialize)]
struct RepostsInfo {
    #[serde(default)]
    count: Option<RawCount>,
}

/// Fetch clip search results for `query`.
///
/// # Errors
///
/// Returns [`ScrapeError::Http`] (and friends) for transport failures,
/// [`ScrapeError::Deserialize`] for unexpected response shapes, and
/// [`ScrapeError::Api`] when VK reports an error payload (expired token,
/// rate cap, etc.).
pub(crate) async fn fetch_vk(
    client: &SourceClient,
    access_token: &str,
    query: &str,
    limit: usize,
    collected_at: &str,
) -> Result<Vec<Observation>, ScrapeError> {
    let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
    let url = format!(
        "https://api.vk.com/method/video.search?q={encoded}&count={limit}&extended=1&v={API_VERSION}&access_token={access_token}"
    );

    let body = client.get_text(&url, &[]).await?;
    parse_search_response(&body, query, limit, collected_at)
}

fn parse_search_response(
    body: &str,
    query: &str,
    limit: usize,
    collected_at: &str,
) -> Result<Vec<Observation>, ScrapeError> {
    let response: ApiResponse =
        serde_json::from_str(body).map_err(|e| ScrapeError::Deserialize {
            context: "VK video.search response".to_string(),
            source: e,
        })?;

    if let Some(error) = response.error {
        return Err(ScrapeError::Api(format!(
            "VK error {}: {}",
            error.error_code, error.error_msg
        )));
    }

    let items = response.response.map(|r| r.items).unwrap_or_default();
    let observations = items
        .into_iter()
        .take(limit)
        .map(|video| {
            let video_id = format!("{}_{}", video.owner_id, video.id);
            let publish_time = video
                .date
                .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
                .map(|dt| dt.format("%Y-%m-%d").to_string());

            Observation {
                platform: "vk".to_string(),
                video_id: video_id.clone(),
                collected_at: collected_at.to_string(),
                query: query.to_string(),
                title: video.title.filter(|t| !t.is_empty()),
                url: Some(format!("https://vk.com/video{video_id}")),
                author: None,
                publish_time,
                views: video.views,
                likes: video.likes.and_then(|l| l.count),
                comments: video.comments,
                shares: video.reposts.and_then(|r| r.count),
            }
        })
        .collect();

    Ok(observations)
}
