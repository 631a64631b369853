//! `TikTok` search source.
//!
//! Uses the same internal search endpoint the web client calls. The endpoint
//! is unauthenticated but expects a browser-looking `Referer`.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use clipwatch_core::{Observation, RawCount};

use crate::client::SourceClient;
use crate::error::ScrapeError;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<SearchData>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(default)]
    videos: Vec<TikTokVideo>,
}

#[derive(Debug, Deserialize)]
struct TikTokVideo {
    #[serde(default)]
    id: String,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    author: Option<Author>,
    #[serde(default)]
    stats: Option<Stats>,
    #[serde(rename = "createTime", default)]
    create_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Author {
    #[serde(rename = "uniqueId", default)]
    unique_id: String,
}

/// Counts arrive as numbers for small videos and as abbreviated display
/// strings ("1.5M") once they grow; [`RawCount`] absorbs both.
#[derive(Debug, Deserialize)]
struct Stats {
    #[serde(rename = "playCount", default)]
    play_count: Option<RawCount>,
    #[serde(rename = "diggCount", default)]
    digg_count: Option<RawCount>,
    #[serde(rename = "commentCount", default)]
    comment_count: Option<RawCount>,
    #[serde(rename = "shareCount", default)]
    share_count: Option<RawCount>,
}

/// Fetch search results for `query`.
///
/// # Errors
///
/// Returns [`ScrapeError::Http`] (and friends) for transport failures and
/// [`ScrapeError::Deserialize`] for unexpected response shapes.
pub(crate) async fn fetch_tiktok(
    client: &SourceClient,
    query: &str,
    limit: usize,
    collected_at: &str,
) -> Result<Vec<Observation>, ScrapeError> {
    let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
    let url = format!(
        "https://www.tiktok.com/api/search/general/full/?aid=1988&keyword={encoded}&count={limit}"
    );
    let referer = format!("https://www.tiktok.com/search?q={encoded}");

    let body = client.get_text(&url, &[("Referer", &referer)]).await?;
    parse_search_response(&body, query, limit, collected_at)
}

fn parse_search_response(
    body: &str,
    query: &str,
    limit: usize,
    collected_at: &str,
) -> Result<Vec<Observation>, ScrapeError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| ScrapeError::Deserialize {
            context: "TikTok search response".to_string(),
            source: e,
        })?;

    let videos = response.data.map(|d| d.videos).unwrap_or_default();
    let observations = videos
        .into_iter()
        .filter(|video| !video.id.is_empty())
        .take(limit)
        .map(|video| {
            let author = video.author.map(|a| a.unique_id).filter(|a| !a.is_empty());
            let url = author
                .as_deref()
                .map(|a| format!("https://www.tiktok.com/@{a}/video/{}", video.id));
            let publish_time = video
                .create_time
                .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
                .map(|dt| dt.format("%Y-%m-%d").to_string());
            let stats = video.stats;
            let (views, likes, comments, shares) = match stats {
                Some(s) => (s.play_count, s.digg_count, s.comment_count, s.share_count),
                None => (None, None, None, None),
            };

            Observation {
                platform: "tiktok".to_string(),
                video_id: video.id,
                collected_at: collected_at.to_string(),
                query: query.to_string(),
                title: video.desc.filter(|d| !d.is_empty()),
                url,
                author,
                publish_time,
                views,
                likes,
                comments,
                shares,
            }
        })
        .collect();

    Ok(observations)
}
