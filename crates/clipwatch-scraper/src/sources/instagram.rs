//! `Instagram` hashtag source.
//!
//! Queries the web client's tag info endpoint, which requires the public web
//! app id header but no login. Reels surface in the tag's `top` and `recent`
//! sections; both are scanned in order until the limit is reached.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use clipwatch_core::{Observation, RawCount};

use crate::client::SourceClient;
use crate::error::ScrapeError;

/// Public app id the instagram.com web client sends on every API request.
const WEB_APP_ID: &str = "936619743392459";

#[derive(Debug, Deserialize)]
struct TagInfoResponse {
    #[serde(default)]
    data: Option<TagData>,
}

#[derive(Debug, Deserialize)]
struct TagData {
    #[serde(default)]
    top: Option<TagSectionList>,
    #[serde(default)]
    recent: Option<TagSectionList>,
}

#[derive(Debug, Deserialize)]
struct TagSectionList {
    #[serde(default)]
    sections: Vec<TagSection>,
}

#[derive(Debug, Deserialize)]
struct TagSection {
    #[serde(default)]
    layout_content: Option<LayoutContent>,
}

#[derive(Debug, Deserialize)]
struct LayoutContent {
    #[serde(default)]
    medias: Vec<MediaWrapper>,
}

#[derive(Debug, Deserialize)]
struct MediaWrapper {
    #[serde(default)]
    media: Option<Media>,
}

#[derive(Debug, Deserialize)]
struct Media {
    #[serde(default)]
    code: String,
    #[serde(default)]
    play_count: Option<RawCount>,
    #[serde(default)]
    like_count: Option<RawCount>,
    #[serde(default)]
    comment_count: Option<RawCount>,
    #[serde(default)]
    caption: Option<Caption>,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    taken_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Caption {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct User {
    #[serde(default)]
    username: Option<String>,
}

/// Fetch reels for `query`, treated as a hashtag.
///
/// # Errors
///
/// Returns [`ScrapeError::Http`] (and friends) for transport failures and
/// [`ScrapeError::Deserialize`] for unexpected response shapes.
pub(crate) async fn fetch_instagram(
    client: &SourceClient,
    query: &str,
    limit: usize,
    collected_at: &str,
) -> Result<Vec<Observation>, ScrapeError> {
    // Hashtags have no spaces; "funny cats" searches as #funnycats.
    let tag: String = query
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    let encoded = utf8_percent_encode(&tag, NON_ALPHANUMERIC).to_string();
    let url = format!("https://www.instagram.com/api/v1/tags/web_info/?tag_name={encoded}");

    let body = client
        .get_text(&url, &[("X-IG-App-ID", WEB_APP_ID)])
        .await?;
    parse_tag_info(&body, query, limit, collected_at)
}

fn parse_tag_info(
    body: &str,
    query: &str,
    limit: usize,
    collected_at: &str,
) -> Result<Vec<Observation>, ScrapeError> {
    let response: TagInfoResponse =
        serde_json::from_str(body).map_err(|e| ScrapeError::Deserialize {
            context: "Instagram tag info response".to_string(),
            source: e,
        })?;

    let mut observations = Vec::new();
    let Some(data) = response.data else {
        return Ok(observations);
    };

    let sections = data
        .top
        .into_iter()
        .chain(data.recent)
        .flat_map(|list| list.sections);

    'sections: for section in sections {
        let Some(content) = section.layout_content else {
            continue;
        };
        for wrapper in content.medias {
            let Some(media) = wrapper.media else { continue };
            if media.code.is_empty() {
                continue;
            }
            let author = media.user.and_then(|u| u.username);
            let publish_time = media
                .taken_at
                .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
                .map(|dt| dt.format("%Y-%m-%d").to_string());

            observations.push(Observation {
                platform: "instagram".to_string(),
                video_id: media.code.clone(),
                collected_at: collected_at.to_string(),
                query: query.to_string(),
                title: media.caption.and_then(|c| c.text).filter(|t| !t.is_empty()),
                url: Some(format!("https://www.instagram.com/reel/{}/", media.code)),
                author,
                publish_time,
                views: media.play_count,
                likes: media.like_count,
                comments: media.comment_count,
                shares: None,
            });
            if observations.len() >= limit {
                break 'sections;
            }
        }
    }

    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "data": {
            "top": {
                "sections": [
                    {
                        "layout_content": {
                            "medias": [
                                {
                                    "media": {
                                        "code": "Cxyz1",
                                        "play_count": 40000,
                                        "like_count": 2100,
                                        "comment_count": 35,
                                        "caption": {"text": "reel one"},
                                        "user": {"username": "alice"},
                                        "taken_at": 1704067200
                                    }
                                },
                                {"media": {"code": "Cxyz2"}}
                            ]
                        }
                    }
                ]
            },
            "recent": {
                "sections": [
                    {
                        "layout_content": {
                            "medias": [
                                {"media": {"code": "Cxyz3", "like_count": "1.2K"}}
                            ]
                        }
                    }
                ]
            }
        }
    }"#;

    #[test]
    fn parses_top_and_recent_sections_in_order() {
        let out = parse_tag_info(RESPONSE, "cats", 20, "2024-01-03 00:00:00").expect("parse");
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].video_id, "Cxyz1");
        assert_eq!(out[0].views, Some(RawCount::Number(40_000)));
        assert_eq!(out[0].author.as_deref(), Some("alice"));
        assert_eq!(
            out[0].url.as_deref(),
            Some("https://www.instagram.com/reel/Cxyz1/")
        );
        assert_eq!(out[2].likes, Some(RawCount::Text("1.2K".to_string())));
    }

    #[test]
    fn respects_the_limit_across_sections() {
        let out = parse_tag_info(RESPONSE, "cats", 2, "2024-01-03 00:00:00").expect("parse");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn missing_data_yields_empty_batch() {
        let out = parse_tag_info("{}", "cats", 20, "t").expect("parse");
        assert!(out.is_empty());
    }

    #[test]
    fn malformed_body_is_a_typed_error() {
        let result = parse_tag_info("<!DOCTYPE html>", "cats", 20, "t");
        assert!(matches!(result, Err(ScrapeError::Deserialize { .. })));
    }
}
