//! `YouTube` search feed source.
//!
//! The public search feed carries per-video statistics in the
//! `media:community` block: view counts on `media:statistics` and like counts
//! on `media:starRating`. Comment counts are not exposed by the feed.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use quick_xml::events::Event;
use quick_xml::Reader;

use clipwatch_core::{Observation, RawCount};

use crate::client::SourceClient;
use crate::error::ScrapeError;

use super::raw_count;

/// Fetch search feed entries for `query`.
///
/// # Errors
///
/// Returns [`ScrapeError::Http`] (and friends) for transport failures and
/// [`ScrapeError::Xml`] for malformed feed content.
pub(crate) async fn fetch_youtube(
    client: &SourceClient,
    query: &str,
    limit: usize,
    collected_at: &str,
) -> Result<Vec<Observation>, ScrapeError> {
    let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
    let url = format!("https://www.youtube.com/feeds/videos.xml?search_query={encoded}");

    let body = client.get_text(&url, &[]).await?;
    parse_search_feed(&body, query, limit, collected_at)
}

fn parse_search_feed(
    xml: &str,
    query: &str,
    limit: usize,
    collected_at: &str,
) -> Result<Vec<Observation>, ScrapeError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_entry = false;
    let mut current_tag = String::new();
    let mut video_id = String::new();
    let mut title = String::new();
    let mut author = String::new();
    let mut published = String::new();
    let mut video_url = String::new();
    let mut views = String::new();
    let mut likes = String::new();
    let mut observations = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                if name == "entry" {
                    in_entry = true;
                    video_id.clear();
                    title.clear();
                    author.clear();
                    published.clear();
                    video_url.clear();
                    views.clear();
                    likes.clear();
                } else {
                    current_tag = name.to_string();
                }
            }
            Ok(Event::Empty(e)) => {
                if !in_entry {
                    continue;
                }
                let name_buf = e.name().as_ref().to_vec();
                match name_buf.as_slice() {
                    b"link" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"href" {
                                let href = String::from_utf8_lossy(attr.value.as_ref()).to_string();
                                if href.contains("youtube.com/watch") {
                                    video_url = href;
                                }
                            }
                        }
                    }
                    b"media:statistics" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"views" {
                                views = String::from_utf8_lossy(attr.value.as_ref()).to_string();
                            }
                        }
                    }
                    b"media:starRating" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"count" {
                                likes = String::from_utf8_lossy(attr.value.as_ref()).to_string();
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if in_entry {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    match current_tag.as_str() {
                        "yt:videoId" => video_id = text,
                        "title" => title = text,
                        "name" => author = text,
                        "published" => published = text,
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                if name_buf.as_slice() == b"entry" {
                    in_entry = false;
                    if !video_id.is_empty() {
                        observations.push(Observation {
                            platform: "youtube".to_string(),
                            video_id: video_id.clone(),
                            collected_at: collected_at.to_string(),
                            query: query.to_string(),
                            title: (!title.is_empty()).then(|| title.clone()),
                            url: if video_url.is_empty() {
                                Some(format!("https://www.youtube.com/watch?v={video_id}"))
                            } else {
                                Some(video_url.clone())
                            },
                            author: (!author.is_empty()).then(|| author.clone()),
                            publish_time: (!published.is_empty()).then(|| published.clone()),
                            views: (!views.is_empty()).then(|| raw_count(&views)),
                            likes: (!likes.is_empty()).then(|| raw_count(&likes)),
                            // Not exposed by the feed.
                            comments: Some(RawCount::Text("N/A".to_string())),
                            shares: None,
                        });
                        if observations.len() >= limit {
                            break;
                        }
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ScrapeError::Xml(e)),
            _ => {}
        }
    }

    Ok(observations)
}
