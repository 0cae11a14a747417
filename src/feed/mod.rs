//! Sermon recordings from the kerkdienstgemist.nl playlist feed.
//!
//! The widget only needs an ordered list of [`SermonItem`]s; where they come
//! from sits behind [`FeedSource`] so tests can hand in parsed XML directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration as StdDuration;

use crate::constants::api::REQUEST_TIMEOUT_SECS;
use crate::constants::feed::PLAYLIST_HOST;
use crate::error::{Error, Result};

/// Namespace prefix the `rss` crate files Media RSS extensions under.
const MEDIA_PREFIX: &str = "media";

/// Feed URL for a playlist id.
pub fn playlist_feed_url(playlist_id: &str) -> String {
    format!("https://{PLAYLIST_HOST}/playlists/{}.rss?media=video", playlist_id.trim())
}

/// One recorded service in the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SermonItem {
    /// Item title.
    pub title: String,
    /// Link to the recording page.
    pub permalink: Option<String>,
    /// Publication time, when it parses as RFC 2822.
    pub published: Option<DateTime<Utc>>,
    /// `itunes:author`, usually the preacher.
    pub author: Option<String>,
    /// `media:thumbnail` URL.
    pub thumbnail: Option<String>,
    /// HTML description, often the liturgy.
    pub description: Option<String>,
}

/// Something that can list the items of a playlist.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch up to `max_items` items of the playlist, in feed order.
    async fn latest(&self, playlist_id: &str, max_items: usize) -> Result<Vec<SermonItem>>;
}

/// [`FeedSource`] that downloads the RSS document over HTTP.
#[derive(Clone)]
pub struct RssFeedSource {
    client: Client,
}

impl RssFeedSource {
    /// Create a source with the standard request timeout.
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for RssFeedSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    async fn latest(&self, playlist_id: &str, max_items: usize) -> Result<Vec<SermonItem>> {
        let url = playlist_feed_url(playlist_id);
        tracing::info!("Fetching sermon feed {url}");

        let resp = self.client.get(&url).send().await
            .map_err(|e| Error::Feed(format!("Request to {url} failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(Error::Feed(format!("{url} answered {}", resp.status())));
        }
        let body = resp.bytes().await
            .map_err(|e| Error::Feed(format!("Reading {url} failed: {e}")))?;

        let channel = rss::Channel::read_from(body.as_ref())
            .map_err(|e| Error::Feed(format!("Invalid RSS from {url}: {e}")))?;
        Ok(parse_channel(&channel, max_items))
    }
}

/// Convert a parsed channel into sermon items, keeping at most `max_items`.
pub fn parse_channel(channel: &rss::Channel, max_items: usize) -> Vec<SermonItem> {
    channel.items()
        .iter()
        .take(max_items)
        .map(|item| SermonItem {
            title: item.title().unwrap_or_default().to_string(),
            permalink: item.link()
                .map(String::from)
                .or_else(|| item.guid().filter(|g| g.is_permalink()).map(|g| g.value().to_string())),
            published: item.pub_date()
                .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            author: item.itunes_ext()
                .and_then(|ext| ext.author())
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from),
            thumbnail: thumbnail_url(item),
            description: item.description()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
        })
        .collect()
}

fn thumbnail_url(item: &rss::Item) -> Option<String> {
    item.extensions()
        .get(MEDIA_PREFIX)?
        .get("thumbnail")?
        .iter()
        .find_map(|ext| ext.attrs().get("url"))
        .filter(|url| !url.is_empty())
        .cloned()
}
