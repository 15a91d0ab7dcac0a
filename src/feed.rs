//! Feed fetching and syndication decoding.
//!
//! One [`FeedClient`] is shared across the run. [`FeedClient::fetch`] pulls a
//! feed over HTTP and decodes it, trying RSS first and falling back to Atom on
//! the same bytes, since plenty of endpoints serve one while advertising the
//! other. Decoding flattens both formats into [`RawEntry`] so the rest of the
//! pipeline never sees format-specific types.
//!
//! Failures here are per-source: the caller logs them and moves on, and a
//! broken feed costs only its own column entries.

use atom_syndication::Feed;
use chrono::{DateTime, Utc};
use rss::Channel;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Errors from fetching or decoding a single feed.
#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("{url} is neither valid RSS nor Atom")]
    Parse { url: String },
}

/// A feed entry flattened out of either syndication format.
///
/// Only the fields the normalizer consumes are kept. Every field is optional
/// or may be empty; the normalizer decides what disqualifies an entry.
#[derive(Debug, Clone, Default)]
pub struct RawEntry {
    /// Entry title as the feed gave it, untrimmed.
    pub title: Option<String>,
    /// Link to the story.
    pub link: Option<String>,
    /// Publication timestamp, parsed to UTC.
    pub published: Option<DateTime<Utc>>,
    /// Last-updated timestamp, parsed to UTC.
    pub updated: Option<DateTime<Utc>>,
    /// Full content HTML, when the feed inlines it.
    pub content: Option<String>,
    /// Summary or description HTML.
    pub summary: Option<String>,
    /// URLs from `media:content` elements that look like images.
    pub media_content: Vec<String>,
    /// URLs from `media:thumbnail` elements.
    pub media_thumbnails: Vec<String>,
    /// Enclosure URLs, in feed order.
    pub enclosures: Vec<String>,
}

/// HTTP client wrapper for feed endpoints.
pub struct FeedClient {
    client: reqwest::Client,
}

impl FeedClient {
    /// Build a client with a 10 second timeout and an identifying user agent.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("orbitwire/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        FeedClient { client }
    }

    /// Fetch one feed and decode its entries in feed order.
    ///
    /// # Arguments
    ///
    /// * `url` - The feed endpoint to pull
    ///
    /// # Returns
    ///
    /// Decoded entries, or a [`FeedError`] describing which stage failed.
    #[instrument(level = "debug", skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<Vec<RawEntry>, FeedError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| FeedError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FeedError::Request(e.to_string()))?;

        if let Ok(channel) = Channel::read_from(&bytes[..]) {
            let entries: Vec<RawEntry> = channel.items().iter().map(decode_rss_item).collect();
            debug!(count = entries.len(), format = "rss", "decoded feed");
            return Ok(entries);
        }

        if let Ok(feed) = Feed::read_from(&bytes[..]) {
            let entries: Vec<RawEntry> = feed.entries().iter().map(decode_atom_entry).collect();
            debug!(count = entries.len(), format = "atom", "decoded feed");
            return Ok(entries);
        }

        Err(FeedError::Parse {
            url: url.to_string(),
        })
    }
}

/// Flatten one RSS item.
fn decode_rss_item(item: &rss::Item) -> RawEntry {
    let (media_content, media_thumbnails) = rss_media_urls(item);
    RawEntry {
        title: item.title().map(str::to_string),
        link: item.link().map(str::to_string),
        published: item.pub_date().and_then(parse_feed_date),
        updated: None,
        content: item.content().map(str::to_string),
        summary: item.description().map(str::to_string),
        media_content,
        media_thumbnails,
        enclosures: item
            .enclosure()
            .map(|e| vec![e.url().to_string()])
            .unwrap_or_default(),
    }
}

/// Flatten one Atom entry.
fn decode_atom_entry(entry: &atom_syndication::Entry) -> RawEntry {
    // Prefer the alternate link; fall back to whatever link comes first.
    let link = entry
        .links()
        .iter()
        .find(|l| l.rel() == "alternate")
        .or_else(|| entry.links().first())
        .map(|l| l.href().to_string());

    let enclosures = entry
        .links()
        .iter()
        .filter(|l| l.rel() == "enclosure")
        .map(|l| l.href().to_string())
        .collect();

    let (media_content, media_thumbnails) = atom_media_urls(entry);

    RawEntry {
        title: Some(entry.title().to_string()).filter(|t| !t.is_empty()),
        link,
        published: entry.published().map(|d| d.with_timezone(&Utc)),
        updated: Some(entry.updated().with_timezone(&Utc)),
        content: entry.content().and_then(|c| c.value()).map(str::to_string),
        summary: entry.summary().map(|s| s.as_str().to_string()),
        media_content,
        media_thumbnails,
        enclosures,
    }
}

/// Parse the date formats feeds actually serve: RFC 2822 from RSS, RFC 3339
/// from Atom and from the many RSS feeds that emit it anyway.
fn parse_feed_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Collect `media:content` and `media:thumbnail` URLs from an RSS item's
/// extension tree.
fn rss_media_urls(item: &rss::Item) -> (Vec<String>, Vec<String>) {
    let mut content = Vec::new();
    let mut thumbnails = Vec::new();

    if let Some(media) = item.extensions().get("media") {
        for ext in media.get("content").into_iter().flatten() {
            if media_looks_like_image(ext.attrs()) {
                if let Some(url) = ext.attrs().get("url") {
                    content.push(url.clone());
                }
            }
            // media:content may nest its thumbnail as a child element.
            for thumb in ext.children().get("thumbnail").into_iter().flatten() {
                if let Some(url) = thumb.attrs().get("url") {
                    thumbnails.push(url.clone());
                }
            }
        }
        for ext in media.get("thumbnail").into_iter().flatten() {
            if let Some(url) = ext.attrs().get("url") {
                thumbnails.push(url.clone());
            }
        }
    }

    (content, thumbnails)
}

/// Collect media extension URLs from an Atom entry.
fn atom_media_urls(entry: &atom_syndication::Entry) -> (Vec<String>, Vec<String>) {
    let mut content = Vec::new();
    let mut thumbnails = Vec::new();

    if let Some(media) = entry.extensions().get("media") {
        for ext in media.get("content").into_iter().flatten() {
            if media_looks_like_image(ext.attrs()) {
                if let Some(url) = ext.attrs().get("url") {
                    content.push(url.clone());
                }
            }
            for thumb in ext.children().get("thumbnail").into_iter().flatten() {
                if let Some(url) = thumb.attrs().get("url") {
                    thumbnails.push(url.clone());
                }
            }
        }
        for ext in media.get("thumbnail").into_iter().flatten() {
            if let Some(url) = ext.attrs().get("url") {
                thumbnails.push(url.clone());
            }
        }
    }

    (content, thumbnails)
}

/// A media element counts as an image when its `medium` and `type` attributes
/// are absent or image-typed. Video thumbnails declare `medium="video"` and
/// get skipped here.
fn media_looks_like_image(attrs: &BTreeMap<String, String>) -> bool {
    let medium_ok = attrs.get("medium").is_none_or(|m| m == "image");
    let type_ok = attrs.get("type").is_none_or(|t| t.starts_with("image/"));
    medium_ok && type_ok
}
