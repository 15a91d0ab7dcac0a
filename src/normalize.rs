//! Entry normalization: raw feed entries to display-ready articles.
//!
//! Normalization enforces the contract the rest of the pipeline relies on:
//! every surviving article has a non-empty title, a parseable link, and a
//! concrete UTC timestamp. Entries that cannot meet it are dropped, not
//! patched up, since a headline with a guessed timestamp would rank wrong
//! and mislabel its age.
//!
//! The reference time is passed in rather than read from the clock, so every
//! article in a run gets its age and recency computed against the same
//! instant.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::config::{FeedSource, RunConfig};
use crate::feed::RawEntry;
use crate::models::Article;

/// Normalize one feed entry against a single reference time.
///
/// # Arguments
///
/// * `entry` - The decoded feed entry
/// * `source` - The registry source the entry came from
/// * `now` - The run's reference time
/// * `cfg` - Tuning values for recency and image filtering
///
/// # Returns
///
/// The normalized article, or `None` when the entry lacks a usable title,
/// link, or timestamp.
pub fn normalize(
    entry: &RawEntry,
    source: &FeedSource,
    now: DateTime<Utc>,
    cfg: &RunConfig,
) -> Option<Article> {
    // Published wins; a feed that only tracks updates still gets a timestamp.
    let published_at = entry.published.or(entry.updated)?;

    let title = entry.title.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
    let link = entry.link.as_deref().and_then(|l| Url::parse(l).ok())?;

    // Future-dated entries read as "just now" instead of a negative age.
    let elapsed = (now - published_at).num_seconds().max(0);

    Some(Article {
        title: title.to_string(),
        link,
        source: source.name.clone(),
        section: source.section,
        published_at,
        age: age_string(elapsed),
        is_recent: elapsed < cfg.recency_threshold_secs,
        image: extract_image(entry, cfg),
    })
}

/// Bucket an elapsed duration into the age strings the page shows.
///
/// Boundaries are half-open: 59s is "just now", 60s is "1m ago", 3600s is
/// "1h ago", 86400s is "1d ago".
pub fn age_string(elapsed_secs: i64) -> String {
    if elapsed_secs < 60 {
        "just now".to_string()
    } else if elapsed_secs < 3_600 {
        format!("{}m ago", elapsed_secs / 60)
    } else if elapsed_secs < 86_400 {
        format!("{}h ago", elapsed_secs / 3_600)
    } else {
        format!("{}d ago", elapsed_secs / 86_400)
    }
}

/// Image extraction strategies in priority order. The first one that yields a
/// URL wins; later strategies are never consulted.
const IMAGE_STRATEGIES: [fn(&RawEntry) -> Option<String>; 5] = [
    media_attachment,
    media_thumbnail,
    content_img,
    summary_img,
    first_enclosure,
];

/// Pick the best image URL for an entry, or none.
///
/// A candidate that fails the extension filter or does not parse as a URL is
/// discarded without falling back to later strategies; the article itself is
/// unaffected either way.
fn extract_image(entry: &RawEntry, cfg: &RunConfig) -> Option<Url> {
    let candidate = IMAGE_STRATEGIES.iter().find_map(|strategy| strategy(entry))?;
    if cfg.image_ext_filter && !has_image_extension(&candidate) {
        return None;
    }
    Url::parse(&candidate).ok()
}

fn media_attachment(entry: &RawEntry) -> Option<String> {
    entry.media_content.first().cloned()
}

fn media_thumbnail(entry: &RawEntry) -> Option<String> {
    entry.media_thumbnails.first().cloned()
}

fn content_img(entry: &RawEntry) -> Option<String> {
    entry.content.as_deref().and_then(first_img_src)
}

fn summary_img(entry: &RawEntry) -> Option<String> {
    entry.summary.as_deref().and_then(first_img_src)
}

fn first_enclosure(entry: &RawEntry) -> Option<String> {
    entry.enclosures.first().cloned()
}

static IMAGE_EXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpe?g|png|gif|webp|avif)$").unwrap());

/// Check whether a URL's path ends in a known image extension.
///
/// Query string and fragment are ignored, and a final path segment with no
/// dot at all passes, since CDN image routes often carry no extension.
fn has_image_extension(url: &str) -> bool {
    let path = url
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or(url);
    let segment = path.rsplit('/').next().unwrap_or(path);
    if !segment.contains('.') {
        return true;
    }
    IMAGE_EXT.is_match(segment)
}

/// First `<img src>` in an HTML fragment, skipping tracking pixels.
fn first_img_src(html: &str) -> Option<String> {
    let img_selector = Selector::parse("img[src]").unwrap();
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&img_selector)
        .filter_map(|img| img.value().attr("src"))
        .find(|src| !src.contains("1x1") && !src.contains("pixel") && !src.contains("spacer"))
        .map(str::to_string)
}
