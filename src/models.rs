//! Data models for normalized articles and ranked output.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`Article`]: A normalized headline with display-ready fields
//! - [`SourceGroup`]: One source's capped headline list
//! - [`RankedResult`]: The full outcome of a run: the breaking pick plus
//!   per-source groups
//!
//! All types serialize to JSON for the optional snapshot output, so field
//! names double as the snapshot schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Section;

/// A normalized article ready for ranking and rendering.
///
/// Every `Article` carries a concrete publication timestamp: entries without
/// one are dropped during normalization rather than guessed at. The `age` and
/// `is_recent` fields are computed once against the run's single reference
/// time, so every rendered fragment agrees on what "now" means.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Headline text, trimmed, never empty.
    pub title: String,
    /// Absolute link to the story.
    pub link: Url,
    /// Registry name of the source this came from.
    pub source: String,
    /// Section the source belongs to.
    pub section: Section,
    /// Publication timestamp in UTC. Falls back to the feed's updated
    /// timestamp when the entry has no published one.
    pub published_at: DateTime<Utc>,
    /// Human-readable age relative to the run's reference time,
    /// e.g. "just now", "12m ago", "3h ago", "2d ago".
    pub age: String,
    /// True when the article is younger than the recency threshold.
    pub is_recent: bool,
    /// Best image found for the entry, if any survived extraction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Url>,
}

/// One source's headlines after ranking, in rank order, capped per config.
///
/// A group exists for every registry source even when it contributed no
/// articles this run; the renderer decides what an empty group looks like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceGroup {
    /// Registry name of the source.
    pub source: String,
    /// Section the group is rendered in.
    pub section: Section,
    /// Homepage the group header links to.
    pub homepage: Option<Url>,
    /// Headlines in global rank order, at most `group_cap` of them.
    pub articles: Vec<Article>,
}

/// The complete outcome of one aggregation run.
///
/// `top` is the single breaking pick; it never also appears inside `groups`.
/// `groups` follow registry declaration order exactly, one per source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    /// Reference time the run was anchored to.
    pub generated_at: DateTime<Utc>,
    /// The breaking pick, when any article survived the freshness window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Article>,
    /// Per-source groups in registry order.
    pub groups: Vec<SourceGroup>,
}

impl RankedResult {
    /// True when no article survived filtering at all.
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.groups.iter().all(|g| g.articles.is_empty())
    }
}
