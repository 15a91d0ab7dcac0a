//! Ranking: freshness filtering, global ordering, the breaking pick, and
//! per-source grouping.
//!
//! Ordering is newest first with deterministic ties: callers assemble the
//! input in registry order with each source's entries in feed order, and the
//! stable sort preserves exactly that order among equal timestamps. No
//! secondary comparator is needed.
//!
//! The single breaking pick is taken off the top of the global order and
//! never repeated inside a group. Groups exist for every registry source, in
//! registry order, whether or not the source contributed anything this run.

use chrono::{DateTime, Utc};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::config::{Registry, RunConfig};
use crate::models::{Article, RankedResult, SourceGroup};

/// Rank normalized articles into the page's shape.
///
/// # Arguments
///
/// * `articles` - Normalized articles in registry order, feed order within
///   each source
/// * `registry` - The run's source table, fixing group order
/// * `now` - The run's reference time
/// * `cfg` - Freshness window and group cap
///
/// # Returns
///
/// The breaking pick plus one group per registry source. Valid and empty when
/// nothing survived the window.
#[instrument(level = "debug", skip_all)]
pub fn rank(
    mut articles: Vec<Article>,
    registry: &Registry,
    now: DateTime<Utc>,
    cfg: &RunConfig,
) -> RankedResult {
    let before = articles.len();
    let window = cfg.freshness_window();
    articles.retain(|a| now - a.published_at <= window);
    debug!(
        kept = articles.len(),
        dropped = before - articles.len(),
        "freshness window applied"
    );

    // Stable sort: equal timestamps keep the caller's registry-then-feed
    // order, which is the tie-break contract.
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    // Same story syndicated by two sources counts once, at its best rank.
    let mut ranked = articles.into_iter().unique_by(|a| a.link.clone());
    let top = ranked.next();

    let mut groups: Vec<SourceGroup> = registry
        .sources()
        .iter()
        .map(|s| SourceGroup {
            source: s.name.clone(),
            section: s.section,
            homepage: s.homepage.clone(),
            articles: Vec::new(),
        })
        .collect();

    for article in ranked {
        if let Some(group) = groups.iter_mut().find(|g| g.source == article.source) {
            if group.articles.len() < cfg.group_cap {
                group.articles.push(article);
            }
        }
    }

    RankedResult {
        generated_at: now,
        top,
        groups,
    }
}
