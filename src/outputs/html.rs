//! HTML fragment rendering for the dashboard page.
//!
//! Fragment builders are pure functions over a [`RankedResult`]: no clock
//! access, no I/O. Ages and recency flags were computed by the normalizer
//! against the run's single reference time, so two fragments rendered minutes
//! apart still agree with each other.
//!
//! The page template owns layout and styling; fragments only use the class
//! hooks the template styles (`headline`, `meta`, `fresh`, `no-headlines`).
//! All feed-controlled text and URLs are escaped on the way in.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::config::Section;
use crate::models::{Article, RankedResult};

/// Shown in the breaking slot when nothing survived filtering.
const NO_HEADLINES: &str = r#"<span class="no-headlines">No current headlines</span>"#;

/// Render the breaking slot: the top pick as a single line, or the explicit
/// empty-state span.
pub fn breaking_fragment(result: &RankedResult) -> String {
    match &result.top {
        Some(top) => format!(
            r#"<a href="{}" target="_blank"{}>{}</a> · {} · {}"#,
            encode_double_quoted_attribute(top.link.as_str()),
            fresh_class(top),
            encode_text(&top.title),
            encode_text(&top.source),
            top.age,
        ),
        None => NO_HEADLINES.to_string(),
    }
}

/// Render one section's column: a header plus headline rows per source.
/// Sources with no surviving articles are omitted from the column entirely.
pub fn section_fragment(result: &RankedResult, section: Section) -> String {
    let mut html = String::new();

    for group in result.groups.iter().filter(|g| g.section == section) {
        if group.articles.is_empty() {
            continue;
        }

        let homepage = group
            .homepage
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "#".to_string());
        writeln!(
            html,
            r#"<h3><a href="{}" target="_blank">{}</a></h3>"#,
            encode_double_quoted_attribute(&homepage),
            encode_text(&group.source),
        )
        .unwrap();

        for article in &group.articles {
            writeln!(
                html,
                r#"<div class="headline"><a href="{}" target="_blank"{}>{}</a><div class="meta">{} · {}</div></div>"#,
                encode_double_quoted_attribute(article.link.as_str()),
                fresh_class(article),
                encode_text(&article.title),
                encode_text(&article.source),
                article.age,
            )
            .unwrap();
        }
    }

    html
}

/// Render every fragment the page needs, keyed by marker name.
pub fn page_fragments(result: &RankedResult) -> Vec<(&'static str, String)> {
    let mut fragments = vec![("BREAKING", breaking_fragment(result))];
    for section in Section::ALL {
        fragments.push((section.marker(), section_fragment(result, section)));
    }
    fragments
}

fn fresh_class(article: &Article) -> &'static str {
    if article.is_recent {
        r#" class="fresh""#
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceGroup;
    use chrono::{DateTime, TimeZone, Utc};
    use url::Url;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 4, 16, 0, 0).unwrap()
    }

    fn article(title: &str, source: &str, age: &str, is_recent: bool) -> Article {
        // Source names can contain spaces and '&', so they go in the path,
        // never the host.
        Article {
            title: title.to_string(),
            link: Url::parse(&format!(
                "https://feeds.example.com/{}/{}",
                source.replace(' ', "-").to_lowercase(),
                title.replace(' ', "-").to_lowercase()
            ))
            .unwrap(),
            source: source.to_string(),
            section: Section::Media,
            published_at: now(),
            age: age.to_string(),
            is_recent,
            image: None,
        }
    }

    fn result_with(top: Option<Article>, groups: Vec<SourceGroup>) -> RankedResult {
        RankedResult {
            generated_at: now(),
            top,
            groups,
        }
    }

    #[test]
    fn test_breaking_fragment_renders_pick() {
        let result = result_with(Some(article("Launch today", "SpaceNews", "12m ago", true)), vec![]);
        let html = breaking_fragment(&result);
        assert!(html.contains(r#"class="fresh""#));
        assert!(html.contains("Launch today</a> · SpaceNews · 12m ago"));
    }

    #[test]
    fn test_breaking_fragment_empty_state() {
        let result = result_with(None, vec![]);
        assert_eq!(
            breaking_fragment(&result),
            r#"<span class="no-headlines">No current headlines</span>"#
        );
    }

    #[test]
    fn test_section_fragment_skips_empty_groups() {
        let groups = vec![
            SourceGroup {
                source: "Quiet Source".to_string(),
                section: Section::Media,
                homepage: Some(Url::parse("https://quiet.example.com").unwrap()),
                articles: vec![],
            },
            SourceGroup {
                source: "SpaceNews".to_string(),
                section: Section::Media,
                homepage: Some(Url::parse("https://spacenews.com").unwrap()),
                articles: vec![article("Stage test fired", "SpaceNews", "3h ago", false)],
            },
        ];
        let result = result_with(None, groups);
        let html = section_fragment(&result, Section::Media);
        assert!(!html.contains("Quiet Source"));
        assert!(html.contains("<h3><a href=\"https://spacenews.com/\" target=\"_blank\">SpaceNews</a></h3>"));
        assert!(html.contains("Stage test fired"));
        assert!(html.contains("SpaceNews · 3h ago"));
        // Not recent, so no fresh class anywhere.
        assert!(!html.contains("fresh"));
    }

    #[test]
    fn test_section_fragment_only_its_own_section() {
        let groups = vec![
            SourceGroup {
                source: "SpaceNews".to_string(),
                section: Section::Media,
                homepage: None,
                articles: vec![article("Media story", "SpaceNews", "1h ago", false)],
            },
            SourceGroup {
                source: "NASA News Releases".to_string(),
                section: Section::Gov,
                homepage: None,
                articles: vec![article("Gov story", "NASA News Releases", "2h ago", false)],
            },
        ];
        let result = result_with(None, groups);
        let media = section_fragment(&result, Section::Media);
        assert!(media.contains("Media story"));
        assert!(!media.contains("Gov story"));
        let gov = section_fragment(&result, Section::Gov);
        assert!(gov.contains("Gov story"));
        assert!(!gov.contains("Media story"));
    }

    #[test]
    fn test_missing_homepage_links_to_hash() {
        let groups = vec![SourceGroup {
            source: "SpaceNews".to_string(),
            section: Section::Media,
            homepage: None,
            articles: vec![article("Story", "SpaceNews", "1h ago", false)],
        }];
        let result = result_with(None, groups);
        let html = section_fragment(&result, Section::Media);
        assert!(html.contains(r##"<h3><a href="#" target="_blank">"##));
    }

    #[test]
    fn test_feed_text_is_escaped() {
        let mut a = article("Q&A: <em>crewed</em> flight", "A&B News", "1h ago", false);
        a.link = Url::parse("https://example.com/story?a=1&b=2").unwrap();
        let groups = vec![SourceGroup {
            source: "A&B News".to_string(),
            section: Section::Media,
            homepage: None,
            articles: vec![a],
        }];
        let result = result_with(None, groups);
        let html = section_fragment(&result, Section::Media);
        assert!(html.contains("Q&amp;A: &lt;em&gt;crewed&lt;/em&gt; flight"));
        assert!(html.contains("A&amp;B News"));
        assert!(html.contains("https://example.com/story?a=1&amp;b=2"));
        assert!(!html.contains("<em>"));
    }

    #[test]
    fn test_page_fragments_covers_every_marker() {
        let result = result_with(None, vec![]);
        let fragments = page_fragments(&result);
        let names: Vec<&str> = fragments.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["BREAKING", "MEDIA", "GOV", "INTL"]);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let groups = vec![SourceGroup {
            source: "SpaceNews".to_string(),
            section: Section::Media,
            homepage: Some(Url::parse("https://spacenews.com").unwrap()),
            articles: vec![article("Story", "SpaceNews", "2h ago", false)],
        }];
        let result = result_with(Some(article("Top", "SpaceNews", "5m ago", true)), groups);
        assert_eq!(page_fragments(&result), page_fragments(&result));
    }
}
