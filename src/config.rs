//! Feed source registry and run tuning.
//!
//! The registry is a single declarative table mapping a human-readable source
//! name to its feed endpoint, optional homepage, and display section. It is
//! loaded once at startup and immutable for the run. Declaration order is
//! meaningful: it fixes the column layout and breaks ranking ties, so the page
//! stays stable from run to run even as article content changes.
//!
//! A YAML file passed via `--sources` replaces the built-in table and may
//! override the tuning values:
//!
//! ```yaml
//! tuning:
//!   freshness_window_hours: 48
//!   group_cap: 6
//!   recency_threshold_secs: 7200
//!   image_ext_filter: true
//! sources:
//!   - name: SpaceNews
//!     endpoint: https://spacenews.com/feed/
//!     homepage: https://spacenews.com
//!     section: media
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use url::Url;

/// Display section a source belongs to. Each section maps to one column of
/// the dashboard page and one pair of splice markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Trade press and general media.
    Media,
    /// Government and military sources.
    Gov,
    /// International agencies and science outlets.
    Intl,
}

impl Section {
    /// All sections in display order.
    pub const ALL: [Section; 3] = [Section::Media, Section::Gov, Section::Intl];

    /// Marker name used in the page template, e.g. `<!-- START MEDIA -->`.
    pub fn marker(self) -> &'static str {
        match self {
            Section::Media => "MEDIA",
            Section::Gov => "GOV",
            Section::Intl => "INTL",
        }
    }
}

/// One feed source: where to fetch it and where it appears on the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSource {
    /// Human-readable name, also the grouping key for headlines.
    pub name: String,
    /// RSS or Atom endpoint.
    pub endpoint: Url,
    /// Homepage the source header links to.
    pub homepage: Option<Url>,
    /// Column the source is rendered in.
    pub section: Section,
}

/// Ordered, immutable source table for one run.
#[derive(Debug, Clone)]
pub struct Registry {
    sources: Vec<FeedSource>,
}

impl Registry {
    /// Wrap an ordered source list.
    pub fn new(sources: Vec<FeedSource>) -> Self {
        Registry { sources }
    }

    /// The built-in space and defense source table.
    pub fn builtin() -> Self {
        let sources = vec![
            src(
                "Air & Space Forces Magazine",
                "https://www.airandspaceforces.com/feed/",
                "https://www.airandspaceforces.com",
                Section::Media,
            ),
            src(
                "Breaking Defense",
                "https://breakingdefense.com/feed/",
                "https://breakingdefense.com",
                Section::Media,
            ),
            src(
                "SpaceNews",
                "https://spacenews.com/feed/",
                "https://spacenews.com",
                Section::Media,
            ),
            src(
                "SpaceRef",
                "https://spaceref.com/rss/",
                "https://spaceref.com",
                Section::Media,
            ),
            src(
                "Ars Technica (Space)",
                "https://feeds.arstechnica.com/arstechnica/space/",
                "https://arstechnica.com/space",
                Section::Media,
            ),
            src(
                "The Verge – Space",
                "https://www.theverge.com/rss/space/index.xml",
                "https://www.theverge.com/space",
                Section::Media,
            ),
            src(
                "Military.com – Space",
                "https://www.military.com/rss/subject/19456/feed.xml",
                "https://www.military.com/space",
                Section::Media,
            ),
            src(
                "Space Force – Headlines",
                "https://www.spaceforce.mil/RSS/headlines.xml",
                "https://www.spaceforce.mil",
                Section::Gov,
            ),
            src(
                "Space Force – Lines of Effort",
                "https://www.spaceforce.mil/RSS/lines-of-effort.xml",
                "https://www.spaceforce.mil",
                Section::Gov,
            ),
            src(
                "Space Force – Field News",
                "https://www.spaceforce.mil/RSS/field-news.xml",
                "https://www.spaceforce.mil",
                Section::Gov,
            ),
            src(
                "Space Force – US Forces",
                "https://www.spaceforce.mil/RSS/us-space-forces-space.xml",
                "https://www.spaceforce.mil",
                Section::Gov,
            ),
            src(
                "NASA News Releases",
                "https://www.nasa.gov/news-release/feed/",
                "https://www.nasa.gov",
                Section::Gov,
            ),
            src(
                "ESA – European Space Agency",
                "https://www.esa.int/rssfeed/Our_Activities",
                "https://www.esa.int",
                Section::Intl,
            ),
            src(
                "Phys.org – Space",
                "https://phys.org/rss-feed/space-news/",
                "https://phys.org/space-news/",
                Section::Intl,
            ),
        ];
        Registry { sources }
    }

    /// Sources in declaration order.
    pub fn sources(&self) -> &[FeedSource] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

fn src(name: &str, endpoint: &str, homepage: &str, section: Section) -> FeedSource {
    FeedSource {
        name: name.to_string(),
        endpoint: Url::parse(endpoint).expect("builtin feed endpoint"),
        homepage: Some(Url::parse(homepage).expect("builtin homepage")),
        section,
    }
}

/// Tuning values for one run. Defaults follow the dashboard's policy: a 48h
/// freshness window, six headlines per source, and a 2h "fresh" highlight.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Articles older than this many hours are dropped entirely.
    pub freshness_window_hours: i64,
    /// Maximum headlines kept per source after ranking.
    pub group_cap: usize,
    /// Articles younger than this many seconds are flagged as recent.
    pub recency_threshold_secs: i64,
    /// When set, extracted image URLs with a non-image file extension are
    /// discarded instead of rendered.
    pub image_ext_filter: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            freshness_window_hours: 48,
            group_cap: 6,
            recency_threshold_secs: 7200,
            image_ext_filter: true,
        }
    }
}

impl RunConfig {
    pub fn freshness_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.freshness_window_hours)
    }

    /// Reject tuning values outside the ranges the pipeline can run with.
    fn validate(&self) -> Result<(), String> {
        // chrono::Duration::hours panics once the hours overflow its
        // millisecond range; a century stays far inside it.
        const MAX_WINDOW_HOURS: i64 = 24 * 365 * 100;
        if !(1..=MAX_WINDOW_HOURS).contains(&self.freshness_window_hours) {
            return Err(format!(
                "freshness_window_hours must be between 1 and {MAX_WINDOW_HOURS}, got {}",
                self.freshness_window_hours
            ));
        }
        if self.recency_threshold_secs < 0 {
            return Err(format!(
                "recency_threshold_secs must not be negative, got {}",
                self.recency_threshold_secs
            ));
        }
        if self.group_cap == 0 {
            return Err("group_cap must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Registry plus tuning, resolved from the CLI at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub registry: Registry,
    pub run: RunConfig,
}

/// Load configuration. With no path the built-in table and default tuning are
/// used; with a path the YAML file must declare at least one source and keep
/// its tuning values in range.
pub fn load(path: Option<&str>) -> Result<AppConfig, Box<dyn Error>> {
    match path {
        None => Ok(AppConfig {
            registry: Registry::builtin(),
            run: RunConfig::default(),
        }),
        Some(p) => {
            let text = std::fs::read_to_string(p)?;
            let file: SourcesFile = serde_yaml::from_str(&text)?;
            let registry = Registry::new(file.sources);
            if registry.is_empty() {
                return Err(format!("{p}: sources file declares no sources").into());
            }
            file.tuning.validate().map_err(|msg| format!("{p}: {msg}"))?;
            Ok(AppConfig {
                registry,
                run: file.tuning,
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct SourcesFile {
    #[serde(default)]
    tuning: RunConfig,
    sources: Vec<FeedSource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_sections_are_ordered() {
        let registry = Registry::builtin();
        assert_eq!(registry.len(), 14);

        // Declaration order groups sections together: media, then gov, then intl.
        let sections: Vec<Section> = registry.sources().iter().map(|s| s.section).collect();
        let first_gov = sections.iter().position(|s| *s == Section::Gov).unwrap();
        let first_intl = sections.iter().position(|s| *s == Section::Intl).unwrap();
        assert!(sections[..first_gov].iter().all(|s| *s == Section::Media));
        assert!(sections[first_gov..first_intl].iter().all(|s| *s == Section::Gov));
        assert!(sections[first_intl..].iter().all(|s| *s == Section::Intl));
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let registry = Registry::builtin();
        let mut names: Vec<&str> = registry.sources().iter().map(|s| s.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), registry.len());
    }

    #[test]
    fn test_run_config_defaults() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.freshness_window_hours, 48);
        assert_eq!(cfg.group_cap, 6);
        assert_eq!(cfg.recency_threshold_secs, 7200);
        assert!(cfg.image_ext_filter);
    }

    #[test]
    fn test_sources_yaml_parsing() {
        let yaml = r#"
tuning:
  freshness_window_hours: 24
  group_cap: 3
sources:
  - name: SpaceNews
    endpoint: https://spacenews.com/feed/
    homepage: https://spacenews.com
    section: media
  - name: NASA News Releases
    endpoint: https://www.nasa.gov/news-release/feed/
    section: gov
"#;
        let file: SourcesFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.sources.len(), 2);
        assert_eq!(file.tuning.freshness_window_hours, 24);
        assert_eq!(file.tuning.group_cap, 3);
        // Unspecified tuning keys keep their defaults.
        assert_eq!(file.tuning.recency_threshold_secs, 7200);
        assert_eq!(file.sources[0].section, Section::Media);
        assert!(file.sources[1].homepage.is_none());
    }

    #[test]
    fn test_sources_yaml_rejects_unknown_section() {
        let yaml = r#"
sources:
  - name: Example
    endpoint: https://example.com/feed/
    section: weather
"#;
        assert!(serde_yaml::from_str::<SourcesFile>(yaml).is_err());
    }

    fn write_sources_file(name: &str, yaml: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "orbitwire-sources-{name}-{}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn test_load_rejects_sources_file_with_no_sources() {
        let path = write_sources_file("empty", "sources: []\n");
        let err = load(path.to_str()).unwrap_err().to_string();
        assert!(err.contains("declares no sources"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_out_of_range_tuning() {
        let yaml = r#"
tuning:
  freshness_window_hours: 10000000000000
sources:
  - name: SpaceNews
    endpoint: https://spacenews.com/feed/
    section: media
"#;
        let path = write_sources_file("huge-window", yaml);
        let err = load(path.to_str()).unwrap_err().to_string();
        assert!(err.contains("freshness_window_hours"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_default_tuning_is_in_range() {
        assert!(RunConfig::default().validate().is_ok());
    }

    #[test]
    fn test_tuning_rejects_out_of_range_window() {
        let zero = RunConfig {
            freshness_window_hours: 0,
            ..RunConfig::default()
        };
        assert!(zero.validate().unwrap_err().contains("freshness_window_hours"));

        let huge = RunConfig {
            freshness_window_hours: 10_000_000_000_000,
            ..RunConfig::default()
        };
        assert!(huge.validate().unwrap_err().contains("freshness_window_hours"));
    }

    #[test]
    fn test_tuning_rejects_negative_recency_threshold() {
        let cfg = RunConfig {
            recency_threshold_secs: -1,
            ..RunConfig::default()
        };
        assert!(cfg.validate().unwrap_err().contains("recency_threshold_secs"));
    }

    #[test]
    fn test_tuning_rejects_zero_group_cap() {
        let cfg = RunConfig {
            group_cap: 0,
            ..RunConfig::default()
        };
        assert!(cfg.validate().unwrap_err().contains("group_cap"));
    }

    #[test]
    fn test_section_markers() {
        assert_eq!(Section::Media.marker(), "MEDIA");
        assert_eq!(Section::Gov.marker(), "GOV");
        assert_eq!(Section::Intl.marker(), "INTL");
    }
}
