//! Project index entries, detail records and their merge.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::block::{ContentBlock, StoryHook};
use super::metric::{Metric, lenient_metrics, opt_display_text, opt_lenient_metrics};

/// Per-project color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Blue,
    Green,
    /// Also the fallback for unrecognised values.
    #[default]
    #[serde(other)]
    Neutral,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Neutral => "neutral",
        }
    }

    /// CSS modifier class, e.g. `theme-blue`.
    pub fn class(self) -> String {
        format!("theme-{}", self.as_str())
    }
}

/// Deserialize a list, treating `null` as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value: Option<Vec<T>> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

// ============================================================================
// Technical sections
// ============================================================================

/// Ordered `label -> [items]` mapping (`"technical": {"Stack": ["Rust", "DB: Postgres"]}`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnicalSections(pub Vec<TechnicalSection>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicalSection {
    pub label: String,
    pub items: Vec<String>,
}

/// One technical item, split when it encodes `key: value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechnicalItem<'a> {
    Pair(&'a str, &'a str),
    Plain(&'a str),
}

impl<'a> TechnicalItem<'a> {
    pub fn parse(item: &'a str) -> Self {
        match item.split_once(':') {
            // "https://..." is not a pair
            Some((key, value))
                if !key.trim().is_empty()
                    && !value.trim().is_empty()
                    && !value.starts_with("//") =>
            {
                Self::Pair(key.trim(), value.trim())
            }
            _ => Self::Plain(item.trim()),
        }
    }
}

impl TechnicalSection {
    pub fn entries(&self) -> impl Iterator<Item = TechnicalItem<'_>> {
        self.items.iter().map(|item| TechnicalItem::parse(item))
    }
}

impl TechnicalSections {
    pub fn iter(&self) -> impl Iterator<Item = &TechnicalSection> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for TechnicalSections {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map: Option<Map<String, Value>> = Option::deserialize(deserializer)?;
        let sections = map
            .unwrap_or_default()
            .into_iter()
            .map(|(label, value)| {
                let items = match value {
                    Value::String(item) => vec![item],
                    Value::Array(list) => list
                        .into_iter()
                        .filter_map(|v| match v {
                            Value::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                    _ => Vec::new(),
                };
                TechnicalSection { label, items }
            })
            .collect();
        Ok(Self(sections))
    }
}

// ============================================================================
// Project index entry
// ============================================================================

/// The lightweight, always-loaded summary record for one project.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectEntry {
    /// Key of the entry in the index object.
    #[serde(skip)]
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub short_subtitle: Option<String>,
    pub company: Option<String>,
    #[serde(deserialize_with = "opt_display_text")]
    pub year: Option<String>,
    pub duration: Option<String>,
    pub job_title: Option<String>,
    pub theme: Theme,
    #[serde(deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    pub card_overview: Option<String>,
    pub story_teaser: Option<String>,
    pub story_hook: Option<StoryHook>,
    pub hero_image: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub hero_images: Vec<String>,
    #[serde(deserialize_with = "lenient_metrics")]
    pub card_metrics: Vec<Metric>,
    #[serde(deserialize_with = "opt_lenient_metrics")]
    pub detail_metrics: Option<Vec<Metric>>,
    pub content_file: Option<String>,
    pub content_blocks: Option<Vec<ContentBlock>>,
    pub technical: TechnicalSections,
    pub overview: Option<String>,
}

/// Where the body content of a case study comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodySource<'a> {
    /// Fetch this detail record first.
    Lazy(&'a str),
    Inline(&'a [ContentBlock]),
    Empty,
}

/// Hero-region hook, resolved from the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeroHook {
    Quote(StoryHook),
    Teaser(String),
}

impl ProjectEntry {
    /// `contentFile` wins when both sources are present.
    pub fn body_source(&self) -> BodySource<'_> {
        if let Some(path) = self.content_file.as_deref().filter(|p| !p.trim().is_empty()) {
            return BodySource::Lazy(path);
        }
        match self.content_blocks.as_deref() {
            Some(blocks) => BodySource::Inline(blocks),
            None => BodySource::Empty,
        }
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        self.content_blocks.as_deref().unwrap_or_default()
    }

    /// `subtitle`, falling back to `shortSubtitle`.
    pub fn display_subtitle(&self) -> Option<&str> {
        self.subtitle
            .as_deref()
            .or(self.short_subtitle.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    /// `heroImages` when non-empty, otherwise `heroImage`.
    pub fn hero_images(&self) -> Vec<&str> {
        if !self.hero_images.is_empty() {
            return self.hero_images.iter().map(String::as_str).collect();
        }
        self.hero_image
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .into_iter()
            .collect()
    }

    /// `detailMetrics` when supplied and non-empty, otherwise `cardMetrics`.
    pub fn effective_metrics(&self) -> &[Metric] {
        match self.detail_metrics.as_deref() {
            Some(detail) if !detail.is_empty() => detail,
            _ => &self.card_metrics,
        }
    }

    /// Explicit `storyHook` > first decodable `story-hook` block > `storyTeaser`.
    pub fn hero_hook(&self) -> Option<HeroHook> {
        if let Some(hook) = &self.story_hook {
            return Some(HeroHook::Quote(hook.clone()));
        }
        let from_blocks = self
            .blocks()
            .iter()
            .filter(|block| block.is_story_hook())
            .find_map(|block| block.decode::<StoryHook>().ok());
        if let Some(hook) = from_blocks {
            return Some(HeroHook::Quote(hook));
        }
        self.story_teaser
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| HeroHook::Teaser(s.to_string()))
    }

    /// Overview text: explicit `overview`, falling back to `cardOverview`.
    pub fn overview_text(&self) -> Option<&str> {
        self.overview
            .as_deref()
            .or(self.card_overview.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    /// Shallow-merge a detail record over this entry.
    ///
    /// Present detail fields win; lists replace wholesale; absent fields keep
    /// the entry's values.
    pub fn merge(&mut self, detail: DetailRecord) {
        let DetailRecord {
            title,
            subtitle,
            job_title,
            duration,
            detail_metrics,
            content_blocks,
            story_hook,
            hero_image,
            hero_images,
            overview,
            tags,
            technical,
        } = detail;

        override_field(&mut self.title, title);
        override_option(&mut self.subtitle, subtitle);
        override_option(&mut self.job_title, job_title);
        override_option(&mut self.duration, duration);
        override_option(&mut self.detail_metrics, detail_metrics);
        override_option(&mut self.content_blocks, content_blocks);
        override_option(&mut self.story_hook, story_hook);
        override_option(&mut self.hero_image, hero_image);
        override_field(&mut self.hero_images, hero_images);
        override_option(&mut self.overview, overview);
        override_field(&mut self.tags, tags);
        override_field(&mut self.technical, technical);
    }

    /// Non-mutating form of [`merge`](Self::merge).
    pub fn merged(&self, detail: DetailRecord) -> Self {
        let mut project = self.clone();
        project.merge(detail);
        project
    }
}

/// Update field if the override is provided.
fn override_field<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn override_option<T>(field: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *field = value;
    }
}

// ============================================================================
// Detail record
// ============================================================================

/// Lazily fetched document carrying the full body of a case study.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetailRecord {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub job_title: Option<String>,
    pub duration: Option<String>,
    #[serde(deserialize_with = "opt_lenient_metrics")]
    pub detail_metrics: Option<Vec<Metric>>,
    pub content_blocks: Option<Vec<ContentBlock>>,
    pub story_hook: Option<StoryHook>,
    pub hero_image: Option<String>,
    pub hero_images: Option<Vec<String>>,
    pub overview: Option<String>,
    pub tags: Option<Vec<String>>,
    pub technical: Option<TechnicalSections>,
}

impl DetailRecord {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: Value) -> ProjectEntry {
        serde_json::from_value(value).unwrap()
    }

    fn detail(value: Value) -> DetailRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_entry_defaults() {
        let project = entry(json!({"title": "Acme"}));
        assert_eq!(project.title, "Acme");
        assert_eq!(project.theme, Theme::Neutral);
        assert!(project.tags.is_empty());
        assert_eq!(project.body_source(), BodySource::Empty);
    }

    #[test]
    fn test_theme_parsing_and_fallback() {
        assert_eq!(entry(json!({"theme": "blue"})).theme, Theme::Blue);
        assert_eq!(entry(json!({"theme": "green"})).theme, Theme::Green);
        assert_eq!(entry(json!({"theme": "magenta"})).theme, Theme::Neutral);
        assert_eq!(Theme::Blue.class(), "theme-blue");
    }

    #[test]
    fn test_numeric_year_and_null_lists() {
        let project = entry(json!({"year": 2023, "tags": null, "cardMetrics": null}));
        assert_eq!(project.year.as_deref(), Some("2023"));
        assert!(project.tags.is_empty());
        assert!(project.card_metrics.is_empty());
    }

    #[test]
    fn test_body_source_prefers_content_file() {
        let project = entry(json!({
            "contentFile": "/data/acme.json",
            "contentBlocks": [{"type": "text", "content": "x"}]
        }));
        assert_eq!(project.body_source(), BodySource::Lazy("/data/acme.json"));

        let inline = entry(json!({"contentBlocks": [{"type": "text", "content": "x"}]}));
        assert!(matches!(inline.body_source(), BodySource::Inline(blocks) if blocks.len() == 1));
    }

    #[test]
    fn test_hero_images_fallback() {
        let single = entry(json!({"heroImage": "/a.png"}));
        assert_eq!(single.hero_images(), vec!["/a.png"]);

        let many = entry(json!({"heroImage": "/a.png", "heroImages": ["/b.png", "/c.png"]}));
        assert_eq!(many.hero_images(), vec!["/b.png", "/c.png"]);
    }

    #[test]
    fn test_effective_metrics() {
        let card_only = entry(json!({"cardMetrics": [{"value": "1", "label": "a"}]}));
        assert_eq!(card_only.effective_metrics()[0].label, "a");

        let with_detail = entry(json!({
            "cardMetrics": [{"value": "1", "label": "a"}],
            "detailMetrics": [{"value": "2", "label": "b"}, {"value": "3", "label": "c"}]
        }));
        assert_eq!(with_detail.effective_metrics().len(), 2);
        assert_eq!(with_detail.effective_metrics()[0].label, "b");

        let empty_detail = entry(json!({
            "cardMetrics": [{"value": "1", "label": "a"}],
            "detailMetrics": []
        }));
        assert_eq!(empty_detail.effective_metrics()[0].label, "a");
    }

    #[test]
    fn test_merge_detail_wins_and_preserves_rest() {
        let mut project = entry(json!({"subtitle": "A", "title": "T"}));
        project.merge(detail(json!({"subtitle": "B"})));
        assert_eq!(project.subtitle.as_deref(), Some("B"));
        assert_eq!(project.title, "T");
    }

    #[test]
    fn test_merge_replaces_lists_wholesale() {
        let project = entry(json!({
            "tags": ["a", "b"],
            "detailMetrics": [{"value": "1", "label": "x"}],
            "contentBlocks": [{"type": "text", "content": "old"}]
        }));
        let merged = project.merged(detail(json!({
            "tags": ["c"],
            "detailMetrics": [{"value": "2", "label": "y"}],
            "contentBlocks": [{"type": "key-insight", "text": "new"}]
        })));
        assert_eq!(merged.tags, vec!["c"]);
        assert_eq!(merged.detail_metrics.as_ref().unwrap().len(), 1);
        assert_eq!(merged.detail_metrics.as_ref().unwrap()[0].value, "2");
        assert_eq!(merged.blocks().len(), 1);
        assert_eq!(merged.blocks()[0].tag(), Some("key-insight"));
        // merged() leaves the original alone
        assert_eq!(project.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_merge_twice_is_stable() {
        let base = entry(json!({"subtitle": "A", "title": "T"}));
        let once = base.merged(detail(json!({"subtitle": "B"})));
        let twice = once.merged(detail(json!({"subtitle": "B"})));
        assert_eq!(once.subtitle, twice.subtitle);
        assert_eq!(once.title, twice.title);
    }

    #[test]
    fn test_hero_hook_precedence() {
        let teaser = entry(json!({"storyTeaser": "Short hook"}));
        assert_eq!(teaser.hero_hook(), Some(HeroHook::Teaser("Short hook".into())));

        let from_block = entry(json!({
            "storyTeaser": "Short hook",
            "contentBlocks": [
                {"type": "key-insight", "text": "x"},
                {"type": "story-hook", "quote": "How did we get here?"}
            ]
        }));
        match from_block.hero_hook() {
            Some(HeroHook::Quote(hook)) => assert_eq!(hook.quote, "How did we get here?"),
            other => panic!("unexpected hook: {other:?}"),
        }

        let explicit = from_block.merged(detail(json!({"storyHook": {"quote": "Override"}})));
        match explicit.hero_hook() {
            Some(HeroHook::Quote(hook)) => assert_eq!(hook.quote, "Override"),
            other => panic!("unexpected hook: {other:?}"),
        }
    }

    #[test]
    fn test_technical_sections_order_and_pairs() {
        let project = entry(json!({
            "technical": {
                "Stack": ["Rust", "DB: Postgres"],
                "Role": "Lead",
                "Links": ["Docs: https://example.com", "https://example.com"]
            }
        }));
        let labels: Vec<_> = project.technical.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Stack", "Role", "Links"]);

        let stack: Vec<_> = project.technical.0[0].entries().collect();
        assert_eq!(
            stack,
            vec![TechnicalItem::Plain("Rust"), TechnicalItem::Pair("DB", "Postgres")]
        );
        assert_eq!(project.technical.0[1].items, vec!["Lead"]);

        let links: Vec<_> = project.technical.0[2].entries().collect();
        assert_eq!(links[0], TechnicalItem::Pair("Docs", "https://example.com"));
        assert_eq!(links[1], TechnicalItem::Plain("https://example.com"));
    }

    #[test]
    fn test_overview_fallback() {
        assert_eq!(entry(json!({"cardOverview": "card"})).overview_text(), Some("card"));
        assert_eq!(
            entry(json!({"cardOverview": "card", "overview": "full"})).overview_text(),
            Some("full")
        );
    }
}
