//! Content blocks: the tagged union making up a case-study body.
//!
//! A block is kept as raw JSON ([`ContentBlock`]) and decoded lazily, so one
//! bad or unfamiliar block never fails the record it belongs to. Decoding
//! goes through a payload struct per tag; [`ContentBlock::typed`] is the
//! upfront guard producing the full [`Block`] sum type.
//!
//! # Tags
//!
//! | Tag                       | Payload            |
//! |---------------------------|--------------------|
//! | `story-hook`              | [`StoryHook`]      |
//! | `timeline-process`        | [`TimelineProcess`]|
//! | `before-after-comparison` | [`BeforeAfter`]    |
//! | `key-insight`             | [`KeyInsight`]     |
//! | `text-image-split`        | [`TextImageSplit`] |
//! | `two-column-with-sidebar` | [`TwoColumnSidebar`]|
//! | `image-grid`              | [`ImageGrid`]      |
//! | `gallery`                 | [`Gallery`]        |
//! | `full-bleed-image`        | [`Figure`]         |
//! | `content-carousel`        | [`ContentCarousel`]|
//! | `metrics-inline`          | [`MetricsInline`]  |
//! | `text`                    | [`TextBlock`]      |
//! | `image`, `image-full`     | [`Figure`]         |
//! | `heading`                 | [`Heading`]        |
//! | `quote`                   | [`Quote`]          |
//! | `list`                    | [`ListBlock`]      |
//! | `video`                   | [`Video`]          |

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use super::Metric;

/// Tag constants.
pub mod tag {
    pub const STORY_HOOK: &str = "story-hook";
    pub const TIMELINE_PROCESS: &str = "timeline-process";
    pub const BEFORE_AFTER: &str = "before-after-comparison";
    pub const KEY_INSIGHT: &str = "key-insight";
    pub const TEXT_IMAGE_SPLIT: &str = "text-image-split";
    pub const TWO_COLUMN_SIDEBAR: &str = "two-column-with-sidebar";
    pub const IMAGE_GRID: &str = "image-grid";
    pub const GALLERY: &str = "gallery";
    pub const FULL_BLEED_IMAGE: &str = "full-bleed-image";
    pub const CONTENT_CAROUSEL: &str = "content-carousel";
    pub const METRICS_INLINE: &str = "metrics-inline";
    pub const TEXT: &str = "text";
    pub const IMAGE: &str = "image";
    pub const IMAGE_FULL: &str = "image-full";
    pub const HEADING: &str = "heading";
    pub const QUOTE: &str = "quote";
    pub const LIST: &str = "list";
    pub const VIDEO: &str = "video";

    pub const KNOWN: &[&str] = &[
        STORY_HOOK,
        TIMELINE_PROCESS,
        BEFORE_AFTER,
        KEY_INSIGHT,
        TEXT_IMAGE_SPLIT,
        TWO_COLUMN_SIDEBAR,
        IMAGE_GRID,
        GALLERY,
        FULL_BLEED_IMAGE,
        CONTENT_CAROUSEL,
        METRICS_INLINE,
        TEXT,
        IMAGE,
        IMAGE_FULL,
        HEADING,
        QUOTE,
        LIST,
        VIDEO,
    ];

    pub fn is_known(tag: &str) -> bool {
        KNOWN.contains(&tag)
    }
}

/// Why a block could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("content block has no `type`")]
    MissingTag,

    #[error("unknown content block type `{0}`")]
    Unknown(String),

    #[error("malformed `{tag}` block: {reason}")]
    Malformed { tag: String, reason: String },
}

// ============================================================================
// Raw block
// ============================================================================

/// One content block exactly as it appeared in the JSON source.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    value: Value,
}

impl<'de> Deserialize<'de> for ContentBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::new)
    }
}

impl From<Value> for ContentBlock {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl ContentBlock {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Discriminant (`type` key), if any.
    pub fn tag(&self) -> Option<&str> {
        self.value.get("type").and_then(Value::as_str)
    }

    pub fn is_story_hook(&self) -> bool {
        self.tag() == Some(tag::STORY_HOOK)
    }

    /// Decode the payload for this block's tag.
    ///
    /// Does not check that the tag matches `T`; callers dispatch on the tag.
    pub fn decode<T: BlockPayload>(&self) -> Result<T, SchemaError> {
        let tag = self.tag().unwrap_or_default();
        let payload = T::deserialize(&self.value).map_err(|err| SchemaError::Malformed {
            tag: tag.to_string(),
            reason: err.to_string(),
        })?;
        if let Some(field) = payload.missing() {
            return Err(SchemaError::Malformed {
                tag: tag.to_string(),
                reason: format!("`{field}` must not be empty"),
            });
        }
        Ok(payload)
    }

    /// Full discriminant-based decode into the typed union.
    pub fn typed(&self) -> Result<Block, SchemaError> {
        let tag = self.tag().ok_or(SchemaError::MissingTag)?;
        if !tag::is_known(tag) {
            return Err(SchemaError::Unknown(tag.to_string()));
        }
        let block = Block::deserialize(&self.value).map_err(|err| SchemaError::Malformed {
            tag: tag.to_string(),
            reason: err.to_string(),
        })?;
        if let Some(field) = block.missing() {
            return Err(SchemaError::Malformed {
                tag: tag.to_string(),
                reason: format!("`{field}` must not be empty"),
            });
        }
        Ok(block)
    }
}

// ============================================================================
// Typed union
// ============================================================================

/// Decoded content block.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Block {
    StoryHook(StoryHook),
    TimelineProcess(TimelineProcess),
    BeforeAfterComparison(BeforeAfter),
    KeyInsight(KeyInsight),
    TextImageSplit(TextImageSplit),
    TwoColumnWithSidebar(TwoColumnSidebar),
    ImageGrid(ImageGrid),
    Gallery(Gallery),
    FullBleedImage(Figure),
    ContentCarousel(ContentCarousel),
    MetricsInline(MetricsInline),
    Text(TextBlock),
    Image(Figure),
    ImageFull(Figure),
    Heading(Heading),
    Quote(Quote),
    List(ListBlock),
    Video(Video),
}

impl Block {
    fn missing(&self) -> Option<&'static str> {
        match self {
            Self::StoryHook(b) => b.missing(),
            Self::TimelineProcess(b) => b.missing(),
            Self::BeforeAfterComparison(b) => b.missing(),
            Self::KeyInsight(b) => b.missing(),
            Self::TextImageSplit(b) => b.missing(),
            Self::TwoColumnWithSidebar(b) => b.missing(),
            Self::ImageGrid(b) => b.missing(),
            Self::Gallery(b) => b.missing(),
            Self::FullBleedImage(b) | Self::Image(b) | Self::ImageFull(b) => b.missing(),
            Self::ContentCarousel(b) => b.missing(),
            Self::MetricsInline(b) => b.missing(),
            Self::Text(b) => b.missing(),
            Self::Heading(b) => b.missing(),
            Self::Quote(b) => b.missing(),
            Self::List(b) => b.missing(),
            Self::Video(b) => b.missing(),
        }
    }
}

/// A decodable block payload.
///
/// `missing` names a required collection or text that decoded but is empty.
pub trait BlockPayload: DeserializeOwned {
    fn missing(&self) -> Option<&'static str> {
        None
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

// ============================================================================
// Shared pieces
// ============================================================================

/// Text given either as one string or as a list of paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraphs(pub Vec<String>);

impl<'de> Deserialize<'de> for Paragraphs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(String),
            Many(Vec<String>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::One(text) => Self(vec![text]),
            Repr::Many(list) => Self(list),
        })
    }
}

impl Paragraphs {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str).filter(|p| !blank(p))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// An image reference with optional alt text and caption.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Figure {
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl BlockPayload for Figure {
    fn missing(&self) -> Option<&'static str> {
        blank(&self.src).then_some("src")
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Opening question or quote shown in the hero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StoryHook {
    pub quote: String,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

impl BlockPayload for StoryHook {
    fn missing(&self) -> Option<&'static str> {
        blank(&self.quote).then_some("quote")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineProcess {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub intro: Option<String>,
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Phase {
    pub title: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

impl BlockPayload for TimelineProcess {
    fn missing(&self) -> Option<&'static str> {
        self.phases.is_empty().then_some("phases")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BeforeAfter {
    #[serde(default)]
    pub title: Option<String>,
    pub before: ComparisonSide,
    pub after: ComparisonSide,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComparisonSide {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl BlockPayload for BeforeAfter {}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyInsight {
    pub text: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl BlockPayload for KeyInsight {
    fn missing(&self) -> Option<&'static str> {
        blank(&self.text).then_some("text")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextImageSplit {
    #[serde(default)]
    pub title: Option<String>,
    pub text: Paragraphs,
    pub image: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    /// Image on the left.
    #[serde(default)]
    pub reverse: bool,
}

impl BlockPayload for TextImageSplit {
    fn missing(&self) -> Option<&'static str> {
        if self.text.is_empty() {
            Some("text")
        } else if blank(&self.image) {
            Some("image")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwoColumnSidebar {
    #[serde(default)]
    pub title: Option<String>,
    pub main: Paragraphs,
    #[serde(default)]
    pub sidebar: Vec<SidebarSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SidebarSection {
    pub label: String,
    #[serde(default)]
    pub items: Vec<String>,
}

impl BlockPayload for TwoColumnSidebar {
    fn missing(&self) -> Option<&'static str> {
        self.main.is_empty().then_some("main")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageGrid {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub columns: Option<u8>,
    pub images: Vec<Figure>,
}

impl BlockPayload for ImageGrid {
    fn missing(&self) -> Option<&'static str> {
        self.images.is_empty().then_some("images")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Gallery {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    pub images: Vec<Figure>,
}

impl BlockPayload for Gallery {
    fn missing(&self) -> Option<&'static str> {
        self.images.is_empty().then_some("images")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentCarousel {
    #[serde(default)]
    pub title: Option<String>,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl BlockPayload for ContentCarousel {
    fn missing(&self) -> Option<&'static str> {
        self.slides.is_empty().then_some("slides")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsInline {
    #[serde(default)]
    pub title: Option<String>,
    pub metrics: Vec<Metric>,
}

impl BlockPayload for MetricsInline {
    fn missing(&self) -> Option<&'static str> {
        self.metrics.is_empty().then_some("metrics")
    }
}

/// Legacy free-text block.
#[derive(Debug, Clone, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub title: Option<String>,
    pub content: Paragraphs,
}

impl BlockPayload for TextBlock {
    fn missing(&self) -> Option<&'static str> {
        self.content.is_empty().then_some("content")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Heading {
    pub text: String,
    #[serde(default)]
    pub level: Option<u8>,
}

impl Heading {
    /// Heading level clamped to `h2..=h4`.
    pub fn level(&self) -> u8 {
        self.level.unwrap_or(2).clamp(2, 4)
    }
}

impl BlockPayload for Heading {
    fn missing(&self) -> Option<&'static str> {
        blank(&self.text).then_some("text")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Quote {
    pub text: String,
    #[serde(default)]
    pub author: Option<String>,
}

impl BlockPayload for Quote {
    fn missing(&self) -> Option<&'static str> {
        blank(&self.text).then_some("text")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListBlock {
    #[serde(default)]
    pub title: Option<String>,
    pub items: Vec<String>,
    #[serde(default)]
    pub ordered: bool,
}

impl BlockPayload for ListBlock {
    fn missing(&self) -> Option<&'static str> {
        self.items.is_empty().then_some("items")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub src: String,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl BlockPayload for Video {
    fn missing(&self) -> Option<&'static str> {
        blank(&self.src).then_some("src")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(value: Value) -> ContentBlock {
        ContentBlock::new(value)
    }

    #[test]
    fn test_tag_reads_type_key() {
        assert_eq!(block(json!({"type": "key-insight", "text": "x"})).tag(), Some("key-insight"));
        assert_eq!(block(json!({"tag": "key-insight"})).tag(), None);
        assert!(block(json!({"type": "story-hook", "quote": "q"})).is_story_hook());
    }

    #[test]
    fn test_typed_known_block() {
        let parsed = block(json!({
            "type": "timeline-process",
            "phases": [{"title": "Discover", "highlights": ["Interviews"]}]
        }))
        .typed()
        .unwrap();
        match parsed {
            Block::TimelineProcess(timeline) => {
                assert_eq!(timeline.phases[0].title, "Discover");
                assert_eq!(timeline.phases[0].highlights, vec!["Interviews"]);
                assert!(timeline.phases[0].outcome.is_none());
            }
            other => panic!("unexpected block: {other:?}"),
        }
    }

    #[test]
    fn test_typed_legacy_tags() {
        assert!(matches!(
            block(json!({"type": "image-full", "src": "/a.png"})).typed(),
            Ok(Block::ImageFull(_))
        ));
        assert!(matches!(
            block(json!({"type": "text", "content": "hello"})).typed(),
            Ok(Block::Text(_))
        ));
    }

    #[test]
    fn test_typed_unknown_and_missing_tag() {
        assert_eq!(
            block(json!({"type": "unknown-experimental"})).typed().unwrap_err(),
            SchemaError::Unknown("unknown-experimental".into())
        );
        assert_eq!(
            block(json!({"tag": "unknown-experimental"})).typed().unwrap_err(),
            SchemaError::MissingTag
        );
    }

    #[test]
    fn test_typed_missing_required_field() {
        let err = block(json!({"type": "timeline-process"})).typed().unwrap_err();
        assert!(matches!(err, SchemaError::Malformed { ref tag, .. } if tag == "timeline-process"));
    }

    #[test]
    fn test_typed_empty_required_list() {
        let err = block(json!({"type": "image-grid", "images": []})).typed().unwrap_err();
        assert_eq!(
            err,
            SchemaError::Malformed {
                tag: "image-grid".into(),
                reason: "`images` must not be empty".into()
            }
        );
    }

    #[test]
    fn test_decode_payload() {
        let insight: KeyInsight = block(json!({"type": "key-insight", "text": "Ship early"}))
            .decode()
            .unwrap();
        assert_eq!(insight.text, "Ship early");
        assert!(insight.label.is_none());
    }

    #[test]
    fn test_decode_blank_text_is_malformed() {
        let result: Result<KeyInsight, _> =
            block(json!({"type": "key-insight", "text": "   "})).decode();
        assert!(result.is_err());
    }

    #[test]
    fn test_paragraphs_accept_string_or_list() {
        let split: TextImageSplit = block(json!({
            "type": "text-image-split", "text": "one", "image": "/a.png"
        }))
        .decode()
        .unwrap();
        assert_eq!(split.text.iter().collect::<Vec<_>>(), vec!["one"]);

        let text: TextBlock = block(json!({"type": "text", "content": ["a", "", "b"]}))
            .decode()
            .unwrap();
        assert_eq!(text.content.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_heading_level_clamped() {
        let heading: Heading = block(json!({"type": "heading", "text": "H", "level": 1}))
            .decode()
            .unwrap();
        assert_eq!(heading.level(), 2);
        let heading: Heading = block(json!({"type": "heading", "text": "H", "level": 9}))
            .decode()
            .unwrap();
        assert_eq!(heading.level(), 4);
    }

    #[test]
    fn test_raw_block_survives_unknown_fields() {
        let raw: Vec<ContentBlock> = serde_json::from_value(json!([
            {"type": "key-insight", "text": "a", "extra": {"nested": true}},
            {"type": "whatever", "anything": [1, 2, 3]}
        ]))
        .unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[1].tag(), Some("whatever"));
    }
}
