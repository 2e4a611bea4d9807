//! Project record -> ATS facts.
//!
//! Each extractor is total: missing or malformed optional data yields an
//! empty collection, never an error.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashSet;

use crate::content::{
    Block, ContentBlock, DetailRecord, Metric, ProjectEntry, TechnicalItem,
};

/// Maximum number of portfolio samples per project.
pub const SAMPLE_LIMIT: usize = 10;

/// Technical section labels whose items count as skills.
static SKILL_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(tools?|tech(nolog(y|ies))?|stack|languages?|frameworks?|platforms?)\b")
        .unwrap()
});

/// Sidebar labels whose items count as achievements.
static SOLUTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsolutions?\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    Image,
    Video,
}

/// One image or video reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub src: String,
    pub kind: SampleKind,
    /// Caption or alt text, when the block carries one.
    pub label: Option<String>,
}

/// Case-insensitive, insertion-ordered string set.
#[derive(Default)]
struct OrderedSet {
    seen: FxHashSet<String>,
    items: Vec<String>,
}

impl OrderedSet {
    fn insert(&mut self, item: &str) {
        let item = item.trim();
        if !item.is_empty() && self.seen.insert(item.to_lowercase()) {
            self.items.push(item.to_string());
        }
    }
}

/// Tags, then items of skill-like technical sections.
///
/// `key: value` items contribute their comma-split values.
pub fn extract_skills(project: &ProjectEntry) -> Vec<String> {
    let mut skills = OrderedSet::default();
    for tag in &project.tags {
        skills.insert(tag);
    }
    for section in project.technical.iter() {
        if !SKILL_LABEL.is_match(&section.label) {
            continue;
        }
        for item in section.entries() {
            match item {
                TechnicalItem::Pair(_, value) => value.split(',').for_each(|v| skills.insert(v)),
                TechnicalItem::Plain(value) => skills.insert(value),
            }
        }
    }
    skills.items
}

/// `cardMetrics` of the entry, then the detail view's metrics.
pub fn extract_metrics(entry: &ProjectEntry, detail: Option<&DetailRecord>) -> Vec<Metric> {
    let detail_metrics = detail
        .and_then(|d| d.detail_metrics.as_deref())
        .or(entry.detail_metrics.as_deref())
        .unwrap_or_default();
    entry
        .card_metrics
        .iter()
        .chain(detail_metrics)
        .cloned()
        .collect()
}

/// Timeline highlights plus `solution`-labelled sidebar lists.
pub fn extract_achievements(blocks: &[ContentBlock]) -> Vec<String> {
    let mut achievements = Vec::new();
    for block in blocks {
        match block.typed() {
            Ok(Block::TimelineProcess(timeline)) => {
                for phase in timeline.phases {
                    achievements.extend(phase.highlights);
                }
            }
            Ok(Block::TwoColumnWithSidebar(columns)) => {
                for section in columns.sidebar {
                    if SOLUTION_LABEL.is_match(&section.label) {
                        achievements.extend(section.items);
                    }
                }
            }
            _ => {}
        }
    }
    achievements.retain(|a| !a.trim().is_empty());
    achievements
}

/// Hero images, then media of grid, gallery, full-bleed and carousel blocks.
///
/// Deduplicated by `src` in discovery order and capped at [`SAMPLE_LIMIT`].
pub fn extract_samples(project: &ProjectEntry) -> Vec<Sample> {
    let mut found = Vec::new();
    let image = |src: &str, label: Option<&str>| Sample {
        src: src.to_string(),
        kind: SampleKind::Image,
        label: label.map(str::to_string),
    };

    for src in project.hero_images() {
        found.push(image(src, Some(project.title.as_str()).filter(|t| !t.is_empty())));
    }

    for block in project.blocks() {
        match block.typed() {
            Ok(Block::ImageGrid(grid)) => found.extend(grid.images.iter().map(|f| {
                image(&f.src, f.caption.as_deref().or(f.alt.as_deref()))
            })),
            Ok(Block::Gallery(gallery)) => found.extend(gallery.images.iter().map(|f| {
                image(&f.src, f.caption.as_deref().or(f.alt.as_deref()))
            })),
            Ok(Block::FullBleedImage(figure)) => found.push(image(
                &figure.src,
                figure.caption.as_deref().or(figure.alt.as_deref()),
            )),
            Ok(Block::ContentCarousel(carousel)) => {
                for slide in &carousel.slides {
                    let label = slide.title.as_deref().or(slide.alt.as_deref());
                    if let Some(video) = &slide.video {
                        found.push(Sample {
                            src: video.clone(),
                            kind: SampleKind::Video,
                            label: label.map(str::to_string),
                        });
                    }
                    if let Some(src) = &slide.src {
                        found.push(image(src, label));
                    }
                }
            }
            _ => {}
        }
    }

    let mut seen = FxHashSet::default();
    found
        .into_iter()
        .filter(|s| !s.src.trim().is_empty() && seen.insert(s.src.clone()))
        .take(SAMPLE_LIMIT)
        .collect()
}
