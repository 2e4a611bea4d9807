//! Built-in block renderers.
//!
//! Each renderer receives its decoded payload and returns the block's
//! `<section>`. Optional fields only produce a node when present.

use super::{BlockContext, BlockRegistry, create_metric_card};
use crate::content::block::{
    BeforeAfter, ComparisonSide, ContentCarousel, Figure, Gallery, Heading, ImageGrid, KeyInsight,
    ListBlock, MetricsInline, Paragraphs, Quote, Slide, TextBlock, TextImageSplit,
    TimelineProcess, TwoColumnSidebar, Video, tag,
};
use crate::dom::Element;

pub(super) fn register_builtin(registry: &mut BlockRegistry) {
    registry.register(tag::TIMELINE_PROCESS, timeline_process);
    registry.register(tag::BEFORE_AFTER, before_after);
    registry.register(tag::KEY_INSIGHT, key_insight);
    registry.register(tag::TEXT_IMAGE_SPLIT, text_image_split);
    registry.register(tag::TWO_COLUMN_SIDEBAR, two_column_sidebar);
    registry.register(tag::IMAGE_GRID, image_grid);
    registry.register(tag::GALLERY, gallery);
    registry.register(tag::FULL_BLEED_IMAGE, single_figure);
    registry.register(tag::CONTENT_CAROUSEL, content_carousel);
    registry.register(tag::METRICS_INLINE, metrics_inline);
    registry.register(tag::TEXT, text);
    registry.register(tag::IMAGE, single_figure);
    registry.register(tag::IMAGE_FULL, single_figure);
    registry.register(tag::HEADING, heading);
    registry.register(tag::QUOTE, quote);
    registry.register(tag::LIST, list);
    registry.register(tag::VIDEO, video);
}

// ============================================================================
// shared builders
// ============================================================================

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// `<tag class="class">text</tag>` when `text` is present.
fn opt_text(tag: &str, class: &str, text: Option<&str>) -> Option<Element> {
    present(text).map(|t| Element::with_class(tag, class).text(t))
}

fn block_title(title: Option<&str>) -> Option<Element> {
    opt_text("h2", "block-title", title)
}

fn paragraphs<'a>(text: &'a Paragraphs, class: &'a str) -> impl Iterator<Item = Element> + 'a {
    text.iter().map(move |p| Element::with_class("p", class).text(p))
}

fn image(src: &str, alt: Option<&str>) -> Element {
    Element::new("img")
        .attr("src", src)
        .attr("alt", alt.unwrap_or_default())
        .attr("loading", "lazy")
}

/// `<figure class="..."><img/><figcaption/></figure>`
fn figure(fig: &Figure, class: &str) -> Element {
    Element::with_class("figure", class)
        .child(image(&fig.src, fig.alt.as_deref()))
        .child_opt(opt_text("figcaption", "figure-caption", fig.caption.as_deref()))
}

fn items_list(tag: &str, class: &str, items: &[String]) -> Element {
    Element::with_class(tag, class).children(
        items
            .iter()
            .filter(|item| !item.trim().is_empty())
            .map(|item| Element::new("li").text(item.clone())),
    )
}

// ============================================================================
// renderers
// ============================================================================

fn timeline_process(block: &TimelineProcess, ctx: BlockContext<'_>) -> Element {
    let phases = block.phases.iter().enumerate().map(|(i, phase)| {
        let mut item = Element::with_class("li", "timeline-phase")
            .attr("data-phase", (i + 1).to_string())
            .child_opt(opt_text("span", "phase-duration", phase.duration.as_deref()))
            .child(Element::with_class("h3", "phase-title").text(phase.title.clone()));
        if !phase.highlights.is_empty() {
            item.push_elem(items_list("ul", "phase-highlights", &phase.highlights));
        }
        item.child_opt(opt_text("p", "phase-outcome", phase.outcome.as_deref()))
    });

    ctx.section()
        .child_opt(block_title(block.title.as_deref()))
        .child_opt(opt_text("p", "timeline-intro", block.intro.as_deref()))
        .child(Element::with_class("ol", "timeline-phases").children(phases))
}

fn comparison_side(side: &ComparisonSide, class: &str, fallback: &str) -> Element {
    let mut column = Element::with_class("div", "comparison-side");
    column.add_class(class);
    let label = present(side.label.as_deref()).unwrap_or(fallback);
    column.push_elem(Element::with_class("h3", "comparison-label").text(label));
    if let Some(src) = present(side.image.as_deref()) {
        column.push_elem(
            Element::with_class("figure", "comparison-image").child(image(src, side.alt.as_deref())),
        );
    }
    if !side.items.is_empty() {
        column.push_elem(items_list("ul", "comparison-items", &side.items));
    }
    column
}

fn before_after(block: &BeforeAfter, ctx: BlockContext<'_>) -> Element {
    ctx.section()
        .child_opt(block_title(block.title.as_deref()))
        .child(
            Element::with_class("div", "comparison")
                .child(comparison_side(&block.before, "comparison-before", "Before"))
                .child(comparison_side(&block.after, "comparison-after", "After")),
        )
}

fn key_insight(block: &KeyInsight, ctx: BlockContext<'_>) -> Element {
    let icon = present(block.icon.as_deref()).map(|icon| {
        Element::with_class("span", "insight-icon")
            .attr("data-icon", icon)
            .attr("aria-hidden", "true")
    });
    ctx.section().child(
        Element::with_class("div", "insight")
            .child_opt(icon)
            .child_opt(opt_text("span", "insight-label", block.label.as_deref()))
            .child(Element::with_class("p", "insight-text").text(block.text.clone())),
    )
}

fn text_image_split(block: &TextImageSplit, ctx: BlockContext<'_>) -> Element {
    let mut section = ctx.section();
    if block.reverse {
        section.add_class("split-reverse");
    }
    let text = Element::with_class("div", "split-text")
        .child_opt(block_title(block.title.as_deref()))
        .children(paragraphs(&block.text, "split-paragraph"));
    let media = Element::with_class("figure", "split-image")
        .child(image(&block.image, block.alt.as_deref()))
        .child_opt(opt_text("figcaption", "figure-caption", block.caption.as_deref()));
    section.child(text).child(media)
}

fn two_column_sidebar(block: &TwoColumnSidebar, ctx: BlockContext<'_>) -> Element {
    let main = Element::with_class("div", "column-main")
        .children(paragraphs(&block.main, "column-paragraph"));
    let mut columns = Element::with_class("div", "two-column").child(main);
    if !block.sidebar.is_empty() {
        let sections = block.sidebar.iter().map(|section| {
            Element::with_class("div", "sidebar-section")
                .child(Element::with_class("h3", "sidebar-label").text(section.label.clone()))
                .child(items_list("ul", "sidebar-items", &section.items))
        });
        columns.push_elem(Element::with_class("aside", "column-sidebar").children(sections));
    }
    ctx.section()
        .child_opt(block_title(block.title.as_deref()))
        .child(columns)
}

fn image_grid(block: &ImageGrid, ctx: BlockContext<'_>) -> Element {
    let mut grid = Element::with_class("div", "image-grid")
        .children(block.images.iter().map(|img| figure(img, "grid-item")));
    if let Some(columns) = block.columns.filter(|c| *c > 0) {
        grid.set_attr("data-columns", columns.to_string());
    }
    ctx.section()
        .child_opt(block_title(block.title.as_deref()))
        .child(grid)
}

fn gallery(block: &Gallery, ctx: BlockContext<'_>) -> Element {
    ctx.section()
        .child_opt(block_title(block.title.as_deref()))
        .child(
            Element::with_class("div", "gallery")
                .children(block.images.iter().map(|img| figure(img, "gallery-item"))),
        )
        .child_opt(opt_text("p", "gallery-caption", block.caption.as_deref()))
}

/// `full-bleed-image`, `image` and `image-full`.
fn single_figure(block: &Figure, ctx: BlockContext<'_>) -> Element {
    ctx.section().child(figure(block, "block-figure"))
}

fn slide(slide: &Slide, index: usize) -> Element {
    let media = if let Some(video) = present(slide.video.as_deref()) {
        Some(
            Element::with_class("video", "slide-video")
                .attr("src", video)
                .attr("controls", "")
                .attr("preload", "metadata"),
        )
    } else {
        present(slide.src.as_deref()).map(|src| image(src, slide.alt.as_deref()))
    };
    Element::with_class("div", "carousel-slide")
        .attr("data-slide", index.to_string())
        .child_opt(media)
        .child_opt(opt_text("h3", "slide-title", slide.title.as_deref()))
        .child_opt(opt_text("p", "slide-text", slide.text.as_deref()))
}

fn content_carousel(block: &ContentCarousel, ctx: BlockContext<'_>) -> Element {
    ctx.section()
        .child_opt(block_title(block.title.as_deref()))
        .child(
            Element::with_class("div", "carousel")
                .attr("data-slide-count", block.slides.len().to_string())
                .children(block.slides.iter().enumerate().map(|(i, s)| slide(s, i))),
        )
}

fn metrics_inline(block: &MetricsInline, ctx: BlockContext<'_>) -> Element {
    ctx.section()
        .child_opt(block_title(block.title.as_deref()))
        .child(
            Element::with_class("div", "metrics-inline")
                .children(block.metrics.iter().map(create_metric_card)),
        )
}

fn text(block: &TextBlock, ctx: BlockContext<'_>) -> Element {
    ctx.section()
        .child_opt(block_title(block.title.as_deref()))
        .children(paragraphs(&block.content, "block-paragraph"))
}

fn heading(block: &Heading, ctx: BlockContext<'_>) -> Element {
    let tag = format!("h{}", block.level());
    ctx.section()
        .child(Element::with_class(tag, "heading-text").text(block.text.clone()))
}

fn quote(block: &Quote, ctx: BlockContext<'_>) -> Element {
    ctx.section().child(
        Element::with_class("blockquote", "quote-body")
            .child(Element::new("p").text(block.text.clone()))
            .child_opt(opt_text("cite", "quote-author", block.author.as_deref())),
    )
}

fn list(block: &ListBlock, ctx: BlockContext<'_>) -> Element {
    let tag = if block.ordered { "ol" } else { "ul" };
    ctx.section()
        .child_opt(block_title(block.title.as_deref()))
        .child(items_list(tag, "list-items", &block.items))
}

fn video(block: &Video, ctx: BlockContext<'_>) -> Element {
    let mut player = Element::new("video")
        .attr("src", block.src.clone())
        .attr("controls", "")
        .attr("preload", "metadata");
    if let Some(poster) = present(block.poster.as_deref()) {
        player.set_attr("poster", poster);
    }
    ctx.section().child(
        Element::with_class("figure", "video-figure")
            .child(player)
            .child_opt(opt_text("figcaption", "figure-caption", block.caption.as_deref())),
    )
}
