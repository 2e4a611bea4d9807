//! Case-study page tree and its fixed regions.
//!
//! ```text
//! article.case-study[data-project-id][data-theme]
//! ├── nav.case-study-breadcrumbs
//! ├── header.case-study-hero
//! ├── ul.case-study-tags
//! ├── section.case-study-overview
//! ├── section.case-study-technical
//! ├── section.case-study-metrics > div.metrics-grid
//! ├── div.case-study-content
//! └── nav.case-study-pager
//! ```

use crate::dom::Element;

/// CSS hook names shared with downstream page scripts.
pub mod class {
    pub const PAGE: &str = "case-study";
    pub const BREADCRUMBS: &str = "case-study-breadcrumbs";
    pub const HERO: &str = "case-study-hero";
    pub const TITLE: &str = "case-study-title";
    pub const SUBTITLE: &str = "case-study-subtitle";
    pub const META: &str = "case-study-meta";
    pub const HOOK: &str = "case-study-hook";
    pub const TAGS: &str = "case-study-tags";
    pub const HERO_IMAGES: &str = "case-study-hero-images";
    pub const HERO_METRICS: &str = "case-study-hero-metrics";
    pub const OVERVIEW: &str = "case-study-overview";
    pub const TECHNICAL: &str = "case-study-technical";
    pub const METRICS: &str = "case-study-metrics";
    pub const METRICS_GRID: &str = "metrics-grid";
    pub const CONTENT: &str = "case-study-content";
    pub const PAGER: &str = "case-study-pager";
    pub const LOADING: &str = "content-loading";
    pub const CONTENT_ERROR: &str = "content-error";
    pub const ERROR: &str = "case-study-error";
}

/// Regions the assembler clears before every population.
pub(super) const REPOPULATED: &[&str] = &[
    class::BREADCRUMBS,
    class::HERO,
    class::TAGS,
    class::OVERVIEW,
    class::TECHNICAL,
    class::METRICS_GRID,
    class::CONTENT,
    class::PAGER,
];

/// The page tree owned by one assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseStudyPage {
    root: Element,
}

impl Default for CaseStudyPage {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseStudyPage {
    /// Empty page skeleton.
    pub fn new() -> Self {
        let root = Element::with_class("article", class::PAGE)
            .child(Element::with_class("nav", class::BREADCRUMBS).attr("aria-label", "Breadcrumb"))
            .child(Element::with_class("header", class::HERO))
            .child(Element::with_class("ul", class::TAGS))
            .child(Element::with_class("section", class::OVERVIEW))
            .child(Element::with_class("section", class::TECHNICAL))
            .child(
                Element::with_class("section", class::METRICS)
                    .child(Element::with_class("div", class::METRICS_GRID)),
            )
            .child(Element::with_class("div", class::CONTENT))
            .child(Element::with_class("nav", class::PAGER));
        Self { root }
    }

    /// Terminal "not found" view with a link back home.
    pub fn not_found(id: &str, home_href: &str) -> Self {
        let root = Element::with_class("div", class::ERROR)
            .attr("data-project-id", id)
            .attr("role", "alert")
            .child(Element::new("h1").text("Project not found"))
            .child(Element::new("p").text(format!("There is no case study called \u{201c}{id}\u{201d}.")))
            .child(
                Element::with_class("a", "error-home-link")
                    .attr("href", home_href)
                    .text("Return home"),
            );
        Self { root }
    }

    pub fn is_error_view(&self) -> bool {
        self.root.has_class(class::ERROR)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn region(&self, class: &str) -> Option<&Element> {
        self.root.find_by_class(class)
    }

    pub fn region_mut(&mut self, class: &str) -> Option<&mut Element> {
        self.root.find_by_class_mut(class)
    }

    /// Mark the page with the active project.
    pub(super) fn set_project(&mut self, id: &str, theme: &str) {
        self.root.set_attr("data-project-id", id);
        self.root.set_attr("data-theme", theme);
    }

    /// Clear a region and fill it with `children`.
    pub(super) fn fill(&mut self, class: &str, children: impl IntoIterator<Item = Element>) {
        if let Some(region) = self.region_mut(class) {
            region.clear_children();
            for child in children {
                region.push_elem(child);
            }
        }
    }

    pub(super) fn clear_regions(&mut self) {
        for class in REPOPULATED {
            if let Some(region) = self.region_mut(class) {
                region.clear_children();
            }
        }
    }

    /// Rendered body blocks.
    pub fn body(&self) -> Option<&Element> {
        self.region(class::CONTENT)
    }

    pub fn hero(&self) -> Option<&Element> {
        self.region(class::HERO)
    }

    pub fn to_html(&self) -> String {
        self.root.to_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton_has_every_region() {
        let page = CaseStudyPage::new();
        for class in REPOPULATED {
            assert!(page.region(class).is_some(), "missing region `{class}`");
        }
        assert!(page.region(class::METRICS).is_some());
        assert!(!page.is_error_view());
    }

    #[test]
    fn test_fill_replaces_children() {
        let mut page = CaseStudyPage::new();
        page.fill(class::TAGS, [Element::new("li").text("a"), Element::new("li").text("b")]);
        page.fill(class::TAGS, [Element::new("li").text("c")]);
        assert_eq!(page.region(class::TAGS).unwrap().text_content(), "c");
    }

    #[test]
    fn test_not_found_view() {
        let page = CaseStudyPage::not_found("ghost", "/");
        assert!(page.is_error_view());
        assert!(page.hero().is_none());
        assert!(page.to_html().contains(r#"href="/""#));
    }
}
