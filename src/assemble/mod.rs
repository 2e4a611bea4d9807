//! Case-study page assembly.
//!
//! One [`Assembler`] owns one page view and drives it through
//!
//! ```text
//! Idle -> Loading -> Populated                         (inline blocks)
//! Idle -> Loading -> Fetching -> Merged -> Populated   (contentFile)
//!              \-> Error(NotFound)        \-> Error(FetchFailure)
//! ```
//!
//! The lazy path is split into [`Assembler::begin`] and
//! [`Assembler::complete`] around the single suspension point. `begin`
//! hands out a [`RequestToken`]; `complete` applies a detail record only
//! while that token is still current, so a slow response for a project the
//! user already navigated away from is dropped.

mod nav;
mod page;
mod source;

use thiserror::Error;

use crate::content::{
    BodySource, ContentBlock, DetailRecord, ProjectEntry, ProjectIndex, TechnicalItem,
};
use crate::dom::Element;
use crate::render::{BlockRegistry, create_metric_card, render_hero_hook};
use crate::utils::path::page_href;
use crate::{debug, log};

pub use nav::NavContext;
pub use page::{CaseStudyPage, class};
pub use source::{DetailSource, FetchError, FsSource};

/// Metrics shown in the hero strip.
pub const HERO_METRIC_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    FetchFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Loading,
    Fetching,
    Merged,
    Populated,
    Error(ErrorKind),
}

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("project `{0}` not found")]
    NotFound(String),
}

/// Identifies one detail request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    project_id: String,
    generation: u64,
}

impl RequestToken {
    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

/// A detail fetch the caller still has to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDetail {
    pub token: RequestToken,
    pub path: String,
}

/// Result of handing a fetch result back to the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Token no longer current; the page was not touched.
    Stale,
    Failed,
}

/// Notified after every successful population.
pub trait PageObserver {
    fn populated(&mut self, page: &CaseStudyPage, project_id: &str);
}

/// Links the page points at.
#[derive(Debug, Clone)]
pub struct Links {
    pub home: String,
    pub listing: String,
    /// Path prefix of case-study pages, e.g. `work`.
    pub page_prefix: String,
}

impl Default for Links {
    fn default() -> Self {
        Self {
            home: "/".into(),
            listing: "/#work".into(),
            page_prefix: "work".into(),
        }
    }
}

impl Links {
    /// Links for a site deployed under `prefix` with pages under `page_path`.
    ///
    /// `Links::for_site("portfolio", "work").page_prefix == "portfolio/work"`
    pub fn for_site(prefix: &str, page_path: &str) -> Self {
        let prefix = prefix.trim_matches('/');
        let page_path = page_path.trim_matches('/');
        let home = if prefix.is_empty() {
            "/".to_string()
        } else {
            format!("/{prefix}/")
        };
        let page_prefix = if prefix.is_empty() {
            page_path.to_string()
        } else {
            format!("{prefix}/{page_path}")
        };
        Self {
            listing: format!("{home}#work"),
            home,
            page_prefix,
        }
    }
}

enum Body<'a> {
    Blocks(&'a [ContentBlock]),
    Loading,
}

pub struct Assembler<'a> {
    index: &'a ProjectIndex,
    registry: &'a BlockRegistry,
    links: Links,
    page: CaseStudyPage,
    state: State,
    nav: NavContext,
    /// Index entry of the view a detail request is pending for.
    pending: Option<(RequestToken, ProjectEntry)>,
    generation: u64,
    observers: Vec<Box<dyn PageObserver + 'a>>,
}

impl<'a> Assembler<'a> {
    pub fn new(index: &'a ProjectIndex, registry: &'a BlockRegistry) -> Self {
        Self {
            index,
            registry,
            links: Links::default(),
            page: CaseStudyPage::new(),
            state: State::Idle,
            nav: NavContext::from_index(index),
            pending: None,
            generation: 0,
            observers: Vec::new(),
        }
    }

    pub fn with_links(mut self, links: Links) -> Self {
        self.links = links;
        self
    }

    pub fn observe(&mut self, observer: impl PageObserver + 'a) {
        self.observers.push(Box::new(observer));
    }

    pub fn page(&self) -> &CaseStudyPage {
        &self.page
    }

    pub fn into_page(self) -> CaseStudyPage {
        self.page
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn nav(&self) -> &NavContext {
        &self.nav
    }

    /// Start a page view for `id`.
    ///
    /// Inline projects are fully populated before this returns `Ok(None)`.
    /// Projects with a `contentFile` get a placeholder population and a
    /// loading indicator, and the returned [`PendingDetail`] must be fetched
    /// and passed to [`complete`](Self::complete).
    pub fn begin(&mut self, id: &str) -> Result<Option<PendingDetail>, AssemblyError> {
        self.generation += 1;
        self.pending = None;
        self.state = State::Loading;

        let index = self.index;
        let Some(entry) = index.get(id) else {
            log!("assemble"; "project `{}` not found", id);
            self.page = CaseStudyPage::not_found(id, &self.links.home);
            self.state = State::Error(ErrorKind::NotFound);
            return Err(AssemblyError::NotFound(id.to_string()));
        };

        if self.page.is_error_view() {
            self.page = CaseStudyPage::new();
        }
        self.nav.set_current(id);

        match entry.body_source() {
            BodySource::Lazy(path) => {
                self.populate(entry, Body::Loading);
                let token = RequestToken {
                    project_id: id.to_string(),
                    generation: self.generation,
                };
                self.pending = Some((token.clone(), entry.clone()));
                self.state = State::Fetching;
                debug!("assemble"; "fetching `{}` for `{}`", path, id);
                Ok(Some(PendingDetail {
                    token,
                    path: path.to_string(),
                }))
            }
            BodySource::Inline(blocks) => {
                self.populate(entry, Body::Blocks(blocks));
                self.finish(id);
                Ok(None)
            }
            BodySource::Empty => {
                self.populate(entry, Body::Blocks(&[]));
                self.finish(id);
                Ok(None)
            }
        }
    }

    /// Apply the result of a detail fetch started by [`begin`](Self::begin).
    pub fn complete(
        &mut self,
        pending: PendingDetail,
        result: Result<DetailRecord, FetchError>,
    ) -> Outcome {
        let is_current = self
            .pending
            .as_ref()
            .is_some_and(|(token, _)| *token == pending.token);
        if !is_current || self.state != State::Fetching {
            debug!("assemble"; "dropping stale response for `{}`", pending.token.project_id);
            return Outcome::Stale;
        }
        let Some((token, entry)) = self.pending.take() else {
            return Outcome::Stale;
        };

        match result {
            Ok(detail) => {
                let merged = entry.merged(detail);
                self.state = State::Merged;
                self.populate(&merged, Body::Blocks(merged.blocks()));
                self.finish(&token.project_id);
                Outcome::Applied
            }
            Err(err) => {
                log!("assemble"; "failed to load `{}`: {}", pending.path, err);
                let error = Element::with_class("div", class::CONTENT_ERROR)
                    .attr("role", "alert")
                    .child(Element::new("p").text("This case study could not be loaded."))
                    .child(
                        Element::with_class("a", "content-error-link")
                            .attr("href", self.links.listing.clone())
                            .text("Back to all projects"),
                    );
                self.page.fill(class::CONTENT, [error]);
                self.state = State::Error(ErrorKind::FetchFailure);
                Outcome::Failed
            }
        }
    }

    /// [`begin`](Self::begin), fetch if needed, then [`complete`](Self::complete).
    pub async fn open(
        &mut self,
        id: &str,
        source: &impl DetailSource,
    ) -> Result<Outcome, AssemblyError> {
        match self.begin(id)? {
            None => Ok(Outcome::Applied),
            Some(pending) => {
                let result = source.fetch(&pending.path).await;
                Ok(self.complete(pending, result))
            }
        }
    }

    /// Open the following project in navigation order.
    pub async fn open_next(
        &mut self,
        source: &impl DetailSource,
    ) -> Option<Result<Outcome, AssemblyError>> {
        let next = self.nav.next_id()?.to_string();
        Some(self.open(&next, source).await)
    }

    pub async fn open_prev(
        &mut self,
        source: &impl DetailSource,
    ) -> Option<Result<Outcome, AssemblyError>> {
        let prev = self.nav.prev_id()?.to_string();
        Some(self.open(&prev, source).await)
    }

    fn finish(&mut self, id: &str) {
        self.state = State::Populated;
        for observer in &mut self.observers {
            observer.populated(&self.page, id);
        }
    }

    // ========================================================================
    // population
    // ========================================================================

    /// Clear every region, then fill it from `project`.
    fn populate(&mut self, project: &ProjectEntry, body: Body<'_>) {
        self.page.clear_regions();
        self.page.set_project(&project.id, project.theme.as_str());

        let breadcrumbs = self.breadcrumbs(project);
        self.page.fill(class::BREADCRUMBS, breadcrumbs);
        self.page.fill(class::HERO, hero(project));
        self.page.fill(class::TAGS, tags(project));
        self.page.fill(class::OVERVIEW, overview(project));
        self.page.fill(class::TECHNICAL, technical(project));
        self.page.fill(
            class::METRICS_GRID,
            project.effective_metrics().iter().map(create_metric_card),
        );

        match body {
            Body::Loading => {
                let loading = Element::with_class("div", class::LOADING)
                    .attr("aria-busy", "true")
                    .text("Loading case study\u{2026}");
                self.page.fill(class::CONTENT, [loading]);
            }
            Body::Blocks(blocks) => {
                let rendered: Vec<_> = self.registry.render_all(blocks, project).collect();
                self.page.fill(class::CONTENT, rendered);
            }
        }

        let pager = self.pager();
        self.page.fill(class::PAGER, pager);
    }

    fn breadcrumbs(&self, project: &ProjectEntry) -> Vec<Element> {
        vec![
            Element::new("a").attr("href", self.links.home.clone()).text("Home"),
            Element::new("a").attr("href", self.links.listing.clone()).text("Work"),
            Element::with_class("span", "breadcrumb-current")
                .attr("aria-current", "page")
                .text(project.title.clone()),
        ]
    }

    fn pager(&self) -> Vec<Element> {
        if !self.nav.can_navigate() {
            return Vec::new();
        }
        let link = |id: Option<&str>, rel: &str, class: &str| {
            let id = id?;
            let title = self.index.get(id).map_or(id, |entry| entry.title.as_str());
            Some(
                Element::with_class("a", class)
                    .attr("href", page_href(&self.links.page_prefix, id))
                    .attr("rel", rel)
                    .attr("data-project-id", id)
                    .text(title),
            )
        };
        [
            link(self.nav.prev_id(), "prev", "pager-prev"),
            link(self.nav.next_id(), "next", "pager-next"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn hero(project: &ProjectEntry) -> Vec<Element> {
    let mut hero = vec![Element::with_class("h1", class::TITLE).text(project.title.clone())];

    if let Some(subtitle) = project.display_subtitle() {
        hero.push(Element::with_class("p", class::SUBTITLE).text(subtitle));
    }

    let meta: Vec<_> = [
        ("meta-company", project.company.as_deref()),
        ("meta-role", project.job_title.as_deref()),
        ("meta-year", project.year.as_deref()),
        ("meta-duration", project.duration.as_deref()),
    ]
    .into_iter()
    .filter_map(|(class, value)| {
        let value = value.filter(|v| !v.trim().is_empty())?;
        Some(Element::with_class("span", class).text(value))
    })
    .collect();
    if !meta.is_empty() {
        hero.push(Element::with_class("div", class::META).children(meta));
    }

    if let Some(hook) = project.hero_hook() {
        hero.push(render_hero_hook(&hook));
    }

    let images = project.hero_images();
    if !images.is_empty() {
        let alt = project.title.as_str();
        hero.push(Element::with_class("div", class::HERO_IMAGES).children(
            images.into_iter().map(|src| {
                Element::new("img")
                    .attr("src", src)
                    .attr("alt", alt)
                    .attr("loading", "eager")
            }),
        ));
    }

    let metrics = project.effective_metrics();
    if !metrics.is_empty() {
        hero.push(
            Element::with_class("div", class::HERO_METRICS)
                .children(metrics.iter().take(HERO_METRIC_LIMIT).map(create_metric_card)),
        );
    }
    hero
}

fn tags(project: &ProjectEntry) -> Vec<Element> {
    project
        .tags
        .iter()
        .filter(|tag| !tag.trim().is_empty())
        .map(|tag| Element::with_class("li", "tag").text(tag.clone()))
        .collect()
}

fn overview(project: &ProjectEntry) -> Option<Element> {
    project
        .overview_text()
        .map(|text| Element::with_class("p", "overview-text").text(text))
}

fn technical(project: &ProjectEntry) -> Vec<Element> {
    project
        .technical
        .iter()
        .map(|section| {
            let items = section.entries().map(|item| match item {
                TechnicalItem::Pair(key, value) => Element::with_class("li", "technical-pair")
                    .child(Element::with_class("span", "technical-key").text(key))
                    .child(Element::with_class("span", "technical-value").text(value)),
                TechnicalItem::Plain(text) => Element::new("li").text(text),
            });
            Element::with_class("div", "technical-section")
                .child(Element::with_class("h3", "technical-label").text(section.label.clone()))
                .child(Element::with_class("ul", "technical-items").children(items))
        })
        .collect()
}
