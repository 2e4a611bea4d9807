//! Site building orchestration.
//!
//! Build phases:
//! - **Init** - Load the index, clean and create the output directory
//! - **Render** - Assemble every case study in index order
//! - **Post-process** - Sitemap and ATS injection, in parallel

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::{
    assemble::{Assembler, FsSource, Links, Outcome},
    config::FolioConfig,
    content::{BodySource, ProjectIndex},
    debug,
    generator::{page::render_document, sitemap::build_sitemap},
    log,
    logger::ProgressLine,
    render::builtin_registry,
    utils::plural_count,
};

use super::render::assemble_page;

/// Number of pages written and how many of them carry an inline fetch error.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub pages: usize,
    pub failed: usize,
}

/// Build the entire site.
///
/// Pipeline: init -> render -> post-process
pub fn build_site(config: &FolioConfig, clean: bool, quiet: bool) -> Result<BuildStats> {
    let index = ProjectIndex::load(&config.build.index)
        .with_context(|| format!("failed to load {}", config.build.index.display()))?;

    init_output(&config.build.output, clean)?;

    let stats = render_pages(config, &index, quiet)?;

    if !quiet {
        log!("build"; "wrote {}", plural_count(stats.pages, "page"));
        if stats.failed > 0 {
            log!("warning"; "{} failed to load detail content", plural_count(stats.failed, "page"));
        }
    }

    post_process(config, &index)?;
    Ok(stats)
}

/// Optionally wipe, then create the output directory.
fn init_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        debug!("build"; "cleaning {}", output.display());
        fs::remove_dir_all(output)
            .with_context(|| format!("failed to clean {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))
}

fn render_pages(config: &FolioConfig, index: &ProjectIndex, quiet: bool) -> Result<BuildStats> {
    let links = Links::for_site(&config.path_prefix(), &config.build.page_path);
    let source = FsSource::new(&config.build.data_root);
    let pages_dir = config.build.output.join(&config.build.page_path);

    let detail_count = index
        .iter()
        .filter(|entry| matches!(entry.body_source(), BodySource::Lazy(_)))
        .count();
    let progress = (!quiet).then(|| {
        ProgressLine::new(&[
            ("inline", index.len() - detail_count),
            ("detail", detail_count),
        ])
    });

    let runtime = tokio::runtime::Runtime::new()?;
    let stats = runtime.block_on(async {
        let mut assembler = Assembler::new(index, builtin_registry()).with_links(links.clone());
        let mut stats = BuildStats::default();

        for entry in index.iter() {
            let page = assemble_page(&mut assembler, &source, &links, &entry.id).await?;
            if page.outcome == Outcome::Failed {
                stats.failed += 1;
            }

            let html = render_document(config, Some(entry), &page.href, &page.fragment);
            let dir = pages_dir.join(&entry.id);
            fs::create_dir_all(&dir)?;
            let path = dir.join("index.html");
            fs::write(&path, html).with_context(|| format!("failed to write {}", path.display()))?;
            stats.pages += 1;

            if let Some(progress) = &progress {
                match entry.body_source() {
                    BodySource::Lazy(_) => progress.inc("detail"),
                    _ => progress.inc("inline"),
                }
            }
        }
        anyhow::Ok(stats)
    })?;

    if let Some(progress) = progress {
        progress.finish();
    }
    Ok(stats)
}

/// Sitemap and ATS injection touch disjoint files.
fn post_process(config: &FolioConfig, index: &ProjectIndex) -> Result<()> {
    let (sitemap, ats) = rayon::join(
        || build_sitemap(config, index),
        || {
            if config.ats.enable {
                super::ats::generate_ats(config, false)
            } else {
                Ok(())
            }
        },
    );
    sitemap?;
    ats
}
