//! `folio render`: one case study to stdout or a file.

use std::fs;
use std::io::{Write, stdout};
use std::path::Path;

use anyhow::{Context, Result};

use crate::assemble::{Assembler, FsSource, Links, Outcome};
use crate::config::FolioConfig;
use crate::content::ProjectIndex;
use crate::generator::page::render_document;
use crate::log;
use crate::render::builtin_registry;
use crate::utils::path::page_href;

/// A populated case study ready to be written.
pub struct RenderedPage {
    pub href: String,
    pub fragment: String,
    pub outcome: Outcome,
}

/// Open `id` in `assembler` and serialize the resulting page.
pub async fn assemble_page(
    assembler: &mut Assembler<'_>,
    source: &FsSource,
    links: &Links,
    id: &str,
) -> Result<RenderedPage> {
    let outcome = assembler
        .open(id, source)
        .await
        .with_context(|| format!("cannot render `{id}`"))?;
    Ok(RenderedPage {
        href: page_href(&links.page_prefix, id),
        fragment: assembler.page().to_html(),
        outcome,
    })
}

pub fn render_project(
    config: &FolioConfig,
    id: &str,
    output: Option<&Path>,
    fragment: bool,
) -> Result<()> {
    let index = ProjectIndex::load(&config.build.index)
        .with_context(|| format!("failed to load {}", config.build.index.display()))?;
    let links = Links::for_site(&config.path_prefix(), &config.build.page_path);
    let source = FsSource::new(&config.build.data_root);

    let runtime = tokio::runtime::Runtime::new()?;
    let page = runtime.block_on(async {
        let mut assembler = Assembler::new(&index, builtin_registry()).with_links(links.clone());
        assemble_page(&mut assembler, &source, &links, id).await
    })?;

    if page.outcome == Outcome::Failed {
        log!("warning"; "`{}` rendered with an inline loading error", id);
    }

    let html = if fragment {
        page.fragment
    } else {
        render_document(config, index.get(id), &page.href, &page.fragment)
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, html)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log!("render"; "wrote {}", path.display());
        }
        None => {
            let mut out = stdout().lock();
            out.write_all(html.as_bytes())?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn site() -> (tempfile::TempDir, FolioConfig) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(
            dir.path().join("data/projects.json"),
            r#"{
                "acme": {"title": "Acme", "contentFile": "/data/acme.json"},
                "zen": {"title": "Zen", "contentBlocks": [{"type": "text", "content": "Line one\nLine two"}]}
            }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("data/acme.json"),
            r#"{"contentBlocks": [{"type": "key-insight", "label": "Insight", "text": "Users churn"}]}"#,
        )
        .unwrap();

        let mut config = test_parse_config("[site]\ntitle = \"Jane\"\n");
        config.build.index = dir.path().join("data/projects.json");
        config.build.data_root = dir.path().to_path_buf();
        (dir, config)
    }

    #[test]
    fn test_render_fragment_to_file() {
        let (dir, config) = site();
        let out = dir.path().join("out/acme.html");
        render_project(&config, "acme", Some(&out), true).unwrap();

        let html = fs::read_to_string(out).unwrap();
        assert!(html.starts_with("<article"));
        assert!(html.contains("Users churn"));
        assert!(!html.contains("content-loading"));
    }

    #[test]
    fn test_render_document_shell() {
        let (dir, config) = site();
        let out = dir.path().join("zen.html");
        render_project(&config, "zen", Some(&out), false).unwrap();

        let html = fs::read_to_string(out).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Zen | Jane</title>"));
        assert!(config.build.minify);
        assert!(html.contains("Line one\nLine two"));
    }

    #[test]
    fn test_render_unknown_project() {
        let (dir, config) = site();
        let err = render_project(&config, "ghost", Some(&dir.path().join("x.html")), true)
            .unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
