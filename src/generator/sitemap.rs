//! Sitemap generation.
//!
//! Lists the landing page and one URL per case study, in index order.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://jane.dev/work/acme/</loc>
//!     <lastmod>2026-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::{
    assemble::Links,
    config::FolioConfig,
    content::ProjectIndex,
    generator::minify_markup,
    log,
    utils::{date::DateTimeUtc, html, path::page_href},
};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const SITEMAP_FILE: &str = "sitemap.xml";

/// Build sitemap if enabled. Returns the written path.
pub fn build_sitemap(config: &FolioConfig, index: &ProjectIndex) -> Result<Option<PathBuf>> {
    if !config.build.sitemap {
        return Ok(None);
    }
    let lastmod = DateTimeUtc::now().to_date();
    let sitemap = Sitemap::build(config, index, Some(&lastmod));
    sitemap.write(config).map(Some)
}

struct Sitemap {
    urls: Vec<UrlEntry>,
}

struct UrlEntry {
    loc: String,
    lastmod: Option<String>,
}

impl Sitemap {
    fn build(config: &FolioConfig, index: &ProjectIndex, lastmod: Option<&str>) -> Self {
        let links = Links::for_site(&config.path_prefix(), &config.build.page_path);
        let entry = |href: &str| {
            // validation guarantees `site.url` whenever the sitemap is on
            config.absolute_url(href).map(|loc| UrlEntry {
                loc,
                lastmod: lastmod.map(str::to_string),
            })
        };

        let urls = std::iter::once(entry(&links.home))
            .chain(
                index
                    .ids()
                    .iter()
                    .map(|id| entry(&page_href(&links.page_prefix, id))),
            )
            .flatten()
            .collect();

        Self { urls }
    }

    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(256 + self.urls.len() * 96);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for entry in self.urls {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&html::escape(&entry.loc));
            xml.push_str("</loc>\n");
            if let Some(lastmod) = entry.lastmod {
                xml.push_str("    <lastmod>");
                xml.push_str(&lastmod);
                xml.push_str("</lastmod>\n");
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    fn write(self, config: &FolioConfig) -> Result<PathBuf> {
        let sitemap_path = config.build.output.join(SITEMAP_FILE);
        let url_count = self.urls.len();
        let xml = self.into_xml();
        let xml = minify_markup(&xml, config.build.minify);

        fs::create_dir_all(&config.build.output).with_context(|| {
            format!("Failed to create {}", config.build.output.display())
        })?;
        fs::write(&sitemap_path, xml.as_bytes())
            .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;

        log!("sitemap"; "{} ({})", SITEMAP_FILE, crate::utils::plural_count(url_count, "url"));
        Ok(sitemap_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> ProjectIndex {
        ProjectIndex::from_json(r#"{"acme": {"title": "Acme"}, "zen & co": {"title": "Zen"}}"#)
            .unwrap()
    }

    fn config(url: &str) -> FolioConfig {
        let mut config = FolioConfig::default();
        config.site.url = Some(url.into());
        config.build.sitemap = true;
        config
    }

    #[test]
    fn test_sitemap_empty() {
        let xml = Sitemap { urls: vec![] }.into_xml();
        assert!(xml.contains(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#)));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn test_sitemap_lists_pages_in_index_order() {
        let xml = Sitemap::build(&config("https://jane.dev"), &index(), Some("2026-01-01")).into_xml();
        let home = xml.find("<loc>https://jane.dev/</loc>").unwrap();
        let acme = xml.find("<loc>https://jane.dev/work/acme/</loc>").unwrap();
        let zen = xml.find("<loc>https://jane.dev/work/zen &amp; co/</loc>").unwrap();
        assert!(home < acme && acme < zen);
        assert_eq!(xml.matches("<lastmod>2026-01-01</lastmod>").count(), 3);
    }

    #[test]
    fn test_sitemap_respects_deploy_prefix() {
        let xml =
            Sitemap::build(&config("https://jane.github.io/portfolio/"), &index(), None).into_xml();
        assert!(xml.contains("<loc>https://jane.github.io/portfolio/</loc>"));
        assert!(xml.contains("<loc>https://jane.github.io/portfolio/work/acme/</loc>"));
        assert!(!xml.contains("<lastmod>"));
    }

    #[test]
    fn test_build_sitemap_writes_minified_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config("https://jane.dev");
        config.build.output = dir.path().join("public");

        let path = build_sitemap(&config, &index()).unwrap().unwrap();
        let written = fs::read_to_string(path).unwrap();
        assert!(!written.contains('\n'));
        assert_eq!(written.matches("<url>").count(), 3);

        config.build.sitemap = false;
        assert!(build_sitemap(&config, &index()).unwrap().is_none());
    }
}
