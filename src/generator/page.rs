//! HTML document shell for pre-rendered case studies.
//!
//! ```text
//! <!DOCTYPE html>
//! <html lang="{site.language}">
//! <head> charset, viewport, title, description, canonical, stylesheets </head>
//! <body><main>{article.case-study}</main></body>
//! </html>
//! ```

use crate::config::FolioConfig;
use crate::content::ProjectEntry;
use crate::generator::minify_markup;
use crate::utils::html::{escape, escape_attr};

/// Wrap a rendered page fragment into a full document.
///
/// `href` is the page's own root-relative URL, used for the canonical link.
pub fn render_document(
    config: &FolioConfig,
    project: Option<&ProjectEntry>,
    href: &str,
    fragment: &str,
) -> String {
    let site = &config.site;
    let title = match project.map(|p| p.title.as_str()).filter(|t| !t.is_empty()) {
        Some(project_title) if !site.title.is_empty() => format!("{project_title} | {}", site.title),
        Some(project_title) => project_title.to_string(),
        None => site.title.clone(),
    };
    let description = project
        .and_then(ProjectEntry::overview_text)
        .unwrap_or(site.description.as_str());

    let mut head = Vec::new();
    head.push("<meta charset=\"utf-8\">".to_string());
    head.push(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">".to_string(),
    );
    head.push(format!("<title>{}</title>", escape(&title)));
    if !description.is_empty() {
        head.push(format!(
            "<meta name=\"description\" content=\"{}\">",
            escape_attr(description)
        ));
    }
    if !site.author.is_empty() {
        head.push(format!(
            "<meta name=\"author\" content=\"{}\">",
            escape_attr(&site.author)
        ));
    }
    if let Some(canonical) = config.absolute_url(href) {
        head.push(format!(
            "<link rel=\"canonical\" href=\"{}\">",
            escape_attr(&canonical)
        ));
    }
    for stylesheet in &config.build.stylesheets {
        head.push(format!(
            "<link rel=\"stylesheet\" href=\"{}\">",
            escape_attr(stylesheet)
        ));
    }

    let mut shell = String::with_capacity(1024);
    shell.push_str("<!DOCTYPE html>\n");
    shell.push_str(&format!("<html lang=\"{}\">\n<head>\n", escape_attr(&site.language)));
    for line in head {
        shell.push_str("  ");
        shell.push_str(&line);
        shell.push('\n');
    }
    shell.push_str("</head>\n<body>\n<main>\n");
    let tail = "\n</main>\n</body>\n</html>\n";

    // the fragment carries values verbatim, only the shell is minified
    let minify = config.build.minify;
    let mut doc = String::with_capacity(shell.len() + fragment.len() + tail.len());
    doc.push_str(&minify_markup(&shell, minify));
    doc.push_str(fragment);
    doc.push_str(&minify_markup(tail, minify));
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ProjectIndex;

    fn config() -> FolioConfig {
        let mut config = FolioConfig::default();
        config.site.title = "Jane Doe".into();
        config.site.url = Some("https://jane.dev".into());
        config.build.stylesheets = vec!["/css/site.css".into()];
        config.build.minify = false;
        config
    }

    #[test]
    fn test_document_head() {
        let index = ProjectIndex::from_json(
            r#"{"acme": {"title": "Acme <CRM>", "cardOverview": "Rebuilt \"sales\" tooling"}}"#,
        )
        .unwrap();
        let html = render_document(&config(), index.get("acme"), "/work/acme/", "<article></article>");

        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(html.contains("<title>Acme &lt;CRM&gt; | Jane Doe</title>"));
        assert!(html.contains(r#"content="Rebuilt &quot;sales&quot; tooling""#));
        assert!(html.contains(r#"<link rel="canonical" href="https://jane.dev/work/acme/">"#));
        assert!(html.contains(r#"<link rel="stylesheet" href="/css/site.css">"#));
        assert!(html.contains("<main>\n<article></article>\n</main>"));
    }

    #[test]
    fn test_document_without_project_or_url() {
        let mut config = config();
        config.site.url = None;
        config.build.minify = true;
        let html = render_document(&config, None, "/", "<div></div>");

        assert!(html.contains("<title>Jane Doe</title>"));
        assert!(!html.contains("canonical"));
        assert!(!html.contains('\n'));
    }

    #[test]
    fn test_minify_keeps_fragment_text() {
        let mut config = config();
        config.build.minify = true;
        let html = render_document(&config, None, "/", "<p>Line one\n  Line two</p>");

        assert!(html.contains("<main><p>Line one\n  Line two</p></main>"));
        assert!(html.starts_with("<!DOCTYPE html><html lang=\"en\"><head>"));
    }
}
