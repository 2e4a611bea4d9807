//! `[build]` configuration.

use macros::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "build")]
pub struct BuildSectionConfig {
    /// Project index JSON (object keyed by project ID).
    #[config(inline_doc)]
    pub index: PathBuf,

    /// Directory that site-absolute `contentFile` paths resolve against.
    #[config(inline_doc)]
    pub data_root: PathBuf,

    /// Output directory for rendered pages.
    #[config(inline_doc)]
    pub output: PathBuf,

    /// URL segment case studies live under (`/work/<id>/`).
    #[config(inline_doc)]
    pub page_path: String,

    /// Stylesheet hrefs linked from every page.
    #[config(inline_doc)]
    pub stylesheets: Vec<String>,

    /// Minify HTML and XML output.
    #[config(inline_doc)]
    pub minify: bool,

    /// Write `sitemap.xml` into the output directory.
    #[config(inline_doc)]
    pub sitemap: bool,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            index: "data/projects.json".into(),
            data_root: ".".into(),
            output: "public".into(),
            page_path: "work".into(),
            stylesheets: Vec::new(),
            minify: true,
            sitemap: false,
        }
    }
}

impl BuildSectionConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let segment = self.page_path.trim_matches('/');
        if segment.is_empty() {
            diag.error_with_hint(
                Self::FIELDS.page_path,
                "must not be empty",
                "use a URL segment like \"work\"",
            );
        } else if segment.contains(|c: char| c.is_whitespace() || c == '?' || c == '#') {
            diag.error(
                Self::FIELDS.page_path,
                format!("`{segment}` is not a valid URL segment"),
            );
        }
        if self.index.as_os_str().is_empty() {
            diag.error(Self::FIELDS.index, "must not be empty");
        }
    }
}
