//! `[site]` configuration.
//!
//! Owner metadata shared by page shells, the sitemap and the ATS `Person` node.

use crate::config::ConfigDiagnostics;
use macros::Config;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "site")]
pub struct SiteSectionConfig {
    /// Portfolio title.
    #[config(inline_doc)]
    pub title: String,

    /// Portfolio owner.
    #[config(inline_doc)]
    pub author: String,

    /// Owner's job title, used for the `Person` node.
    #[config(inline_doc)]
    pub job_title: String,

    /// Contact email.
    #[config(inline_doc)]
    pub email: String,

    /// Site description.
    #[config(inline_doc)]
    pub description: String,

    /// Canonical site URL (e.g., "https://jane.dev").
    #[config(inline_doc)]
    pub url: Option<String>,

    /// Language code (e.g., "en").
    #[config(inline_doc)]
    pub language: String,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            job_title: String::new(),
            email: String::new(),
            description: String::new(),
            url: None,
            language: "en".into(),
        }
    }
}

impl SiteSectionConfig {
    /// Validate site configuration.
    ///
    /// # Checks
    /// - If `sitemap_enabled`, `url` must be set
    /// - `url` must be an http(s) URL with a host
    pub fn validate(&self, sitemap_enabled: bool, diag: &mut ConfigDiagnostics) {
        if sitemap_enabled && self.url.is_none() {
            diag.error_with_hint(
                Self::FIELDS.url,
                format!(
                    "{} is enabled but {} is not configured",
                    super::BuildSectionConfig::FIELDS.sitemap,
                    Self::FIELDS.url
                ),
                format!("set {}, e.g.: \"https://example.com\"", Self::FIELDS.url),
            );
        }

        let Some(url_str) = &self.url else {
            return;
        };
        match url::Url::parse(url_str) {
            Ok(parsed) => {
                if !matches!(parsed.scheme(), "http" | "https") {
                    diag.error_with_hint(
                        Self::FIELDS.url,
                        format!(
                            "scheme '{}' not supported, must be http or https",
                            parsed.scheme()
                        ),
                        "use format like https://example.com",
                    );
                }
                if parsed.host_str().is_none() {
                    diag.error_with_hint(
                        Self::FIELDS.url,
                        "URL must have a valid host",
                        "use format like https://example.com",
                    );
                }
            }
            Err(e) => {
                diag.error_with_hint(
                    Self::FIELDS.url,
                    format!("invalid URL: {e}"),
                    "use format like https://example.com",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(url: Option<&str>) -> SiteSectionConfig {
        SiteSectionConfig {
            url: url.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_url() {
        let mut diag = ConfigDiagnostics::new();
        site(Some("https://jane.dev/")).validate(true, &mut diag);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_rejects_bad_scheme_and_garbage() {
        let mut diag = ConfigDiagnostics::new();
        site(Some("ftp://jane.dev")).validate(false, &mut diag);
        assert_eq!(diag.errors().len(), 1);

        let mut diag = ConfigDiagnostics::new();
        site(Some("not a url")).validate(false, &mut diag);
        assert_eq!(diag.errors().len(), 1);
    }

    #[test]
    fn test_sitemap_requires_url() {
        let mut diag = ConfigDiagnostics::new();
        site(None).validate(true, &mut diag);
        assert!(diag.has_errors());

        let mut diag = ConfigDiagnostics::new();
        site(None).validate(false, &mut diag);
        assert!(!diag.has_errors());
    }
}
