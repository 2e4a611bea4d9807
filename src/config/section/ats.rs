//! `[ats]` configuration.
//!
//! # Example
//!
//! ```toml
//! [ats]
//! enable = true
//! target = "public/index.html"
//! placeholder = "ats-content"
//!
//! [[ats.projects]]
//! id = "acme"
//! json_path = "data/acme.json"
//! project_key = "acme"
//! priority = 1
//! ```

use macros::Config;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{ConfigDiagnostics, FieldPath};

/// `projects` is skipped by the derive, so its path is spelled here.
const PROJECTS: FieldPath = FieldPath::new("ats.projects");

#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "ats")]
pub struct AtsSectionConfig {
    /// Generate ATS markup during `folio build`.
    #[config(inline_doc)]
    pub enable: bool,

    /// HTML file the markup is injected into.
    #[config(inline_doc)]
    pub target: Option<PathBuf>,

    /// ID of the placeholder element in `target`.
    #[config(inline_doc)]
    pub placeholder: String,

    /// Copy `target` to `<target>.backup` before writing.
    #[config(inline_doc)]
    pub backup: bool,

    /// Projects included in the ATS batch.
    #[config(skip)]
    pub projects: Vec<AtsProject>,
}

impl Default for AtsSectionConfig {
    fn default() -> Self {
        Self {
            enable: false,
            target: None,
            placeholder: "ats-content".into(),
            backup: true,
            projects: Vec::new(),
        }
    }
}

/// One `[[ats.projects]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AtsProject {
    pub id: String,
    /// Detail record, when the project has one.
    #[serde(default)]
    pub json_path: Option<PathBuf>,
    /// Index to look the entry up in; defaults to `build.index`.
    #[serde(default)]
    pub index_path: Option<PathBuf>,
    /// Key of the entry inside the index; defaults to `id`.
    #[serde(default)]
    pub project_key: Option<String>,
    #[serde(default)]
    pub priority: i32,
}

impl AtsProject {
    pub fn key(&self) -> &str {
        self.project_key.as_deref().unwrap_or(&self.id)
    }

    pub(crate) fn normalize(&mut self, root: &Path) {
        let join = |p: &PathBuf| crate::utils::path::normalize_path(&root.join(p));
        self.json_path = self.json_path.as_ref().map(join);
        self.index_path = self.index_path.as_ref().map(join);
    }
}

impl AtsSectionConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.enable {
            if self.target.is_none() {
                diag.error_with_hint(
                    Self::FIELDS.target,
                    format!("{} is enabled but no target is set", Self::FIELDS.enable),
                    "set the HTML file to inject into, e.g.: \"public/index.html\"",
                );
            }
            if self.placeholder.trim().is_empty() {
                diag.error(Self::FIELDS.placeholder, "placeholder ID must not be empty");
            }
            if self.projects.is_empty() {
                diag.warn(PROJECTS, "no projects configured, output will be empty");
            }
        }

        let mut seen = FxHashSet::default();
        for project in &self.projects {
            if project.id.trim().is_empty() {
                diag.error(PROJECTS, "project id must not be empty");
            } else if !seen.insert(project.id.as_str()) {
                diag.error(
                    PROJECTS,
                    format!("duplicate project id `{}`", project.id),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str) -> AtsProject {
        AtsProject {
            id: id.into(),
            json_path: None,
            index_path: None,
            project_key: None,
            priority: 0,
        }
    }

    #[test]
    fn test_parse_projects() {
        let config: AtsSectionConfig = toml::from_str(
            r#"
            enable = true
            target = "index.html"

            [[projects]]
            id = "acme"
            json_path = "data/acme.json"
            priority = 2

            [[projects]]
            id = "zen"
            project_key = "zen-garden"
            "#,
        )
        .unwrap();
        assert_eq!(config.placeholder, "ats-content");
        assert_eq!(config.projects.len(), 2);
        assert_eq!(config.projects[0].key(), "acme");
        assert_eq!(config.projects[1].key(), "zen-garden");
        assert_eq!(config.projects[1].priority, 0);
    }

    #[test]
    fn test_enabled_requires_target() {
        let config = AtsSectionConfig {
            enable: true,
            projects: vec![project("acme")],
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
    }

    #[test]
    fn test_duplicate_ids() {
        let config = AtsSectionConfig {
            projects: vec![project("acme"), project("zen"), project("acme")],
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
        assert!(diag.errors()[0].message.contains("acme"));
    }

    #[test]
    fn test_empty_projects_warns() {
        let config = AtsSectionConfig {
            enable: true,
            target: Some("index.html".into()),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().len(), 1);
    }
}
