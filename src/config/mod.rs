//! Portfolio configuration management for `folio.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── ats        # [ats] and [[ats.projects]]
//! │   ├── build      # [build]
//! │   └── site       # [site]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # Config discovery, URL helpers
//! └── mod.rs         # FolioConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section             | Purpose                                        |
//! |---------------------|------------------------------------------------|
//! | `[site]`            | Owner metadata, canonical URL                  |
//! | `[build]`           | Index, data root, output, stylesheets, sitemap |
//! | `[ats]`             | ATS target, placeholder, backup                |
//! | `[[ats.projects]]`  | Projects in the ATS batch                      |

pub mod section;
pub mod types;
mod util;

pub use section::{AtsProject, AtsSectionConfig, BuildSectionConfig, SiteSectionConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{BuildArgs, Cli, Commands},
    log,
    utils::path::normalize_path,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::{extract_url_path, find_config_file};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSectionConfig,

    #[serde(default)]
    pub build: BuildSectionConfig,

    #[serde(default)]
    pub ats: AtsSectionConfig,
}

impl FolioConfig {
    /// Load configuration for a non-init command.
    ///
    /// Searches upward from cwd to find the config file; the project root is
    /// the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = find_config_file(&cli.config)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.config_path = normalize_path(&config_path);
        config.apply_command_options(cli);
        config.normalize_paths(&root);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Commented template written by `folio init`.
    pub fn template() -> String {
        [
            SiteSectionConfig::template_with_header(),
            BuildSectionConfig::template_with_header(),
            AtsSectionConfig::template_with_header(),
        ]
        .join("\n")
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Deploy prefix taken from the path of `site.url` (`""` at domain root).
    pub fn path_prefix(&self) -> String {
        self.site
            .url
            .as_deref()
            .and_then(extract_url_path)
            .unwrap_or_default()
    }

    /// Absolute URL of a root-relative href, when `site.url` is set.
    ///
    /// `href` already carries the deploy prefix, so only the origin is joined.
    pub fn absolute_url(&self, href: &str) -> Option<String> {
        let url = url::Url::parse(self.site.url.as_deref()?).ok()?;
        let origin = url.origin().ascii_serialization();
        Some(format!("{origin}/{}", href.trim_start_matches('/')))
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { build_args } => self.apply_build_args(build_args),
            Commands::Ats { target, .. } => {
                // running `folio ats` implies the section is on
                self.ats.enable = true;
                if let Some(target) = target {
                    self.ats.target = Some(target.clone());
                }
            }
            Commands::Init { .. } | Commands::Render { .. } | Commands::Validate { .. } => {}
        }
    }

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs) {
        Self::update_option(&mut self.build.output, args.output.as_ref());
        Self::update_option(&mut self.build.minify, args.minify.as_ref());
        Self::update_option(&mut self.build.sitemap, args.sitemap.as_ref());
        Self::update_option(&mut self.ats.enable, args.ats.as_ref());

        if let Some(ref url) = args.site_url {
            self.site.url = Some(url.clone());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Normalize all paths relative to root directory.
    fn normalize_paths(&mut self, root: &Path) {
        let root = normalize_path(root);

        self.build.index = normalize_path(&root.join(&self.build.index));
        self.build.data_root = normalize_path(&root.join(&self.build.data_root));
        self.build.output = normalize_path(&root.join(&self.build.output));

        if let Some(target) = self.ats.target.take() {
            self.ats.target = Some(normalize_path(&root.join(target)));
        }
        for project in &mut self.ats.projects {
            project.normalize(&root);
        }

        self.root = root;
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(self.build.sitemap, &mut diag);
        self.build.validate(&mut diag);
        self.ats.validate(&mut diag);

        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> FolioConfig {
    let (parsed, ignored) = FolioConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
