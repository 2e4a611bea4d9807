//! Project initialization.
//!
//! Writes a commented `folio.toml` and an empty project index.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::config::{BuildSectionConfig, FolioConfig};
use crate::log;

/// Initialize `root`, creating it when missing.
///
/// The config file is never overwritten unless `force` is set; an existing
/// project index is always kept.
pub fn new_project(root: &Path, config_name: &Path, force: bool) -> Result<()> {
    fs::create_dir_all(root).with_context(|| format!("failed to create {}", root.display()))?;

    let config_path = root.join(config_name);
    if config_path.exists() && !force {
        bail!(
            "`{}` already exists, pass --force to overwrite it",
            config_path.display()
        );
    }
    fs::write(&config_path, FolioConfig::template())
        .with_context(|| format!("failed to write config file '{}'", config_path.display()))?;

    let index_path = root.join(BuildSectionConfig::default().index);
    if !index_path.exists() {
        if let Some(parent) = index_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&index_path, "{}\n")
            .with_context(|| format!("failed to write {}", index_path.display()))?;
    }

    log!("init"; "initialized {}", root.display());
    Ok(())
}
