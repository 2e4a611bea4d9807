//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Path component of a URL, without surrounding slashes.
///
/// This is the deploy prefix of `site.url` (`https://jane.github.io/portfolio`
/// serves pages under `/portfolio`). Returns `None` for unparsable URLs.
///
/// ```ignore
/// extract_url_path("https://jane.github.io/portfolio/") -> Some("portfolio")
/// extract_url_path("https://jane.dev")                  -> Some("")
/// extract_url_path("jane.dev")                          -> None
/// ```
pub fn extract_url_path(url_str: &str) -> Option<String> {
    let parsed = url::Url::parse(url_str).ok()?;
    Some(parsed.path().trim_matches('/').to_string())
}

/// Find config file by searching upward from current directory
///
/// ```text
/// /home/jane/site/data/projects/  ← cwd
/// /home/jane/site/folio.toml      ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    find_config_from(&cwd, config_name)
}

fn find_config_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// tests
// ============================================================================
